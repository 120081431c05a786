use axum::{
    http::{header, StatusCode},
    response::Response,
};
use url::form_urlencoded;

/// Location header of a redirect
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response should be a redirect")
        .to_str()
        .unwrap()
        .to_string()
}

/// Decoded value of `key` in the query part of `target`
#[allow(dead_code)]
pub fn query_param(target: &str, key: &str) -> Option<String> {
    let (_, query) = target.split_once('?')?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Asserts a 303 redirect to the scores page and returns its target
#[allow(dead_code)]
pub fn assert_scores_redirect(response: &Response) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(response);
    assert!(
        target.starts_with("/scores"),
        "expected redirect to /scores, got {}",
        target
    );
    target
}
