use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
};
use serde::de::DeserializeOwned;
use tower::ServiceExt;
use url::form_urlencoded;
use uuid::Uuid;

use robswebhub::scores::types::{ScoresPageResponse, WinChartResponse};

use super::{
    assertions::{assert_scores_redirect, query_param},
    setup::TestSetup,
};

// ============================================================================
// Action Helpers
// ============================================================================

#[allow(dead_code)]
impl TestSetup {
    /// Send a request through the full router
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> Response {
        self.send(
            Request::get(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn json<T: DeserializeOwned>(&self, uri: &str) -> T {
        let response = self.get(uri).await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    /// Create a match through the form endpoint and return its ID
    pub async fn create_match(&self, player1: &str, player2: &str) -> Uuid {
        let response = self
            .post_form(
                "/scores/matches",
                &[("player1", player1), ("player2", player2)],
            )
            .await;
        let target = assert_scores_redirect(&response);
        let id = query_param(&target, "matchup_id").expect("redirect should carry the match id");
        Uuid::parse_str(&id).unwrap()
    }

    /// Submit one game and return the redirect target
    pub async fn submit_single(
        &self,
        match_id: Uuid,
        winner: &str,
        score: &str,
        played_at: &str,
    ) -> String {
        let id = match_id.to_string();
        let response = self
            .post_form(
                "/scores/single",
                &[
                    ("matchup_id", id.as_str()),
                    ("winner_initials", winner),
                    ("score", score),
                    ("played_at", played_at),
                ],
            )
            .await;
        assert_scores_redirect(&response)
    }

    /// Submit a score sheet and return the redirect target
    pub async fn submit_batch(&self, match_id: Uuid, sheet: &str) -> String {
        let id = match_id.to_string();
        let response = self
            .post_form(
                "/scores/batch",
                &[("matchup_id", id.as_str()), ("raw_matches_list", sheet)],
            )
            .await;
        assert_scores_redirect(&response)
    }

    pub async fn scores_page(&self, match_id: Uuid) -> ScoresPageResponse {
        self.json(&format!("/scores?matchup_id={}", match_id)).await
    }

    pub async fn chart(&self, match_id: Uuid) -> WinChartResponse {
        self.json(&format!("/scores/chart/{}", match_id)).await
    }
}
