use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const SESSION_COOKIE: &str = "auth-session";
pub const LOGIN_STATE_COOKIE: &str = "auth-state";

/// Value of the cookie called `name`, with RFC 6265 quotes stripped
pub fn cookie_value<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name).map(|cookie| cookie.value_trimmed())
}

/// HttpOnly, Lax cookie on `/`
pub fn build_cookie(
    name: &'static str,
    value: String,
    max_age: Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

/// Cookie that makes the browser drop `name`, whether or not it sent one
pub fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = build_cookie(name, String::new(), Duration::ZERO, secure);
    cookie.make_removal();
    cookie
}
