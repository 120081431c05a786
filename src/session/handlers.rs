use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use rand::{distr::Alphanumeric, Rng};
use serde::Deserialize;
use time::Duration;
use tracing::{info, instrument, warn};

use super::{
    cookie::{build_cookie, cookie_value, removal_cookie, LOGIN_STATE_COOKIE, SESSION_COOKIE},
    provider::{authorize_url, logout_url, IdentityProvider},
};
use crate::shared::{AppError, AppState};

const LOGIN_STATE_MAX_AGE: Duration = Duration::minutes(10);

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

fn random_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

fn identity_provider(state: &AppState) -> Result<&dyn IdentityProvider, AppError> {
    state.identity_provider.as_deref().ok_or_else(|| {
        warn!("Login attempted without an identity provider");
        AppError::ServiceUnavailable("No identity provider configured".to_string())
    })
}

/// HTTP handler starting the login flow
///
/// GET /login
/// Remembers a random state in a signed cookie and redirects to the provider
#[instrument(name = "login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    // nothing could finish the flow at /callback
    identity_provider(&state)?;

    let login_state = random_state();
    let state_token = state.session_keys.create_login_state_token(&login_state)?;
    let target = authorize_url(&state.settings.auth, &login_state)?;
    let secure = state.settings.application.environment.is_production();

    let jar = jar.add(build_cookie(
        LOGIN_STATE_COOKIE,
        state_token,
        LOGIN_STATE_MAX_AGE,
        secure,
    ));

    info!("Redirecting to identity provider");
    Ok((jar, Redirect::temporary(target.as_str())))
}

/// HTTP handler finishing the login flow
///
/// GET /callback
/// Verifies the returned state, lets the identity provider resolve the code
/// and stores the resulting profile in the session cookie
#[instrument(name = "callback", skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(CookieJar, Redirect), AppError> {
    if let Some(error) = query.error {
        warn!(error = %error, description = ?query.error_description, "Provider refused login");
        return Err(AppError::BadRequest(
            query.error_description.unwrap_or(error),
        ));
    }

    let expected_state = cookie_value(&jar, LOGIN_STATE_COOKIE)
        .and_then(|token| state.session_keys.validate_login_state_token(token).ok());
    match (expected_state, query.state.as_deref()) {
        (Some(expected), Some(received)) if expected == received => {}
        _ => {
            warn!("Login state missing or mismatched");
            return Err(AppError::BadRequest("Invalid state parameter".to_string()));
        }
    }

    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let profile = identity_provider(&state)?.exchange_code(&code).await?;

    let token = state.session_keys.create_session_token(&profile)?;
    let secure = state.settings.application.environment.is_production();
    let max_age = Duration::days(state.session_keys.expiration_days);

    let jar = jar
        .add(build_cookie(SESSION_COOKIE, token, max_age, secure))
        .add(removal_cookie(LOGIN_STATE_COOKIE, secure));

    info!(sub = %profile.sub, "User logged in");
    Ok((jar, Redirect::to("/")))
}

/// HTTP handler for logging out
///
/// GET /logout
/// Drops the session cookie and sends the browser through the provider logout
#[instrument(name = "logout", skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    request_headers: HeaderMap,
) -> Result<(CookieJar, Redirect), AppError> {
    let environment = state.settings.application.environment;
    let scheme = if environment.is_production() {
        "https"
    } else {
        "http"
    };
    let host = request_headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| state.settings.address());
    let target = logout_url(&state.settings.auth, &format!("{}://{}", scheme, host))?;

    let jar = jar.add(removal_cookie(SESSION_COOKIE, environment.is_production()));

    info!("User logged out");
    Ok((jar, Redirect::temporary(target.as_str())))
}
