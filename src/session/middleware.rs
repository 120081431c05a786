use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, instrument, warn};

use super::{
    cookie::{cookie_value, SESSION_COOKIE},
    token::SessionKeys,
    types::UserProfile,
};
use crate::shared::AppState;

/// Outcome of reading the session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Authenticated(UserProfile),
    /// No session cookie, or an empty one
    Anonymous,
    /// A session cookie that failed signature, expiry or shape checks
    Corrupt,
}

/// Request-scoped view of who is asking.
///
/// Computed once per request by [`session_context`]; handlers extract it with
/// `Extension<SessionContext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub state: SessionState,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self {
            state: SessionState::Anonymous,
        }
    }

    /// Corrupt sessions count as logged out.
    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match &self.state {
            SessionState::Authenticated(profile) => Some(profile),
            SessionState::Anonymous | SessionState::Corrupt => None,
        }
    }
}

/// Reads the session cookie from `jar` into an explicit three-way state
pub fn read_session(jar: &CookieJar, keys: &SessionKeys) -> SessionState {
    let token = match cookie_value(jar, SESSION_COOKIE) {
        Some(token) if !token.is_empty() => token,
        _ => return SessionState::Anonymous,
    };

    match keys.validate_session_token(token) {
        Ok(profile) => SessionState::Authenticated(profile),
        Err(e) => {
            warn!(error = %e, "Ignoring corrupt session cookie");
            SessionState::Corrupt
        }
    }
}

/// Session middleware - attaches a [`SessionContext`] to every request.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), session::session_context))
#[instrument(skip_all)]
pub async fn session_context(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let session = read_session(&jar, &state.session_keys);
    debug!(
        logged_in = matches!(session, SessionState::Authenticated(_)),
        "Session read"
    );

    if let SessionState::Authenticated(profile) = &session {
        sentry::configure_scope(|scope| {
            scope.set_user(Some(sentry::User {
                id: Some(profile.sub.clone()),
                username: Some(profile.name.clone()),
                ..Default::default()
            }));
        });
    }

    req.extensions_mut().insert(SessionContext { state: session });
    next.run(req).await
}
