use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::config::Settings;
use crate::scores::{repository::MatchRepository, ScoreError};
use crate::session::{provider::IdentityProvider, SessionKeys};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub match_repository: Arc<dyn MatchRepository>,
    /// Absent when no identity provider is wired up; login callbacks fail then.
    pub identity_provider: Option<Arc<dyn IdentityProvider>>,
    pub session_keys: SessionKeys,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        match_repository: Arc<dyn MatchRepository>,
        identity_provider: Option<Arc<dyn IdentityProvider>>,
        settings: Settings,
    ) -> Self {
        let session_keys = SessionKeys::from_settings(&settings.auth);
        Self {
            match_repository,
            identity_provider,
            session_keys,
            settings: Arc::new(settings),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ScoreError> for AppError {
    fn from(err: ScoreError) -> Self {
        match err {
            ScoreError::MatchNotFound => AppError::NotFound(err.to_string()),
            ScoreError::StorageUnavailable(msg) => AppError::DatabaseError(msg),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::SessionError(msg) => {
                warn!(error = %msg, "Session handling failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Session error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::scores::repository::InMemoryMatchRepository;

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        match_repository: Option<Arc<dyn MatchRepository>>,
        identity_provider: Option<Arc<dyn IdentityProvider>>,
        settings: Settings,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                match_repository: None,
                identity_provider: None,
                settings: Settings::default(),
            }
        }

        pub fn with_match_repository(mut self, repo: Arc<dyn MatchRepository>) -> Self {
            self.match_repository = Some(repo);
            self
        }

        pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
            self.identity_provider = Some(provider);
            self
        }

        pub fn with_settings(mut self, settings: Settings) -> Self {
            self.settings = settings;
            self
        }

        pub fn build(self) -> AppState {
            AppState::new(
                self.match_repository
                    .unwrap_or_else(|| Arc::new(InMemoryMatchRepository::new())),
                self.identity_provider,
                self.settings,
            )
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_errors_map_to_status_codes() {
        let cases = [
            (ScoreError::MatchNotFound, StatusCode::NOT_FOUND),
            (ScoreError::PlayerNotInMatch, StatusCode::BAD_REQUEST),
            (
                ScoreError::MalformedScore("x".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ScoreError::StorageUnavailable("down".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, status) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
