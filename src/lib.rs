// Library crate for the robswebhub server
// This file exposes the public API for integration tests

pub mod config;
pub mod pages;
pub mod scores;
pub mod session;
pub mod shared;

use axum::{
    extract::Request,
    middleware,
    routing::{get, post},
    Router,
};
use sentry_tower::{NewSentryLayer, SentryHttpLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Re-export commonly used types for easier access in tests
pub use config::Settings;
pub use scores::{InMemoryMatchRepository, MatchRepository};
pub use session::{provider::IdentityProvider, SessionContext, SessionState, UserProfile};
pub use shared::{AppError, AppState};

/// Builds the full application router around `state`
pub fn build_router(state: AppState) -> Router {
    // Matrix clients fetch these cross-origin
    let well_known = Router::new()
        .route("/matrix/server", get(pages::matrix_server))
        .route("/matrix/client", get(pages::matrix_client))
        .layer(CorsLayer::permissive());

    let router = Router::new()
        .route("/", get(pages::home).head(pages::home_head))
        .route("/about", get(pages::about))
        .route("/cloud", get(pages::cloud))
        .route("/scores", get(scores::scores_index))
        .route("/scores/matches", post(scores::create_match))
        .route("/scores/single", post(scores::submit_single))
        .route("/scores/batch", post(scores::submit_batch))
        .route("/scores/chart/:id", get(scores::scores_chart))
        .route("/login", get(session::login))
        .route("/callback", get(session::callback))
        .route("/logout", get(session::logout))
        .nest("/.well-known", well_known)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_context,
        ));

    // Outside the session layer so it can tag the request's hub with the user
    let router = if state.settings.telemetry.sentry_enabled() {
        router
            .layer(SentryHttpLayer::with_transaction())
            .layer(NewSentryLayer::<Request>::new_from_top())
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{self, StatusCode},
    };
    use secrecy::SecretString;
    use tower::ServiceExt; // for `oneshot`

    fn settings_with_sentry() -> Settings {
        let mut settings = Settings::default();
        settings.telemetry.sentry_dsn = Some(SecretString::new(
            "https://key@o0.ingest.sentry.io/1"
                .to_string()
                .into_boxed_str(),
        ));
        settings
    }

    #[tokio::test]
    async fn test_router_serves_with_error_reporting_layers() {
        let app = build_router(
            AppStateBuilder::new()
                .with_settings(settings_with_sentry())
                .build(),
        );

        let response = app
            .clone()
            .oneshot(http::Request::head("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(http::Request::get("/scores").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_serves_without_error_reporting() {
        let app = build_router(AppStateBuilder::new().build());

        let response = app
            .oneshot(http::Request::get("/about").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
