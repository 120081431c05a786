use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::{
    models::cloud_services,
    types::{AboutPage, CloudPage, HomePage, HomeQuery},
};
use crate::{session::SessionContext, shared::AppState};

/// GET /
#[instrument(name = "home", skip_all)]
pub async fn home(
    Extension(session): Extension<SessionContext>,
    Query(query): Query<HomeQuery>,
) -> Json<HomePage> {
    Json(HomePage {
        logged_in: session.is_logged_in(),
        user_name: session.profile().map(|p| p.name.clone()),
        error: query.error.filter(|e| !e.is_empty()),
    })
}

/// HEAD / for uptime probes
pub async fn home_head() -> StatusCode {
    StatusCode::OK
}

/// GET /about
#[instrument(name = "about", skip_all)]
pub async fn about(Extension(session): Extension<SessionContext>) -> Json<AboutPage> {
    Json(AboutPage {
        logged_in: session.is_logged_in(),
        title: "About".to_string(),
        summary: "A small personal hub: self-hosted services and a scorekeeper for friendly rivalries."
            .to_string(),
    })
}

/// GET /cloud
#[instrument(name = "cloud", skip_all)]
pub async fn cloud(Extension(session): Extension<SessionContext>) -> Json<CloudPage> {
    let services = cloud_services();
    debug!(service_count = services.len(), "Listing cloud services");

    Json(CloudPage {
        logged_in: session.is_logged_in(),
        services,
    })
}

/// GET /.well-known/matrix/server
pub async fn matrix_server(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "m.server": format!("{}:443", state.settings.application.matrix_host),
    }))
}

/// GET /.well-known/matrix/client
pub async fn matrix_client(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "m.homeserver": {
            "base_url": format!("https://{}", state.settings.application.matrix_host),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionState, UserProfile};
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt; // for `oneshot`

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn with_session(router: Router, session: SessionContext) -> Router {
        router.layer(Extension(session))
    }

    #[tokio::test]
    async fn test_home_reports_login_and_error() {
        let session = SessionContext {
            state: SessionState::Authenticated(UserProfile {
                sub: "auth0|1".to_string(),
                name: "Rob".to_string(),
                nickname: String::new(),
                picture: String::new(),
            }),
        };
        let app = with_session(Router::new().route("/", get(home)), session);

        let response = app
            .oneshot(Request::get("/?error=Match%20not%20found").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page = body_json(response).await;
        assert_eq!(page["logged_in"], true);
        assert_eq!(page["user_name"], "Rob");
        assert_eq!(page["error"], "Match not found");
    }

    #[tokio::test]
    async fn test_corrupt_session_reads_as_logged_out() {
        let session = SessionContext {
            state: SessionState::Corrupt,
        };
        let app = with_session(Router::new().route("/cloud", get(cloud)), session);

        let response = app
            .oneshot(Request::get("/cloud").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let page = body_json(response).await;
        assert_eq!(page["logged_in"], false);
        assert_eq!(page["services"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_matrix_delegation() {
        let app = Router::new()
            .route("/server", get(matrix_server))
            .route("/client", get(matrix_client))
            .with_state(AppStateBuilder::new().build());

        let server = body_json(
            app.clone()
                .oneshot(Request::get("/server").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(server["m.server"], "matrix.robswebhub.net:443");

        let client = body_json(
            app.oneshot(Request::get("/client").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(
            client["m.homeserver"]["base_url"],
            "https://matrix.robswebhub.net"
        );
    }
}
