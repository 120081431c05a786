use async_trait::async_trait;
use tracing::warn;
use url::Url;

use super::types::UserProfile;
use crate::config::AuthSettings;
use crate::shared::AppError;

/// Scopes requested from the provider on login
pub const LOGIN_SCOPES: &str = "openid profile";

/// The OAuth2/OIDC identity provider.
///
/// Exchanging the authorization code and verifying the ID token happen on
/// the provider side of this trait; the web layer only sees the profile.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<UserProfile, AppError>;
}

fn misconfigured(e: url::ParseError) -> AppError {
    warn!(error = %e, "Identity provider URL could not be built");
    AppError::ServiceUnavailable("Identity provider is misconfigured".to_string())
}

/// Authorization endpoint the browser is sent to on login
pub fn authorize_url(auth: &AuthSettings, state: &str) -> Result<Url, AppError> {
    Url::parse_with_params(
        &format!("https://{}/authorize", auth.domain),
        &[
            ("response_type", "code"),
            ("client_id", auth.client_id.as_str()),
            ("redirect_uri", auth.callback_url.as_str()),
            ("scope", LOGIN_SCOPES),
            ("state", state),
        ],
    )
    .map_err(misconfigured)
}

/// Provider logout endpoint that sends the browser back to `return_to`
pub fn logout_url(auth: &AuthSettings, return_to: &str) -> Result<Url, AppError> {
    Url::parse_with_params(
        &format!("https://{}/v2/logout", auth.domain),
        &[("returnTo", return_to), ("client_id", auth.client_id.as_str())],
    )
    .map_err(misconfigured)
}
