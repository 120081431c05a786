use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::types::{LoginStateClaims, SessionClaims, UserProfile};
use crate::config::AuthSettings;
use crate::shared::AppError;

/// Login state tokens only need to survive one provider round trip.
const LOGIN_STATE_MINUTES: i64 = 10;

/// Signing keys for session and login-state cookies
#[derive(Clone)]
pub struct SessionKeys {
    secret: SecretString,
    pub expiration_days: i64,
}

impl SessionKeys {
    pub fn new(secret: SecretString, expiration_days: i64) -> Self {
        Self {
            secret,
            expiration_days,
        }
    }

    pub fn from_settings(auth: &AuthSettings) -> Self {
        Self::new(auth.session_secret.clone(), auth.session_days)
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.expose_secret().as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.expose_secret().as_bytes())
    }

    /// Signs a session token carrying `profile`
    #[instrument(skip(self, profile), fields(sub = %profile.sub))]
    pub fn create_session_token(&self, profile: &UserProfile) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            profile: profile.clone(),
            exp: (now + Duration::days(self.expiration_days)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key()).map_err(|e| {
            debug!(error = %e, "Failed to encode session token");
            AppError::SessionError(e.to_string())
        })
    }

    /// Verifies signature and expiry of a session token
    #[instrument(skip(self, token))]
    pub fn validate_session_token(&self, token: &str) -> Result<UserProfile, AppError> {
        decode::<SessionClaims>(token, &self.decoding_key(), &Validation::default())
            .map(|data| data.claims.profile)
            .map_err(|e| {
                debug!(error = %e, "Failed to decode session token");
                AppError::SessionError(e.to_string())
            })
    }

    pub fn create_login_state_token(&self, state: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = LoginStateClaims {
            state: state.to_string(),
            exp: (now + Duration::minutes(LOGIN_STATE_MINUTES)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key())
            .map_err(|e| AppError::SessionError(e.to_string()))
    }

    /// Returns the state the login was started with
    pub fn validate_login_state_token(&self, token: &str) -> Result<String, AppError> {
        decode::<LoginStateClaims>(token, &self.decoding_key(), &Validation::default())
            .map(|data| data.claims.state)
            .map_err(|e| {
                debug!(error = %e, "Failed to decode login state token");
                AppError::SessionError(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> SessionKeys {
        SessionKeys::new(SecretString::new(secret.to_string().into_boxed_str()), 7)
    }

    fn profile() -> UserProfile {
        UserProfile {
            sub: "auth0|42".to_string(),
            name: "Rob".to_string(),
            nickname: "rob".to_string(),
            picture: "https://example.com/rob.png".to_string(),
        }
    }

    #[test]
    fn test_session_token_carries_profile() {
        let keys = keys("test-secret");
        let token = keys.create_session_token(&profile()).unwrap();

        assert_eq!(keys.validate_session_token(&token).unwrap(), profile());
    }

    #[test]
    fn test_session_token_from_other_secret_rejected() {
        let token = keys("one-secret").create_session_token(&profile()).unwrap();
        let result = keys("another-secret").validate_session_token(&token);
        assert!(matches!(result, Err(AppError::SessionError(_))));
    }

    #[test]
    fn test_tampered_session_token_rejected() {
        let keys = keys("test-secret");
        let mut token = keys.create_session_token(&profile()).unwrap();
        token.push('x');
        assert!(keys.validate_session_token(&token).is_err());
        assert!(keys.validate_session_token("not-a-jwt").is_err());
    }

    #[test]
    fn test_expired_session_token_rejected() {
        let keys = SessionKeys::new(
            SecretString::new("test-secret".to_string().into_boxed_str()),
            -1,
        );
        let token = keys.create_session_token(&profile()).unwrap();
        assert!(keys.validate_session_token(&token).is_err());
    }

    #[test]
    fn test_login_state_token() {
        let keys = keys("test-secret");
        let token = keys.create_login_state_token("abc123").unwrap();

        assert_eq!(keys.validate_login_state_token(&token).unwrap(), "abc123");
        // a state token is not a session
        assert!(keys.validate_session_token(&token).is_err());
    }
}
