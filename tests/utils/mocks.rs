use async_trait::async_trait;

use robswebhub::{AppError, IdentityProvider, UserProfile};

/// Identity provider that accepts a single known authorization code
pub struct FakeIdentityProvider {
    pub code: String,
    pub profile: UserProfile,
}

#[allow(dead_code)]
impl FakeIdentityProvider {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            profile: UserProfile {
                sub: format!("auth0|{}", name.to_lowercase()),
                name: name.to_string(),
                nickname: name.to_lowercase(),
                picture: String::new(),
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn exchange_code(&self, code: &str) -> Result<UserProfile, AppError> {
        if code == self.code {
            Ok(self.profile.clone())
        } else {
            Err(AppError::BadRequest("Unknown authorization code".to_string()))
        }
    }
}
