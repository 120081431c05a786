use serde::{Deserialize, Serialize};

/// Identity of a logged-in user as handed over by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// Stable subject identifier
    pub sub: String,
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub picture: String,
}

/// JWT claims stored in the session cookie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub exp: usize,
    pub iat: usize,
}

/// JWT claims binding a login attempt to the browser that started it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginStateClaims {
    pub state: String,
    pub exp: usize,
    pub iat: usize,
}
