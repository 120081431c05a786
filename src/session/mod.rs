// Public API - what other modules can use
pub use handlers::{callback, login, logout};
pub use middleware::{read_session, session_context, SessionContext, SessionState};
pub use token::SessionKeys;
pub use types::UserProfile;

// Internal modules
pub mod cookie;
mod handlers;
mod middleware;
pub mod provider;
mod token;
mod types;
