pub mod actions;
pub mod assertions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::{location, query_param};
#[allow(unused_imports)]
pub use mocks::FakeIdentityProvider;
pub use setup::TestSetupBuilder;
