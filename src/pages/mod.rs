// Public API - what other modules can use
pub use handlers::{about, cloud, home, home_head, matrix_client, matrix_server};
pub use models::{cloud_services, CloudService};

// Internal modules
mod handlers;
pub mod models;
pub mod types;
