// Public API - what other modules can use
pub use errors::{ScoreError, StoreError};
pub use handlers::{create_match, scores_chart, scores_index, submit_batch, submit_single};
pub use models::{MatchModel, NormalizedScore, ScoreModel};
pub use repository::{InMemoryMatchRepository, MatchRepository, PostgresMatchRepository};
pub use service::{BatchReport, MatchOverview, ScoreService, SingleScoreInput};

// Internal modules
pub mod aggregation;
pub mod batch;
mod errors;
mod handlers;
pub mod models;
pub mod normalizer;
pub mod repository;
pub mod service;
pub mod types;
