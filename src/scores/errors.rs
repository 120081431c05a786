use thiserror::Error;

/// Failures of the match store itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("A match with this ID already exists")]
    DuplicateId,

    #[error("Match not found")]
    NotFound,

    #[error("A game with this ID was already recorded for the match")]
    DuplicateGameId,

    #[error("Score refers to a match that does not exist")]
    MatchForeignKeyViolation,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Failures of the scoring pipeline. The `Display` text is what ends up in
/// the `error` query parameter of a redirect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("Match not found")]
    MatchNotFound,

    #[error("Player not in match")]
    PlayerNotInMatch,

    #[error("Invalid score format: {0}")]
    MalformedScore(String),

    #[error("Invalid date format: {0}")]
    MalformedDate(String),

    #[error("Duplicate game ID")]
    DuplicateGameId,

    #[error("Invalid match: {0}")]
    InvalidMatch(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<StoreError> for ScoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound | StoreError::MatchForeignKeyViolation => {
                ScoreError::MatchNotFound
            }
            StoreError::DuplicateGameId => ScoreError::DuplicateGameId,
            StoreError::DuplicateId => {
                ScoreError::InvalidMatch("A match with this ID already exists".to_string())
            }
            StoreError::Unavailable(msg) => ScoreError::StorageUnavailable(msg),
        }
    }
}
