use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::{
    errors::StoreError,
    models::{MatchModel, ScoreModel},
};

/// Trait for match store operations
///
/// The store exclusively owns matches and scores. Both are append-only:
/// nothing here updates or deletes a row.
#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn create_match(&self, match_info: &MatchModel) -> Result<MatchModel, StoreError>;
    async fn get_match(&self, match_id: Uuid) -> Result<Option<MatchModel>, StoreError>;

    /// Inserts one game. `(match_id, game_id)` is unique and `match_id` must
    /// refer to an existing match.
    async fn create_score(&self, score: &ScoreModel) -> Result<(), StoreError>;

    /// Scores played on or after `since`, newest first.
    async fn get_match_scores(
        &self,
        match_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<ScoreModel>, StoreError>;

    /// At most `limit` scores, newest `played_at` first.
    async fn get_recent_scores(
        &self,
        match_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ScoreModel>, StoreError>;
}

#[derive(Default)]
struct MatchStoreState {
    matches: HashMap<Uuid, MatchModel>,
    scores: Vec<ScoreModel>,
    game_keys: HashSet<(Uuid, Uuid)>,
}

/// In-memory implementation of MatchRepository for development and testing
///
/// Data is lost when the application restarts.
#[derive(Default)]
pub struct InMemoryMatchRepository {
    state: RwLock<MatchStoreState>,
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored scores across all matches
    pub async fn score_count(&self) -> usize {
        self.state.read().await.scores.len()
    }
}

fn newest_first(scores: &mut [ScoreModel]) {
    scores.sort_by(|a, b| {
        b.played_at
            .cmp(&a.played_at)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    #[instrument(skip(self, match_info), fields(match_id = %match_info.id))]
    async fn create_match(&self, match_info: &MatchModel) -> Result<MatchModel, StoreError> {
        debug!(
            player1 = %match_info.player1,
            player2 = %match_info.player2,
            "Creating match in memory"
        );

        let mut state = self.state.write().await;
        if state.matches.contains_key(&match_info.id) {
            warn!("Match already exists in memory");
            return Err(StoreError::DuplicateId);
        }
        state.matches.insert(match_info.id, match_info.clone());

        Ok(match_info.clone())
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: Uuid) -> Result<Option<MatchModel>, StoreError> {
        let state = self.state.read().await;
        let found = state.matches.get(&match_id).cloned();
        debug!(found = found.is_some(), "Fetched match from memory");
        Ok(found)
    }

    #[instrument(skip(self, score), fields(match_id = %score.match_id, game_id = %score.game_id))]
    async fn create_score(&self, score: &ScoreModel) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.matches.contains_key(&score.match_id) {
            warn!("Score refers to unknown match");
            return Err(StoreError::MatchForeignKeyViolation);
        }
        if !state.game_keys.insert((score.match_id, score.game_id)) {
            warn!("Game already recorded for match");
            return Err(StoreError::DuplicateGameId);
        }
        state.scores.push(score.clone());

        debug!("Score stored in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_match_scores(
        &self,
        match_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<ScoreModel>, StoreError> {
        let state = self.state.read().await;
        let mut scores: Vec<ScoreModel> = state
            .scores
            .iter()
            .filter(|s| s.match_id == match_id && s.played_at >= since)
            .cloned()
            .collect();
        newest_first(&mut scores);

        debug!(score_count = scores.len(), "Fetched match scores from memory");
        Ok(scores)
    }

    #[instrument(skip(self))]
    async fn get_recent_scores(
        &self,
        match_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ScoreModel>, StoreError> {
        let state = self.state.read().await;
        let mut scores: Vec<ScoreModel> = state
            .scores
            .iter()
            .filter(|s| s.match_id == match_id)
            .cloned()
            .collect();
        newest_first(&mut scores);
        scores.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(scores)
    }
}

/// PostgreSQL implementation of the match store
pub struct PostgresMatchRepository {
    pool: PgPool,
}

impl PostgresMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps constraint violations onto store outcomes; `duplicate` is what a
/// unique violation means for the statement at hand.
fn map_db_error(e: sqlx::Error, duplicate: StoreError) -> StoreError {
    if let sqlx::Error::Database(db_error) = &e {
        match db_error.code().as_deref() {
            Some("23505") => return duplicate,
            Some("23503") => return StoreError::MatchForeignKeyViolation,
            _ => {}
        }
    }
    warn!(error = %e, "Match store query failed");
    StoreError::Unavailable(e.to_string())
}

fn unavailable(e: sqlx::Error) -> StoreError {
    warn!(error = %e, "Match store query failed");
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl MatchRepository for PostgresMatchRepository {
    #[instrument(skip(self, match_info), fields(match_id = %match_info.id))]
    async fn create_match(&self, match_info: &MatchModel) -> Result<MatchModel, StoreError> {
        debug!("Creating match in database");

        sqlx::query_as::<_, MatchModel>(
            "INSERT INTO matches (id, player_1, player_2, created_at) VALUES ($1, $2, $3, $4) \
             RETURNING id, player_1, player_2, created_at",
        )
        .bind(match_info.id)
        .bind(&match_info.player1)
        .bind(&match_info.player2)
        .bind(match_info.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, StoreError::DuplicateId))
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: Uuid) -> Result<Option<MatchModel>, StoreError> {
        debug!("Fetching match from database");

        sqlx::query_as::<_, MatchModel>(
            "SELECT id, player_1, player_2, created_at FROM matches WHERE id = $1",
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)
    }

    #[instrument(skip(self, score), fields(match_id = %score.match_id, game_id = %score.game_id))]
    async fn create_score(&self, score: &ScoreModel) -> Result<(), StoreError> {
        debug!("Creating score in database");

        sqlx::query(
            "INSERT INTO scores \
             (match_id, game_id, winner, winner_score, loser_score, played_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(score.match_id)
        .bind(score.game_id)
        .bind(&score.winner)
        .bind(score.winner_score)
        .bind(score.loser_score)
        .bind(score.played_at)
        .bind(score.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, StoreError::DuplicateGameId))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_match_scores(
        &self,
        match_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<ScoreModel>, StoreError> {
        sqlx::query_as::<_, ScoreModel>(
            "SELECT match_id, game_id, winner, winner_score, loser_score, played_at, created_at \
             FROM scores WHERE match_id = $1 AND played_at >= $2 \
             ORDER BY played_at DESC, created_at DESC",
        )
        .bind(match_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)
    }

    #[instrument(skip(self))]
    async fn get_recent_scores(
        &self,
        match_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ScoreModel>, StoreError> {
        sqlx::query_as::<_, ScoreModel>(
            "SELECT match_id, game_id, winner, winner_score, loser_score, played_at, created_at \
             FROM scores WHERE match_id = $1 \
             ORDER BY played_at DESC, created_at DESC LIMIT $2",
        )
        .bind(match_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)
    }
}
