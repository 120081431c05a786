use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the matches table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct MatchModel {
    pub id: Uuid,
    #[sqlx(rename = "player_1")]
    pub player1: String,
    #[sqlx(rename = "player_2")]
    pub player2: String,
    pub created_at: DateTime<Utc>,
}

impl MatchModel {
    /// Creates a new match with a generated ID. Players are fixed for the
    /// lifetime of the match.
    pub fn new(player1: String, player2: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            player1,
            player2,
            created_at: Utc::now(),
        }
    }

    pub fn has_player(&self, player: &str) -> bool {
        self.player1 == player || self.player2 == player
    }
}

/// Database model for the scores table. One row per game.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ScoreModel {
    pub match_id: Uuid,
    pub game_id: Uuid,
    pub winner: String,
    pub winner_score: i16,
    pub loser_score: i16,
    pub played_at: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Output of the normalizer: winner_score >= loser_score always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedScore {
    pub winner_score: i16,
    pub loser_score: i16,
    pub played_at: NaiveDate,
}

impl ScoreModel {
    /// Builds a fresh game row for `match_id` with a new game ID.
    pub fn new(match_id: Uuid, winner: String, score: NormalizedScore) -> Self {
        Self {
            match_id,
            game_id: Uuid::new_v4(),
            winner,
            winner_score: score.winner_score,
            loser_score: score.loser_score,
            played_at: score.played_at,
            created_at: Utc::now(),
        }
    }
}
