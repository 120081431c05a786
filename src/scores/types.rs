use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::models::{MatchModel, ScoreModel};

/// Query string of the scores page
#[derive(Debug, Default, Deserialize)]
pub struct ScoresQuery {
    pub matchup_id: Option<String>,
    pub error: Option<String>,
}

/// Form payload for creating a match
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateMatchForm {
    pub player1: String,
    pub player2: String,
}

/// Form payload for a single game result.
/// Fields default to empty so missing ones become a redirect, not a 422.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SingleScoreForm {
    pub matchup_id: String,
    pub winner_initials: String,
    pub score: String,
    pub played_at: String,
}

/// Form payload for a multi-line score sheet
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BatchScoreForm {
    pub matchup_id: String,
    pub raw_matches_list: String,
}

/// Response of the scores page
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScoresPageResponse {
    #[serde(rename = "match")]
    pub match_info: Option<MatchModel>,
    pub scores: Vec<ScoreModel>,
    pub recent_scores: Vec<ScoreModel>,
    pub error: Option<String>,
}

impl ScoresPageResponse {
    pub fn with_error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// One line of the win chart
#[derive(Debug, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub data: Vec<u32>,
}

/// Response of the chart endpoint, ready for a line chart
#[derive(Debug, Serialize, Deserialize)]
pub struct WinChartResponse {
    pub title: String,
    pub dates: Vec<NaiveDate>,
    pub series: Vec<ChartSeries>,
}
