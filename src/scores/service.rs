use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    aggregation::{cumulative_wins, window_start, WinSeries},
    batch::{parse_sheet, LineOutcome, SkipReason},
    errors::ScoreError,
    models::{MatchModel, ScoreModel},
    normalizer::normalize,
    repository::MatchRepository,
};
use crate::config::ScoreSettings;

/// One game submitted through the single-entry form.
#[derive(Debug, Clone)]
pub struct SingleScoreInput {
    pub match_id: Uuid,
    pub winner: String,
    pub score: String,
    pub played_at: String,
}

/// What a batch submission did, line by line.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub persisted: usize,
    pub skipped: usize,
    pub outcomes: Vec<LineOutcome>,
}

/// Everything the scores page shows for one match.
#[derive(Debug, Clone)]
pub struct MatchOverview {
    pub match_info: MatchModel,
    pub scores: Vec<ScoreModel>,
    pub recent_scores: Vec<ScoreModel>,
}

/// Service for the match scoring pipeline
pub struct ScoreService {
    repository: Arc<dyn MatchRepository>,
    settings: ScoreSettings,
}

impl ScoreService {
    pub fn new(repository: Arc<dyn MatchRepository>, settings: ScoreSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Creates a match between two named players
    #[instrument(skip(self))]
    pub async fn create_match(
        &self,
        player1: &str,
        player2: &str,
    ) -> Result<MatchModel, ScoreError> {
        let (player1, player2) = (player1.trim(), player2.trim());
        if player1.is_empty() || player2.is_empty() {
            return Err(ScoreError::InvalidMatch(
                "both players need a name".to_string(),
            ));
        }
        if player1.contains(char::is_whitespace) || player2.contains(char::is_whitespace) {
            // batch lines are whitespace separated, such a name could never win
            return Err(ScoreError::InvalidMatch(
                "player names must not contain spaces".to_string(),
            ));
        }

        let created = self
            .repository
            .create_match(&MatchModel::new(player1.to_string(), player2.to_string()))
            .await?;

        info!(match_id = %created.id, "Match created");
        Ok(created)
    }

    async fn require_match(&self, match_id: Uuid) -> Result<MatchModel, ScoreError> {
        self.repository
            .get_match(match_id)
            .await?
            .ok_or(ScoreError::MatchNotFound)
    }

    /// Validates one game against its match and persists it.
    ///
    /// Checks run in order: match exists, winner plays in it, score and
    /// date normalize. Returns the match ID on success.
    #[instrument(skip(self, input), fields(match_id = %input.match_id))]
    pub async fn submit_single(&self, input: SingleScoreInput) -> Result<Uuid, ScoreError> {
        let match_info = self.require_match(input.match_id).await?;

        let winner = input.winner.trim();
        if !match_info.has_player(winner) {
            warn!(winner = %winner, "Winner is not part of the match");
            return Err(ScoreError::PlayerNotInMatch);
        }

        let normalized = normalize(&input.score, &input.played_at)?;
        let score = ScoreModel::new(match_info.id, winner.to_string(), normalized);
        self.repository.create_score(&score).await?;

        info!(
            game_id = %score.game_id,
            winner = %score.winner,
            winner_score = score.winner_score,
            loser_score = score.loser_score,
            "Score recorded"
        );
        Ok(match_info.id)
    }

    /// Admits every valid line of a score sheet.
    ///
    /// Only a missing match aborts the batch. Invalid lines and lines the
    /// store refuses are skipped, nothing is rolled back.
    #[instrument(skip(self, raw_sheet))]
    pub async fn submit_batch(
        &self,
        match_id: Uuid,
        raw_sheet: &str,
    ) -> Result<BatchReport, ScoreError> {
        let match_info = self.require_match(match_id).await?;

        let mut report = BatchReport::default();
        for outcome in parse_sheet(raw_sheet, &match_info) {
            let outcome = match outcome {
                LineOutcome::Accepted(parsed) => {
                    let score = ScoreModel::new(match_info.id, parsed.winner.clone(), parsed.score);
                    match self.repository.create_score(&score).await {
                        Ok(()) => LineOutcome::Accepted(parsed),
                        Err(e) => {
                            warn!(
                                line = parsed.line_number,
                                error = %e,
                                "Could not store batch line"
                            );
                            LineOutcome::Skipped {
                                line_number: parsed.line_number,
                                reason: SkipReason::Storage,
                            }
                        }
                    }
                }
                skipped @ LineOutcome::Skipped { .. } => skipped,
            };

            match &outcome {
                LineOutcome::Accepted(_) => report.persisted += 1,
                LineOutcome::Skipped {
                    line_number,
                    reason,
                } => {
                    debug!(line = line_number, reason = reason.as_ref(), "Skipped batch line");
                    report.skipped += 1;
                }
            }
            report.outcomes.push(outcome);
        }

        info!(
            persisted = report.persisted,
            skipped = report.skipped,
            "Batch processed"
        );
        Ok(report)
    }

    /// Match plus its windowed scores and the bounded recent list
    #[instrument(skip(self))]
    pub async fn match_overview(&self, match_id: Uuid) -> Result<MatchOverview, ScoreError> {
        let match_info = self.require_match(match_id).await?;
        let since = window_start(Utc::now().date_naive(), self.settings.window_months);

        let scores = self.repository.get_match_scores(match_id, since).await?;
        let recent_scores = self
            .repository
            .get_recent_scores(match_id, self.settings.recent_limit)
            .await?;

        Ok(MatchOverview {
            match_info,
            scores,
            recent_scores,
        })
    }

    /// Cumulative win series over the aggregation window
    #[instrument(skip(self))]
    pub async fn win_series(
        &self,
        match_id: Uuid,
    ) -> Result<(MatchModel, WinSeries), ScoreError> {
        let match_info = self.require_match(match_id).await?;
        let since = window_start(Utc::now().date_naive(), self.settings.window_months);

        let scores = self.repository.get_match_scores(match_id, since).await?;
        let series = cumulative_wins(&match_info, &scores);

        debug!(points = series.dates.len(), "Win series computed");
        Ok((match_info, series))
    }
}
