use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::models::{MatchModel, ScoreModel};

/// Running win totals per player on a shared, ascending date axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinSeries {
    pub dates: Vec<NaiveDate>,
    pub player1_wins: Vec<u32>,
    pub player2_wins: Vec<u32>,
}

impl WinSeries {
    /// Cumulative totals at `date`, if that date is on the axis.
    pub fn totals_at(&self, date: NaiveDate) -> Option<(u32, u32)> {
        let index = self.dates.iter().position(|d| *d == date)?;
        Some((self.player1_wins[index], self.player2_wins[index]))
    }
}

/// Builds the cumulative win series for a match.
///
/// Scores are bucketed by `played_at`; all games of one day are applied
/// before the axis advances, so same-day ordering never changes a total.
/// Games won by neither player are ignored.
pub fn cumulative_wins(match_info: &MatchModel, scores: &[ScoreModel]) -> WinSeries {
    let mut by_date: BTreeMap<NaiveDate, Vec<&ScoreModel>> = BTreeMap::new();
    for score in scores {
        by_date.entry(score.played_at).or_default().push(score);
    }

    let mut series = WinSeries::default();
    let (mut player1_count, mut player2_count) = (0u32, 0u32);

    for (date, day_scores) in by_date {
        for score in day_scores {
            if score.winner == match_info.player1 {
                player1_count += 1;
            } else if score.winner == match_info.player2 {
                player2_count += 1;
            }
        }
        series.dates.push(date);
        series.player1_wins.push(player1_count);
        series.player2_wins.push(player2_count);
    }

    series
}

/// First day included in a window of `months` ending at `today`.
pub fn window_start(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}
