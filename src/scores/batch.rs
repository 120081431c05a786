use strum_macros::AsRefStr;

use super::{
    models::{MatchModel, NormalizedScore},
    normalizer::{parse_played_at, parse_score},
};

/// Why a batch line was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// Not exactly `<date> <winner> <score>`
    WrongTokenCount,
    UnknownPlayer,
    MalformedDate,
    MalformedScore,
    /// The line was valid but the store refused it
    Storage,
}

/// A line that passed validation and is ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub line_number: usize,
    pub winner: String,
    pub score: NormalizedScore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Accepted(ParsedLine),
    Skipped { line_number: usize, reason: SkipReason },
}

/// Parses one trimmed, non-blank line of a score sheet against `match_info`.
pub fn parse_line(
    line_number: usize,
    line: &str,
    match_info: &MatchModel,
) -> Result<ParsedLine, SkipReason> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [date, winner, score] = tokens.as_slice() else {
        return Err(SkipReason::WrongTokenCount);
    };

    if !match_info.has_player(winner) {
        return Err(SkipReason::UnknownPlayer);
    }

    let played_at = parse_played_at(date).map_err(|_| SkipReason::MalformedDate)?;
    let (winner_score, loser_score) = parse_score(score).map_err(|_| SkipReason::MalformedScore)?;

    Ok(ParsedLine {
        line_number,
        winner: winner.to_string(),
        score: NormalizedScore {
            winner_score,
            loser_score,
            played_at,
        },
    })
}

/// Splits a raw score sheet into per-line outcomes.
///
/// Line endings are normalized first, blank lines produce no outcome at
/// all, and every other line is judged on its own. Line numbers are 1-based
/// positions in the original text.
pub fn parse_sheet(raw: &str, match_info: &MatchModel) -> Vec<LineOutcome> {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");

    normalized
        .split('\n')
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let line_number = index + 1;
            Some(match parse_line(line_number, line, match_info) {
                Ok(parsed) => LineOutcome::Accepted(parsed),
                Err(reason) => LineOutcome::Skipped {
                    line_number,
                    reason,
                },
            })
        })
        .collect()
}
