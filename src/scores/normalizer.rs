use chrono::NaiveDate;

use super::{errors::ScoreError, models::NormalizedScore};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `"<a>:<b>"` token into `(winner_score, loser_score)`.
///
/// The larger value always lands in the winner slot, so `"1:3"` and `"3:1"`
/// normalize identically. Both parts must be non-negative 16-bit integers.
pub fn parse_score(token: &str) -> Result<(i16, i16), ScoreError> {
    let token = token.trim();
    let parts: Vec<&str> = token.split(':').collect();
    let [first, second] = parts.as_slice() else {
        return Err(ScoreError::MalformedScore(format!(
            "expected <winner>:<loser>, got '{}'",
            token
        )));
    };

    let first = parse_score_part(first)?;
    let second = parse_score_part(second)?;

    if first < second {
        Ok((second, first))
    } else {
        Ok((first, second))
    }
}

fn parse_score_part(part: &str) -> Result<i16, ScoreError> {
    let value: i16 = part
        .parse()
        .map_err(|_| ScoreError::MalformedScore(format!("'{}' is not a number", part)))?;
    if value < 0 {
        return Err(ScoreError::MalformedScore(format!(
            "'{}' is negative",
            part
        )));
    }
    Ok(value)
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_played_at(token: &str) -> Result<NaiveDate, ScoreError> {
    let token = token.trim();
    let malformed = || ScoreError::MalformedDate(format!("expected YYYY-MM-DD, got '{}'", token));

    // chrono accepts unpadded fields, the form does not
    let bytes = token.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_shaped {
        return Err(malformed());
    }

    NaiveDate::parse_from_str(token, DATE_FORMAT).map_err(|_| malformed())
}

/// Normalizes a raw score token and date token into a validated triple.
pub fn normalize(score_token: &str, date_token: &str) -> Result<NormalizedScore, ScoreError> {
    let (winner_score, loser_score) = parse_score(score_token)?;
    let played_at = parse_played_at(date_token)?;

    Ok(NormalizedScore {
        winner_score,
        loser_score,
        played_at,
    })
}
