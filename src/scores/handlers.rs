use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Form, Json,
};
use tracing::{info, instrument, warn};
use url::form_urlencoded;
use uuid::Uuid;

use super::{
    errors::ScoreError,
    service::{ScoreService, SingleScoreInput},
    types::{
        BatchScoreForm, ChartSeries, CreateMatchForm, ScoresPageResponse, ScoresQuery,
        SingleScoreForm, WinChartResponse,
    },
};
use crate::shared::{AppError, AppState};

fn service(state: &AppState) -> ScoreService {
    ScoreService::new(state.match_repository.clone(), state.settings.scores.clone())
}

/// 303 back to the scores page, optionally for a match and with an error
pub fn scores_redirect(match_id: Option<Uuid>, error: Option<&str>) -> Redirect {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(id) = match_id {
        query.append_pair("matchup_id", &id.to_string());
    }
    if let Some(error) = error {
        query.append_pair("error", error);
    }
    let query = query.finish();

    if query.is_empty() {
        Redirect::to("/scores")
    } else {
        Redirect::to(&format!("/scores?{}", query))
    }
}

/// Redirect for a failed submission. An unknown match has no page to return to.
fn failure_redirect(match_id: Uuid, err: &ScoreError) -> Redirect {
    match err {
        ScoreError::MatchNotFound => scores_redirect(None, Some(&err.to_string())),
        _ => scores_redirect(Some(match_id), Some(&err.to_string())),
    }
}

fn parse_matchup_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// HTTP handler for the scores page
///
/// GET /scores?matchup_id=<id>&error=<msg>
/// Without an ID only the error (if any) is returned
#[instrument(name = "scores_index", skip(state))]
pub async fn scores_index(
    State(state): State<AppState>,
    Query(query): Query<ScoresQuery>,
) -> Result<Json<ScoresPageResponse>, AppError> {
    let error = query.error.filter(|e| !e.is_empty());
    let Some(raw_id) = query.matchup_id.filter(|id| !id.is_empty()) else {
        return Ok(Json(ScoresPageResponse {
            error,
            ..ScoresPageResponse::default()
        }));
    };

    let Some(match_id) = parse_matchup_id(&raw_id) else {
        return Ok(Json(ScoresPageResponse::with_error("Invalid matchup ID")));
    };

    match service(&state).match_overview(match_id).await {
        Ok(overview) => Ok(Json(ScoresPageResponse {
            match_info: Some(overview.match_info),
            scores: overview.scores,
            recent_scores: overview.recent_scores,
            error,
        })),
        Err(ScoreError::MatchNotFound) => {
            Ok(Json(ScoresPageResponse::with_error("Match not found")))
        }
        Err(e) => Err(e.into()),
    }
}

/// HTTP handler for creating a match
///
/// POST /scores/matches
#[instrument(name = "create_match", skip(state))]
pub async fn create_match(
    State(state): State<AppState>,
    Form(form): Form<CreateMatchForm>,
) -> Redirect {
    match service(&state)
        .create_match(&form.player1, &form.player2)
        .await
    {
        Ok(created) => scores_redirect(Some(created.id), None),
        Err(e) => {
            warn!(error = %e, "Match creation failed");
            scores_redirect(None, Some(&e.to_string()))
        }
    }
}

/// HTTP handler for a single game result
///
/// POST /scores/single
/// Always redirects back to the scores page, with an error when rejected
#[instrument(name = "submit_single_score", skip(state))]
pub async fn submit_single(
    State(state): State<AppState>,
    Form(form): Form<SingleScoreForm>,
) -> Redirect {
    let Some(match_id) = parse_matchup_id(&form.matchup_id) else {
        return scores_redirect(None, Some("Invalid matchup ID"));
    };

    let missing = [
        ("winner_initials", &form.winner_initials),
        ("score", &form.score),
        ("played_at", &form.played_at),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty());
    if let Some((field, _)) = missing {
        return scores_redirect(Some(match_id), Some(&format!("Missing field: {}", field)));
    }

    let input = SingleScoreInput {
        match_id,
        winner: form.winner_initials,
        score: form.score,
        played_at: form.played_at,
    };
    match service(&state).submit_single(input).await {
        Ok(match_id) => scores_redirect(Some(match_id), None),
        Err(e) => {
            warn!(error = %e, "Score submission rejected");
            failure_redirect(match_id, &e)
        }
    }
}

/// HTTP handler for a batch score sheet
///
/// POST /scores/batch
/// Invalid lines are dropped silently; only an unknown match is reported
#[instrument(name = "submit_score_batch", skip(state, form))]
pub async fn submit_batch(
    State(state): State<AppState>,
    Form(form): Form<BatchScoreForm>,
) -> Redirect {
    let Some(match_id) = parse_matchup_id(&form.matchup_id) else {
        return scores_redirect(None, Some("Invalid matchup ID"));
    };

    match service(&state)
        .submit_batch(match_id, &form.raw_matches_list)
        .await
    {
        Ok(report) => {
            info!(
                persisted = report.persisted,
                skipped = report.skipped,
                "Score sheet stored"
            );
            scores_redirect(Some(match_id), None)
        }
        Err(e) => {
            warn!(error = %e, "Score sheet rejected");
            failure_redirect(match_id, &e)
        }
    }
}

/// HTTP handler for the cumulative win chart data
///
/// GET /scores/chart/:id
#[instrument(name = "scores_chart", skip(state))]
pub async fn scores_chart(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<WinChartResponse>, AppError> {
    let match_id = parse_matchup_id(&raw_id)
        .ok_or_else(|| AppError::BadRequest("Invalid match ID".to_string()))?;

    let (match_info, series) = service(&state).win_series(match_id).await?;

    Ok(Json(WinChartResponse {
        title: "Summary of Wins".to_string(),
        dates: series.dates,
        series: vec![
            ChartSeries {
                name: format!("Wins of {}", match_info.player1),
                data: series.player1_wins,
            },
            ChartSeries {
                name: format!("Wins of {}", match_info.player2),
                data: series.player2_wins,
            },
        ],
    }))
}
