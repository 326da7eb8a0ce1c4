//! Summary API - /tilgjengelige-konsulenter/sammendrag
//!
//! GET answers with `{"sammendrag": "..."}`: a Norwegian LLM-written summary
//! of the consultants that clear the availability threshold and, when given,
//! hold every required skill.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use konsulent_core::filter::filter_consultants;
use konsulent_core::{QueryState, ServerError};

pub fn router() -> Router<QueryState> {
    Router::new().route("/tilgjengelige-konsulenter/sammendrag", get(get_summary))
}

/// Query parameters under their wire names.
///
/// `min_tilgjengelighet_prosent` is required but declared optional here so
/// that missing- and out-of-range values share the JSON error envelope
/// instead of the extractor's plain-text rejection.
#[derive(Debug, Deserialize)]
struct SummaryQuery {
    #[serde(rename = "min_tilgjengelighet_prosent")]
    min_availability: Option<i64>,
    #[serde(rename = "påkrevd_ferdighet")]
    required_skill: Option<String>,
}

async fn get_summary(
    State(state): State<QueryState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<serde_json::Value>, ServerError> {
    // Validate before touching the provider
    let min_availability = match query.min_availability {
        Some(v) if (0..=100).contains(&v) => v as u8,
        Some(v) => {
            return Err(ServerError::BadRequest(format!(
                "min_tilgjengelighet_prosent must be between 0 and 100, got {}",
                v
            )))
        }
        None => {
            return Err(ServerError::BadRequest(
                "min_tilgjengelighet_prosent is required".into(),
            ))
        }
    };

    tracing::info!(
        "[Summary Route] GET: min_tilgjengelighet_prosent={}, påkrevd_ferdighet={:?}",
        min_availability,
        query.required_skill
    );

    let roster = state.roster_client.fetch_consultants().await?;
    let filtered = filter_consultants(&roster, min_availability, query.required_skill.as_deref());

    tracing::info!(
        "[Summary Route] {} of {} consultants match",
        filtered.len(),
        roster.len()
    );

    let summary = state
        .summarizer
        .summarize(&filtered, min_availability, query.required_skill.as_deref())
        .await?;

    Ok(Json(serde_json::json!({ "sammendrag": summary })))
}
