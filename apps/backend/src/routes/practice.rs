//! Practice endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use question_core::evaluate as evaluate_response;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// POST /api/modules/:module_id/questions/:question_id/evaluate
pub async fn evaluate(
    State(state): State<AppState>,
    Path((module_id, question_id)): Path<(String, String)>,
    Json(response): Json<Response>,
) -> Result<Json<Evaluation>> {
    let question = state
        .read_store()?
        .load_question(&module_id, &question_id)?
        .ok_or_else(|| ApiError::NotFound(format!("question {}/{}", module_id, question_id)))?;

    let evaluation = evaluate_response(&question, &response)?;
    tracing::debug!(
        module = %module_id,
        question = %question_id,
        correct = evaluation.is_correct,
        "Evaluated response"
    );
    Ok(Json(evaluation))
}
