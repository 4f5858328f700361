//! Question endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use question_core::validate_question;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// GET /api/modules/:module_id/questions/:question_id
pub async fn get_one(
    State(state): State<AppState>,
    Path((module_id, question_id)): Path<(String, String)>,
) -> Result<Json<Question>> {
    let question = state
        .read_store()?
        .load_question(&module_id, &question_id)?
        .ok_or_else(|| ApiError::NotFound(format!("question {}/{}", module_id, question_id)))?;
    Ok(Json(question))
}

/// PUT /api/modules/:module_id/questions/:question_id
///
/// The path names the question being replaced. When no question has that id
/// the body is appended as a new question.
pub async fn save(
    State(state): State<AppState>,
    Path((module_id, question_id)): Path<(String, String)>,
    Json(question): Json<Question>,
) -> Result<Json<Question>> {
    let mut store = state.write_store()?;
    let mut module = store
        .load_module(&module_id)?
        .ok_or_else(|| ApiError::NotFound(format!("module {}", module_id)))?;

    let original_id = module
        .question(&question_id)
        .map(|existing| existing.id.clone());
    let errors = validate_question(&question, &module.question_ids(), original_id.as_deref());
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    module.upsert_question(question.clone(), original_id.as_deref());
    store.save_module(module)?;
    tracing::info!("Saved question {} in module {}", question.id, module_id);
    Ok(Json(question))
}

/// DELETE /api/modules/:module_id/questions/:question_id
pub async fn remove(
    State(state): State<AppState>,
    Path((module_id, question_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let mut store = state.write_store()?;
    let mut module = store
        .load_module(&module_id)?
        .ok_or_else(|| ApiError::NotFound(format!("module {}", module_id)))?;

    if module.remove_question(&question_id).is_none() {
        return Err(ApiError::NotFound(format!(
            "question {}/{}",
            module_id, question_id
        )));
    }
    store.save_module(module)?;
    Ok(StatusCode::NO_CONTENT)
}
