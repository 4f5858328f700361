//! Module endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use question_core::validate_module;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// GET /api/modules
pub async fn list(State(state): State<AppState>) -> Result<Json<ModuleListResponse>> {
    let modules = state.read_store()?.list_modules()?;
    Ok(Json(ModuleListResponse {
        modules: modules.iter().map(ModuleSummary::from).collect(),
    }))
}

/// GET /api/modules/:module_id
pub async fn get_one(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<Json<QuestionModule>> {
    let module = state
        .read_store()?
        .load_module(&module_id)?
        .ok_or_else(|| ApiError::NotFound(format!("module {}", module_id)))?;
    Ok(Json(module))
}

/// PUT /api/modules/:module_id
pub async fn save(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
    Json(module): Json<QuestionModule>,
) -> Result<Json<QuestionModule>> {
    if module.id != module_id {
        return Err(ApiError::BadRequest(format!(
            "module id {} does not match path {}",
            module.id, module_id
        )));
    }

    let errors = validate_module(&module);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    state.write_store()?.save_module(module.clone())?;
    tracing::info!("Saved module {} ({} questions)", module.id, module.questions.len());
    Ok(Json(module))
}

/// DELETE /api/modules/:module_id
pub async fn remove(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<StatusCode> {
    if state.write_store()?.delete_module(&module_id)? {
        tracing::info!("Deleted module {}", module_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("module {}", module_id)))
    }
}
