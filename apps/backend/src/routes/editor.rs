//! Editor endpoints: gap text codec and pre-submit validation

use axum::{extract::State, Json};
use question_core::{gap_text, validate_question};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// POST /api/gap-text/decode
pub async fn decode(
    State(state): State<AppState>,
    Json(payload): Json<RawGapTextRequest>,
) -> Result<Json<GapText>> {
    state.capabilities.require_gap_text_authoring()?;
    Ok(Json(gap_text::decode(&payload.raw)?))
}

/// POST /api/gap-text/encode
pub async fn encode(
    State(state): State<AppState>,
    Json(payload): Json<GapText>,
) -> Result<Json<RawGapTextResponse>> {
    state.capabilities.require_gap_text_authoring()?;
    let raw = gap_text::encode(&payload.text, &payload.correct_gap_values)?;
    Ok(Json(RawGapTextResponse { raw }))
}

/// POST /api/gap-text/remove-gaps
pub async fn remove_gaps(
    State(state): State<AppState>,
    Json(payload): Json<RawGapTextRequest>,
) -> Result<Json<TemplateResponse>> {
    state.capabilities.require_gap_text_authoring()?;
    Ok(Json(TemplateResponse {
        text: gap_text::remove_gap_content(&payload.raw),
    }))
}

/// POST /api/questions/validate
pub async fn validate(
    Json(payload): Json<ValidateQuestionRequest>,
) -> Result<Json<ValidateQuestionResponse>> {
    let errors = validate_question(
        &payload.question,
        &payload.existing_ids,
        payload.original_id.as_deref(),
    );
    Ok(Json(ValidateQuestionResponse {
        valid: errors.is_empty(),
        errors,
    }))
}
