//! AI question generation endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::llm::LlmError;
use crate::state::AppState;
use crate::types::QuestionDraft;

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    #[serde(default)]
    pub syllabus: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<QuestionDraft>,
}

/// POST /api/generate-questions
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateQuestionsRequest>,
) -> ApiResult<Json<GenerateQuestionsResponse>> {
    if body.syllabus.is_empty() {
        return Err(ApiError::Validation("Syllabus is required".to_string()));
    }

    let manager = state.llm.as_ref().ok_or_else(|| {
        ApiError::Upstream(LlmError::ConfigError(
            "No LLM providers configured".to_string(),
        ))
    })?;

    let questions = manager
        .generate_questions(
            &body.syllabus,
            state.llm_config.default_timeout,
            state.llm_config.default_max_tokens,
        )
        .await?;

    Ok(Json(GenerateQuestionsResponse { questions }))
}
