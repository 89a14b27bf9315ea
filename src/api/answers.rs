//! Answer submission endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub selected_option: String,
    #[serde(default)]
    pub participant_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerResponse {
    pub is_correct: bool,
}

/// POST /api/answers
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitAnswerRequest>,
) -> ApiResult<Json<SubmitAnswerResponse>> {
    let answer = state
        .submit_answer(
            &body.code,
            &body.participant_id,
            &body.question_id,
            &body.selected_option,
        )
        .await?;

    Ok(Json(SubmitAnswerResponse {
        is_correct: answer.is_correct,
    }))
}
