//! Join endpoint: members and guests enter a room.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::MaybeUser;
use crate::error::ApiResult;
use crate::state::{AppState, JoinOutcome};
use crate::types::ParticipantId;

use super::MessageResponse;

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedResponse {
    pub participant_id: ParticipantId,
}

/// POST /api/join
///
/// A fresh join answers `{participantId}`; a repeat join answers
/// `{message: "Already joined"}`, mirroring what clients key off.
pub async fn join(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Json(body): Json<JoinRequest>,
) -> ApiResult<Response> {
    let outcome = state
        .join_room(&body.code, user.as_ref(), body.username)
        .await?;

    Ok(match outcome {
        JoinOutcome::Joined(participant) => Json(JoinedResponse {
            participant_id: participant.id,
        })
        .into_response(),
        JoinOutcome::AlreadyJoined(_) => Json(MessageResponse {
            message: "Already joined".to_string(),
        })
        .into_response(),
    })
}
