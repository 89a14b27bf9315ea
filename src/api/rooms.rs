//! Room lifecycle and read-model endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::*;

use super::MessageResponse;

/// Room creation payload as it arrives on the wire. Every field is lenient
/// so that a half-filled form produces a 400 with a readable message instead
/// of a deserializer rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub settings: Option<SettingsPayload>,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPayload {
    #[serde(default)]
    pub time_limit: Option<u32>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl CreateRoomRequest {
    fn into_new_room(self) -> Result<NewRoom, ApiError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::Validation("Title is required".to_string()));
        }

        let settings = self.settings.unwrap_or_default();
        let (Some(start_time), Some(end_time)) = (settings.start_time, settings.end_time) else {
            return Err(ApiError::Validation(
                "Start and end time are required".to_string(),
            ));
        };

        for (i, draft) in self.questions.iter().enumerate() {
            draft.validate().map_err(|reason| {
                ApiError::Validation(format!("Question {}: {}", i + 1, reason))
            })?;
        }

        Ok(NewRoom {
            title,
            settings: RoomSettings {
                time_limit: settings.time_limit,
                max_participants: settings.max_participants,
                start_time,
                end_time,
            },
            questions: self.questions,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub room_id: RoomId,
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub title: String,
    pub question_count: usize,
    /// Host's username, or "Unknown" when the host never registered
    pub host: String,
    pub settings: RoomSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailsResponse {
    pub room: RoomDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetails {
    pub title: String,
    pub status: RoomStatus,
    pub host_id: Option<UserId>,
    pub participants: Vec<Participant>,
    pub settings: RoomSettings,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// POST /api/rooms
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<(StatusCode, Json<CreateRoomResponse>)> {
    // Deserialize by hand so shape mistakes (bad datetimes included) stay in
    // the 400 family
    let request: CreateRoomRequest =
        serde_json::from_value(body).map_err(|e| ApiError::Validation(e.to_string()))?;
    let new_room = request.into_new_room()?;

    let room = state.create_room(Some(user.id), new_room).await;
    Ok((
        StatusCode::CREATED,
        Json(CreateRoomResponse {
            room_id: room.id,
            code: room.code,
        }),
    ))
}

/// GET /api/rooms/{code}
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<RoomSummary>> {
    let room = state.room_by_code(&code).await?;
    let questions = state.questions_in_room(&room.id).await;

    let host = match &room.host_id {
        Some(id) => state.user_by_id(id).await.map(|u| u.username),
        None => None,
    };

    Ok(Json(RoomSummary {
        title: room.title,
        question_count: questions.len(),
        host: host.unwrap_or_else(|| "Unknown".to_string()),
        settings: room.settings,
    }))
}

/// GET /api/rooms/{code}/details
pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<RoomDetailsResponse>> {
    let room = state.room_by_code(&code).await?;

    let mut participants = state.participants_in_room(&room.id).await;
    participants.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then_with(|| a.id.cmp(&b.id)));

    let status = room.effective_status(Utc::now());
    Ok(Json(RoomDetailsResponse {
        room: RoomDetails {
            title: room.title,
            status,
            host_id: room.host_id,
            participants,
            settings: room.settings,
        },
    }))
}

/// POST /api/rooms/{code}/start
pub async fn start(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    user: CurrentUser,
) -> ApiResult<Json<MessageResponse>> {
    state.start_room(&code, &user).await?;
    Ok(Json(MessageResponse {
        message: "Quiz started".to_string(),
    }))
}

/// GET /api/rooms/{code}/questions
pub async fn questions(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<QuestionsResponse>> {
    let room = state.room_by_code(&code).await?;
    let questions = state.questions_in_room(&room.id).await;
    Ok(Json(QuestionsResponse { questions }))
}

/// GET /api/rooms/{code}/leaderboard
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<LeaderboardResponse>> {
    let leaderboard = state.leaderboard(&code).await?;
    Ok(Json(LeaderboardResponse { leaderboard }))
}

/// GET /api/rooms/{code}/results
pub async fn results(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<QuizResults>> {
    Ok(Json(state.results(&code).await?))
}
