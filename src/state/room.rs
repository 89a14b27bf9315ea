use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::*;
use chrono::Utc;
use rand::Rng;

/// Safe character set for room codes (excludes 0/O and 1/I to avoid confusion)
const CODE_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_LENGTH: usize = 6;

/// Generate a random room code (6 characters)
fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

impl AppState {
    /// Create a room together with its questions. The code is allocated and
    /// the room inserted under one write lock, so a stored code is never
    /// handed out twice.
    pub async fn create_room(&self, host_id: Option<UserId>, new_room: NewRoom) -> Room {
        let room = {
            let mut rooms = self.rooms.write().await;

            let code = loop {
                let code = generate_code();
                if !rooms.values().any(|r| r.code == code) {
                    break code;
                }
                // Collision - try again (extremely rare with ~10^9 combinations)
            };

            let room = Room {
                id: ulid::Ulid::new().to_string(),
                code,
                host_id,
                title: new_room.title,
                settings: new_room.settings,
                status: RoomStatus::Waiting,
                created_at: Utc::now(),
            };
            rooms.insert(room.id.clone(), room.clone());
            room
        };

        // Questions are a second collection write; a poll landing between the
        // two sees the room with a partial question list.
        {
            let mut questions = self.questions.write().await;
            for (i, draft) in new_room.questions.into_iter().enumerate() {
                let question = Question {
                    id: ulid::Ulid::new().to_string(),
                    room_id: room.id.clone(),
                    question_text: draft.question_text,
                    options: draft.options,
                    correct_answer: draft.correct_answer,
                    explanation: draft.explanation,
                    order: (i + 1) as u32,
                };
                questions.insert(question.id.clone(), question);
            }
        }

        tracing::info!("Created room {} ({})", room.code, room.title);
        room
    }

    /// Look up a room by code, case-insensitively
    pub async fn room_by_code(&self, code: &str) -> ApiResult<Room> {
        let code = code.to_uppercase();
        self.rooms
            .read()
            .await
            .values()
            .find(|r| r.code == code)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Room not found".to_string()))
    }

    /// Start the quiz. The first caller on a hostless room is adopted as its
    /// host; everyone else is rejected from then on. Starting an already
    /// active room succeeds again.
    pub async fn start_room(&self, code: &str, requester: &CurrentUser) -> ApiResult<Room> {
        let code = code.to_uppercase();
        let mut rooms = self.rooms.write().await;

        let room = rooms
            .values_mut()
            .find(|r| r.code == code)
            .ok_or_else(|| ApiError::NotFound("Room not found".to_string()))?;

        match room.host_id.clone() {
            None => {
                room.host_id = Some(requester.id.clone());
                tracing::info!("Room {} adopted {} as host", room.code, requester.username);
            }
            Some(host_id) if host_id != requester.id => {
                return Err(ApiError::Forbidden("Only host can start".to_string()));
            }
            Some(_) => {}
        }

        room.status = RoomStatus::Active;
        tracing::info!("Room {} started", room.code);
        Ok(room.clone())
    }
}
