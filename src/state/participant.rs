use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::*;
use chrono::Utc;

/// Outcome of a join request
#[derive(Debug, Clone)]
pub enum JoinOutcome {
    Joined(Participant),
    AlreadyJoined(Participant),
}

impl JoinOutcome {
    pub fn participant(&self) -> &Participant {
        match self {
            JoinOutcome::Joined(p) | JoinOutcome::AlreadyJoined(p) => p,
        }
    }
}

impl AppState {
    /// Join a room. Deduplication is per (room, identity key): an
    /// authenticated user joins as `user:<id>`, a guest as `guest:<name>`,
    /// so a repeated join returns the existing participant instead of
    /// inserting a second row. Check and insert run under one write lock.
    pub async fn join_room(
        &self,
        code: &str,
        user: Option<&CurrentUser>,
        guest_name: Option<String>,
    ) -> ApiResult<JoinOutcome> {
        let room = self.room_by_code(code).await?;

        let (user_id, username) = match user {
            Some(user) => (Some(user.id.clone()), user.username.clone()),
            None => {
                let name = guest_name.filter(|n| !n.is_empty()).ok_or_else(|| {
                    ApiError::Validation("Username required for guests".to_string())
                })?;
                (None, name)
            }
        };

        let candidate = Participant {
            id: ulid::Ulid::new().to_string(),
            room_id: room.id.clone(),
            user_id,
            username,
            joined_at: Utc::now(),
        };
        let key = candidate.identity_key();

        let mut participants = self.participants.write().await;
        if let Some(existing) = participants
            .values()
            .find(|p| p.room_id == room.id && p.identity_key() == key)
        {
            return Ok(JoinOutcome::AlreadyJoined(existing.clone()));
        }

        participants.insert(candidate.id.clone(), candidate.clone());
        tracing::info!("{} joined room {}", candidate.username, room.code);
        Ok(JoinOutcome::Joined(candidate))
    }

    /// All participants of a room, in unspecified order
    pub async fn participants_in_room(&self, room_id: &RoomId) -> Vec<Participant> {
        self.participants
            .read()
            .await
            .values()
            .filter(|p| p.room_id == *room_id)
            .cloned()
            .collect()
    }

    pub async fn participant_by_id(&self, id: &str) -> Option<Participant> {
        self.participants.read().await.get(id).cloned()
    }
}
