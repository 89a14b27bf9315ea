use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::*;
use chrono::Utc;

impl AppState {
    /// Record an answer. The participant must belong to the room the code
    /// names; the question is resolved by id alone and is not required to
    /// belong to that room. Correctness is computed here, once. Duplicate
    /// submissions create separate rows.
    pub async fn submit_answer(
        &self,
        code: &str,
        participant_id: &str,
        question_id: &str,
        selected_option: &str,
    ) -> ApiResult<Answer> {
        let room = self.room_by_code(code).await?;

        let participant = self
            .participant_by_id(participant_id)
            .await
            .filter(|p| p.room_id == room.id)
            .ok_or_else(|| ApiError::Forbidden("Not a participant".to_string()))?;

        let question = self
            .question_by_id(question_id)
            .await
            .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

        let answer = Answer {
            id: ulid::Ulid::new().to_string(),
            participant_id: participant.id.clone(),
            question_id: question.id.clone(),
            selected_option: selected_option.to_string(),
            is_correct: question.correct_answer == selected_option,
            submitted_at: Utc::now(),
        };

        self.answers
            .write()
            .await
            .insert(answer.id.clone(), answer.clone());

        tracing::debug!(
            "{} answered question {} ({})",
            participant.username,
            question.order,
            if answer.is_correct {
                "correct"
            } else {
                "incorrect"
            }
        );
        Ok(answer)
    }
}
