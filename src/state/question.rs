use super::AppState;
use crate::types::*;

impl AppState {
    /// Questions of a room in quiz order: ascending `order`, id as tiebreak
    /// so repeated reads agree even when orders collide
    pub async fn questions_in_room(&self, room_id: &RoomId) -> Vec<Question> {
        let mut questions: Vec<Question> = self
            .questions
            .read()
            .await
            .values()
            .filter(|q| q.room_id == *room_id)
            .cloned()
            .collect();
        questions.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        questions
    }

    /// Resolve a question by id alone; callers decide whether room
    /// ownership matters
    pub async fn question_by_id(&self, id: &str) -> Option<Question> {
        self.questions.read().await.get(id).cloned()
    }
}
