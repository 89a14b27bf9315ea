use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type RoomId = String;
pub type QuestionId = String;
pub type ParticipantId = String;
pub type AnswerId = String;
pub type UserId = String;

/// Number of options every question carries
pub const QUESTION_OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Active,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSettings {
    /// Seconds per question, purely informational for clients
    pub time_limit: Option<u32>,
    /// Declared capacity; joins are not capped against it
    pub max_participants: Option<u32>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    /// Short join code, stored uppercase
    pub code: String,
    /// Unset until someone starts the quiz
    pub host_id: Option<UserId>,
    pub title: String,
    pub settings: RoomSettings,
    /// Stored status only ever moves Waiting -> Active; Finished is derived
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Status as clients see it: `Finished` once the end time has passed,
    /// without any write having happened.
    pub fn effective_status(&self, now: DateTime<Utc>) -> RoomStatus {
        if now > self.settings.end_time {
            RoomStatus::Finished
        } else {
            self.status
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionOption {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub room_id: RoomId,
    pub question_text: String,
    pub options: Vec<QuestionOption>,
    /// Option id of the correct choice
    pub correct_answer: String,
    pub explanation: String,
    /// 1-based position within the quiz
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub room_id: RoomId,
    pub user_id: Option<UserId>,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    /// Key used for join deduplication. Authenticated joiners and guests live
    /// in disjoint namespaces, so a guest may reuse a member's display name.
    pub fn identity_key(&self) -> String {
        match &self.user_id {
            Some(user_id) => format!("user:{}", user_id),
            None => format!("guest:{}", self.username),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: AnswerId,
    pub participant_id: ParticipantId,
    pub question_id: QuestionId,
    pub selected_option: String,
    /// Computed once at submission time, never recomputed
    pub is_correct: bool,
    pub submitted_at: DateTime<Utc>,
}

/// Registered account in the identity registry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    /// Opaque bearer credential issued at registration
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Resolved identity of the request sender
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
}

impl From<UserAccount> for CurrentUser {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id,
            username: account.username,
        }
    }
}

// ========== Creation payloads ==========

/// Fully validated room creation payload (validation happens at the HTTP
/// boundary before this is built)
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub title: String,
    pub settings: RoomSettings,
    pub questions: Vec<QuestionDraft>,
}

/// Question payload before it is stored. Used both as room creation input and
/// as the AI generator's output shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl QuestionDraft {
    /// Shape check shared by room creation and generator output
    pub fn validate(&self) -> Result<(), String> {
        if self.question_text.trim().is_empty() {
            return Err("question text must not be empty".to_string());
        }
        if self.options.len() != QUESTION_OPTION_COUNT {
            return Err(format!(
                "each question needs exactly {} options",
                QUESTION_OPTION_COUNT
            ));
        }
        if self
            .options
            .iter()
            .any(|o| o.id.trim().is_empty() || o.text.trim().is_empty())
        {
            return Err("every option needs an id and a text".to_string());
        }
        if !self.options.iter().any(|o| o.id == self.correct_answer) {
            return Err("correct answer must match one of the option ids".to_string());
        }
        Ok(())
    }
}

// ========== Aggregate views ==========

/// One leaderboard row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub correct: u32,
}

/// Per-answer detail row in the results view. Answers to questions outside
/// the room join to empty strings rather than being dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDetail {
    pub question: String,
    pub options: Vec<QuestionOption>,
    pub selected: String,
    pub correct: bool,
    /// Display text of the correct option, not its id
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResult {
    pub username: String,
    pub participant_id: ParticipantId,
    pub score: u32,
    pub total_attempts: u32,
    pub answers: Vec<AnswerDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionStat {
    pub question: String,
    pub correct: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResults {
    pub results: Vec<ParticipantResult>,
    pub question_stats: Vec<QuestionStat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            question_text: "Which planet is known as the red planet?".to_string(),
            options: vec![
                QuestionOption {
                    id: "a".to_string(),
                    text: "Mars".to_string(),
                },
                QuestionOption {
                    id: "b".to_string(),
                    text: "Venus".to_string(),
                },
                QuestionOption {
                    id: "c".to_string(),
                    text: "Jupiter".to_string(),
                },
                QuestionOption {
                    id: "d".to_string(),
                    text: "Saturn".to_string(),
                },
            ],
            correct_answer: "a".to_string(),
            explanation: String::new(),
        }
    }

    #[test]
    fn test_draft_validation_accepts_well_formed() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_draft_validation_rejects_empty_text() {
        let mut d = draft();
        d.question_text = "   ".to_string();
        assert!(d.validate().unwrap_err().contains("question text"));
    }

    #[test]
    fn test_draft_validation_rejects_wrong_option_count() {
        let mut d = draft();
        d.options.pop();
        assert!(d.validate().unwrap_err().contains("exactly 4"));
    }

    #[test]
    fn test_draft_validation_rejects_unknown_correct_answer() {
        let mut d = draft();
        d.correct_answer = "e".to_string();
        assert!(d.validate().unwrap_err().contains("option ids"));
    }

    #[test]
    fn test_effective_status_derives_finished() {
        let now = Utc::now();
        let room = Room {
            id: ulid::Ulid::new().to_string(),
            code: "ABC234".to_string(),
            host_id: None,
            title: "Quiz".to_string(),
            settings: RoomSettings {
                time_limit: Some(30),
                max_participants: None,
                start_time: now - chrono::Duration::hours(2),
                end_time: now - chrono::Duration::hours(1),
            },
            status: RoomStatus::Active,
            created_at: now - chrono::Duration::hours(3),
        };

        assert_eq!(room.effective_status(now), RoomStatus::Finished);
        // Stored status is untouched
        assert_eq!(room.status, RoomStatus::Active);

        let before_end = room.settings.end_time - chrono::Duration::minutes(5);
        assert_eq!(room.effective_status(before_end), RoomStatus::Active);
    }
}
