use super::AppState;
use crate::error::ApiResult;
use crate::types::*;
use std::collections::{HashMap, HashSet};

impl AppState {
    /// Correct-answer counts for a room, best first. Only answers to the
    /// room's own questions count, and only participants with at least one
    /// such answer appear.
    pub async fn leaderboard(&self, code: &str) -> ApiResult<Vec<LeaderboardEntry>> {
        let room = self.room_by_code(code).await?;

        let room_questions: HashSet<QuestionId> = self
            .questions
            .read()
            .await
            .values()
            .filter(|q| q.room_id == room.id)
            .map(|q| q.id.clone())
            .collect();

        let mut counts: HashMap<ParticipantId, u32> = HashMap::new();
        for answer in self.answers.read().await.values() {
            if !room_questions.contains(&answer.question_id) {
                continue;
            }
            let correct = counts.entry(answer.participant_id.clone()).or_insert(0);
            if answer.is_correct {
                *correct += 1;
            }
        }

        // Rows whose participant no longer resolves are dropped
        let participants = self.participants.read().await;
        let mut rows: Vec<(Participant, u32)> = counts
            .into_iter()
            .filter_map(|(id, correct)| participants.get(&id).cloned().map(|p| (p, correct)))
            .collect();

        rows.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.joined_at.cmp(&b.0.joined_at))
                .then_with(|| a.0.id.cmp(&b.0.id))
        });

        Ok(rows
            .into_iter()
            .map(|(p, correct)| LeaderboardEntry {
                username: p.username,
                correct,
            })
            .collect())
    }

    /// Full results view: one row per room participant carrying all their
    /// answers with per-answer detail, plus per-question totals in quiz
    /// order.
    pub async fn results(&self, code: &str) -> ApiResult<QuizResults> {
        let room = self.room_by_code(code).await?;

        let questions = self.questions_in_room(&room.id).await;
        let by_id: HashMap<QuestionId, Question> = questions
            .iter()
            .cloned()
            .map(|q| (q.id.clone(), q))
            .collect();

        let participants = self.participants_in_room(&room.id).await;

        let answers = self.answers.read().await;
        let mut rows: Vec<(Participant, u32, Vec<AnswerDetail>)> = Vec::new();
        for participant in participants {
            let mut own: Vec<&Answer> = answers
                .values()
                .filter(|a| a.participant_id == participant.id)
                .collect();
            own.sort_by(|a, b| {
                a.submitted_at
                    .cmp(&b.submitted_at)
                    .then_with(|| a.id.cmp(&b.id))
            });

            let score = own.iter().filter(|a| a.is_correct).count() as u32;
            let details: Vec<AnswerDetail> = own
                .iter()
                .map(|a| match by_id.get(&a.question_id) {
                    Some(q) => AnswerDetail {
                        question: q.question_text.clone(),
                        options: q.options.clone(),
                        selected: a.selected_option.clone(),
                        correct: a.is_correct,
                        correct_answer: q
                            .options
                            .iter()
                            .find(|o| o.id == q.correct_answer)
                            .map(|o| o.text.clone())
                            .unwrap_or_default(),
                        explanation: q.explanation.clone(),
                    },
                    // Answers to questions outside this room keep their row
                    // but carry no question detail
                    None => AnswerDetail {
                        question: String::new(),
                        options: Vec::new(),
                        selected: a.selected_option.clone(),
                        correct: a.is_correct,
                        correct_answer: String::new(),
                        explanation: String::new(),
                    },
                })
                .collect();

            rows.push((participant, score, details));
        }

        rows.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.joined_at.cmp(&b.0.joined_at))
                .then_with(|| a.0.id.cmp(&b.0.id))
        });

        let results: Vec<ParticipantResult> = rows
            .into_iter()
            .map(|(p, score, details)| ParticipantResult {
                username: p.username,
                participant_id: p.id,
                score,
                total_attempts: details.len() as u32,
                answers: details,
            })
            .collect();

        // Stats count every answer row referencing the question, wherever
        // the answering participant came from
        let question_stats: Vec<QuestionStat> = questions
            .iter()
            .map(|q| {
                let rows: Vec<&Answer> =
                    answers.values().filter(|a| a.question_id == q.id).collect();
                QuestionStat {
                    question: q.question_text.clone(),
                    correct: rows.iter().filter(|a| a.is_correct).count() as u32,
                    total: rows.len() as u32,
                }
            })
            .collect();

        Ok(QuizResults {
            results,
            question_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::JoinOutcome;
    use chrono::{Duration, Utc};

    fn option(id: &str, text: &str) -> QuestionOption {
        QuestionOption {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    fn two_question_room() -> NewRoom {
        let now = Utc::now();
        NewRoom {
            title: "Geography".to_string(),
            settings: RoomSettings {
                time_limit: Some(30),
                max_participants: None,
                start_time: now,
                end_time: now + Duration::hours(1),
            },
            questions: vec![
                QuestionDraft {
                    question_text: "Which river flows through Cairo?".to_string(),
                    options: vec![
                        option("a", "Nile"),
                        option("b", "Danube"),
                        option("c", "Amazon"),
                        option("d", "Rhine"),
                    ],
                    correct_answer: "a".to_string(),
                    explanation: "The Nile crosses Cairo on its way north.".to_string(),
                },
                QuestionDraft {
                    question_text: "Which mountain is the tallest?".to_string(),
                    options: vec![
                        option("a", "K2"),
                        option("b", "Everest"),
                        option("c", "Denali"),
                        option("d", "Mont Blanc"),
                    ],
                    correct_answer: "b".to_string(),
                    explanation: String::new(),
                },
            ],
        }
    }

    async fn join_guest(state: &AppState, code: &str, name: &str) -> Participant {
        match state
            .join_room(code, None, Some(name.to_string()))
            .await
            .unwrap()
        {
            JoinOutcome::Joined(p) => p,
            JoinOutcome::AlreadyJoined(p) => p,
        }
    }

    #[tokio::test]
    async fn test_leaderboard_orders_by_correct_count() {
        let state = AppState::new();
        let room = state.create_room(None, two_question_room()).await;
        let questions = state.questions_in_room(&room.id).await;

        let p1 = join_guest(&state, &room.code, "priya").await;
        let p2 = join_guest(&state, &room.code, "quinn").await;

        // priya gets both right, quinn swaps them and gets both wrong
        state
            .submit_answer(&room.code, &p1.id, &questions[0].id, "a")
            .await
            .unwrap();
        state
            .submit_answer(&room.code, &p1.id, &questions[1].id, "b")
            .await
            .unwrap();
        state
            .submit_answer(&room.code, &p2.id, &questions[0].id, "b")
            .await
            .unwrap();
        state
            .submit_answer(&room.code, &p2.id, &questions[1].id, "a")
            .await
            .unwrap();

        let board = state.leaderboard(&room.code).await.unwrap();
        assert_eq!(
            board,
            vec![
                LeaderboardEntry {
                    username: "priya".to_string(),
                    correct: 2,
                },
                LeaderboardEntry {
                    username: "quinn".to_string(),
                    correct: 0,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_leaderboard_empty_room() {
        let state = AppState::new();
        let room = state.create_room(None, two_question_room()).await;

        let board = state.leaderboard(&room.code).await.unwrap();
        assert!(board.is_empty());

        let err = state.leaderboard("NOROOM").await.unwrap_err();
        assert_eq!(err.to_string(), "Room not found");
    }

    #[tokio::test]
    async fn test_leaderboard_skips_participants_without_answers() {
        let state = AppState::new();
        let room = state.create_room(None, two_question_room()).await;
        let questions = state.questions_in_room(&room.id).await;

        let p1 = join_guest(&state, &room.code, "priya").await;
        join_guest(&state, &room.code, "quinn").await;

        state
            .submit_answer(&room.code, &p1.id, &questions[0].id, "c")
            .await
            .unwrap();

        let board = state.leaderboard(&room.code).await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].username, "priya");
        assert_eq!(board[0].correct, 0);
    }

    #[tokio::test]
    async fn test_leaderboard_counts_every_duplicate_row() {
        let state = AppState::new();
        let room = state.create_room(None, two_question_room()).await;
        let questions = state.questions_in_room(&room.id).await;
        let p = join_guest(&state, &room.code, "priya").await;

        state
            .submit_answer(&room.code, &p.id, &questions[0].id, "a")
            .await
            .unwrap();
        state
            .submit_answer(&room.code, &p.id, &questions[0].id, "a")
            .await
            .unwrap();

        let board = state.leaderboard(&room.code).await.unwrap();
        assert_eq!(board[0].correct, 2);
    }

    #[tokio::test]
    async fn test_leaderboard_tiebreak_prefers_earlier_joiner() {
        let state = AppState::new();
        let room = state.create_room(None, two_question_room()).await;
        let questions = state.questions_in_room(&room.id).await;

        let p1 = join_guest(&state, &room.code, "priya").await;
        let p2 = join_guest(&state, &room.code, "quinn").await;

        // Backdate quinn's join so the tiebreak has to look at timestamps,
        // not insertion order
        state
            .participants
            .write()
            .await
            .get_mut(&p2.id)
            .unwrap()
            .joined_at = p1.joined_at - Duration::minutes(5);

        state
            .submit_answer(&room.code, &p1.id, &questions[0].id, "a")
            .await
            .unwrap();
        state
            .submit_answer(&room.code, &p2.id, &questions[0].id, "a")
            .await
            .unwrap();

        let board = state.leaderboard(&room.code).await.unwrap();
        assert_eq!(board[0].username, "quinn");
        assert_eq!(board[1].username, "priya");
    }

    #[tokio::test]
    async fn test_results_full_view() {
        let state = AppState::new();
        let room = state.create_room(None, two_question_room()).await;
        let questions = state.questions_in_room(&room.id).await;

        let p1 = join_guest(&state, &room.code, "priya").await;
        let p2 = join_guest(&state, &room.code, "quinn").await;

        state
            .submit_answer(&room.code, &p1.id, &questions[0].id, "a")
            .await
            .unwrap();
        state
            .submit_answer(&room.code, &p1.id, &questions[1].id, "b")
            .await
            .unwrap();
        state
            .submit_answer(&room.code, &p2.id, &questions[0].id, "b")
            .await
            .unwrap();
        state
            .submit_answer(&room.code, &p2.id, &questions[1].id, "a")
            .await
            .unwrap();

        let view = state.results(&room.code).await.unwrap();

        assert_eq!(view.results.len(), 2);
        let first = &view.results[0];
        assert_eq!(first.username, "priya");
        assert_eq!(first.score, 2);
        assert_eq!(first.total_attempts, 2);
        assert_eq!(first.answers.len(), 2);
        assert_eq!(first.answers[0].question, "Which river flows through Cairo?");
        assert_eq!(first.answers[0].selected, "a");
        assert!(first.answers[0].correct);
        // Detail carries the correct option's display text, not its id
        assert_eq!(first.answers[0].correct_answer, "Nile");
        assert_eq!(
            first.answers[0].explanation,
            "The Nile crosses Cairo on its way north."
        );

        let second = &view.results[1];
        assert_eq!(second.username, "quinn");
        assert_eq!(second.score, 0);
        assert_eq!(second.total_attempts, 2);

        assert_eq!(
            view.question_stats,
            vec![
                QuestionStat {
                    question: "Which river flows through Cairo?".to_string(),
                    correct: 1,
                    total: 2,
                },
                QuestionStat {
                    question: "Which mountain is the tallest?".to_string(),
                    correct: 1,
                    total: 2,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_results_includes_joined_but_silent() {
        let state = AppState::new();
        let room = state.create_room(None, two_question_room()).await;
        join_guest(&state, &room.code, "priya").await;

        let view = state.results(&room.code).await.unwrap();
        assert_eq!(view.results.len(), 1);
        assert_eq!(view.results[0].score, 0);
        assert_eq!(view.results[0].total_attempts, 0);
        assert!(view.results[0].answers.is_empty());

        // Questions with no answers still get a stats row
        assert_eq!(view.question_stats.len(), 2);
        assert_eq!(view.question_stats[0].correct, 0);
        assert_eq!(view.question_stats[0].total, 0);
    }

    #[tokio::test]
    async fn test_cross_room_rows_follow_the_question() {
        let state = AppState::new();
        let room_a = state.create_room(None, two_question_room()).await;
        let room_b = state.create_room(None, two_question_room()).await;
        let questions_a = state.questions_in_room(&room_a.id).await;

        // quinn belongs to room B but answers a room A question through
        // room B's code
        let quinn = join_guest(&state, &room_b.code, "quinn").await;
        state
            .submit_answer(&room_b.code, &quinn.id, &questions_a[0].id, "a")
            .await
            .unwrap();

        // The row counts toward room A's leaderboard and stats
        let board_a = state.leaderboard(&room_a.code).await.unwrap();
        assert_eq!(board_a.len(), 1);
        assert_eq!(board_a[0].username, "quinn");
        assert_eq!(board_a[0].correct, 1);

        let view_a = state.results(&room_a.code).await.unwrap();
        assert!(view_a.results.is_empty());
        assert_eq!(view_a.question_stats[0].total, 1);
        assert_eq!(view_a.question_stats[0].correct, 1);

        // In room B's results the answer keeps its row but joins no detail
        let view_b = state.results(&room_b.code).await.unwrap();
        assert_eq!(view_b.results.len(), 1);
        assert_eq!(view_b.results[0].score, 1);
        assert_eq!(view_b.results[0].total_attempts, 1);
        assert_eq!(view_b.results[0].answers[0].question, "");
        assert_eq!(view_b.results[0].answers[0].correct_answer, "");
        assert!(view_b.results[0].answers[0].correct);

        // Room B's own questions saw no answers
        assert_eq!(view_b.question_stats[0].total, 0);
        let board_b = state.leaderboard(&room_b.code).await.unwrap();
        assert!(board_b.is_empty());
    }
}
