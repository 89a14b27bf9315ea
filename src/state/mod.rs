mod answer;
mod participant;
mod question;
mod room;
mod score;
mod user;

pub use participant::JoinOutcome;

use crate::llm::{LlmConfig, LlmManager};
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state: one collection per document type
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RwLock<HashMap<RoomId, Room>>>,
    pub questions: Arc<RwLock<HashMap<QuestionId, Question>>>,
    pub participants: Arc<RwLock<HashMap<ParticipantId, Participant>>>,
    pub answers: Arc<RwLock<HashMap<AnswerId, Answer>>>,
    pub users: Arc<RwLock<HashMap<UserId, UserAccount>>>,
    /// Question generator, None when no provider is configured
    pub llm: Option<Arc<LlmManager>>,
    pub llm_config: LlmConfig,
}

impl AppState {
    pub fn new() -> Self {
        Self::new_with_llm(None, LlmConfig::default())
    }

    pub fn new_with_llm(llm: Option<LlmManager>, llm_config: LlmConfig) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            questions: Arc::new(RwLock::new(HashMap::new())),
            participants: Arc::new(RwLock::new(HashMap::new())),
            answers: Arc::new(RwLock::new(HashMap::new())),
            users: Arc::new(RwLock::new(HashMap::new())),
            llm: llm.map(Arc::new),
            llm_config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
