// Modules are public so integration tests can drive the state directly

pub mod api;
pub mod auth;
pub mod error;
pub mod llm;
pub mod state;
pub mod types;
