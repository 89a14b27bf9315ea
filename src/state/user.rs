use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::*;
use chrono::Utc;
use rand::Rng;

const TOKEN_CHARS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789";
const TOKEN_LENGTH: usize = 24;

/// Generate an opaque bearer token
fn generate_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LENGTH)
        .map(|_| TOKEN_CHARS[rng.random_range(0..TOKEN_CHARS.len())] as char)
        .collect()
}

impl AppState {
    /// Register an account and issue its bearer token
    pub async fn register_user(&self, username: &str) -> ApiResult<UserAccount> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::Validation("Username is required".to_string()));
        }

        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == username) {
            return Err(ApiError::Conflict("Username is taken".to_string()));
        }

        let account = UserAccount {
            id: ulid::Ulid::new().to_string(),
            username: username.to_string(),
            token: generate_token(),
            created_at: Utc::now(),
        };
        users.insert(account.id.clone(), account.clone());
        tracing::info!("Registered user {}", account.username);
        Ok(account)
    }

    /// Resolve a bearer token to its account
    pub async fn user_by_token(&self, token: &str) -> Option<UserAccount> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.token == token)
            .cloned()
    }

    pub async fn user_by_id(&self, id: &str) -> Option<UserAccount> {
        self.users.read().await.get(id).cloned()
    }
}
