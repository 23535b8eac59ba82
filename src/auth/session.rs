use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// What a successful login hands back: the token the client must present
/// and when it stops being good.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

/// In-process session registry.
///
/// Ephemeral on purpose: sessions live exactly as long as the process.
/// Nothing is persisted.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, token: &str, expires_at: DateTime<Utc>) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(token.to_string(), expires_at);
    }

    /// A token is valid while it is known and unexpired. Checking an
    /// expired token evicts it.
    pub async fn verify(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get(token) {
            Some(expires_at) if *expires_at > Utc::now() => true,
            Some(_) => {
                sessions.remove(token);
                false
            }
            None => false,
        }
    }

    pub async fn remove(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
