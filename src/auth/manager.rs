use super::session::{AdminSession, SessionStore};
use crate::core::{Result, StoreError, fresh_id};
use chrono::{Duration, Utc};

const SESSION_TTL_HOURS: i64 = 24;

/// The single-password admin gate.
///
/// The shared password comes from configuration, is trimmed and hashed
/// with bcrypt at startup, and every login verifies against the hash.
/// Successful logins mint a session token with a 24-hour expiry.
pub struct AdminAuth {
    password_hash: String,
    sessions: SessionStore,
    session_ttl: Duration,
}

impl AdminAuth {
    pub fn new(admin_password: &str) -> Result<Self> {
        let trimmed = admin_password.trim();
        if trimmed.is_empty() {
            return Err(StoreError::Configuration(
                "admin password is not configured".into(),
            ));
        }

        let password_hash = bcrypt::hash(trimmed, bcrypt::DEFAULT_COST)
            .map_err(|e| StoreError::Configuration(format!("failed to hash password: {}", e)))?;

        Ok(Self {
            password_hash,
            sessions: SessionStore::new(),
            session_ttl: Duration::hours(SESSION_TTL_HOURS),
        })
    }

    /// Shortens the session lifetime; test hook.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Checks the password (whitespace-trimmed) and on success issues a
    /// fresh session token.
    pub async fn login(&self, password: &str) -> Result<AdminSession> {
        let matched = bcrypt::verify(password.trim(), &self.password_hash).unwrap_or(false);
        if !matched {
            tracing::warn!("admin login rejected: password mismatch");
            return Err(StoreError::InvalidCredentials);
        }

        let session = AdminSession {
            session_token: fresh_id(),
            expires_at: Utc::now() + self.session_ttl,
        };
        self.sessions
            .insert(&session.session_token, session.expires_at)
            .await;
        tracing::info!("admin login accepted");
        Ok(session)
    }

    pub async fn verify(&self, token: &str) -> bool {
        self.sessions.verify(token).await
    }

    pub async fn logout(&self, token: &str) {
        self.sessions.remove(token).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_with_correct_password() {
        let auth = AdminAuth::new("topsecret").unwrap();
        let session = auth.login("topsecret").await.unwrap();

        assert!(!session.session_token.is_empty());
        assert!(session.expires_at > Utc::now());
        assert!(auth.verify(&session.session_token).await);
    }

    #[tokio::test]
    async fn test_login_trims_whitespace() {
        let auth = AdminAuth::new("  topsecret  ").unwrap();
        assert!(auth.login(" topsecret ").await.is_ok());
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let auth = AdminAuth::new("topsecret").unwrap();
        let err = auth.login("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_empty_password_is_config_error() {
        assert!(matches!(
            AdminAuth::new("   "),
            Err(StoreError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_session_fails_verify() {
        let auth = AdminAuth::new("topsecret")
            .unwrap()
            .with_session_ttl(Duration::seconds(-1));
        let session = auth.login("topsecret").await.unwrap();
        assert!(!auth.verify(&session.session_token).await);
    }

    #[tokio::test]
    async fn test_logout_invalidates_token() {
        let auth = AdminAuth::new("topsecret").unwrap();
        let session = auth.login("topsecret").await.unwrap();
        auth.logout(&session.session_token).await;
        assert!(!auth.verify(&session.session_token).await);
    }
}
