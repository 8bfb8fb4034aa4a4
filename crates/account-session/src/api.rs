//! Login API boundary

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User information returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    pub session_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResult {
    Success(LoginResponse),
    /// Failure reason, free-form
    Error(String),
}

impl LoginResult {
    pub fn success(username: impl Into<String>, session_token: impl Into<String>) -> Self {
        Self::Success(LoginResponse {
            username: username.into(),
            session_token: session_token.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Authentication backend.
///
/// Implementations report every failure through [`LoginResult::Error`].
#[async_trait]
pub trait LoginApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> LoginResult;
}

/// Stand-in backend: waits, then accepts any credentials with a fresh token
#[derive(Debug, Clone)]
pub struct MockLoginApi {
    latency: Duration,
}

impl MockLoginApi {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

    pub fn new() -> Self {
        Self::with_latency(Self::DEFAULT_LATENCY)
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockLoginApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoginApi for MockLoginApi {
    async fn login(&self, username: &str, _password: &str) -> LoginResult {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        LoginResult::success(username, Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_api_issues_fresh_tokens() {
        let api = MockLoginApi::with_latency(Duration::ZERO);

        let first = api.login("alice", "secret1").await;
        let second = api.login("alice", "secret1").await;

        let (LoginResult::Success(first), LoginResult::Success(second)) = (first, second) else {
            panic!("mock login should always succeed");
        };
        assert_eq!(first.username, "alice");
        assert_ne!(first.session_token, second.session_token);
        assert!(Uuid::parse_str(&first.session_token).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_api_waits_for_latency() {
        let api = MockLoginApi::new();
        let started = tokio::time::Instant::now();

        assert!(api.login("bob", "hunter22").await.is_success());
        assert!(started.elapsed() >= MockLoginApi::DEFAULT_LATENCY);
    }
}
