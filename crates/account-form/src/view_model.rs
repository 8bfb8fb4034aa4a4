//! Login screen view model

use std::sync::Arc;

use futures_util::StreamExt;
use parking_lot::RwLock;

use account_session::LoginRepository;

use crate::validation::{validate, LoginFormState};

pub struct LoginViewModel {
    repository: LoginRepository,
    form_state: Arc<RwLock<LoginFormState>>,
    /// Outcome of the last finished login, `None` before the first one
    login_success: Arc<RwLock<Option<bool>>>,
}

impl LoginViewModel {
    pub fn new(repository: LoginRepository) -> Self {
        Self {
            repository,
            form_state: Arc::new(RwLock::new(LoginFormState::default())),
            login_success: Arc::new(RwLock::new(None)),
        }
    }

    /// Re-validate after an edit to either field
    pub fn login_data_changed(&self, username: &str, password: &str) -> LoginFormState {
        let state = validate(username, password);
        *self.form_state.write() = state.clone();
        state
    }

    pub fn form_state(&self) -> LoginFormState {
        self.form_state.read().clone()
    }

    pub fn login_success(&self) -> Option<bool> {
        *self.login_success.read()
    }

    /// Run a login through the repository and record its outcome
    pub async fn login(&self, username: &str, password: &str) -> bool {
        let mut outcome = self.repository.login(username, password);
        let mut succeeded = false;

        while let Some(value) = outcome.next().await {
            succeeded = value;
            *self.login_success.write() = Some(value);
        }

        tracing::debug!(succeeded, "Login form submission finished");
        succeeded
    }

    pub fn repository(&self) -> &LoginRepository {
        &self.repository
    }
}

impl Clone for LoginViewModel {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            form_state: Arc::clone(&self.form_state),
            login_success: Arc::clone(&self.login_success),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FormError;
    use account_session::{FixedClock, LoginApi, LoginResult, MockLoginApi};
    use account_storage::CredentialStore;
    use std::time::Duration;

    struct RejectingApi;

    #[async_trait::async_trait]
    impl LoginApi for RejectingApi {
        async fn login(&self, _username: &str, _password: &str) -> LoginResult {
            LoginResult::Error("rejected".to_string())
        }
    }

    fn view_model(api: Arc<dyn LoginApi>) -> LoginViewModel {
        let store = CredentialStore::open_in_memory().unwrap();
        let repository = LoginRepository::new(store, api, Arc::new(FixedClock::new(1))).unwrap();
        LoginViewModel::new(repository)
    }

    #[test]
    fn test_form_state_tracks_input() {
        let vm = view_model(Arc::new(MockLoginApi::with_latency(Duration::ZERO)));
        assert_eq!(vm.form_state(), LoginFormState::default());

        vm.login_data_changed("not-an-email@", "123456");
        assert_eq!(vm.form_state().username_error, Some(FormError::InvalidUsername));

        vm.login_data_changed("alice@example.com", "12345");
        assert_eq!(vm.form_state().password_error, Some(FormError::InvalidPassword));

        let state = vm.login_data_changed("alice@example.com", "123456");
        assert!(state.is_data_valid);
        assert_eq!(vm.form_state(), state);
    }

    #[tokio::test]
    async fn test_login_records_success() {
        let vm = view_model(Arc::new(MockLoginApi::with_latency(Duration::ZERO)));
        assert_eq!(vm.login_success(), None);

        assert!(vm.login("alice", "secret1").await);
        assert_eq!(vm.login_success(), Some(true));
        assert!(vm.repository().is_logged_in());
        assert_eq!(vm.repository().username().as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_login_records_failure() {
        let vm = view_model(Arc::new(RejectingApi));

        assert!(!vm.login("alice", "secret1").await);
        assert_eq!(vm.login_success(), Some(false));
        assert!(!vm.repository().is_logged_in());
    }
}
