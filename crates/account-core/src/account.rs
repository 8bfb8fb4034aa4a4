//! Account state container
//!
//! Wires the credential store, login API and clock into one repository.
//! Every surface gets its state from the same repository instance.

use std::sync::Arc;

use account_form::LoginViewModel;
use account_session::{Clock, LoginApi, LoginRepository, MockLoginApi, SystemClock};
use account_storage::{CredentialStore, Database};

use crate::config::Config;
use crate::watcher::StateWatcher;
use crate::Result;

pub struct Account {
    config: Config,
    repository: LoginRepository,
}

impl Account {
    /// Open the on-disk store and build the repository against the mock API
    pub fn new(config: Config) -> Result<Self> {
        let db = Database::open(&config.database_path)?;
        let store = CredentialStore::new(db);
        let api = Arc::new(MockLoginApi::with_latency(config.mock_latency()));

        Self::with_parts(config, store, api, Arc::new(SystemClock))
    }

    pub fn with_parts(
        config: Config,
        store: CredentialStore,
        api: Arc<dyn LoginApi>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let repository = LoginRepository::new(store, api, clock)?;

        tracing::info!(
            database = %config.database_path.display(),
            logged_in = repository.is_logged_in(),
            "Account initialized"
        );

        Ok(Self { config, repository })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &LoginRepository {
        &self.repository
    }

    pub fn login_view_model(&self) -> LoginViewModel {
        LoginViewModel::new(self.repository.clone())
    }

    /// Call `on_change` with the login flag until the watcher is dropped
    pub fn watch<F>(&self, on_change: F) -> StateWatcher
    where
        F: FnMut(bool) + Send + 'static,
    {
        StateWatcher::spawn(self.repository.observe_login_state(), on_change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_session::FixedClock;
    use std::path::PathBuf;

    fn test_account() -> Account {
        let mut config = Config::new(PathBuf::from("/unused"));
        config.mock_latency_ms = 0;
        let api = Arc::new(MockLoginApi::with_latency(config.mock_latency()));

        Account::with_parts(
            config,
            CredentialStore::open_in_memory().unwrap(),
            api,
            Arc::new(FixedClock::new(42)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_view_model_shares_repository() {
        let account = test_account();
        let vm = account.login_view_model();

        assert!(vm.login("alice@example.com", "secret1").await);
        assert!(account.repository().is_logged_in());
        assert_eq!(account.repository().last_login_time(), Some(42));

        account.repository().logout().unwrap();
        assert!(!vm.repository().is_logged_in());
    }

    #[tokio::test]
    async fn test_new_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new(dir.path().to_path_buf());
        config.mock_latency_ms = 0;

        {
            let account = Account::new(config.clone()).unwrap();
            assert!(!account.repository().is_logged_in());
            assert!(account.login_view_model().login("bob", "hunter22").await);
        }

        let account = Account::new(config).unwrap();
        assert!(account.repository().is_logged_in());
        assert_eq!(account.repository().username().as_deref(), Some("bob"));
    }
}
