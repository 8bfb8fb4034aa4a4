//! Application state management
use account_core::{Account, Config, Result};

/// Owns the account container for the lifetime of one command
pub struct AppState {
    account: Account,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            account: Account::new(config)?,
        })
    }

    pub fn account(&self) -> &Account {
        &self.account
    }
}
