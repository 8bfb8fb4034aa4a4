//! Session data structure

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use account_storage::{keys, CredentialStore};

use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Name the user signed in with
    pub username: Option<String>,
    /// Token issued by the login API
    pub session_token: Option<String>,
    /// Epoch millis of the last successful login
    pub login_time: Option<i64>,
}

impl Session {
    /// A login time of `0` is the stored "unset" marker and reads as `None`
    pub fn signed_in(username: String, session_token: String, login_time: i64) -> Self {
        Self {
            username: Some(username),
            session_token: Some(session_token),
            login_time: (login_time != 0).then_some(login_time),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session_token.is_some()
    }

    /// Login time as a local date-time, e.g. `Mar 4, 2024, 9:15:02 AM`
    pub fn last_login_date_formatted(&self) -> Option<String> {
        let millis = self.login_time?;
        let at = DateTime::from_timestamp_millis(millis)?;
        Some(
            at.with_timezone(&Local)
                .format("%b %-d, %Y, %-I:%M:%S %p")
                .to_string(),
        )
    }

    /// Read the persisted session
    pub(crate) fn load(store: &CredentialStore) -> Result<Self> {
        let username = store.get(keys::USERNAME)?;
        let session_token = store.get(keys::SESSION_TOKEN)?;
        let login_time = match store.get_i64(keys::LOGIN_TIME)? {
            0 => None,
            millis => Some(millis),
        };

        Ok(Self {
            username,
            session_token,
            login_time,
        })
    }

    /// Persist all three fields in one transaction
    pub(crate) fn save(&self, store: &CredentialStore) -> Result<()> {
        let login_time = self.login_time.unwrap_or(0).to_string();
        store.set_many(&[
            (keys::USERNAME, self.username.as_deref()),
            (keys::SESSION_TOKEN, self.session_token.as_deref()),
            (keys::LOGIN_TIME, Some(login_time.as_str())),
        ])?;
        Ok(())
    }
}
