//! Login Repository
//!
//! Owns the authoritative login state. Reads come from an in-memory mirror
//! of the credential store; every mutation writes the store first, then the
//! mirror, then publishes the flag, all under the mirror's write lock.

use std::sync::Arc;

use futures_util::stream::{self, BoxStream, StreamExt};
use parking_lot::RwLock;

use account_storage::CredentialStore;

use crate::api::{LoginApi, LoginResult};
use crate::clock::Clock;
use crate::hub::{LoginStateHub, LoginStateSubscription};
use crate::session::Session;
use crate::Result;

pub struct LoginRepository {
    /// Mirror of the persisted session
    session: Arc<RwLock<Session>>,
    /// Durable storage, written only from here
    store: CredentialStore,
    api: Arc<dyn LoginApi>,
    clock: Arc<dyn Clock>,
    login_state: LoginStateHub,
    /// Held for the whole of a login attempt
    login_gate: Arc<tokio::sync::Mutex<()>>,
}

impl LoginRepository {
    /// Load the persisted session and start publishing from it
    pub fn new(
        store: CredentialStore,
        api: Arc<dyn LoginApi>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let session = Session::load(&store)?;
        let login_state = LoginStateHub::new(session.is_logged_in());

        tracing::info!(
            logged_in = session.is_logged_in(),
            username = ?session.username,
            "Restored login session"
        );

        Ok(Self {
            session: Arc::new(RwLock::new(session)),
            store,
            api,
            clock,
            login_state,
            login_gate: Arc::new(tokio::sync::Mutex::new(())),
        })
    }

    pub fn username(&self) -> Option<String> {
        self.session.read().username.clone()
    }

    pub fn session_token(&self) -> Option<String> {
        self.session.read().session_token.clone()
    }

    pub fn last_login_time(&self) -> Option<i64> {
        self.session.read().login_time
    }

    pub fn last_login_date_formatted(&self) -> Option<String> {
        self.session.read().last_login_date_formatted()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.read().is_logged_in()
    }

    /// All three session fields, read together
    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    /// Current login flag, then every change
    pub fn observe_login_state(&self) -> LoginStateSubscription {
        self.login_state.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.login_state.subscriber_count()
    }

    /// Clear the session and publish `false`.
    ///
    /// A login already in flight is not cancelled and may still commit.
    pub fn logout(&self) -> Result<()> {
        let username = self.username();
        self.commit(Session::signed_out())?;

        tracing::info!(username = ?username, "Logged out");
        Ok(())
    }

    /// Attempt a login on a Tokio task.
    ///
    /// The returned stream yields a single `true` once the session is stored
    /// and published, or `false` if the attempt failed. Attempts on the same
    /// repository run one at a time. Outside a Tokio runtime the stream
    /// yields `false` without attempting anything.
    pub fn login(&self, username: &str, password: &str) -> BoxStream<'static, bool> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(username = %username, error = %e, "Login attempted outside a Tokio runtime");
                return stream::iter([false]).boxed();
            }
        };

        let repo = self.clone();
        let username = username.to_string();
        let password = password.to_string();

        let attempt =
            handle.spawn(async move { repo.attempt_login(&username, &password).await });

        stream::once(async move {
            attempt.await.unwrap_or_else(|e| {
                tracing::error!(error = %e, "Login task did not complete");
                false
            })
        })
        .boxed()
    }

    async fn attempt_login(&self, username: &str, password: &str) -> bool {
        let _gate = self.login_gate.lock().await;

        match self.api.login(username, password).await {
            LoginResult::Error(reason) => {
                // TODO: surface the failure reason to the login form
                tracing::warn!(username = %username, reason = %reason, "Login rejected");
                false
            }
            LoginResult::Success(response) => {
                let login_time = self.clock.current_time_millis();
                let session =
                    Session::signed_in(response.username, response.session_token, login_time);

                match self.commit(session) {
                    Ok(()) => {
                        tracing::info!(username = %username, login_time, "Logged in");
                        true
                    }
                    Err(e) => {
                        tracing::error!(username = %username, error = %e, "Failed to store session");
                        false
                    }
                }
            }
        }
    }

    fn commit(&self, session: Session) -> Result<()> {
        let mut current = self.session.write();
        session.save(&self.store)?;

        let logged_in = session.is_logged_in();
        *current = session;
        self.login_state.publish(logged_in);
        Ok(())
    }
}

impl Clone for LoginRepository {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            store: self.store.clone(),
            api: Arc::clone(&self.api),
            clock: Arc::clone(&self.clock),
            login_state: self.login_state.clone(),
            login_gate: Arc::clone(&self.login_gate),
        }
    }
}
