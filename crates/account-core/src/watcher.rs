//! Scoped login state observer
//!
//! A surface holds a `StateWatcher` for as long as it is alive. Dropping the
//! watcher aborts its task, which drops the subscription and unsubscribes.

use account_session::LoginStateSubscription;
use tokio::task::JoinHandle;

pub struct StateWatcher {
    task: JoinHandle<()>,
}

impl StateWatcher {
    /// Must be called inside a Tokio runtime
    pub fn spawn<F>(mut subscription: LoginStateSubscription, mut on_change: F) -> Self
    where
        F: FnMut(bool) + Send + 'static,
    {
        let task = tokio::spawn(async move {
            while let Some(logged_in) = subscription.recv().await {
                on_change(logged_in);
            }
            tracing::debug!("Login state stream closed");
        });

        Self { task }
    }

    /// True once the repository is gone or the watcher was stopped
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for StateWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
