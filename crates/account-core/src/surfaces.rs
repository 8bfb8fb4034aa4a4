//! Presenters for the screens that show login state
//!
//! Each takes the flag delivered by a subscription plus the repository for
//! the session details, and returns what to display.

use account_session::LoginRepository;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceAction {
    Logout,
    OpenLogin,
}

impl SurfaceAction {
    /// Carry out the action against the repository.
    ///
    /// Returns `true` when the caller still has to show the login screen.
    pub fn perform(self, repository: &LoginRepository) -> account_session::Result<bool> {
        match self {
            SurfaceAction::Logout => {
                repository.logout()?;
                Ok(false)
            }
            SurfaceAction::OpenLogin => Ok(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerView {
    pub text: String,
    pub action: SurfaceAction,
}

pub struct LoginBanner;

impl LoginBanner {
    pub fn render(repository: &LoginRepository, logged_in: bool) -> BannerView {
        if logged_in {
            BannerView {
                text: format!(
                    "Welcome, {}! Tap to sign out",
                    repository.username().unwrap_or_default()
                ),
                action: SurfaceAction::Logout,
            }
        } else {
            BannerView {
                text: "You are signed out. Tap to sign in".to_string(),
                action: SurfaceAction::OpenLogin,
            }
        }
    }
}

pub struct HomeScreen;

impl HomeScreen {
    pub fn render(logged_in: bool) -> &'static str {
        if logged_in {
            "You are signed in."
        } else {
            "You are not signed in."
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    pub greeting: String,
    pub last_login: Option<String>,
    pub show_email: bool,
    pub show_last_login: bool,
    pub button_label: &'static str,
    pub action: SurfaceAction,
}

pub struct AccountScreen;

impl AccountScreen {
    pub fn render(repository: &LoginRepository, logged_in: bool) -> AccountView {
        if !logged_in {
            return AccountView {
                greeting: "Hello! Sign in to manage your account.".to_string(),
                last_login: None,
                show_email: false,
                show_last_login: false,
                button_label: "Log in",
                action: SurfaceAction::OpenLogin,
            };
        }

        let session = repository.session();
        AccountView {
            greeting: format!("Hello, {}", session.username.as_deref().unwrap_or_default()),
            last_login: session
                .last_login_date_formatted()
                .map(|date| format!("Last login: {}", date)),
            show_email: true,
            show_last_login: true,
            button_label: "Log out",
            action: SurfaceAction::Logout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_session::{FixedClock, MockLoginApi};
    use account_storage::CredentialStore;
    use futures_util::StreamExt;
    use std::sync::Arc;
    use std::time::Duration;

    async fn signed_in_repository() -> LoginRepository {
        let repo = LoginRepository::new(
            CredentialStore::open_in_memory().unwrap(),
            Arc::new(MockLoginApi::with_latency(Duration::ZERO)),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        )
        .unwrap();
        let _: Vec<bool> = repo.login("alice", "secret1").collect().await;
        repo
    }

    #[tokio::test]
    async fn test_banner() {
        let repo = signed_in_repository().await;

        let view = LoginBanner::render(&repo, true);
        assert!(view.text.contains("alice"));
        assert_eq!(view.action, SurfaceAction::Logout);

        assert!(!view.action.perform(&repo).unwrap());
        assert!(!repo.is_logged_in());

        let view = LoginBanner::render(&repo, false);
        assert_eq!(view.action, SurfaceAction::OpenLogin);
        assert!(view.action.perform(&repo).unwrap());
    }

    #[tokio::test]
    async fn test_account_screen() {
        let repo = signed_in_repository().await;

        let view = AccountScreen::render(&repo, true);
        assert_eq!(view.greeting, "Hello, alice");
        assert!(view.last_login.unwrap().starts_with("Last login: "));
        assert!(view.show_email && view.show_last_login);
        assert_eq!(view.button_label, "Log out");

        repo.logout().unwrap();
        let view = AccountScreen::render(&repo, false);
        assert_eq!(view.last_login, None);
        assert!(!view.show_email);
        assert_eq!(view.action, SurfaceAction::OpenLogin);
    }

    #[test]
    fn test_home_screen() {
        assert_eq!(HomeScreen::render(true), "You are signed in.");
        assert_eq!(HomeScreen::render(false), "You are not signed in.");
    }
}
