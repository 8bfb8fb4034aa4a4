//! Login session commands
use account_core::{Account, AccountScreen, BannerView, HomeScreen, LoginBanner};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::CommandResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub logged_in: bool,
    pub username: Option<String>,
    pub last_login: Option<String>,
    pub home: &'static str,
    pub banner: BannerView,
}

impl SessionInfo {
    fn from_account(account: &Account) -> Self {
        let repository = account.repository();
        let session = repository.session();
        let logged_in = session.is_logged_in();

        Self {
            logged_in,
            last_login: session.last_login_date_formatted(),
            username: session.username,
            home: HomeScreen::render(logged_in),
            banner: LoginBanner::render(repository, logged_in),
        }
    }
}

impl std::fmt::Display for SessionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.home)?;
        if let Some(username) = &self.username {
            writeln!(f, "User: {}", username)?;
        }
        if let Some(last_login) = &self.last_login {
            writeln!(f, "Last login: {}", last_login)?;
        }
        write!(f, "{}", self.banner.text)
    }
}

pub fn status(state: &AppState) -> CommandResult<SessionInfo> {
    CommandResult::ok(SessionInfo::from_account(state.account()))
}

pub async fn login(state: &AppState, username: &str, password: &str) -> CommandResult<SessionInfo> {
    let view_model = state.account().login_view_model();

    let form = view_model.login_data_changed(username, password);
    if let Some(error) = form.error() {
        return CommandResult::err(error.to_string());
    }

    if view_model.login(username, password).await {
        CommandResult::ok(SessionInfo::from_account(state.account()))
    } else {
        CommandResult::err("Login failed".to_string())
    }
}

pub fn logout(state: &AppState) -> CommandResult<SessionInfo> {
    match state.account().repository().logout() {
        Ok(()) => CommandResult::ok(SessionInfo::from_account(state.account())),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Interactive loop: reads `login <user> <password>`, `logout`, `status`
/// and `quit` from stdin while printing the account screen on every change.
/// Reports the final session on exit.
pub async fn shell(state: &AppState) -> CommandResult<SessionInfo> {
    let account = state.account();
    let repository = account.repository().clone();

    let _watcher = account.watch(move |logged_in| {
        let view = AccountScreen::render(&repository, logged_in);
        println!("{}", view.greeting);
        if let Some(last_login) = view.last_login {
            println!("{}", last_login);
        }
        println!("[{}]", view.button_label);
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => return status(state),
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => return status(state),
            Err(e) => return CommandResult::err(e.to_string()),
        };

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => return status(state),
            ["status"] => print_result(status(state)),
            ["logout"] => print_result(logout(state)),
            ["login", username, password] => {
                print_result(login(state, username, password).await)
            }
            _ => println!("usage: login <user> <password> | logout | status | quit"),
        }
    }
}

fn print_result(result: CommandResult<SessionInfo>) {
    match (result.data, result.error) {
        (Some(info), _) => println!("{}", info),
        (None, Some(error)) => println!("error: {}", error),
        (None, None) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_core::Config;

    fn app_state(dir: &std::path::Path) -> AppState {
        let mut config = Config::new(dir.to_path_buf());
        config.mock_latency_ms = 0;
        AppState::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(dir.path());
        assert!(!status(&state).data.unwrap().logged_in);

        let result = login(&state, "a@b.com", "secret1").await;
        assert!(result.success);
        let info = result.data.unwrap();
        assert!(info.logged_in);
        assert_eq!(info.username.as_deref(), Some("a@b.com"));
        assert!(info.to_string().contains("User: a@b.com"));

        let info = logout(&state).data.unwrap();
        assert!(!info.logged_in);
        assert_eq!(info.home, "You are not signed in.");
    }

    #[tokio::test]
    async fn test_login_rejects_invalid_form() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(dir.path());

        let result = login(&state, "not-an-email@", "secret1").await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Not a valid username"));

        let result = login(&state, "bob", "12345").await;
        assert_eq!(
            result.error.as_deref(),
            Some("Password must be >5 characters")
        );
        assert!(!state.account().repository().is_logged_in());
    }
}
