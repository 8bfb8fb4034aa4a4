//! Account Core
//!
//! Central coordination layer: configuration, logging, and the container
//! that hands one login repository to every surface.

mod account;
mod config;
mod error;
mod surfaces;
mod watcher;

pub use account::Account;
pub use config::{Config, CONFIG_FILE_NAME};
pub use error::CoreError;
pub use surfaces::{
    AccountScreen, AccountView, BannerView, HomeScreen, LoginBanner, SurfaceAction,
};
pub use watcher::StateWatcher;

// Re-export core components
pub use account_form::{validate, FormError, LoginFormState, LoginViewModel};
pub use account_session::{
    Clock, FixedClock, LoginApi, LoginRepository, LoginResponse, LoginResult,
    LoginStateSubscription, MockLoginApi, Session, SessionError, SystemClock,
};
pub use account_storage::{CredentialStore, Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging; `RUST_LOG` takes precedence over `default_filter`
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
