//! Account Session Management
//!
//! - A Session is the username, token and login time of the signed-in user
//! - The session persists across restarts through the credential store
//! - Login state is broadcast to every subscriber, current value first
//! - Logins run on a Tokio task and are serialized per repository

mod api;
mod clock;
mod error;
mod hub;
mod repository;
mod session;

pub use api::{LoginApi, LoginResponse, LoginResult, MockLoginApi};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::SessionError;
pub use hub::{LoginStateHub, LoginStateSubscription};
pub use repository::LoginRepository;
pub use session::Session;

pub type Result<T> = std::result::Result<T, SessionError>;
