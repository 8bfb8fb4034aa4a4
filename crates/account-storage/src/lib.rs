//! Account Storage Layer
//!
//! SQLite-backed persistence for the signed-in session.
//! The credential store is a flat key-value table; every write is committed
//! before the call returns.

mod credentials;
mod database;
mod error;
mod migrations;

pub use credentials::{keys, CredentialStore};
pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
