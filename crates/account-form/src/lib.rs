//! Account Login Form
//!
//! Input checks for the login screen and the view model that drives it.
//! Validation is pure; the view model only adds state and the login call.

mod validation;
mod view_model;

pub use validation::{is_password_valid, is_username_valid, validate, FormError, LoginFormState};
pub use view_model::LoginViewModel;
