//! # Snakeshot Config
//!
//! TOML configuration for the snakeshot tool: browser, game page, board,
//! timing, output layout, diff options and player credentials.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
