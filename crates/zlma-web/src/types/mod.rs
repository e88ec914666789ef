//! Shared types for the zlma pages.

pub mod error;

pub use error::{ConfigError, ProcessError, ServeError, ValidationError};
