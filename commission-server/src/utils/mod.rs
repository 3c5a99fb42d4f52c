//! Utility module - common types and helpers
//!
//! - [`AppError`] - application error type
//! - [`AppResult`] - application result alias
//! - logging setup

pub mod error;
pub mod logger;
pub mod result;

pub use error::{AppError, AppResponse, ok, ok_with_message};
pub use result::AppResult;
