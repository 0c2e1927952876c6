//! Utility module
//!
//! - [`logger`]: tracing subscriber setup
//! - [`validation`]: input length and format checks
//!
//! Error and response types come from `shared::error` and are re-exported
//! here for handlers.

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
