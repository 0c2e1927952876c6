//! Unified error system
//!
//! - [`ErrorCode`]: numeric codes returned to API clients
//! - [`ErrorCategory`]: code ranges (general, product, category, import, system)
//! - [`AppError`]: handler error with code, message and details
//! - [`ApiResponse`]: JSON envelope for every response
//!
//! Catalog operations fail with [`crate::catalog::CatalogError`], which
//! converts into [`AppError`] at the HTTP boundary.
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::CategoryNotFound).with_detail("id", "42");
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(7001));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
