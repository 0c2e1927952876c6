//! Error codes returned in the `code` field of every API response
//!
//! Ranges:
//! - 0xxx: general
//! - 6xxx: product
//! - 7xxx: category and assignment
//! - 8xxx: import
//! - 9xxx: system

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storefront error code, serialized as its `u16` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    Success = 0,
    Unknown = 1,
    /// Malformed or out-of-range input
    InvalidRequest = 2,

    // ==================== 6xxx: Product ====================
    ProductNotFound = 6001,
    ProductSlugExists = 6002,

    // ==================== 7xxx: Category ====================
    CategoryNotFound = 7001,
    CategorySlugExists = 7002,
    /// Parent id does not resolve
    CategoryParentInvalid = 7003,
    /// Parent change would close a cycle
    CategoryCycleDetected = 7004,
    /// Assignment sync finished with some writes rejected
    AssignmentPartialFailure = 7101,

    // ==================== 8xxx: Import ====================
    ImportParseFailed = 8001,
    ImportEmpty = 8002,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
}

impl ErrorCode {
    const ALL: [ErrorCode; 14] = [
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::InvalidRequest,
        ErrorCode::ProductNotFound,
        ErrorCode::ProductSlugExists,
        ErrorCode::CategoryNotFound,
        ErrorCode::CategorySlugExists,
        ErrorCode::CategoryParentInvalid,
        ErrorCode::CategoryCycleDetected,
        ErrorCode::AssignmentPartialFailure,
        ErrorCode::ImportParseFailed,
        ErrorCode::ImportEmpty,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default message when the caller supplies none
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "OK",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductSlugExists => "Product slug already exists",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategorySlugExists => "Category slug already exists",
            ErrorCode::CategoryParentInvalid => "Parent category does not exist",
            ErrorCode::CategoryCycleDetected => "Category parent would create a cycle",
            ErrorCode::AssignmentPartialFailure => "Some product assignments could not be updated",
            ErrorCode::ImportParseFailed => "Import file could not be parsed",
            ErrorCode::ImportEmpty => "Import contains no products",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A `u16` that is not a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorCode::InvalidRequest.code(), 2);
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::CategoryNotFound.code(), 7001);
        assert_eq!(ErrorCode::CategoryCycleDetected.code(), 7004);
        assert_eq!(ErrorCode::AssignmentPartialFailure.code(), 7101);
        assert_eq!(ErrorCode::ImportEmpty.code(), 8002);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_every_code_parses_back() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serialized_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::CategoryNotFound).unwrap(), "7001");
        let code: ErrorCode = serde_json::from_str("6002").unwrap();
        assert_eq!(code, ErrorCode::ProductSlugExists);
        assert!(serde_json::from_str::<ErrorCode>("1234").is_err());
    }
}
