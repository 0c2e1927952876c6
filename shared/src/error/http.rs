//! HTTP status for each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ProductNotFound | Self::CategoryNotFound => StatusCode::NOT_FOUND,
            Self::ProductSlugExists | Self::CategorySlugExists => StatusCode::CONFLICT,
            // Well-formed request that would break the hierarchy
            Self::CategoryParentInvalid | Self::CategoryCycleDetected => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::AssignmentPartialFailure => StatusCode::MULTI_STATUS,
            Self::Unknown | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::InvalidRequest | Self::ImportParseFailed | Self::ImportEmpty => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}
