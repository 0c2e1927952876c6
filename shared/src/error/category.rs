//! Error code ranges

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Domain of an [`ErrorCode`], derived from its numeric range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 0xxx
    General,
    /// 6xxx
    Product,
    /// 7xxx, including assignment sync
    Category,
    /// 8xxx
    Import,
    /// 9xxx and anything unassigned
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            6000..7000 => Self::Product,
            7000..8000 => Self::Category,
            8000..9000 => Self::Import,
            _ => Self::System,
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
