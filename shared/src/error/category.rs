//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Cart errors (1xxx)
    Cart,
    /// Customization errors (2xxx)
    Customization,
    /// Navigation errors (3xxx)
    Navigation,
    /// Payment errors (4xxx)
    Payment,
    /// Catalog and configuration errors (5xxx)
    Catalog,
}

impl ErrorCategory {
    /// Determine category from a numeric error code
    pub fn from_code(code: u16) -> Self {
        match code / 1000 {
            1 => ErrorCategory::Cart,
            2 => ErrorCategory::Customization,
            3 => ErrorCategory::Navigation,
            4 => ErrorCategory::Payment,
            5 => ErrorCategory::Catalog,
            _ => ErrorCategory::General,
        }
    }

    /// Get the category name
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCategory::General => "general",
            ErrorCategory::Cart => "cart",
            ErrorCategory::Customization => "customization",
            ErrorCategory::Navigation => "navigation",
            ErrorCategory::Payment => "payment",
            ErrorCategory::Catalog => "catalog",
        }
    }
}

impl ErrorCode {
    /// Get the category of this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1002), ErrorCategory::Cart);
        assert_eq!(ErrorCategory::from_code(2004), ErrorCategory::Customization);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Navigation);
        assert_eq!(ErrorCategory::from_code(4003), ErrorCategory::Payment);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Catalog);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::General);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::CartEmpty.category(), ErrorCategory::Cart);
        assert_eq!(ErrorCode::PaymentDeclined.category().name(), "payment");
    }
}
