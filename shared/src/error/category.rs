//! Coarse error classes derived from the code ranges

use super::codes::ErrorCode;

/// The thousands-range a code belongs to.
///
/// Used where behavior depends on the class of failure rather than the
/// specific code, e.g. the response layer logs `System` errors and stays
/// quiet about the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    General,
    Auth,
    Order,
    Payment,
    Catalog,
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            4000..5000 => Self::Order,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Catalog,
            9000.. => Self::System,
            // Ranges the registry does not assign
            _ => Self::General,
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_map_to_their_category() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(4002), ErrorCategory::Order);
        assert_eq!(ErrorCategory::from_code(5002), ErrorCategory::Payment);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Catalog);
        assert_eq!(ErrorCategory::from_code(9002), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(u16::MAX), ErrorCategory::System);
    }

    #[test]
    fn test_unassigned_ranges_fall_back_to_general() {
        assert_eq!(ErrorCategory::from_code(2500), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(7500), ErrorCategory::General);
    }

    #[test]
    fn test_codes_report_their_category() {
        assert_eq!(ErrorCode::DuplicateEmail.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::EmptyCart.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::GatewayError.category(), ErrorCategory::Payment);
        assert_eq!(ErrorCode::BookNotFound.category(), ErrorCategory::Catalog);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }
}
