//! Command Error Types

use thiserror::Error;

/// Well-formed commands the loop refuses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Requested rate is not one of the supported values
    #[error("Rate {0} Hz is not one of 0, 1, 2, 4, 5, 10")]
    InvalidRate(i32),
}
