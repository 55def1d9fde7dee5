//! The module contains the errors the ledger can return.
//!
//! The errors are:
//!
//! - [`InvalidAmount`] and [`InvalidDescription`] returned by
//!   [`Ledger::add`] when a draft is rejected.
//! - [`InvalidKind`], [`InvalidField`], [`InvalidDirection`] and
//!   [`InvalidDate`] returned when textual view parameters cannot be parsed.
//! - [`Subscriber`] built for a failing change subscriber. It is logged by
//!   the ledger and never returned from a mutation.
//!
//!  [`InvalidAmount`]: LedgerError::InvalidAmount
//!  [`InvalidDescription`]: LedgerError::InvalidDescription
//!  [`InvalidKind`]: LedgerError::InvalidKind
//!  [`InvalidField`]: LedgerError::InvalidField
//!  [`InvalidDirection`]: LedgerError::InvalidDirection
//!  [`InvalidDate`]: LedgerError::InvalidDate
//!  [`Subscriber`]: LedgerError::Subscriber
//!  [`Ledger::add`]: crate::Ledger::add
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid description: {0}")]
    InvalidDescription(String),
    #[error("Invalid kind: \"{0}\"")]
    InvalidKind(String),
    #[error("Invalid field: \"{0}\"")]
    InvalidField(String),
    #[error("Invalid direction: \"{0}\"")]
    InvalidDirection(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Subscriber #{index} failed: {reason}")]
    Subscriber { index: usize, reason: String },
}

impl LedgerError {
    /// Returns `true` for errors caused by malformed or out-of-range input.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Subscriber { .. })
    }
}
