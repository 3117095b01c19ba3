//! The module contains the error the engine can throw.
//!
//! The variants map one-to-one onto the HTTP failure modes the server
//! exposes:
//!
//! - [`NotFound`] an id does not resolve, or the record is in the wrong
//!   status for the requested transition.
//! - [`Validation`] malformed or out-of-range input.
//! - [`InsufficientFunds`] a transfer or payment would violate a balance
//!   constraint.
//! - [`Conflict`] a hard delete was attempted on a record that is not
//!   archived.
//!
//! [`NotFound`]: EngineError::NotFound
//! [`Validation`]: EngineError::Validation
//! [`InsufficientFunds`]: EngineError::InsufficientFunds
//! [`Conflict`]: EngineError::Conflict
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("conflict: {0}")]
    Conflict(String),
}
