//! The module contains the error the engine can throw.
//!
//! Every reconciliation operation fails fast with one of these variants and
//! leaves no partial writes behind (the surrounding transaction rolls back).
use rust_decimal::Decimal;
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Insufficient stock: {available}L available, {requested}L requested")]
    InsufficientStock {
        available: Decimal,
        requested: Decimal,
    },
    #[error("Integrity violation: {0}")]
    Integrity(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (
                Self::InsufficientStock {
                    available: a1,
                    requested: r1,
                },
                Self::InsufficientStock {
                    available: a2,
                    requested: r2,
                },
            ) => a1 == a2 && r1 == r2,
            (Self::Integrity(a), Self::Integrity(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
