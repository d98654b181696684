//! Column decoding helpers.
//!
//! Decimals and enums are stored as TEXT. A value that no longer parses is a
//! storage error, never a silent default.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

/// Parses a TEXT decimal column.
pub fn decode_decimal(value: &str, column: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value)
        .map_err(|e| StorageError::Decode(format!("{} '{}': {}", column, value, e)))
}

/// Parses a TEXT enum column through the domain type's `FromStr`.
pub fn decode_enum<T>(value: &str, column: &str) -> Result<T, StorageError>
where
    T: FromStr<Err = String>,
{
    T::from_str(value).map_err(|e| StorageError::Decode(format!("{}: {}", column, e)))
}
