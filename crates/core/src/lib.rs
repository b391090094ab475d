//! Shared domain types, errors, and validation rules.

pub mod error;
pub mod types;
pub mod validation;
