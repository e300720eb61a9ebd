//! Core functionality for preference documents, legacy import and persistence

pub mod document;
pub mod error;
pub mod legacy;
pub mod literal;
pub mod locations;
pub mod store;
pub mod value;
