//! Foundation types for Granary.
//!
//! The storage engine in `granary-store` is generic over any hashable item
//! kind. This crate supplies the fixed enumeration used by the `granary`
//! binary and throughout the test suites.
//!
//! # Key Types
//!
//! - [`Cereal`] — The kinds of grain a granary knows how to hold
//! - [`TypeError`] — Failures when parsing kinds from text

pub mod cereal;
pub mod error;

pub use cereal::Cereal;
pub use error::TypeError;
