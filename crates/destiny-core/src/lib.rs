//! Core types and the Destiny Matrix calculator.
//!
//! This crate is free of HTTP and database dependencies. The calculator
//! ([`matrix::calculate_matrix`]) is a pure function from a birth date to a
//! [`matrix::MatrixCalculation`]; everything else here describes the records
//! that surround a calculation once it has been stored.

// Native `async fn` in traits; the store trait spells out its `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod arcana;
pub mod catalog;
pub mod date;
pub mod entitlement;
pub mod error;
pub mod interpretation;
pub mod matrix;
pub mod prompt;
pub mod record;
pub mod store;

pub use arcana::Arcana;
pub use date::BirthDate;
pub use error::{Error, Result};
pub use matrix::{MatrixCalculation, calculate_matrix};
