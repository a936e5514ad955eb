//! Formflow domain logic.
//!
//! Everything in this crate is pure: no database handles, no HTTP types.
//! The persistence and API crates feed rows in and get decisions, aggregates
//! or encoded bytes back out.

pub mod analytics;
pub mod error;
pub mod export;
pub mod question_order;
pub mod spreadsheet;
pub mod submission;
pub mod types;
