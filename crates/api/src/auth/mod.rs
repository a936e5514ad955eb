//! Identity primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token issue and validation.

pub mod jwt;
pub mod password;
