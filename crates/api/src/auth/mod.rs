//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT generation and validation.
//! - [`cookie`] -- the HttpOnly `token` cookie carrying the JWT.

pub mod cookie;
pub mod jwt;
pub mod password;
