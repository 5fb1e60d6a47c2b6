//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller, decoded from the `token` cookie or a Bearer header.
//! - [`rbac`] -- extractors that additionally require one [`Permission`](nexus_core::roles::Permission).

pub mod auth;
pub mod rbac;
