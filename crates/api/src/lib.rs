//! HTTP API for the Nexus real-estate backend: axum routes, session auth
//! and the error envelope. The `nexus-api` and `nexus-admin` binaries build
//! on this library.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
