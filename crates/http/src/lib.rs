//! Minimal HTTP server skeleton shared by the storefront services.
//!
//! Each service builds its own `axum::Router`; this crate supplies the pieces
//! they all need: the JSON error body, the `/health` endpoint and the
//! bind-and-serve bootstrap.

pub mod error;
pub mod health;
pub mod server;

pub use error::json_error;
pub use health::health_router;
pub use server::{port_from_env, serve};
