//! `storefront-client` — outbound HTTP with a fixed-interval retry policy.
//!
//! Every inter-service call goes through [`ServiceClient`]: a reqwest wrapper
//! that retries failed attempts a bounded number of times with a fixed delay
//! and classifies the final failure into a [`RemoteCallError`]. Gateways
//! depend on the [`CallClient`] capability trait so tests can substitute a
//! double for the real transport.

pub mod client;
pub mod error;

pub use client::{CallClient, ClientConfig, ServiceClient};
pub use error::RemoteCallError;
