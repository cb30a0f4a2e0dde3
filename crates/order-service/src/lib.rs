//! HTTP API for the order service, plus the cross-service verification that
//! gates order creation.
//!
//! An incoming order is checked against the user service (does the user
//! exist?) and the product service (does each line item have stock?) before
//! anything is persisted. Both checks go through the retrying client in
//! `storefront-client`; the gateways and workflow here classify its failures
//! into the responses callers see.

pub mod app;
pub mod config;
pub mod gateways;
pub mod routes;
pub mod workflow;
