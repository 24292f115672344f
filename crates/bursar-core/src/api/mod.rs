//! REST API client module for the dues portal.
//!
//! This module provides the `PortalClient` for communicating with the
//! portal backend to fetch dues, challans, and legacy ledger data.
//!
//! The API uses JWT bearer token authentication; tokens are owned by the
//! session manager and attached to every request it executes.

pub mod client;
pub mod error;

pub use client::PortalClient;
pub use error::ApiError;
