//! Core library for bursar - a client for the university dues portal.
//!
//! The portal tracks what students owe across campus offices (academic
//! fees, hostel mess bills, library fines, departmental dues and the
//! pre-digital legacy ledgers) and verifies uploaded payment proofs.
//!
//! The center of the crate is [`auth::SessionManager`]: it owns the JWT
//! token pair, and every request sent through [`api::PortalClient`] passes
//! through it so a rejected access token is refreshed exactly once and the
//! request replayed, no matter how many tasks hit the 401 at the same time.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiError, PortalClient};
pub use auth::{LoginCredentials, LoginOutcome, RefreshPhase, SessionManager, SessionStore};
pub use config::Config;
