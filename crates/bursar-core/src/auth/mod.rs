//! Authentication and session lifecycle.
//!
//! `SessionManager` is the single owner of the token pair: it logs in and
//! out, restores persisted sessions, and intercepts every outbound request
//! to transparently refresh a rejected access token exactly once.

pub mod manager;
pub mod refresh;
pub mod session;
pub mod store;

pub use manager::{LoginCredentials, LoginOutcome, SessionManager};
pub use refresh::RefreshPhase;
pub use session::{SessionSnapshot, SessionState, TokenPair};
pub use store::{SessionStore, StoredSession};
