//! In-memory session state: the token pair and the identity it belongs to.
//!
//! All fields live behind one lock so tokens and identity change together.
//! Every transition bumps an epoch counter; refresh coordination compares
//! epochs to tell whether another task already replaced the tokens.

use parking_lot::RwLock;

use crate::models::SessionIdentity;

/// Access/refresh token pair issued by the portal.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Default)]
struct StateInner {
    tokens: Option<TokenPair>,
    identity: Option<SessionIdentity>,
    department: Option<String>,
    epoch: u64,
}

/// Shared session state. Lock is held only for field access, never across
/// an await point.
#[derive(Debug, Default)]
pub struct SessionState {
    inner: RwLock<StateInner>,
}

/// Everything the session holds, read under a single lock acquisition.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub tokens: Option<TokenPair>,
    pub identity: Option<SessionIdentity>,
    pub department: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch. Bumped on every establish/replace/clear.
    pub fn epoch(&self) -> u64 {
        self.inner.read().epoch
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .tokens
            .as_ref()
            .map(|t| t.access.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner
            .read()
            .tokens
            .as_ref()
            .map(|t| t.refresh.clone())
    }

    pub fn identity(&self) -> Option<SessionIdentity> {
        self.inner.read().identity.clone()
    }

    pub fn department(&self) -> Option<String> {
        self.inner.read().department.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().tokens.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.read();
        SessionSnapshot {
            tokens: inner.tokens.clone(),
            identity: inner.identity.clone(),
            department: inner.department.clone(),
        }
    }

    /// Install a full session in one step.
    pub fn establish(
        &self,
        tokens: TokenPair,
        identity: SessionIdentity,
        department: Option<String>,
    ) {
        let mut inner = self.inner.write();
        inner.tokens = Some(tokens);
        inner.identity = Some(identity);
        inner.department = department;
        inner.epoch += 1;
    }

    /// Swap in a fresh access token, keeping the refresh token and identity.
    /// Returns false when there is no live session to update (logged out
    /// while the refresh was in flight).
    pub fn replace_access(&self, access: String) -> bool {
        let mut inner = self.inner.write();
        match inner.tokens.as_mut() {
            Some(tokens) => {
                tokens.access = access;
                inner.epoch += 1;
                true
            }
            None => false,
        }
    }

    /// Drop tokens and identity together.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.tokens = None;
        inner.identity = None;
        inner.department = None;
        inner.epoch += 1;
    }
}
