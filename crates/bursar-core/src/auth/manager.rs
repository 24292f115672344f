//! Session manager for the dues portal.
//!
//! Owns the token pair and identity, performs login/logout/restore, and
//! wraps every authenticated request with the 401 protocol: on a rejected
//! access token, refresh it once (shared across concurrent callers) and
//! replay the request once with the new token. A failed refresh ends the
//! session.

use std::sync::Arc;

use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::models::{ProfileResponse, SessionIdentity};

use super::refresh::{RefreshGate, RefreshPhase};
use super::session::{SessionState, TokenPair};
use super::store::{SessionStore, StoredSession};

// ============================================================================
// Constants
// ============================================================================

/// Path of the token refresh endpoint
const REFRESH_PATH: &str = "/auth/token/refresh/";

/// Path of the profile endpoint used to resolve the identity at login
const PROFILE_PATH: &str = "/profile/";

/// Login credentials, one variant per portal login endpoint.
#[derive(Debug, Clone)]
pub enum LoginCredentials {
    Staff { email: String, password: String },
    Student { roll_number: String, password: String },
}

impl LoginCredentials {
    fn endpoint(&self) -> &'static str {
        match self {
            LoginCredentials::Staff { .. } => "/auth/staff/login/",
            LoginCredentials::Student { .. } => "/auth/student/login/",
        }
    }

    fn payload(&self) -> serde_json::Value {
        match self {
            LoginCredentials::Staff { email, password } => {
                serde_json::json!({ "email": email, "password": password })
            }
            LoginCredentials::Student {
                roll_number,
                password,
            } => {
                serde_json::json!({ "roll_number": roll_number, "password": password })
            }
        }
    }

    fn password(&self) -> &str {
        match self {
            LoginCredentials::Staff { password, .. } => password,
            LoginCredentials::Student { password, .. } => password,
        }
    }
}

/// What a successful login hands back to the caller.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub identity: SessionIdentity,
    pub department: Option<String>,
    /// Dashboard route suggested by the server for staff accounts.
    pub redirect_to: Option<String>,
}

struct ManagerInner {
    http: Client,
    base_url: String,
    state: SessionState,
    store: SessionStore,
    gate: RefreshGate,
}

/// Session manager shared across tasks.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling,
/// and the manager state itself sits behind one Arc.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<ManagerInner>,
}

impl SessionManager {
    pub fn new(http: Client, base_url: impl Into<String>, store: SessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            inner: Arc::new(ManagerInner {
                http,
                base_url,
                state: SessionState::new(),
                store,
                gate: RefreshGate::new(),
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    // ===== Session accessors =====

    /// `Authorization` header value for the current access token.
    pub fn auth_header(&self) -> Option<String> {
        self.inner
            .state
            .access_token()
            .map(|token| format!("Bearer {}", token))
    }

    pub fn identity(&self) -> Option<SessionIdentity> {
        self.inner.state.identity()
    }

    pub fn department(&self) -> Option<String> {
        self.inner.state.department()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.is_authenticated()
    }

    pub fn refresh_phase(&self) -> RefreshPhase {
        self.inner.gate.phase()
    }

    // ===== Login / logout / restore =====

    /// Authenticate against the portal.
    ///
    /// Validates the grant, resolves the identity from `/profile/`, and only
    /// then commits the session. A failure at any step leaves the manager
    /// exactly as it was.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, ApiError> {
        if credentials.password().is_empty() {
            return Err(ApiError::InvalidCredentials(
                "Password cannot be empty".to_string(),
            ));
        }

        let response = self
            .inner
            .http
            .post(self.url(credentials.endpoint()))
            .json(&credentials.payload())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status.is_client_error() {
            return Err(ApiError::login_rejection(&text));
        }
        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }

        let grant: LoginGrant = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Malformed login payload: {}", e)))?;
        let (Some(access), Some(refresh)) = (grant.access, grant.refresh) else {
            return Err(ApiError::InvalidResponse(
                "Login response missing tokens".to_string(),
            ));
        };

        // The tokens are not committed yet, so the profile fetch carries
        // them explicitly rather than going through `execute`.
        let profile = self.fetch_profile(&access).await?;
        let identity = SessionIdentity::from_profile(&profile);
        let department = grant.department.or_else(|| profile.department());

        self.inner.state.establish(
            TokenPair {
                access,
                refresh,
            },
            identity.clone(),
            department.clone(),
        );
        self.inner.gate.set_phase(RefreshPhase::Idle);
        self.persist_session();

        debug!(user = %identity.display_name, role = %identity.role, "Login succeeded");

        Ok(LoginOutcome {
            identity,
            department,
            redirect_to: grant.redirect_to,
        })
    }

    /// Drop the session. Safe to call when already logged out.
    pub fn logout(&self) {
        self.inner.state.clear();
        if let Err(err) = self.inner.store.clear() {
            warn!(error = %err, "Failed to clear persisted session");
        }
        debug!("Session cleared");
    }

    /// Rehydrate the session from the persisted snapshot. Returns whether a
    /// session was restored. Incomplete snapshots are discarded.
    pub fn restore(&self) -> bool {
        let stored = match self.inner.store.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => return false,
            Err(err) => {
                warn!(error = %err, "Failed to load persisted session");
                return false;
            }
        };

        if !stored.is_complete() {
            warn!("Discarding incomplete session snapshot");
            if let Err(err) = self.inner.store.clear() {
                warn!(error = %err, "Failed to clear persisted session");
            }
            return false;
        }

        let StoredSession {
            access_token,
            refresh_token,
            user_data,
            department,
            ..
        } = stored;
        self.inner.state.establish(
            TokenPair {
                access: access_token,
                refresh: refresh_token,
            },
            user_data,
            department,
        );
        self.inner.gate.set_phase(RefreshPhase::Idle);
        debug!("Session restored");
        true
    }

    // ===== Request interception =====

    /// Send an authenticated request, refreshing the access token once if
    /// the server rejects it.
    ///
    /// `make_request` is invoked per attempt so a replay carries the fresh
    /// token (and rebuildable bodies such as multipart forms). The returned
    /// response may still be an error status; callers map it themselves.
    pub async fn execute<F>(&self, make_request: F) -> Result<Response, ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut retried = false;
        loop {
            let epoch = self.inner.state.epoch();
            let mut request = make_request();
            if let Some(auth) = self.auth_header() {
                request = request.header(header::AUTHORIZATION, auth);
            }
            let response = request.send().await?;

            if response.status() != StatusCode::UNAUTHORIZED || retried {
                return Ok(response);
            }
            if self.inner.state.refresh_token().is_none() {
                // Nothing to refresh with; hand the 401 back as-is.
                return Ok(response);
            }

            self.refresh_access_token(epoch).await?;
            retried = true;
        }
    }

    /// Refresh the access token, serialized across tasks.
    ///
    /// `observed_epoch` is the session epoch at the time of the rejected
    /// attempt. If the epoch moved while this task waited on the gate, the
    /// session was already refreshed (or ended) by someone else and no new
    /// request is made.
    async fn refresh_access_token(&self, observed_epoch: u64) -> Result<(), ApiError> {
        let _guard = self.inner.gate.acquire().await;

        if self.inner.state.epoch() != observed_epoch {
            if self.inner.state.access_token().is_some() {
                return Ok(());
            }
            return Err(ApiError::SessionExpired);
        }

        let Some(refresh) = self.inner.state.refresh_token() else {
            return Err(ApiError::SessionExpired);
        };

        self.inner.gate.set_phase(RefreshPhase::Refreshing);
        debug!("Access token rejected, exchanging refresh token");

        match self.exchange_refresh_token(&refresh).await {
            Ok(access) => {
                if !self.inner.state.replace_access(access) {
                    // Logged out while the refresh was on the wire.
                    self.inner.gate.set_phase(RefreshPhase::Failed);
                    return Err(ApiError::SessionExpired);
                }
                self.inner.gate.set_phase(RefreshPhase::Idle);
                self.persist_session();
                debug!("Access token refreshed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Token refresh failed, ending session");
                self.logout();
                self.inner.gate.set_phase(RefreshPhase::Failed);
                Err(ApiError::SessionExpired)
            }
        }
    }

    async fn exchange_refresh_token(&self, refresh: &str) -> Result<String, ApiError> {
        let response = self
            .inner
            .http
            .post(self.url(REFRESH_PATH))
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }

        let grant: RefreshGrant = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Malformed refresh payload: {}", e)))?;
        Ok(grant.access)
    }

    async fn fetch_profile(&self, access: &str) -> Result<ProfileResponse, ApiError> {
        let response = self
            .inner
            .http
            .get(self.url(PROFILE_PATH))
            .bearer_auth(access)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Malformed profile payload: {}", e)))
    }

    /// Write the current session to the store. Persistence is best effort;
    /// the in-memory session is authoritative.
    fn persist_session(&self) {
        let snapshot = self.inner.state.snapshot();
        let (Some(tokens), Some(identity)) = (snapshot.tokens, snapshot.identity) else {
            return;
        };

        let stored = StoredSession {
            access_token: tokens.access,
            refresh_token: tokens.refresh,
            user_type: identity.role.to_string(),
            user_data: identity,
            department: snapshot.department,
        };
        if let Err(err) = self.inner.store.save(&stored) {
            warn!(error = %err, "Failed to persist session");
        }
    }
}

// ============================================================================
// Wire payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct LoginGrant {
    #[serde(default)]
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    redirect_to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshGrant {
    access: String,
}
