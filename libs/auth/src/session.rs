//! Session store
//!
//! Holds the current user, role, permission list, and bearer token; persists
//! them to durable storage and restores them on startup. The store is an
//! explicitly constructed service: consumers receive a clone rather than
//! reaching for a global. All predicates are pure functions over the
//! last-fetched server snapshot — the client never grants itself anything.

use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;
use tracing::{info, warn};

use common::storage::TOKEN_KEY;
use common::{ApiClient, ApiResult, Storage};

use crate::models::{LoginCredentials, LoginResponse, User, ValidateResponse};

const USER_KEY: &str = "auth_user";
const ROLE_KEY: &str = "auth_role";
const PERMISSIONS_KEY: &str = "auth_permissions";

/// Point-in-time copy of the session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub user: Option<User>,
    pub role: Option<String>,
    pub permissions: Vec<String>,
    pub token: Option<String>,
    pub initialized: bool,
}

/// Client-side session service
#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    storage: Arc<dyn Storage>,
    state: Arc<RwLock<Session>>,
    // Serializes initialize() so concurrent navigations cannot double-fire
    // the network validation.
    init_lock: Arc<Mutex<()>>,
}

impl SessionStore {
    /// Create a session store sharing the API client's storage
    ///
    /// Sharing matters: the token this store persists is the one the HTTP
    /// client attaches to every request.
    pub fn new(api: ApiClient) -> Self {
        let storage = api.storage();

        SessionStore {
            api,
            storage,
            state: Arc::new(RwLock::new(Session::default())),
            init_lock: Arc::new(Mutex::new(())),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Idempotent startup: restore the persisted snapshot and, when a token
    /// was found, validate it against the server before reporting initialized
    pub async fn initialize(&self) {
        let _guard = self.init_lock.lock().await;

        if self.read().initialized {
            return;
        }

        self.restore_from_storage();

        if self.read().token.is_some() {
            self.validate_token().await;
        }

        self.write().initialized = true;
    }

    /// Restore token/user/role/permissions from durable storage
    ///
    /// Malformed stored JSON is recovered locally by treating the field as
    /// absent. Does not mark the store initialized and performs no network
    /// call.
    pub fn restore_from_storage(&self) {
        let token = self.stored(TOKEN_KEY);
        let user = self
            .stored(USER_KEY)
            .and_then(|raw| serde_json::from_str::<User>(&raw).ok());
        let role = self.stored(ROLE_KEY);
        let permissions = self
            .stored(PERMISSIONS_KEY)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
            .unwrap_or_default();

        let mut state = self.write();
        state.token = token;
        state.user = user;
        state.role = role;
        state.permissions = permissions;
    }

    fn stored(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read stored session key {key}: {e}");
                None
            }
        }
    }

    fn persist(&self) -> ApiResult<()> {
        let state = self.read().clone();

        match &state.token {
            Some(token) => self.storage.set(TOKEN_KEY, token)?,
            None => self.storage.remove(TOKEN_KEY)?,
        }

        match &state.user {
            Some(user) => {
                let raw = serde_json::to_string(user).map_err(common::ApiError::Decode)?;
                self.storage.set(USER_KEY, &raw)?;
            }
            None => self.storage.remove(USER_KEY)?,
        }

        match &state.role {
            Some(role) => self.storage.set(ROLE_KEY, role)?,
            None => self.storage.remove(ROLE_KEY)?,
        }

        if state.permissions.is_empty() {
            self.storage.remove(PERMISSIONS_KEY)?;
        } else {
            let raw =
                serde_json::to_string(&state.permissions).map_err(common::ApiError::Decode)?;
            self.storage.set(PERMISSIONS_KEY, &raw)?;
        }

        Ok(())
    }

    /// Clear the in-memory snapshot and the persisted keys
    ///
    /// Storage failures are logged and swallowed: a session being cleared
    /// must not resurrect itself because a file could not be removed.
    pub fn clear(&self) {
        {
            let mut state = self.write();
            state.user = None;
            state.role = None;
            state.permissions = Vec::new();
            state.token = None;
        }

        for key in [TOKEN_KEY, USER_KEY, ROLE_KEY, PERMISSIONS_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("Failed to remove stored session key {key}: {e}");
            }
        }
    }

    /// Authenticate with the server, replacing the whole session snapshot
    ///
    /// Any failure leaves the session fully cleared — login never produces a
    /// partially-populated session.
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<()> {
        match self.api.post::<LoginResponse, _>("/auth/login", credentials).await {
            Ok(response) => {
                let email = response.user.email.clone();

                {
                    let mut state = self.write();
                    state.user = Some(response.user);
                    state.role = Some(response.role);
                    state.permissions = response.permissions;
                    state.token = Some(response.token);
                }

                // A session that cannot be persisted is treated as a failed
                // login, so the caller never sees Err on a live session.
                if let Err(e) = self.persist() {
                    self.clear();
                    return Err(e);
                }

                info!("Session established for {email}");
                Ok(())
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    /// Best-effort server notification, then unconditional local clear
    ///
    /// Logout cannot fail from the caller's perspective.
    pub async fn logout(&self) {
        let result: ApiResult<serde_json::Value> =
            self.api.post("/auth/logout", &serde_json::json!({})).await;

        if let Err(e) = result {
            warn!("Logout request failed, clearing session anyway: {e}");
        }

        self.clear();
    }

    /// Ask the server whether the held token is still valid
    ///
    /// With no token this returns false without a network call. A negative
    /// answer or any transport failure clears the session entirely — no
    /// stale or partial session is ever retained.
    pub async fn validate_token(&self) -> bool {
        if self.read().token.is_none() {
            return false;
        }

        match self.api.get::<ValidateResponse>("/auth/validate").await {
            Ok(response) if response.valid && response.user.is_some() => {
                {
                    let mut state = self.write();
                    state.user = response.user;
                    state.role = response.role;
                    state.permissions = response.permissions;
                }

                if let Err(e) = self.persist() {
                    warn!("Failed to persist validated session: {e}");
                }

                true
            }
            Ok(_) => {
                info!("Token rejected by server, clearing session");
                self.clear();
                false
            }
            Err(e) => {
                warn!("Token validation failed, clearing session: {e}");
                self.clear();
                false
            }
        }
    }

    /// True iff both token and user are present
    pub fn is_authenticated(&self) -> bool {
        let state = self.read();
        state.token.is_some() && state.user.is_some()
    }

    /// Whether `initialize()` has completed
    pub fn initialized(&self) -> bool {
        self.read().initialized
    }

    /// Copy of the full session state
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// Current user, if any
    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// Current role, if any
    pub fn role(&self) -> Option<String> {
        self.read().role.clone()
    }

    /// Last-fetched permission list
    pub fn permissions(&self) -> Vec<String> {
        self.read().permissions.clone()
    }

    /// Holds the given permission
    pub fn can(&self, permission: &str) -> bool {
        self.read().permissions.iter().any(|p| p == permission)
    }

    /// Holds at least one of the given permissions
    pub fn can_any(&self, permissions: &[&str]) -> bool {
        let state = self.read();
        permissions
            .iter()
            .any(|wanted| state.permissions.iter().any(|p| p == wanted))
    }

    /// Holds every one of the given permissions
    pub fn can_all(&self, permissions: &[&str]) -> bool {
        let state = self.read();
        permissions
            .iter()
            .all(|wanted| state.permissions.iter().any(|p| p == wanted))
    }

    /// Role equals the given name
    pub fn has_role(&self, role: &str) -> bool {
        self.read().role.as_deref() == Some(role)
    }

    /// Role is one of the given names
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        match self.read().role.as_deref() {
            Some(current) => roles.contains(&current),
            None => false,
        }
    }
}

// Test-only state seeding so guard and predicate tests need no server.
#[cfg(test)]
pub(crate) fn seed(store: &SessionStore, session: Session) {
    *store
        .state
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = session;
}
