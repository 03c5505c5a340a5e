//! Route guard
//!
//! Runs before every navigation. Checks are evaluated in a fixed order and
//! short-circuit on the first failing condition: initialize the session,
//! then authentication, then guest-only, then required permissions. An
//! uninitialized or failed session counts as unauthenticated.

use tracing::debug;

use crate::session::SessionStore;

/// Declarative requirements a route places on the visitor
#[derive(Debug, Clone, Default)]
pub struct RouteRules {
    /// Route requires an authenticated session
    pub requires_auth: bool,
    /// Route is only for unauthenticated visitors (e.g. the login page)
    pub guest_only: bool,
    /// Visitor must hold at least one of these permissions
    pub permissions: Vec<String>,
}

impl RouteRules {
    /// Rules for a route anyone may visit
    pub fn public() -> Self {
        RouteRules::default()
    }

    /// Rules for a route requiring authentication
    pub fn authenticated() -> Self {
        RouteRules {
            requires_auth: true,
            ..RouteRules::default()
        }
    }

    /// Rules for a guest-only route
    pub fn guest() -> Self {
        RouteRules {
            guest_only: true,
            ..RouteRules::default()
        }
    }

    /// Require at least one of the given permissions (implies authentication)
    pub fn with_any_permission(mut self, permissions: &[&str]) -> Self {
        self.permissions = permissions.iter().map(|p| p.to_string()).collect();
        self
    }
}

/// Result of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Navigation may proceed
    Allow,
    /// Visitor must log in first; `redirect_to` preserves the requested path
    RedirectToLogin { redirect_to: String },
    /// Visitor is sent to the default landing page
    RedirectHome,
}

/// Navigation guard consulting the session store
#[derive(Clone)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(session: SessionStore) -> Self {
        RouteGuard { session }
    }

    /// Evaluate the rules for a navigation to `path`
    ///
    /// Awaiting session initialization is the one suspension point; every
    /// check after it is a pure read of the session snapshot.
    pub async fn check(&self, path: &str, rules: &RouteRules) -> GuardOutcome {
        self.session.initialize().await;

        let authenticated = self.session.is_authenticated();

        if rules.requires_auth && !authenticated {
            debug!("Guard: {path} requires auth, redirecting to login");
            return GuardOutcome::RedirectToLogin {
                redirect_to: path.to_string(),
            };
        }

        if rules.guest_only && authenticated {
            debug!("Guard: {path} is guest-only, redirecting home");
            return GuardOutcome::RedirectHome;
        }

        if !rules.permissions.is_empty() {
            let wanted: Vec<&str> = rules.permissions.iter().map(String::as_str).collect();

            if !self.session.can_any(&wanted) {
                debug!("Guard: missing permissions for {path}, redirecting home");
                return GuardOutcome::RedirectHome;
            }
        }

        GuardOutcome::Allow
    }
}
