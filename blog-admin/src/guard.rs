use crate::storage::TokenStore;

pub const LOGIN_ROUTE: &str = "/login";
pub const ADMIN_ROUTE: &str = "/admin";
pub const ADMIN_POSTS_ROUTE: &str = "/admin/posts";
pub const SETTINGS_ROUTE: &str = "/admin/settings";

/// Shown in place of guarded content while unauthorized.
pub const PLACEHOLDER: &str = "Checking session...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Unauthorized,
    Authorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// Guarded content stays hidden; go to `to` instead.
    Redirect { to: &'static str },
}

/// Presence-only gate in front of protected routes.
///
/// The login route always passes. Any other route passes when the store holds
/// a non-empty token; the token is neither decoded nor sent anywhere, so an
/// expired token still passes and the first API call reports the 401.
/// Each route change is decided on its own; `state` records the last decision.
/// Logout clears the token and calls [`RouteGuard::reset`].
#[derive(Debug, Default)]
pub struct RouteGuard {
    state: GuardState,
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Evaluated once per route change.
    pub fn on_route_change(&mut self, route: &str, store: &dyn TokenStore) -> GuardDecision {
        self.state = if route == LOGIN_ROUTE || store.token().is_some() {
            GuardState::Authorized
        } else {
            GuardState::Unauthorized
        };

        match self.state {
            GuardState::Authorized => GuardDecision::Render,
            GuardState::Unauthorized => {
                tracing::debug!(route, "No stored token, redirecting to login");
                GuardDecision::Redirect { to: LOGIN_ROUTE }
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = GuardState::Unauthorized;
    }
}
