use std::sync::Arc;

use crate::guard::{GuardDecision, RouteGuard};
use crate::storage::{StorageError, TokenStore};

/// Explicit session state: the token store plus the route guard reading it.
pub struct Session {
    store: Arc<dyn TokenStore>,
    guard: RouteGuard,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            guard: RouteGuard::new(),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.token()
    }

    /// Runs the guard for a navigation to `route`.
    pub fn enter(&mut self, route: &str) -> GuardDecision {
        self.guard.on_route_change(route, self.store.as_ref())
    }

    pub fn login(&mut self, token: &str) -> Result<(), StorageError> {
        self.store.set_token(token)
    }

    /// Clears the stored token and puts the guard back to `Unauthorized`.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.store.clear()?;
        self.guard.reset();
        Ok(())
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }
}
