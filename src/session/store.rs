//! Authentication state container.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::credentials::{CredentialVerifier, DemoCredentials, Identity};
use super::observers::{ObserverRegistry, Subscription};
use super::user::User;
use crate::error::AuthError;

#[derive(Debug, Clone, Default)]
struct SessionState {
    /// User and token live and die together.
    identity: Option<Identity>,
    is_loading: bool,
    last_error: Option<String>,
}

/// Read-only copy of the session, as views and API clients see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub current_user: Option<User>,
    pub session_token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_user: self.identity.as_ref().map(|i| i.user.clone()),
            session_token: self.identity.as_ref().map(|i| i.token.clone()),
            is_authenticated: self.identity.is_some(),
            is_loading: self.is_loading,
            last_error: self.last_error.clone(),
        }
    }
}

/// Single source of truth for who is signed in.
///
/// Cloning is cheap and every clone shares the same state and observers.
/// Each mutating operation commits its change and then notifies all
/// observers synchronously, without holding the state lock.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

#[derive(Debug)]
struct SessionStoreInner {
    state: RwLock<SessionState>,
    observers: ObserverRegistry,
    verifier: Arc<dyn CredentialVerifier>,
    /// Held for the whole of a login attempt.
    login_gate: Mutex<()>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Arc::new(DemoCredentials::default()))
    }
}

impl SessionStore {
    /// Create an unauthenticated store backed by `verifier`.
    #[must_use]
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self::from_state(verifier, SessionState::default())
    }

    /// Create a store that starts already signed in as `identity`.
    #[must_use]
    pub fn with_identity(verifier: Arc<dyn CredentialVerifier>, identity: Identity) -> Self {
        Self::from_state(
            verifier,
            SessionState {
                identity: Some(identity),
                ..SessionState::default()
            },
        )
    }

    fn from_state(verifier: Arc<dyn CredentialVerifier>, state: SessionState) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                state: RwLock::new(state),
                observers: ObserverRegistry::new(),
                verifier,
                login_gate: Mutex::new(()),
            }),
        }
    }

    // ── Reads ───────────────────────────────────────────────────────

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.read().snapshot()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().identity.is_some()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.read().identity.as_ref().map(|i| i.user.clone())
    }

    #[must_use]
    pub fn session_token(&self) -> Option<String> {
        self.read().identity.as_ref().map(|i| i.token.clone())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.read().last_error.clone()
    }

    // ── Observers ───────────────────────────────────────────────────

    /// Register `callback` to run after every state change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.observers.subscribe(callback)
    }

    /// Returns `false` if the subscription was not registered.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.inner.observers.unsubscribe(subscription)
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }

    // ── Operations ──────────────────────────────────────────────────

    /// Attempt to sign in.
    ///
    /// Observers are notified twice: once when the attempt starts
    /// (`is_loading` set, error cleared) and once with the outcome. On failure
    /// the session is cleared and the error message is kept in `last_error`.
    /// Concurrent attempts on the same store run one after another. An attempt
    /// abandoned mid-flight still clears `is_loading` and notifies.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let _gate = self.inner.login_gate.lock().await;

        self.update(|state| {
            state.is_loading = true;
            state.last_error = None;
        });
        debug!(name: "session.login.started", email = %email, "Login attempt started");
        let attempt = PendingLogin {
            store: self,
            settled: false,
        };

        match self.inner.verifier.verify(email, password).await {
            Ok(identity) => {
                let user = identity.user.clone();
                attempt.settle(|state| {
                    state.identity = Some(identity);
                    state.is_loading = false;
                });
                info!(
                    name: "session.login.succeeded",
                    user_id = user.id,
                    role = %user.role,
                    "User signed in"
                );
                Ok(user)
            }
            Err(err) => {
                let message = err.to_string();
                attempt.settle(|state| {
                    state.identity = None;
                    state.is_loading = false;
                    state.last_error = Some(message);
                });
                warn!(name: "session.login.failed", email = %email, error = %err, "Login rejected");
                Err(err)
            }
        }
    }

    /// Sign out and clear any pending error.
    pub fn logout(&self) {
        let was_authenticated = self.is_authenticated();
        self.update(|state| {
            state.identity = None;
            state.last_error = None;
        });
        if was_authenticated {
            info!(name: "session.logout", "User signed out");
        }
    }

    pub fn clear_error(&self) {
        self.update(|state| state.last_error = None);
    }

    pub fn set_loading(&self, loading: bool) {
        self.update(|state| state.is_loading = loading);
    }

    /// Re-read the current user. There is no backing service yet, so this
    /// completes immediately and leaves the state (and observers) untouched.
    pub async fn refresh_user(&self) -> Result<(), AuthError> {
        debug!(name: "session.refresh", "User refresh requested");
        Ok(())
    }

    fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut SessionState),
    {
        {
            let mut guard = self.write();
            mutate(&mut guard);
        }
        self.inner.observers.notify();
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A login attempt that has announced itself to observers.
///
/// If the attempt is dropped before it settles (the caller timed out or went
/// away), the loading flag is cleared and observers hear about it.
struct PendingLogin<'a> {
    store: &'a SessionStore,
    settled: bool,
}

impl PendingLogin<'_> {
    fn settle<F>(mut self, mutate: F)
    where
        F: FnOnce(&mut SessionState),
    {
        self.settled = true;
        self.store.update(mutate);
    }
}

impl Drop for PendingLogin<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(name: "session.login.cancelled", "Login attempt dropped before completing");
            self.store.update(|state| state.is_loading = false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::credentials::{DEMO_EMAIL, DEMO_PASSWORD, DEMO_TOKEN, auto_session_identity};

    #[test]
    fn test_new_store_is_unauthenticated() {
        let store = SessionStore::default();
        let snapshot = store.snapshot();

        assert!(!snapshot.is_authenticated);
        assert!(snapshot.current_user.is_none());
        assert!(snapshot.session_token.is_none());
        assert!(!snapshot.is_loading);
        assert!(snapshot.last_error.is_none());
    }

    #[test]
    fn test_with_identity_starts_authenticated() {
        let store = SessionStore::with_identity(
            Arc::new(DemoCredentials::default()),
            auto_session_identity(),
        );

        assert!(store.is_authenticated());
        assert_eq!(store.session_token().as_deref(), Some("demo-token-auto"));
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let store = SessionStore::default();

        let user = store.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        assert_eq!(user.email, DEMO_EMAIL);
        assert!(store.is_authenticated());
        assert_eq!(store.session_token().as_deref(), Some(DEMO_TOKEN));
        assert!(!store.is_loading());

        store.logout();
        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn test_failed_login_records_error() {
        let store = SessionStore::default();

        let err = store.login(DEMO_EMAIL, "wrong").await.unwrap_err();
        assert_eq!(err, AuthError::AuthenticationFailed);
        assert_eq!(store.last_error().as_deref(), Some("authentication failed"));
        assert!(!store.is_loading());
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = SessionStore::default();
        let view = store.clone();

        store.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        assert!(view.is_authenticated());
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let store = SessionStore::default();
        store.set_loading(true);

        let json = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(json["isAuthenticated"], false);
        assert_eq!(json["isLoading"], true);
        assert!(json["currentUser"].is_null());
    }
}
