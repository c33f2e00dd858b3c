//! Racing Team Hub
//!
//! Session core of a racing team-management console: who is signed in, what
//! they may see in the menu, and how enumerated team data is labelled.
//!
//! # Architecture
//!
//! - **Session**: Explicitly constructed store with login/logout and ordered
//!   change observers
//! - **Navigation**: Role-filtered menu and route resolution
//! - **Lookups**: Code-to-label/color tables for roles, vehicles and events
//! - **Server**: Axum HTTP console exposing the store, with SSE change feed
//!
//! # Modules
//!
//! - [`session`]: Session store, observers, credential verification, users
//! - [`navigation`]: Menu filtering and routing
//! - [`forms`]: Login form validation
//! - [`lookups`]: Display tables
//! - [`config`]: Layered configuration (defaults, file, env, CLI)
//! - [`server`]: HTTP router and handlers

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod error;
pub mod forms;
pub mod lookups;
pub mod navigation;
pub mod server;
pub mod session;
pub mod telemetry;

use crate::config::AppConfig;

use session::credentials::auto_session_identity;
use session::{DemoCredentials, SessionStore};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Buffered change signals per SSE client before it is marked lagged.
const SESSION_EVENT_BUFFER: usize = 64;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The process-wide session.
    pub session: SessionStore,
    /// Fires once per session store notification.
    pub session_events: broadcast::Sender<()>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build the session store described by `config` and bridge its
    /// observer notifications onto [`AppState::session_events`].
    pub fn new(config: Arc<AppConfig>) -> Self {
        let verifier = Arc::new(DemoCredentials::new(
            config.auth.demo_email.clone(),
            config.auth.demo_password.clone(),
        ));

        let session = if config.auth.demo_session_on_startup {
            tracing::warn!(
                name: "session.demo_bypass",
                "Starting with the demo user already signed in"
            );
            SessionStore::with_identity(verifier, auto_session_identity())
        } else {
            SessionStore::new(verifier)
        };

        Self::with_session(session, config)
    }

    /// Wrap an existing store.
    pub fn with_session(session: SessionStore, config: Arc<AppConfig>) -> Self {
        let (tx, _) = broadcast::channel(SESSION_EVENT_BUFFER);

        let sender = tx.clone();
        let _bridge = session.subscribe(move || {
            // No receivers just means no SSE client is connected.
            let _ = sender.send(());
        });

        Self {
            session,
            session_events: tx,
            config,
        }
    }
}
