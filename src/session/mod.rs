//! Authentication session management.
//!
//! This module holds the client-side record of who is signed in and tells
//! interested views whenever it changes.
//!
//! # Architecture
//!
//! - [`SessionStore`]: Shared, thread-safe session state with login/logout
//! - [`ObserverRegistry`]: Ordered change callbacks with [`Subscription`] handles
//! - [`CredentialVerifier`]: Seam for checking credentials ([`DemoCredentials`]
//!   accepts a single fixed pair)
//! - [`User`] / [`UserRole`]: The signed-in team member
//!
//! # Example
//!
//! ```rust
//! use racing_team_hub::session::SessionStore;
//!
//! let store = SessionStore::default();
//! let _sub = store.subscribe(|| println!("session changed"));
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(store.login("admin@racing.com", "admin123")).unwrap();
//! assert!(store.snapshot().is_authenticated);
//! ```

pub mod credentials;
pub mod observers;
mod store;
pub mod user;

pub use credentials::{CredentialVerifier, DemoCredentials, Identity};
pub use observers::{ObserverRegistry, Subscription};
pub use store::{SessionSnapshot, SessionStore};
pub use user::{User, UserRole};
