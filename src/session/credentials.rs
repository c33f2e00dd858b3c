//! Credential verification used by [`SessionStore::login`].
//!
//! [`SessionStore::login`]: super::SessionStore::login

use async_trait::async_trait;
use chrono::NaiveDate;

use super::user::{User, UserRole};
use crate::error::AuthError;

pub const DEMO_EMAIL: &str = "admin@racing.com";
pub const DEMO_PASSWORD: &str = "admin123";
pub const DEMO_TOKEN: &str = "demo-token-123";

/// Token carried by the startup demo session.
pub const AUTO_SESSION_TOKEN: &str = "demo-token-auto";

/// A user together with the opaque token issued for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: User,
    pub token: String,
}

/// Checks an email/password pair and returns the identity it belongs to.
#[async_trait]
pub trait CredentialVerifier: Send + Sync + std::fmt::Debug {
    async fn verify(&self, email: &str, password: &str) -> Result<Identity, AuthError>;
}

/// Accepts exactly one configured pair and answers with a fixed identity.
///
/// Comparison is exact: no trimming, no case folding.
#[derive(Debug, Clone)]
pub struct DemoCredentials {
    email: String,
    password: String,
    identity: Identity,
}

impl Default for DemoCredentials {
    fn default() -> Self {
        Self::new(DEMO_EMAIL, DEMO_PASSWORD)
    }
}

impl DemoCredentials {
    /// Accept `email`/`password`; the issued identity is the demo team manager
    /// with that email.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        let email = email.into();
        let identity = Identity {
            user: demo_user(&email, "Admin", "Racing"),
            token: DEMO_TOKEN.to_string(),
        };
        Self {
            email,
            password: password.into(),
            identity,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

#[async_trait]
impl CredentialVerifier for DemoCredentials {
    async fn verify(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        if email == self.email && password == self.password {
            Ok(self.identity.clone())
        } else {
            Err(AuthError::AuthenticationFailed)
        }
    }
}

/// Identity installed when the store is started with the demo session.
#[must_use]
pub fn auto_session_identity() -> Identity {
    Identity {
        user: demo_user("demo@racing.com", "Demo", "User"),
        token: AUTO_SESSION_TOKEN.to_string(),
    }
}

fn demo_user(email: &str, first_name: &str, last_name: &str) -> User {
    User {
        id: 1,
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        role: UserRole::Manager,
        team_id: 1,
        team_name: Some("Racing Team Demo".to_string()),
        phone_number: Some("+1234567890".to_string()),
        license_number: Some("RT001".to_string()),
        license_expiry: NaiveDate::from_ymd_opt(2025, 12, 31),
        active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_pair_is_accepted() {
        let verifier = DemoCredentials::default();
        let identity = verifier.verify(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

        assert_eq!(identity.token, DEMO_TOKEN);
        assert_eq!(identity.user.email, DEMO_EMAIL);
        assert_eq!(identity.user.role, UserRole::Manager);
        assert_eq!(identity.user.full_name(), "Admin Racing");
    }

    #[tokio::test]
    async fn test_match_is_exact() {
        let verifier = DemoCredentials::default();

        for (email, password) in [
            ("ADMIN@racing.com", DEMO_PASSWORD),
            (" admin@racing.com", DEMO_PASSWORD),
            (DEMO_EMAIL, "admin1234"),
            ("", ""),
        ] {
            assert_eq!(
                verifier.verify(email, password).await,
                Err(AuthError::AuthenticationFailed)
            );
        }
    }

    #[tokio::test]
    async fn test_custom_pair() {
        let verifier = DemoCredentials::new("pit@racing.com", "boxbox");
        assert!(verifier.verify("pit@racing.com", "boxbox").await.is_ok());
        assert!(verifier.verify(DEMO_EMAIL, DEMO_PASSWORD).await.is_err());
    }

    #[test]
    fn test_auto_session_identity() {
        let identity = auto_session_identity();
        assert_eq!(identity.token, AUTO_SESSION_TOKEN);
        assert_eq!(identity.user.email, "demo@racing.com");
    }
}
