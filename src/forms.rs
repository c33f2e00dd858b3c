//! Login form validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

/// Email/password pair as typed into the login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Per-field messages; an empty value means the form may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check the fields before a login attempt.
    ///
    /// Only the shape is checked here; whether the pair is accepted is up to
    /// the session store.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let errors = FieldErrors {
            email: if self.email.is_empty() {
                Some("El email es requerido")
            } else if !EMAIL_SHAPE.is_match(&self.email) {
                Some("El email no es válido")
            } else {
                None
            },
            password: if self.password.is_empty() {
                Some("La contraseña es requerida")
            } else if self.password.chars().count() < MIN_PASSWORD_LEN {
                Some("La contraseña debe tener al menos 6 caracteres")
            } else {
                None
            },
        };

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
