//! Error types shared across the crate.

use thiserror::Error;

/// Failure of a login attempt.
///
/// This is the only way the session store can fail. It is never fatal: the
/// caller may retry `login` immediately, and the same message is kept in the
/// session's `last_error` for display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Submitted credentials did not match an accepted pair.
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// A string code that does not name any variant of a lookup table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("unknown {kind} code: {code}")]
    UnknownCode {
        /// Table the code was looked up in (`role`, `vehicle status`, ...).
        kind: &'static str,
        /// The offending code, verbatim.
        code: String,
    },
}

impl LookupError {
    pub(crate) fn unknown(kind: &'static str, code: &str) -> Self {
        Self::UnknownCode {
            kind,
            code: code.to_string(),
        }
    }
}
