//! Passphrase gate for one UI session.
//!
//! # Invariants
//! - A session starts `Pending` and only a matching passphrase moves it to
//!   `Authenticated`.
//! - Operations guarded by [`Session::require`] never run while locked.

use crate::config::AppConfig;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Shared passphrase checked by every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGate {
    passphrase: String,
}

impl AuthGate {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.passphrase.clone())
    }

    fn accepts(&self, input: &str) -> bool {
        input == self.passphrase
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Pending,
    /// Last attempt did not match; the UI shows an error and asks again.
    Rejected,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Locked,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locked => write!(f, "passphrase required"),
        }
    }
}

impl Error for SessionError {}

/// Per-session authentication flag.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: AuthState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Checks `input` against `gate`. Once authenticated, later calls keep the
    /// session open regardless of input.
    pub fn submit(&mut self, gate: &AuthGate, input: &str) -> AuthState {
        if self.state == AuthState::Authenticated {
            return self.state;
        }
        if gate.accepts(input) {
            self.state = AuthState::Authenticated;
            info!("event=auth_submit module=session status=ok");
        } else {
            self.state = AuthState::Rejected;
            warn!("event=auth_submit module=session status=rejected");
        }
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    pub fn require(&self) -> Result<(), SessionError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(SessionError::Locked)
        }
    }

    /// Returns the session to `Pending`.
    pub fn lock(&mut self) {
        self.state = AuthState::Pending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_locked() {
        let session = Session::new();
        assert_eq!(session.state(), AuthState::Pending);
        assert_eq!(session.require(), Err(SessionError::Locked));
    }

    #[test]
    fn wrong_then_right_passphrase() {
        let gate = AuthGate::new("qidtnote123");
        let mut session = Session::new();
        assert_eq!(session.submit(&gate, "guess"), AuthState::Rejected);
        assert!(session.require().is_err());
        assert_eq!(session.submit(&gate, "qidtnote123"), AuthState::Authenticated);
        assert!(session.require().is_ok());
    }

    #[test]
    fn authenticated_session_survives_resubmit_until_locked() {
        let gate = AuthGate::from_config(&AppConfig::with_data_dir("."));
        let mut session = Session::new();
        session.submit(&gate, "qidtnote123");
        assert_eq!(session.submit(&gate, ""), AuthState::Authenticated);
        session.lock();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn passphrase_match_is_exact() {
        let gate = AuthGate::new("secret");
        let mut session = Session::new();
        assert_eq!(session.submit(&gate, "secret "), AuthState::Rejected);
        assert_eq!(session.submit(&gate, "SECRET"), AuthState::Rejected);
    }
}
