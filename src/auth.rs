//! Client-side session guard for the dashboard.
//!
//! The dashboard never handles an event while the session is not both
//! ready and authenticated; the app redirects to the login screen
//! instead. This mirrors a route guard, nothing more: there is no
//! security model behind it.

use log::{info, warn};
use thiserror::Error;

use crate::config::SessionConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("la sesión aún no está lista")]
    NotReady,
    #[error("usuario o PIN incorrectos")]
    InvalidCredentials,
}

#[derive(Debug, Default)]
pub struct Session {
    ready: bool,
    authenticated: bool,
    user: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the session ready once startup (config load) finished.
    pub fn set_ready(&mut self) {
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Whether the dashboard may handle events right now.
    pub fn guard(&self) -> bool {
        self.ready && self.authenticated
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn login(&mut self, user: &str, pin: &str, config: &SessionConfig) -> Result<(), AuthError> {
        if !self.ready {
            return Err(AuthError::NotReady);
        }
        if user.trim() == config.user && pin.trim() == config.pin {
            self.authenticated = true;
            self.user = Some(user.trim().to_string());
            info!("session opened for {}", config.user);
            Ok(())
        } else {
            warn!("rejected login attempt for {user:?}");
            Err(AuthError::InvalidCredentials)
        }
    }

    pub fn logout(&mut self) {
        if self.authenticated {
            info!("session closed");
        }
        self.authenticated = false;
        self.user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig {
            user: "admin".into(),
            pin: "1234".into(),
        }
    }

    #[test]
    fn test_login_requires_ready() {
        let mut session = Session::new();
        assert_eq!(
            session.login("admin", "1234", &config()),
            Err(AuthError::NotReady)
        );
        session.set_ready();
        assert!(session.login("admin", "1234", &config()).is_ok());
        assert!(session.guard());
    }

    #[test]
    fn test_bad_credentials_keep_guard_closed() {
        let mut session = Session::new();
        session.set_ready();
        assert_eq!(
            session.login("admin", "9999", &config()),
            Err(AuthError::InvalidCredentials)
        );
        assert!(!session.guard());
    }

    #[test]
    fn test_logout_closes_guard() {
        let mut session = Session::new();
        session.set_ready();
        session.login("admin", "1234", &config()).unwrap();
        session.logout();
        assert!(!session.guard());
        assert_eq!(session.user(), None);
    }
}
