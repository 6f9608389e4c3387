//! Admin gate for editing the building and event catalogues.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminError {
    #[error("admin access is not configured")]
    NotConfigured,
    #[error("invalid admin passcode")]
    InvalidPasscode,
}

/// Proof that the holder passed the admin gate.
///
/// Building catalogue and event store edits take a reference to one of these.
#[derive(Debug)]
pub struct AdminSession {
    _private: (),
}

/// Checks a passcode against the configured one.
#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    passcode: Option<String>,
}

impl AdminGate {
    pub fn new(passcode: Option<String>) -> Self {
        Self {
            passcode: passcode.filter(|p| !p.is_empty()),
        }
    }

    /// Whether a passcode has been configured at all.
    pub fn is_configured(&self) -> bool {
        self.passcode.is_some()
    }

    pub fn login(&self, passcode: &str) -> Result<AdminSession, AdminError> {
        let expected = self.passcode.as_deref().ok_or(AdminError::NotConfigured)?;
        if expected == passcode {
            log::debug!("admin session opened");
            Ok(AdminSession { _private: () })
        } else {
            log::warn!("rejected admin login");
            Err(AdminError::InvalidPasscode)
        }
    }
}
