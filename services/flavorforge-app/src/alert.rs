//! Blocking user-facing alerts

/// Shows a message the user must acknowledge
#[cfg_attr(test, mockall::automock)]
pub trait Alerter: Send + Sync {
    fn alert(&self, message: &str);
}

/// Writes alerts to stderr for terminal users
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAlerter;

impl Alerter for ConsoleAlerter {
    fn alert(&self, message: &str) {
        tracing::debug!("Alert shown: {}", message);
        eprintln!("! {}", message);
    }
}
