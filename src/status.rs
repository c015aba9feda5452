pub const READY: &str = "Ready.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A pending revert-to-ready, carrying the message it is allowed to clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusExpiry {
    pub message: String,
}

/// One-line status with delayed revert.
///
/// Each non-error message other than [`READY`] leaves a [`StatusExpiry`] for the
/// event loop to fire later. Firing is a no-op if a newer message replaced it,
/// so nothing ever needs cancelling.
#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
    severity: Severity,
    pending: Option<StatusExpiry>,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY.to_string(),
            severity: Severity::Info,
            pending: None,
        }
    }
}

impl StatusLine {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn set(&mut self, message: impl Into<String>, severity: Severity) {
        self.message = message.into();
        self.severity = severity;
        self.pending = (severity != Severity::Error && self.message != READY).then(|| StatusExpiry {
            message: self.message.clone(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.set(message, Severity::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.set(message, Severity::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.set(message, Severity::Error);
    }

    /// Hands the latest expiry to the caller for scheduling.
    pub fn take_expiry(&mut self) -> Option<StatusExpiry> {
        self.pending.take()
    }

    /// Returns true if the line was reverted.
    pub fn expire(&mut self, expiry: &StatusExpiry) -> bool {
        if self.severity == Severity::Error || self.message != expiry.message {
            return false;
        }
        self.message = READY.to_string();
        self.severity = Severity::Info;
        self.pending = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_message_expires_to_ready() {
        let mut status = StatusLine::default();
        status.info("3 application(s) found.");

        let expiry = status.take_expiry().expect("info schedules an expiry");

        assert!(status.expire(&expiry));
        assert_eq!(status.message(), READY);
        assert_eq!(status.severity(), Severity::Info);
    }

    #[test]
    fn stale_expiry_is_a_noop() {
        let mut status = StatusLine::default();
        status.info("Launching Paint...");
        let stale = status.take_expiry().expect("scheduled");
        status.success("Successfully launched Paint.");

        assert!(!status.expire(&stale));
        assert_eq!(status.message(), "Successfully launched Paint.");
        assert_eq!(status.severity(), Severity::Success);
    }

    #[test]
    fn only_latest_expiry_is_pending() {
        let mut status = StatusLine::default();
        status.info("first");
        status.success("second");

        assert_eq!(status.take_expiry(), Some(StatusExpiry { message: "second".to_string() }));
        assert_eq!(status.take_expiry(), None);
    }

    #[test]
    fn errors_persist() {
        let mut status = StatusLine::default();
        status.error("Error launching Paint: boom");

        assert_eq!(status.take_expiry(), None);
        let forged = StatusExpiry { message: "Error launching Paint: boom".to_string() };
        assert!(!status.expire(&forged));
        assert_eq!(status.severity(), Severity::Error);
    }

    #[test]
    fn error_cancels_earlier_pending_expiry() {
        let mut status = StatusLine::default();
        status.info("Launching Paint...");
        status.error("Error: App path not found for Paint (mspaint.exe).");

        assert_eq!(status.take_expiry(), None);
    }

    #[test]
    fn ready_is_never_scheduled() {
        let mut status = StatusLine::default();
        status.info(READY);

        assert_eq!(status.take_expiry(), None);
    }

    #[test]
    fn repeated_identical_message_is_cleared_by_either_expiry() {
        let mut status = StatusLine::default();
        status.info("1 application(s) found.");
        let first = status.take_expiry().expect("scheduled");
        status.info("1 application(s) found.");

        assert!(status.expire(&first));
        assert_eq!(status.message(), READY);
    }
}
