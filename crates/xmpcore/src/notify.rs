//! Client error notification
//!
//! A process-wide default callback and a per-object override. Every failure
//! raised by an [`XmpMeta`](crate::meta::XmpMeta) operation is offered to the
//! installed callback before it is returned; a recoverable error is
//! swallowed when the callback asks for it.

use std::fmt;
use std::sync::Arc;

use crate::errors::ExError;

/// How bad an error is, in increasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    /// The operation can continue
    #[default]
    Recoverable,
    /// The current operation is abandoned
    OperationFatal,
    /// The file being processed cannot be used
    FileFatal,
    /// The process should stop using the library
    ProcessFatal,
}

/// Client callback. Returning `true` asks for a recoverable error to be
/// swallowed.
pub type ErrorCallback = Arc<dyn Fn(Severity, &ExError) -> bool + Send + Sync>;

/// Callback plus its notification accounting
#[derive(Clone, Default)]
pub struct ErrorCallbackInfo {
    client: Option<ErrorCallback>,
    limit: u32,
    notifications: u32,
    top_severity: Severity,
}

impl fmt::Debug for ErrorCallbackInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorCallbackInfo")
            .field("installed", &self.client.is_some())
            .field("limit", &self.limit)
            .field("notifications", &self.notifications)
            .field("top_severity", &self.top_severity)
            .finish()
    }
}

impl ErrorCallbackInfo {
    /// Install `client` with a notification limit; 0 means unlimited
    pub fn new(client: ErrorCallback, limit: u32) -> Self {
        Self {
            client: Some(client),
            limit,
            ..Self::default()
        }
    }

    /// Whether a client callback is installed
    pub fn can_notify(&self) -> bool {
        self.client.is_some()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn notifications(&self) -> u32 {
        self.notifications
    }

    pub fn top_severity(&self) -> Severity {
        self.top_severity
    }

    /// Set a new limit and restart the accounting
    pub fn reset_limit(&mut self, limit: u32) {
        self.limit = limit;
        self.notifications = 0;
        self.top_severity = Severity::Recoverable;
    }

    /// Decide whether this notification goes out, updating the counters
    ///
    /// Lower-than-top severities are dropped uncounted. A higher severity
    /// becomes the new top and restarts the count.
    fn check_limit_and_severity(&mut self, severity: Severity) -> bool {
        if self.limit == 0 {
            return true;
        }
        if severity < self.top_severity {
            return false;
        }
        if severity > self.top_severity {
            self.top_severity = severity;
            self.notifications = 0;
        }
        if self.notifications >= self.limit {
            return false;
        }
        self.notifications += 1;
        true
    }

    /// Offer `error` to the client and mark it as notified.
    ///
    /// Returns `true` when the error is recoverable and the client chose to
    /// continue. An error already marked is not offered again.
    pub fn offer(&mut self, severity: Severity, error: &mut ExError) -> bool {
        let mut recover = severity == Severity::Recoverable;
        if !self.can_notify() || error.is_notified() {
            return recover;
        }
        error.set_notified();
        if !self.check_limit_and_severity(severity) {
            tracing::debug!(
                severity = ?severity,
                code = error.code(),
                "error notification suppressed"
            );
            return recover;
        }
        if let Some(client) = &self.client {
            recover &= client(severity, error);
        }
        recover
    }

    /// [`offer`](Self::offer), handing the error back unless it was
    /// swallowed
    ///
    /// # Errors
    /// The same error, unless it was swallowed
    pub fn notify(&mut self, severity: Severity, mut error: ExError) -> Result<(), ExError> {
        if self.offer(severity, &mut error) {
            Ok(())
        } else {
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::sync::Mutex;

    fn recording(answer: bool) -> (ErrorCallback, Arc<Mutex<Vec<Severity>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ErrorCallback = Arc::new(move |severity: Severity, _err: &ExError| {
            sink.lock().unwrap().push(severity);
            answer
        });
        (callback, seen)
    }

    fn err() -> ExError {
        ExError::new(ErrorKind::BadParam).with_message("boom")
    }

    #[test]
    fn test_no_callback_propagates_everything_but_recoverable() {
        let mut info = ErrorCallbackInfo::default();
        assert!(!info.can_notify());
        assert!(info.notify(Severity::Recoverable, err()).is_ok());
        let returned = info.notify(Severity::OperationFatal, err()).unwrap_err();
        assert!(!returned.is_notified());
    }

    #[test]
    fn test_recoverable_swallowed_only_when_client_agrees() {
        let (yes, _) = recording(true);
        let mut info = ErrorCallbackInfo::new(yes, 0);
        assert!(info.notify(Severity::Recoverable, err()).is_ok());

        let (no, _) = recording(false);
        let mut info = ErrorCallbackInfo::new(no, 0);
        let returned = info.notify(Severity::Recoverable, err()).unwrap_err();
        assert!(returned.is_notified());
    }

    #[test]
    fn test_fatal_always_propagates() {
        let (yes, seen) = recording(true);
        let mut info = ErrorCallbackInfo::new(yes, 0);
        assert!(info.notify(Severity::FileFatal, err()).is_err());
        assert_eq!(*seen.lock().unwrap(), vec![Severity::FileFatal]);
    }

    #[test]
    fn test_limit_and_severity_escalation() {
        let (yes, seen) = recording(true);
        let mut info = ErrorCallbackInfo::new(yes, 2);

        for _ in 0..3 {
            let _ = info.notify(Severity::Recoverable, err());
        }
        assert_eq!(seen.lock().unwrap().len(), 2);
        assert_eq!(info.notifications(), 2);

        // higher severity restarts the count
        let _ = info.notify(Severity::OperationFatal, err());
        assert_eq!(info.top_severity(), Severity::OperationFatal);
        assert_eq!(info.notifications(), 1);

        // lower severity is dropped uncounted
        let _ = info.notify(Severity::Recoverable, err());
        assert_eq!(seen.lock().unwrap().len(), 3);
        assert_eq!(info.notifications(), 1);

        info.reset_limit(5);
        assert_eq!(info.notifications(), 0);
        assert_eq!(info.top_severity(), Severity::Recoverable);
        assert_eq!(info.limit(), 5);
    }

    #[test]
    fn test_already_notified_error_is_not_offered_again() {
        let (yes, seen) = recording(true);
        let mut info = ErrorCallbackInfo::new(yes, 0);
        let first = info.notify(Severity::OperationFatal, err()).unwrap_err();
        let _ = info.notify(Severity::OperationFatal, first);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
