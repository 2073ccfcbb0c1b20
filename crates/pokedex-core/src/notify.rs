//! User-facing notifications.
//!
//! The session reports login/logout/registration outcomes through an
//! injected [`Notifier`] rather than printing directly, so embedders
//! decide how (or whether) messages reach the user.

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// An operation completed successfully.
    Success,
    /// Informational, e.g. a logout.
    Info,
    /// Something to pay attention to, but not a failure.
    Warning,
    /// An operation failed.
    Error,
}

/// A sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Deliver a notification.
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// A notifier that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _level: NoticeLevel, _message: &str) {}
}
