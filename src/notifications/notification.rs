// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.

use crate::application::port::SavedAsset;
use crate::error::{Error, ValidationError};
use crate::i18n::I18n;
use std::time::{Duration, Instant};

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates a new unique notification ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Severity level determines display duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Operation completed successfully (2s, like a short toast).
    #[default]
    Success,
    Info,
    /// Recoverable problem, e.g. a validation refusal (3.5s).
    Warning,
    /// Error requiring attention (manual dismiss).
    Error,
}

impl Severity {
    /// Returns the auto-dismiss duration for this severity.
    /// Returns `None` for errors (manual dismiss required).
    #[must_use]
    pub fn auto_dismiss_duration(&self) -> Option<Duration> {
        match self {
            Severity::Success | Severity::Info => Some(Duration::from_millis(2000)),
            Severity::Warning => Some(Duration::from_millis(3500)),
            Severity::Error => None,
        }
    }
}

/// A message to be displayed to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    severity: Severity,
    /// The i18n key for the notification message.
    message_key: String,
    /// Arguments for message interpolation.
    message_args: Vec<(String, String)>,
    created_at: Instant,
    /// Custom auto-dismiss duration (overrides severity default).
    custom_dismiss_duration: Option<Duration>,
}

impl Notification {
    /// Creates a new notification with the given severity and message key.
    pub fn new(severity: Severity, message_key: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            severity,
            message_key: message_key.into(),
            message_args: Vec::new(),
            created_at: Instant::now(),
            custom_dismiss_duration: None,
        }
    }

    pub fn success(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Success, message_key)
    }

    pub fn info(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Info, message_key)
    }

    pub fn warning(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message_key)
    }

    pub fn error(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Error, message_key)
    }

    /// Builds the user-facing notification for an edit error.
    ///
    /// Validation refusals and task-slot outcomes are warnings since the
    /// session stays usable; everything else is an error.
    pub fn from_error(err: &Error) -> Self {
        let severity = match err {
            Error::Validation(_) | Error::Busy | Error::Cancelled => Severity::Warning,
            _ => Severity::Error,
        };
        let notification = Self::new(severity, err.i18n_key());
        match err {
            Error::PermissionDenied(permission) => {
                notification.with_arg("permission", permission.as_str())
            }
            Error::Validation(ValidationError::UnknownSticker(name)) => {
                notification.with_arg("sticker", name.clone())
            }
            _ => notification,
        }
    }

    /// Success message for a finished export, naming where it went.
    pub fn saved(asset: &SavedAsset) -> Self {
        Self::success(asset.notification_key()).with_arg("path", asset.locator.clone())
    }

    /// Adds an argument for message interpolation.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.message_args.push((key.into(), value.into()));
        self
    }

    /// Sets a custom auto-dismiss duration, overriding the severity default.
    #[must_use]
    pub fn auto_dismiss(mut self, duration: Duration) -> Self {
        self.custom_dismiss_duration = Some(duration);
        self
    }

    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    #[must_use]
    pub fn message_args(&self) -> &[(String, String)] {
        &self.message_args
    }

    /// Resolves the localized message text.
    #[must_use]
    pub fn message(&self, i18n: &I18n) -> String {
        i18n.tr_with_args(&self.message_key, &self.message_args)
    }

    /// Same severity, key and arguments.
    #[must_use]
    pub fn same_message(&self, other: &Notification) -> bool {
        self.severity == other.severity
            && self.message_key == other.message_key
            && self.message_args == other.message_args
    }

    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Returns whether this notification should auto-dismiss.
    #[must_use]
    pub fn should_auto_dismiss(&self) -> bool {
        let duration = self
            .custom_dismiss_duration
            .or_else(|| self.severity.auto_dismiss_duration());

        duration.is_some_and(|d| self.age() >= d)
    }
}
