// SPDX-License-Identifier: MPL-2.0
//! Notification lifecycle management.
//!
//! Entries are kept in arrival order; the first [`MAX_VISIBLE`] are on
//! screen and the rest wait. Repeating a message already pending refreshes
//! it instead of stacking a duplicate (a user tapping "rotate" while
//! cropping sees one warning, not five).

use super::notification::{Notification, NotificationId, Severity};
use crate::error::Result;
use std::collections::VecDeque;

/// Maximum number of notifications visible at once.
pub const MAX_VISIBLE: usize = 3;

#[derive(Debug, Default)]
pub struct Manager {
    entries: VecDeque<Notification>,
}

impl Manager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `notification`, or replaces an identical pending one in place.
    pub fn push(&mut self, notification: Notification) {
        match notification.severity() {
            Severity::Warning => log::warn!("notification: {}", notification.message_key()),
            Severity::Error => log::error!("notification: {}", notification.message_key()),
            Severity::Success | Severity::Info => {
                log::debug!("notification: {}", notification.message_key());
            }
        }

        match self
            .entries
            .iter_mut()
            .find(|pending| pending.same_message(&notification))
        {
            Some(pending) => *pending = notification,
            None => self.entries.push_back(notification),
        }
    }

    /// Pushes the outcome of an edit: `success_key` on `Ok`, the error's
    /// own message on `Err`.
    pub fn report<T>(&mut self, result: &Result<T>, success_key: &str) {
        match result {
            Ok(_) => self.push(Notification::success(success_key)),
            Err(err) => self.push(Notification::from_error(err)),
        }
    }

    /// Returns `true` if the notification was pending.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id() != id);
        self.entries.len() != before
    }

    /// Drops visible notifications whose display time is over. Waiting ones
    /// are left alone until they reach the screen.
    pub fn tick(&mut self) {
        let expired: Vec<NotificationId> = self
            .visible()
            .filter(|n| n.should_auto_dismiss())
            .map(Notification::id)
            .collect();
        for id in expired {
            self.dismiss(id);
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().take(MAX_VISIBLE)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.entries.len().min(MAX_VISIBLE)
    }

    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.entries.len().saturating_sub(MAX_VISIBLE)
    }

    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops pending errors, e.g. after a retried export succeeded.
    pub fn clear_errors(&mut self) {
        self.entries.retain(|n| n.severity() != Severity::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ValidationError};
    use std::time::Duration;

    #[test]
    fn overflow_waits_in_arrival_order() {
        let mut manager = Manager::new();
        for i in 0..5 {
            manager.push(Notification::info(format!("info-{i}")));
        }
        assert_eq!(manager.visible_count(), MAX_VISIBLE);
        assert_eq!(manager.queued_count(), 2);

        let first = manager.visible().next().map(Notification::id).unwrap();
        assert!(manager.dismiss(first));
        let keys: Vec<_> = manager.visible().map(Notification::message_key).collect();
        assert_eq!(keys, vec!["info-1", "info-2", "info-3"]);
        assert!(!manager.dismiss(first));
    }

    #[test]
    fn repeated_refusal_is_not_stacked() {
        let mut manager = Manager::new();
        let refused: Result<()> = Err(ValidationError::NotInViewingMode.into());
        for _ in 0..4 {
            manager.report(&refused, "unused");
        }
        assert_eq!(manager.visible_count(), 1);
        assert_eq!(manager.queued_count(), 0);
    }

    #[test]
    fn report_picks_success_key() {
        let mut manager = Manager::new();
        manager.report(&Ok(()), "notification-crop-applied");
        let n = manager.visible().next().unwrap();
        assert_eq!(n.severity(), Severity::Success);
        assert_eq!(n.message_key(), "notification-crop-applied");
    }

    #[test]
    fn tick_expires_only_visible_entries() {
        let mut manager = Manager::new();
        manager.push(Notification::error("error-io"));
        for i in 0..3 {
            manager.push(Notification::info(format!("later-{i}")).auto_dismiss(Duration::ZERO));
        }
        manager.tick();
        // Two visible infos expired; the third was queued and is now shown.
        assert_eq!(manager.visible_count(), 2);
        assert_eq!(manager.queued_count(), 0);
        manager.tick();
        assert_eq!(manager.visible_count(), 1);
    }

    #[test]
    fn clear_errors_keeps_other_severities() {
        let mut manager = Manager::new();
        manager.push(Notification::from_error(&Error::Resource("disk".into())));
        manager.push(Notification::error("error-io"));
        manager.push(Notification::success("notification-crop-applied"));
        manager.push(Notification::from_error(&Error::Busy));

        manager.clear_errors();
        assert_eq!(manager.visible_count(), 2);
        assert!(manager.visible().all(|n| n.severity() != Severity::Error));

        manager.clear();
        assert!(!manager.has_notifications());
    }
}
