//! Notification/toast system for user feedback.
//!
//! Provides transient notifications for copy and save results.

use std::time::{Duration, Instant};

/// How long copy feedback stays on screen.
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_secs(2);

const DEFAULT_DURATION: Duration = Duration::from_secs(3);
const FADE_DURATION: Duration = Duration::from_millis(500);

/// Type of notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationType {
    /// Modifier class of the toast element.
    pub fn class_name(&self) -> &'static str {
        match self {
            NotificationType::Success => "toast-success",
            NotificationType::Info => "toast-info",
            NotificationType::Warning => "toast-warning",
            NotificationType::Error => "toast-error",
        }
    }
}

/// A single notification.
#[derive(Debug, Clone)]
pub struct Notification {
    /// The notification message.
    pub message: String,
    /// Type of notification.
    pub notification_type: NotificationType,
    /// When the notification was created.
    pub created_at: Instant,
    /// How long the notification should be visible.
    pub duration: Duration,
}

impl Notification {
    /// Creates a new notification.
    pub fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
            created_at: Instant::now(),
            duration: DEFAULT_DURATION,
        }
    }

    /// Creates a new notification with custom duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Returns whether this notification has expired.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// Returns the remaining visibility (0.0 to 1.0) for fade-out effect.
    pub fn visibility(&self) -> f32 {
        let elapsed = self.created_at.elapsed();
        if elapsed >= self.duration {
            return 0.0;
        }

        // Fade out at the end
        let remaining = self.duration - elapsed;
        if remaining < FADE_DURATION {
            remaining.as_secs_f32() / FADE_DURATION.as_secs_f32()
        } else {
            1.0
        }
    }
}

/// Manages notifications for one page.
#[derive(Debug)]
pub struct NotificationManager {
    /// Active notifications.
    notifications: Vec<Notification>,
    /// Maximum number of visible notifications.
    max_visible: usize,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationManager {
    /// Creates a new notification manager.
    pub fn new() -> Self {
        Self {
            notifications: Vec::new(),
            max_visible: 5,
        }
    }

    /// Adds a notification with the default duration.
    pub fn notify(&mut self, message: impl Into<String>, notification_type: NotificationType) {
        self.push(Notification::new(message, notification_type));
    }

    /// Adds a notification that disappears after `duration`.
    pub fn notify_for(
        &mut self,
        message: impl Into<String>,
        notification_type: NotificationType,
        duration: Duration,
    ) {
        self.push(Notification::new(message, notification_type).with_duration(duration));
    }

    fn push(&mut self, notification: Notification) {
        log::debug!(
            "Notification ({:?}): {}",
            notification.notification_type,
            notification.message
        );
        self.notifications.push(notification);

        // Limit total notifications
        if self.notifications.len() > self.max_visible * 2 {
            let excess = self.notifications.len() - self.max_visible * 2;
            self.notifications.drain(..excess);
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationType::Success);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationType::Info);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationType::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationType::Error);
    }

    /// Removes expired notifications and returns whether any are still visible.
    pub fn update(&mut self) -> bool {
        self.notifications.retain(|n| !n.is_expired());
        !self.notifications.is_empty()
    }

    /// Returns the visible notifications (most recent first).
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().rev().take(self.max_visible)
    }

    /// The most recent notification.
    pub fn latest(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Returns whether there are any visible notifications.
    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }

    /// Clears all notifications.
    pub fn clear(&mut self) {
        self.notifications.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_creation() {
        let notification = Notification::new("Code copied!", NotificationType::Success);
        assert_eq!(notification.message, "Code copied!");
        assert!(!notification.is_expired());
        assert!(notification.visibility() > 0.9);
    }

    #[test]
    fn test_expired_notification_is_dropped() {
        let mut manager = NotificationManager::new();
        manager.notify_for("gone", NotificationType::Info, Duration::ZERO);
        assert!(manager.latest().unwrap().is_expired());
        assert_eq!(manager.latest().unwrap().visibility(), 0.0);
        assert!(!manager.update());
    }

    #[test]
    fn test_notification_manager() {
        let mut manager = NotificationManager::default();
        manager.success("Saved!");
        manager.error("Copy failed");

        assert!(manager.has_notifications());
        assert_eq!(manager.visible().count(), 2);
        assert_eq!(manager.latest().unwrap().notification_type.class_name(), "toast-error");
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut manager = NotificationManager::new();
        for i in 0..25 {
            manager.info(format!("n{i}"));
        }
        assert_eq!(manager.visible().count(), 5);
        assert_eq!(manager.visible().next().unwrap().message, "n24");
        manager.clear();
        assert!(!manager.has_notifications());
    }
}
