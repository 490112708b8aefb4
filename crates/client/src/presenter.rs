//! Presentation side effects.
//!
//! The cart and the auth state never render anything themselves; they hand
//! notifications, badge updates and navigation requests to a [`Presenter`].
//! A browser build would implement it over the DOM, the CLI prints, tests
//! record.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

/// Page the user is sent to after logging out.
pub const HOME_PAGE: &str = "index.html";

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Error)
    }
}

/// Cart badge state: the item count, shown only when non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartBadge {
    pub count: u32,
}

impl CartBadge {
    #[must_use]
    pub const fn visible(self) -> bool {
        self.count > 0
    }
}

/// Entry of the account area of the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavLink {
    /// Link to the profile page labelled with the user's name.
    Profile { full_name: String },
    Logout,
    Login,
    SignUp,
}

impl NavLink {
    /// Target page. `Logout` has none; it triggers an action instead.
    #[must_use]
    pub const fn href(&self) -> Option<&'static str> {
        match self {
            Self::Profile { .. } => Some("profile.html"),
            Self::Logout => None,
            Self::Login => Some("login.html"),
            Self::SignUp => Some("signup.html"),
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Profile { full_name } => full_name.clone(),
            Self::Logout => "Logout".to_string(),
            Self::Login => "Login".to_string(),
            Self::SignUp => "Sign Up".to_string(),
        }
    }
}

/// Sink for UI side effects.
pub trait Presenter: Send + Sync {
    /// Show a transient notification.
    fn notify(&self, notification: &Notification);

    /// Refresh the cart badge.
    fn cart_badge(&self, badge: CartBadge);

    /// Leave the current page for `target`.
    fn navigate(&self, target: &str);
}

/// Presenter that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn notify(&self, notification: &Notification) {
        tracing::info!(
            kind = notification.kind.as_str(),
            message = %notification.message,
            "Notification"
        );
    }

    fn cart_badge(&self, badge: CartBadge) {
        tracing::debug!(count = badge.count, visible = badge.visible(), "Cart badge");
    }

    fn navigate(&self, target: &str) {
        tracing::info!(page = target, "Navigate");
    }
}

/// Presenter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPresenter;

impl Presenter for NoopPresenter {
    fn notify(&self, _notification: &Notification) {}

    fn cart_badge(&self, _badge: CartBadge) {}

    fn navigate(&self, _target: &str) {}
}

/// Presenter that collects events in memory, for tests and headless use.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    notifications: Mutex<Vec<Notification>>,
    badges: Mutex<Vec<CartBadge>>,
    navigations: Mutex<Vec<String>>,
}

impl RecordingPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }

    /// Most recent badge update.
    #[must_use]
    pub fn last_badge(&self) -> Option<CartBadge> {
        lock(&self.badges).last().copied()
    }

    /// Navigation targets received so far, oldest first.
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        lock(&self.navigations).clone()
    }
}

impl Presenter for RecordingPresenter {
    fn notify(&self, notification: &Notification) {
        lock(&self.notifications).push(notification.clone());
    }

    fn cart_badge(&self, badge: CartBadge) {
        lock(&self.badges).push(badge);
    }

    fn navigate(&self, target: &str) {
        lock(&self.navigations).push(target.to_string());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_visibility() {
        assert!(!CartBadge { count: 0 }.visible());
        assert!(CartBadge { count: 3 }.visible());
    }

    #[test]
    fn test_nav_link_targets() {
        let profile = NavLink::Profile {
            full_name: "Asha Rao".to_string(),
        };
        assert_eq!(profile.href(), Some("profile.html"));
        assert_eq!(profile.label(), "Asha Rao");
        assert_eq!(NavLink::Logout.href(), None);
        assert_eq!(NavLink::SignUp.label(), "Sign Up");
    }

    #[test]
    fn test_recording_presenter_records() {
        let presenter = RecordingPresenter::new();
        presenter.notify(&Notification::error("boom"));
        presenter.cart_badge(CartBadge { count: 1 });
        presenter.cart_badge(CartBadge { count: 4 });
        presenter.navigate(HOME_PAGE);

        assert_eq!(presenter.notifications().len(), 1);
        assert_eq!(presenter.last_badge(), Some(CartBadge { count: 4 }));
        assert_eq!(presenter.navigations(), vec![HOME_PAGE.to_string()]);
    }
}
