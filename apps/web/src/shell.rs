//! Side-effect seams owned by the hosting UI: user notifications and navigation.
//!
//! The library never renders toasts or touches routing itself. It calls these
//! traits, and the host decides how to present them. The in-memory
//! implementations here are what a headless host (and the test suite) uses.

use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Success,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Error,
            message: message.to_string(),
        });
    }
}

/// Collects notifications until the host drains them.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    items: Arc<RwLock<Vec<Notification>>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        match self.items.write() {
            Ok(mut items) => std::mem::take(&mut *items),
            Err(_) => Vec::new(),
        }
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.items
            .read()
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.snapshot()
            .iter()
            .filter(|n| n.level == level)
            .count()
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => warn!("notify error: {}", notification.message),
            _ => info!("notify {:?}: {}", notification.level, notification.message),
        }
        if let Ok(mut items) = self.items.write() {
            items.push(notification);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    /// The client's job listing.
    Jobs,
    PostJob,
    EditJob(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Jobs => "/jobs".to_string(),
            Route::PostJob => "/jobs/new".to_string(),
            Route::EditJob(id) => format!("/jobs/{id}/edit"),
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Records every navigation; the last entry is the current route.
#[derive(Debug, Clone, Default)]
pub struct RouteHistory {
    visited: Arc<RwLock<Vec<Route>>>,
}

impl RouteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Route> {
        self.visited.read().ok().and_then(|v| v.last().cloned())
    }

    pub fn visited(&self) -> Vec<Route> {
        self.visited.read().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Navigator for RouteHistory {
    fn navigate(&self, route: Route) {
        info!("navigate to {}", route.path());
        if let Ok(mut visited) = self.visited.write() {
            visited.push(route);
        }
    }
}
