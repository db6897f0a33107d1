//! Session storage and the session-expiry policy.
//!
//! The API layer never clears storage or redirects on its own. On a `401` it
//! emits `SessionEvent::Unauthorized`, and the single `SessionExpiryHandler`
//! subscribed at startup owns the clear/notify/redirect policy.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::errors::SESSION_EXPIRED_MESSAGE;
use crate::shell::{Navigator, Notifier, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Token,
    User,
    Lang,
}

impl SessionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::Token => "token",
            SessionKey::User => "user",
            SessionKey::Lang => "lang",
        }
    }
}

/// Key/value storage that survives page navigation (browser session storage in the web host).
pub trait SessionStore: Send + Sync {
    fn get(&self, key: SessionKey) -> Option<String>;
    fn set(&self, key: SessionKey, value: String);
    fn remove(&self, key: SessionKey);
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<SessionKey, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: SessionKey) -> Option<String> {
        self.entries.read().ok()?.get(&key).cloned()
    }

    fn set(&self, key: SessionKey, value: String) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, value);
        }
    }

    fn remove(&self, key: SessionKey) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(&key);
        }
    }
}

/// The logged-in user as persisted by the auth flow.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: Value,
}

impl Session {
    /// Reads the session from storage. A malformed user blob counts as no session.
    pub fn load(store: &dyn SessionStore) -> Option<Session> {
        let token = store.get(SessionKey::Token).filter(|t| !t.is_empty())?;
        let user = match store.get(SessionKey::User) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(user) => user,
                Err(e) => {
                    warn!("Stored user is not valid JSON: {e}");
                    return None;
                }
            },
            None => Value::Null,
        };
        Some(Session { token, user })
    }

    pub fn save(&self, store: &dyn SessionStore) {
        store.set(SessionKey::Token, self.token.clone());
        store.set(SessionKey::User, self.user.to_string());
    }

    pub fn user_id(&self) -> Option<String> {
        resolve_user_id(&self.user)
    }
}

/// Drops credentials. The language preference is kept.
pub fn clear_session(store: &dyn SessionStore) {
    store.remove(SessionKey::Token);
    store.remove(SessionKey::User);
}

/// Resolves the acting user's id.
///
/// The auth response sometimes nests the user one level (`{ user: { ... } }`);
/// the inner object wins when present. Ids are probed as `_id`, `id`, `userId`.
pub fn resolve_user_id(user: &Value) -> Option<String> {
    let inner = user.get("user").filter(|u| u.is_object()).unwrap_or(user);
    ["_id", "id", "userId"]
        .iter()
        .find_map(|key| match inner.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// An authenticated call came back `401`.
    Unauthorized,
}

/// Broadcast channel the API layer publishes session events on.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn emit(&self, event: SessionEvent) {
        // No subscriber is fine: nothing owns the policy yet.
        if self.tx.send(event).is_err() {
            debug!("Session event {event:?} dropped, no subscriber");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// The one subscriber that reacts to session expiry.
#[derive(Clone)]
pub struct SessionExpiryHandler {
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    redirect_delay: Duration,
}

impl SessionExpiryHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            store,
            notifier,
            navigator,
            redirect_delay,
        }
    }

    /// Clears credentials, notifies once, then redirects home after the delay.
    /// Events arriving after the session is already cleared are ignored.
    pub async fn handle(&self, event: SessionEvent) {
        match event {
            SessionEvent::Unauthorized => {
                if self.store.get(SessionKey::Token).is_none() {
                    debug!("Unauthorized event with no stored session, ignoring");
                    return;
                }
                info!("Session expired, clearing stored credentials");
                clear_session(self.store.as_ref());
                self.notifier.error(SESSION_EXPIRED_MESSAGE);
                tokio::time::sleep(self.redirect_delay).await;
                self.navigator.navigate(Route::Home);
            }
        }
    }

    pub async fn run(self, mut rx: broadcast::Receiver<SessionEvent>) {
        loop {
            match rx.recv().await {
                Ok(event) => self.handle(event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Session event subscriber lagged, skipped {skipped} events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
