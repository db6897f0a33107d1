use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api::{HttpMarketplaceApi, MarketplaceApi};
use crate::config::Config;
use crate::locale::Language;
use crate::payment::SimulatedPayment;
use crate::session::{
    MemorySessionStore, Session, SessionEvents, SessionExpiryHandler, SessionStore,
};
use crate::shell::{Navigator, NotificationQueue, Notifier, RouteHistory};

/// Shared collaborators handed to every flow (wizard, contact form, checkout).
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<dyn MarketplaceApi>,
    pub store: Arc<dyn SessionStore>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub events: SessionEvents,
    pub config: Config,
}

impl AppContext {
    pub fn session(&self) -> Option<Session> {
        Session::load(self.store.as_ref())
    }

    pub fn language(&self) -> Language {
        Language::load(self.store.as_ref(), self.config.default_language)
    }

    pub fn set_language(&self, language: Language) {
        language.save(self.store.as_ref());
    }

    pub fn payment(&self) -> SimulatedPayment {
        SimulatedPayment::new(self.config.payment_simulation)
    }
}

/// Installs the global tracing subscriber. Safe to call more than once.
pub fn init_tracing(config: &Config) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// A running client: context plus the in-memory shell the host drains.
pub struct App {
    pub ctx: AppContext,
    pub notifications: Arc<NotificationQueue>,
    pub routes: Arc<RouteHistory>,
    expiry_task: JoinHandle<()>,
}

impl App {
    /// Wires the HTTP client and spawns the session-expiry subscriber.
    /// Must be called inside a tokio runtime.
    pub fn start(config: Config) -> Result<App> {
        init_tracing(&config);
        info!("Starting marketplace web client v{}", env!("CARGO_PKG_VERSION"));

        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let events = SessionEvents::new();
        let notifications = Arc::new(NotificationQueue::new());
        let routes = Arc::new(RouteHistory::new());

        let api = HttpMarketplaceApi::new(&config, store.clone(), events.clone())?;
        info!("Backend client initialized (base url: {})", config.api_base_url);

        let handler = SessionExpiryHandler::new(
            store.clone(),
            notifications.clone(),
            routes.clone(),
            config.session_expiry_redirect,
        );
        let expiry_task = tokio::spawn(handler.run(events.subscribe()));

        let ctx = AppContext {
            api: Arc::new(api),
            store,
            notifier: notifications.clone(),
            navigator: routes.clone(),
            events,
            config,
        };

        Ok(App {
            ctx,
            notifications,
            routes,
            expiry_task,
        })
    }

    pub fn shutdown(self) {
        self.expiry_task.abort();
    }
}
