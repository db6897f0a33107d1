//! Client core of the marketplace web frontend: job-posting wizard, backend
//! client, session handling and the small auxiliary flows around them.

pub mod api;
pub mod app;
pub mod config;
pub mod contact;
pub mod errors;
pub mod locale;
pub mod models;
pub mod payment;
pub mod session;
pub mod shell;
pub mod wizard;

#[cfg(test)]
mod testing;

pub use app::{App, AppContext};
pub use config::Config;
pub use errors::ClientError;
