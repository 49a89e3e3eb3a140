//! marketdeck — headless client core for a market data browser
//!
//! A thin client over a remote REST API: dashboard movers, a searchable
//! stock list, stock detail, a watchlist, profile and admin asset
//! management. Almost all state is either transient view state or a mirror
//! of the last successful fetch; the session and dark-mode preference are
//! the only durable pieces, kept in simple key-value storage.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod jobs;
pub mod preferences;
pub mod services;
pub mod session;
pub mod storage;
pub mod views;

pub use api::ApiClient;
pub use config::ApiConfig;
pub use error::{AppError, Result};
pub use preferences::PreferenceStore;
pub use session::{SessionStore, SessionUser};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing for an embedding application.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketdeck=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
