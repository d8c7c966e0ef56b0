#[macro_use]
extern crate serde;
#[macro_use]
extern crate lazy_static;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::error::{ConfigurationError, PortalError};
use crate::portal::Portal;
use crate::store::JsonFileStore;

pub mod config;
pub mod data;
pub mod error;
pub mod pending;
pub mod portal;
pub mod role;
pub mod snapshot;
pub mod store;
pub mod util;

pub use data::prefs::{resolve_prefs, update_prefs};
pub use data::user::normalize_user;
pub use pending::{DeleteCoordinator, DeleteStatus, PendingDelete};
pub use snapshot::{delete_user, Snapshot};

/// Loads configuration and opens a portal session backed by the configured
/// snapshot file.
pub fn open(log_level: Option<Level>) -> Result<Portal<JsonFileStore>, PortalError> {
    if let Some(l) = log_level {
        let subscriber = FmtSubscriber::builder().with_max_level(l).finish();

        if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Unable to set global logger: {}", err);
        };
    }

    tracing::info!("Reading .env file...");
    if dotenv::dotenv().is_err() {
        tracing::warn!("Unable to load .env file.");
    }

    tracing::info!("Loading configuration...");
    let c = match Config::load() {
        Ok(c) => {
            tracing::info!("Configuration loaded.");
            c
        }
        Err(ConfigurationError::NotFound(_)) => {
            let c = Config::default();
            if c.save().is_err() {
                tracing::warn!("Unable to save generated configuration.");
            }
            c
        }
        Err(other) => {
            tracing::error!("Configuration error: {}", other);
            return Err(other.into());
        }
    };

    tracing::info!("Using snapshot file: {}", c.snapshot_path.display());
    let store = JsonFileStore::new(c.snapshot_path.clone());

    Ok(Portal::new(store, &c))
}
