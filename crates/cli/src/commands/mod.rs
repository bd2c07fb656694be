//! Subcommand implementations.

pub mod catalog;
pub mod demo;
pub mod session;

use std::sync::Arc;

use thiserror::Error;

use freshco_storefront::clock::SystemClock;
use freshco_storefront::config::{ConfigError, StorefrontConfig};
use freshco_storefront::error::AppError;
use freshco_storefront::services::Notifier;
use freshco_storefront::state::Storefront;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Could not read input: {0}")]
    Io(#[from] std::io::Error),

    /// Input ended before a value was entered.
    #[error("No {0} entered")]
    MissingInput(&'static str),
}

/// Load configuration from the environment and `.env`.
pub fn load_config() -> Result<StorefrontConfig, ConfigError> {
    StorefrontConfig::from_env()
}

/// Build an in-memory storefront with the wall clock and restore any
/// persisted session.
pub async fn open_storefront<N: Notifier>(
    config: StorefrontConfig,
    notifier: N,
) -> Result<Storefront<N>, AppError> {
    let storefront = Storefront::in_memory(config, Arc::new(notifier), Arc::new(SystemClock))?;
    storefront.session().restore().await?;
    Ok(storefront)
}
