//! Demo error types.

use revenant_core::PoolError;
use thiserror::Error;

/// Errors that stop the demo.
#[derive(Error, Debug)]
pub enum DemoError {
    /// Building or driving the pools failed.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// The demo settings are unusable.
    #[error("invalid demo configuration: {0}")]
    InvalidConfig(String),

    /// The demo config file is not valid TOML for [`DemoConfig`](crate::DemoConfig).
    #[error("failed to parse demo configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The demo config file could not be read.
    #[error("failed to read demo configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Instances were created but never destroyed.
    #[error("{0} instances leaked past shutdown")]
    Leak(u64),
}

/// Result type for demo operations.
pub type DemoResult<T> = Result<T, DemoError>;
