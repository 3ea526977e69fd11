//! # Eiga API
//!
//! JSON REST API for a movie catalogue.
//!
//! Every request passes through the same lifecycle:
//!
//! - **Panic isolation**: a panicking handler becomes a generic 500
//! - **Admission control**: a global token bucket, then one bucket per client IP
//! - **Authentication**: the bearer token resolves to an [`auth::Identity`]
//! - **Authorization**: per-route gates (authenticated, activated, permitted)
//!
//! Work that outlives a request (welcome mail) runs on the
//! [`core::BackgroundTaskTracker`], and [`core::ShutdownCoordinator`] drains
//! HTTP traffic and background work before the process exits.
//!
//! ## Running
//!
//! ```rust,no_run
//! use eiga_api::{Api, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/eiga.yaml").await?;
//!     Api::new(config).run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod core;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use utils::error::{ApiError, Result};

use tracing::info;

/// The API process: configuration plus the HTTP server built from it
pub struct Api {
    server: server::HttpServer,
}

impl Api {
    /// Create the API. Must be called inside a Tokio runtime.
    pub fn new(config: Config) -> Self {
        info!("Creating API instance");
        Self {
            server: server::HttpServer::new(config),
        }
    }

    /// Serve until a termination signal has been fully handled
    pub async fn run(self) -> Result<()> {
        info!(
            environment = %self.server.state().config.server().environment,
            "Starting Eiga API"
        );
        self.server.start().await
    }
}

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
