//! ipsbuild library - expose modules for testing
//!
//! This library exposes the command handlers so they can be exercised
//! without spawning the binary.

pub mod commands;
pub mod common;
pub mod errors;

pub use common::GlobalOpts;
pub use ipsbuild_config as config_manager;
pub use ipsbuild_logger as logger;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV_VAR: &str = "IPSBUILD_LOG";

/// Install a `tracing` subscriber for library events.
///
/// Only done at `-vv` or when `IPSBUILD_LOG` is set; otherwise library
/// events are dropped and the logger crate is the only console output.
pub fn init_tracing(verbosity: u8) {
    let from_env = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR).ok();
    if from_env.is_none() && verbosity < 2 {
        return;
    }
    let filter = from_env.unwrap_or_else(|| {
        "ipsbuild=trace,ipsbuild_manifest=trace,ipsbuild_php=trace".into()
    });
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
