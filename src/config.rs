//! Configuration for oemhook
//!
//! Centralized configuration with sensible defaults.

use crate::catalog::Revision;
use crate::error::{HookError, Result};

/// Main configuration for an oemhook client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Catalog Configuration
    // -------------------------------------------------------------------------
    /// Revision used when the caller names an operation without one
    pub revision: Revision,

    // -------------------------------------------------------------------------
    // Transport Configuration
    // -------------------------------------------------------------------------
    /// How long to wait for a completion (milliseconds)
    pub reply_timeout_ms: u64,

    /// Bounded capacity of the simulated modem link, in frames
    pub link_capacity: usize,

    // -------------------------------------------------------------------------
    // Logging Configuration
    // -------------------------------------------------------------------------
    /// Fallback filter when RUST_LOG is not set
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            revision: Revision::Aligned,
            reply_timeout_ms: 5000,
            link_capacity: 64,
            log_filter: "info,oemhook=debug".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the default catalog revision
    pub fn revision(mut self, revision: Revision) -> Self {
        self.config.revision = revision;
        self
    }

    /// Set the reply timeout (in milliseconds)
    pub fn reply_timeout_ms(mut self, ms: u64) -> Self {
        self.config.reply_timeout_ms = ms;
        self
    }

    /// Set the simulated link capacity (in frames)
    pub fn link_capacity(mut self, frames: usize) -> Self {
        self.config.link_capacity = frames;
        self
    }

    /// Set the fallback log filter
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.log_filter = filter.into();
        self
    }

    /// Finish the builder, rejecting values the transports cannot work with
    pub fn build(self) -> Result<Config> {
        if self.config.reply_timeout_ms == 0 {
            return Err(HookError::Config(
                "reply timeout must be greater than zero".to_string(),
            ));
        }
        if self.config.link_capacity == 0 {
            return Err(HookError::Config(
                "link capacity must be at least one frame".to_string(),
            ));
        }
        Ok(self.config)
    }
}
