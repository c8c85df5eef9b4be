//! Node settings

use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use serial_link::DEFAULT_BAUD_RATE;
use telemetry_scheduler::SchedulerConfig;

use crate::error::NodeError;

/// Serial line settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Serial device path; stdin/stdout when unset
    pub device: Option<String>,
    pub baud_rate: u32,
    /// How often the interrupt worker polls for received bytes (µs)
    pub poll_interval_us: u64,
    /// Bytes the wire writer accepts before the transmit FIFO reads as full
    pub fifo_depth: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            device: None,
            baud_rate: DEFAULT_BAUD_RATE,
            poll_interval_us: 500,
            fifo_depth: 16,
        }
    }
}

impl LinkConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_micros(self.poll_interval_us.max(1))
    }
}

/// Everything the host process reads at startup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub scheduler: SchedulerConfig,
    pub link: LinkConfig,
    /// Max tracing level (`error` .. `trace`)
    pub log_level: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            link: LinkConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl NodeConfig {
    /// Config file looked up when no path is given (any format `config` knows)
    pub const DEFAULT_FILE: &'static str = "telemetry-node";

    /// Environment prefix, e.g. `TELEMETRY__LINK__DEVICE=/dev/ttyUSB0`
    pub const ENV_PREFIX: &'static str = "TELEMETRY";

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: &str) -> Result<Self, NodeError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
