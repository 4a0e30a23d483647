//! Connection defaults loaded from an optional file and the environment.
//!
//! Command line flags always win over these values.
//!
//! ```toml
//! host = "hbase-rest.internal"
//! port = 8080
//! timeout_secs = 10
//! precision = 4
//! tls = false
//! ```
//!
//! Every key can also be set as `CELLPROBE_<KEY>`, e.g. `CELLPROBE_HOST`.

use std::path::Path;

use cellprobe_types::DEFAULT_PRECISION;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Default HBase REST gateway port.
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
    pub precision: usize,
    pub tls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            timeout_secs: 10,
            precision: DEFAULT_PRECISION,
            tls: false,
        }
    }
}

impl Settings {
    /// Load from `path` (if given) and `CELLPROBE_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder
            .add_source(Environment::with_prefix("CELLPROBE"))
            .build()?
            .try_deserialize()
    }
}
