//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default tracing filter when `XPRESS_LOG` is not set.
fn default_log_filter() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// `tracing` filter directive (e.g. `"info"`, `"xpress_schema=debug"`).
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}
