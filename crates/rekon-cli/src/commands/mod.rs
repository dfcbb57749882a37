pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;

use tracing::debug;

use rekon_core::models::config::RekonConfig;

/// Load the configuration named on the command line, else the user's
/// config file when present, else defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<RekonConfig> {
    if let Some(path) = path {
        debug!("Loading configuration from {}", path);
        return Ok(RekonConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(RekonConfig::from_file(&default_path)?)
    } else {
        Ok(RekonConfig::default())
    }
}
