//! Reading `.ts-catalog.json` from disk.

use std::path::Path;

use super::{
    ConfigError,
    TsCatalogSettings,
};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".ts-catalog.json";

/// Loads settings from `CONFIG_FILE_NAME` in `workspace_root`.
///
/// # Returns
/// - `Ok(Some(settings))`: the file exists and parsed
/// - `Ok(None)`: there is no configuration file
/// - `Err(ConfigError)`: read or parse failure
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<TsCatalogSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    load_from_file(&config_path).map(Some)
}

/// Loads settings from an explicit path, which must exist.
pub(super) fn load_from_file(config_path: &Path) -> Result<TsCatalogSettings, ConfigError> {
    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(config_path)?;
    let settings: TsCatalogSettings = serde_json::from_str(&content)?;

    Ok(settings)
}
