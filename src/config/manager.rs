//! Holds the validated settings for one run.

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    TsCatalogSettings,
    loader,
};

/// Loads, validates and keeps the active settings.
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// Current settings
    current_settings: TsCatalogSettings,

    /// Directory the settings were looked up in
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// A manager holding the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: TsCatalogSettings::default(), workspace_root: None }
    }

    /// Loads `.ts-catalog.json` from `workspace_root`, falling back to the
    /// defaults when there is none.
    ///
    /// # Errors
    /// - File read error
    /// - JSON parse error
    /// - Validation error
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        let loaded = workspace_root.as_deref().map(loader::load_from_workspace).transpose()?;
        let settings = loaded.flatten().map_or_else(TsCatalogSettings::default, |ws| {
            tracing::debug!("Loaded workspace settings: {:?}", ws);
            ws
        });

        self.apply(settings)?;
        self.workspace_root = workspace_root;
        Ok(())
    }

    /// Loads settings from an explicit file, such as the one given with
    /// `--config`.
    ///
    /// # Errors
    /// - File read error
    /// - JSON parse error
    /// - Validation error
    pub fn load_file(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        let settings = loader::load_from_file(config_path)?;
        self.apply(settings)?;
        self.workspace_root = config_path.parent().map(Path::to_path_buf);
        Ok(())
    }

    /// Validates and activates `settings`.
    fn apply(&mut self, settings: TsCatalogSettings) -> Result<(), ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        self.current_settings = settings;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);
        Ok(())
    }

    /// Active settings.
    #[must_use]
    pub const fn get_settings(&self) -> &TsCatalogSettings {
        &self.current_settings
    }

    /// Directory the settings came from, if any.
    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use crate::merge::LocationPolicy;

    /// new: starts from the defaults
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings(), &TsCatalogSettings::default());
        assert!(manager.workspace_root().is_none());
    }

    /// load_settings: no workspace root
    #[rstest]
    fn test_load_settings_without_workspace() {
        let mut manager = ConfigManager::new();

        let result = manager.load_settings(None);

        assert!(result.is_ok());
        assert!(manager.get_settings().merge.match_similar);
        assert!(manager.workspace_root().is_none());
    }

    /// load_settings: the workspace has a configuration file
    #[rstest]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"merge": {"locations": "none"}}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().merge.locations, LocationPolicy::None);
        assert!(manager.workspace_root().is_some());
    }

    /// load_settings: invalid values are rejected and the defaults stay
    #[rstest]
    fn test_load_settings_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"merge": {"similarityPercent": 0}}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert_eq!(manager.get_settings(), &TsCatalogSettings::default());
    }

    /// load_file: explicit configuration path
    #[rstest]
    fn test_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");
        fs::write(&path, r#"{"merge": {"matchSimilar": false}}"#).unwrap();

        let mut manager = ConfigManager::new();
        manager.load_file(&path).unwrap();

        assert!(!manager.get_settings().merge.match_similar);
        assert_eq!(manager.workspace_root().map(PathBuf::as_path), Some(temp_dir.path()));
    }
}
