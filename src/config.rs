//! `.ts-catalog.json` configuration.
/// Config file loader
mod loader;
/// Configuration manager
mod manager;
/// Catalog file pattern matcher
mod matcher;
/// Configuration types and settings
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use matcher::{
    FileMatcher,
    MatcherError,
};
pub use types::{
    CheckConfig,
    ConfigError,
    MergeConfig,
    TranslationFilesConfig,
    TsCatalogSettings,
    ValidationError,
};
