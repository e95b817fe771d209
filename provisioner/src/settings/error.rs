use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Missing required settings: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("Invalid setting name: {0:?}")]
    InvalidKey(String),

    #[error("Value for {0} must fit on a single line")]
    MultilineValue(String),

    #[error("Value for {0} must not contain `$`; the settings file expands it on read")]
    ExpandableValue(String),
}
