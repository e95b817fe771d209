use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::error::SettingsError;
use super::keys;
use shared_types::DEFAULT_REGION;

/// `KEY=value` settings file, loaded once and rewritten on every upsert.
///
/// Values are read through `dotenvy`. Writes touch only the line of the key
/// being set, so comments and unrelated lines survive.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>> {
    let mut values = BTreeMap::new();
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to open settings file {}", path.display()))?;
    for item in iter {
        let (key, value) =
            item.with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        values.insert(key, value);
    }
    Ok(values)
}

/// Key declared by a settings line, if the line declares one.
fn line_key(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    trimmed.split_once('=').map(|(key, _)| key.trim())
}

/// Replace the line for `key` in place, or append one. Extra lines for the
/// same key are dropped so the file ends up with exactly one.
pub(crate) fn upsert_line(contents: &str, key: &str, value: &str) -> String {
    let entry = format!("{key}={value}");
    let mut written = false;
    let mut lines = Vec::new();

    for line in contents.lines() {
        if line_key(line) == Some(key) {
            if !written {
                lines.push(entry.clone());
                written = true;
            }
            continue;
        }
        lines.push(line.to_string());
    }
    if !written {
        lines.push(entry);
    }

    let mut updated = lines.join("\n");
    updated.push('\n');
    updated
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

impl SettingsStore {
    /// Load the settings file. A missing file is a configuration error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(SettingsError::FileNotFound(path).into());
        }
        let values = read_values(&path)?;
        debug!(path = %path.display(), count = values.len(), "loaded settings");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Value of `key`, treating blank values as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// `1`, `true` and `yes` (any case) count as enabled.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.get(key)
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
    }

    pub fn region(&self) -> &str {
        self.get_or(keys::REGION, DEFAULT_REGION)
    }

    /// Insert or overwrite `key` in the settings file, then reload the whole
    /// file so the in-memory view matches what is on disk.
    pub fn upsert(&mut self, key: &str, value: &str) -> Result<()> {
        if !is_valid_key(key) {
            return Err(SettingsError::InvalidKey(key.to_string()).into());
        }
        if value.contains(['\n', '\r']) {
            return Err(SettingsError::MultilineValue(key.to_string()).into());
        }
        if value.contains('$') {
            return Err(SettingsError::ExpandableValue(key.to_string()).into());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file {}", self.path.display()))?;
        fs::write(&self.path, upsert_line(&contents, key, value))
            .with_context(|| format!("Failed to write settings file {}", self.path.display()))?;
        self.values = read_values(&self.path)?;

        info!(key, path = %self.path.display(), "settings file updated");
        Ok(())
    }
}
