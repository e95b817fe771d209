use std::collections::BTreeMap;

use super::error::SettingsError;
use super::store::SettingsStore;

/// Required keys that are absent or blank, in the order they were asked for.
pub fn missing_keys(values: &BTreeMap<String, String>, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|key| values.get(**key).is_none_or(|v| v.trim().is_empty()))
        .map(|key| (*key).to_string())
        .collect()
}

/// Fails with every missing key at once rather than stopping at the first.
pub fn ensure_complete(settings: &SettingsStore, required: &[&str]) -> Result<(), SettingsError> {
    let missing = missing_keys(settings.values(), required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SettingsError::MissingKeys(missing))
    }
}
