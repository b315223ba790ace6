//! Settings and profile persistence over a [`KeyValueStore`].

use serde_json::Value;

use crate::{
    foundation::error::{ColorLensError, ColorLensResult},
    profiles::store::ProfileStore,
    settings::{
        record::SettingsRecord,
        schema::{
            SCHEMA_VERSION, StoredSettings, UpgradeReport, upgrade_profile, upgrade_settings,
        },
    },
    storage::kv::KeyValueStore,
};

/// Key holding the versioned settings envelope.
pub const SETTINGS_KEY: &str = "colorLensSettings";
/// Key holding the profile array.
pub const PROFILES_KEY: &str = "userProfiles";

/// Load settings, upgrading any known prior layout. An absent key yields defaults.
pub fn load_settings<S: KeyValueStore + ?Sized>(
    store: &S,
) -> ColorLensResult<(SettingsRecord, UpgradeReport)> {
    match store.get(SETTINGS_KEY)? {
        None | Some(Value::Null) => Ok((
            SettingsRecord::default(),
            UpgradeReport {
                from_version: SCHEMA_VERSION,
                discarded_fields: Vec::new(),
            },
        )),
        Some(value) => upgrade_settings(&value),
    }
}

/// Persist `record` at the current schema version.
pub fn save_settings<S: KeyValueStore + ?Sized>(
    store: &mut S,
    record: &SettingsRecord,
) -> ColorLensResult<()> {
    let value = serde_json::to_value(StoredSettings::current(record.clone()))?;
    store.set(SETTINGS_KEY, value)
}

/// Load the profile collection.
///
/// Entries in either profile layout are accepted. Entries that cannot be read at all, or
/// that would break the store's invariants, are skipped with a warning.
pub fn load_profiles<S: KeyValueStore + ?Sized>(store: &S) -> ColorLensResult<ProfileStore> {
    let items = match store.get(PROFILES_KEY)? {
        None | Some(Value::Null) => return Ok(ProfileStore::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ColorLensError::storage(format!(
                "'{PROFILES_KEY}' does not hold an array"
            )));
        }
    };

    let mut profiles = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match upgrade_profile(item) {
            Ok(p) => profiles.push(p),
            Err(err) => tracing::warn!(index = i, %err, "skipping unreadable profile"),
        }
    }
    let (store, _dropped) = ProfileStore::from_profiles(profiles);
    Ok(store)
}

/// Persist every profile in insertion order.
pub fn save_profiles<S: KeyValueStore + ?Sized>(
    store: &mut S,
    profiles: &ProfileStore,
) -> ColorLensResult<()> {
    let value = serde_json::to_value(profiles.profiles())?;
    store.set(PROFILES_KEY, value)
}

#[cfg(test)]
#[path = "../../tests/unit/storage/persist.rs"]
mod tests;
