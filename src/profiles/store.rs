use chrono::{DateTime, Utc};

use crate::{
    filters::catalog::FilterId,
    foundation::error::ProfileError,
    settings::{normalize::canonicalize, record::SettingsRecord},
};

/// Maximum number of profiles a store may hold.
pub const MAX_PROFILES: usize = 6;
/// Maximum profile name length, in characters, after trimming.
pub const MAX_NAME_CHARS: usize = 64;

/// A named, saved settings record.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Unique name.
    pub name: String,
    /// Saved settings, functional scale.
    pub settings: SettingsRecord,
    /// When the profile was last written.
    pub saved_at: DateTime<Utc>,
}

/// Lightweight listing entry.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    /// Profile name.
    pub name: String,
    /// Filter the profile selects.
    pub filter_id: FilterId,
    /// When the profile was last written.
    pub saved_at: DateTime<Utc>,
}

impl From<&Profile> for ProfileSummary {
    fn from(p: &Profile) -> Self {
        Self {
            name: p.name.clone(),
            filter_id: p.settings.filter_id,
            saved_at: p.saved_at,
        }
    }
}

/// Ordered profile collection enforcing unique names and [`MAX_PROFILES`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileStore {
    profiles: Vec<Profile>,
}

impl ProfileStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted profiles, dropping entries that would violate the
    /// invariants. Returns the store and the names that were dropped.
    pub fn from_profiles(profiles: impl IntoIterator<Item = Profile>) -> (Self, Vec<String>) {
        let mut store = Self::new();
        let mut dropped = Vec::new();
        for mut p in profiles {
            let name = match validate_name(&p.name) {
                Ok(n) => n,
                Err(_) => {
                    dropped.push(p.name);
                    continue;
                }
            };
            if store.position(&name).is_some() || store.profiles.len() >= MAX_PROFILES {
                dropped.push(name);
                continue;
            }
            p.name = name;
            p.settings = stored_settings(p.settings);
            store.profiles.push(p);
        }
        if !dropped.is_empty() {
            tracing::warn!(?dropped, "dropped persisted profiles violating store invariants");
        }
        (store, dropped)
    }

    /// Save `settings` under `name`, stamped with the current time.
    ///
    /// An existing profile with the same name is fully replaced (overwrite intent is
    /// confirmed by the caller). A new name is rejected with
    /// [`ProfileError::CapacityExceeded`] when the store is full.
    pub fn save(&mut self, name: &str, settings: SettingsRecord) -> Result<(), ProfileError> {
        self.save_at(name, settings, Utc::now())
    }

    /// [`ProfileStore::save`] with an explicit timestamp.
    pub fn save_at(
        &mut self,
        name: &str,
        settings: SettingsRecord,
        saved_at: DateTime<Utc>,
    ) -> Result<(), ProfileError> {
        let name = validate_name(name)?;
        let profile = Profile {
            name,
            settings: stored_settings(settings),
            saved_at,
        };

        match self.position(&profile.name) {
            Some(i) => {
                tracing::info!(name = %profile.name, "overwriting profile");
                self.profiles[i] = profile;
            }
            None => {
                if self.profiles.len() >= MAX_PROFILES {
                    return Err(ProfileError::CapacityExceeded {
                        limit: MAX_PROFILES,
                    });
                }
                tracing::info!(name = %profile.name, "saving new profile");
                self.profiles.push(profile);
            }
        }
        Ok(())
    }

    /// Change a profile's name, keeping its settings and position.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), ProfileError> {
        let i = self
            .position(old_name.trim())
            .ok_or_else(|| ProfileError::NotFound(old_name.to_owned()))?;
        let new_name = validate_name(new_name)?;
        if self.profiles[i].name == new_name {
            return Ok(());
        }
        if self.position(&new_name).is_some() {
            return Err(ProfileError::DuplicateName(new_name));
        }
        tracing::info!(from = %self.profiles[i].name, to = %new_name, "renaming profile");
        self.profiles[i].name = new_name;
        Ok(())
    }

    /// Remove a profile.
    pub fn delete(&mut self, name: &str) -> Result<(), ProfileError> {
        let i = self
            .position(name.trim())
            .ok_or_else(|| ProfileError::NotFound(name.to_owned()))?;
        let removed = self.profiles.remove(i);
        tracing::info!(name = %removed.name, "deleted profile");
        Ok(())
    }

    /// Summaries in insertion order.
    pub fn list(&self) -> Vec<ProfileSummary> {
        self.profiles.iter().map(ProfileSummary::from).collect()
    }

    /// Look up a profile by exact (trimmed) name.
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.position(name.trim()).map(|i| &self.profiles[i])
    }

    /// All profiles in insertion order.
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Number of stored profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.profiles.iter().position(|p| p.name == name)
    }
}

fn validate_name(name: &str) -> Result<String, ProfileError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > MAX_NAME_CHARS {
        return Err(ProfileError::InvalidName(name.to_owned()));
    }
    Ok(trimmed.to_owned())
}

// Saved records never carry an active profile name.
fn stored_settings(settings: SettingsRecord) -> SettingsRecord {
    SettingsRecord {
        active_profile_name: None,
        ..canonicalize(settings)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/profiles/store.rs"]
mod tests;
