use crate::{
    foundation::error::{ColorLensResult, ProfileError},
    profiles::store::{Profile, ProfileStore, ProfileSummary},
    settings::record::SettingsRecord,
    storage::{
        kv::KeyValueStore,
        persist::{load_profiles, save_profiles},
    },
};

/// [`ProfileStore`] bound to a [`KeyValueStore`]: loaded on open, persisted after every
/// successful mutation.
///
/// A mutation whose write fails is not committed in memory either, so the in-memory view
/// never runs ahead of storage.
#[derive(Debug)]
pub struct ProfileService<S> {
    kv: S,
    profiles: ProfileStore,
}

impl<S: KeyValueStore> ProfileService<S> {
    /// Load profiles from `kv`.
    pub fn open(kv: S) -> ColorLensResult<Self> {
        let profiles = load_profiles(&kv)?;
        tracing::debug!(count = profiles.len(), "opened profile service");
        Ok(Self { kv, profiles })
    }

    /// Save (or overwrite) a profile.
    pub fn save(&mut self, name: &str, settings: SettingsRecord) -> ColorLensResult<()> {
        self.mutate(|p| p.save(name, settings))
    }

    /// Rename a profile.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> ColorLensResult<()> {
        self.mutate(|p| p.rename(old_name, new_name))
    }

    /// Delete a profile.
    pub fn delete(&mut self, name: &str) -> ColorLensResult<()> {
        self.mutate(|p| p.delete(name))
    }

    /// Summaries in insertion order.
    pub fn list(&self) -> Vec<ProfileSummary> {
        self.profiles.list()
    }

    /// Look up a profile.
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Settings of profile `name`, tagged with it as the active profile.
    pub fn activate(&self, name: &str) -> ColorLensResult<SettingsRecord> {
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_owned()))?;
        tracing::info!(name = %profile.name, "activating profile");
        Ok(SettingsRecord {
            active_profile_name: Some(profile.name.clone()),
            ..profile.settings.clone()
        })
    }

    /// In-memory profile collection.
    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    /// Backing store.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Consume the service, returning the backing store.
    pub fn into_inner(self) -> S {
        self.kv
    }

    fn mutate(
        &mut self,
        op: impl FnOnce(&mut ProfileStore) -> Result<(), ProfileError>,
    ) -> ColorLensResult<()> {
        let mut next = self.profiles.clone();
        op(&mut next)?;
        save_profiles(&mut self.kv, &next)?;
        self.profiles = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/profiles/service.rs"]
mod tests;
