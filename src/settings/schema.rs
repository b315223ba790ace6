//! Versioned persisted shapes and upgrades from every known prior layout.
//!
//! Layouts seen in the wild:
//!
//! - **v0** (no `schemaVersion`): flat object, `filter` holds a catalog display name, numbers
//!   may be strings, `readingMode` may be present.
//! - **v1** (no `schemaVersion`): like v0 but keyed by `filterId`.
//! - **v2**: `{schemaVersion: 2, settings: SettingsRecord}`.
//!
//! Upgrades never drop a field silently: anything that does not survive is listed in the
//! returned [`UpgradeReport`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    foundation::error::{ColorLensError, ColorLensResult},
    profiles::store::Profile,
    settings::{
        normalize::normalize_draft,
        record::{RawCustomColors, SettingsDraft, SettingsRecord, de_loose_bool, de_loose_f64},
    },
};

/// Current settings schema version.
pub const SCHEMA_VERSION: u32 = 2;

const V0_FIELDS: &[&str] = &[
    "filter",
    "contrast",
    "saturation",
    "nightVision",
    "customColors",
    "activeProfileName",
];
const V1_FIELDS: &[&str] = &[
    "filterId",
    "contrast",
    "saturation",
    "nightVision",
    "customColors",
    "activeProfileName",
];

/// Persisted settings envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    /// Layout version of `settings`.
    pub schema_version: u32,
    /// Canonical record.
    pub settings: SettingsRecord,
}

impl StoredSettings {
    /// Wrap `record` at the current schema version.
    pub fn current(record: SettingsRecord) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            settings: record,
        }
    }
}

/// What an upgrade did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpgradeReport {
    /// Detected source layout version.
    pub from_version: u32,
    /// Top-level fields that had no place in the current layout.
    pub discarded_fields: Vec<String>,
}

impl UpgradeReport {
    /// Whether the input was already current and lossless.
    pub fn is_current(&self) -> bool {
        self.from_version == SCHEMA_VERSION && self.discarded_fields.is_empty()
    }
}

/// Detect the layout of a persisted settings value and convert it to a canonical record.
///
/// An empty object is a v0 layout with every field absent and yields defaults. Versions
/// newer than [`SCHEMA_VERSION`] are rejected rather than guessed at.
pub fn upgrade_settings(value: &Value) -> ColorLensResult<(SettingsRecord, UpgradeReport)> {
    let Value::Object(obj) = value else {
        return Err(ColorLensError::validation(format!(
            "settings must be a JSON object, got {}",
            kind_of(value)
        )));
    };

    let version = match obj.get("schemaVersion") {
        Some(v) => v
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| ColorLensError::validation(format!("invalid schemaVersion {v}")))?,
        None if obj.contains_key("filterId") => 1,
        None => 0,
    };

    let (record, discarded_fields) = match version {
        0 => upgrade_flat(obj, V0_FIELDS)?,
        1 => upgrade_flat(obj, V1_FIELDS)?,
        SCHEMA_VERSION => {
            let settings = obj
                .get("settings")
                .cloned()
                .ok_or_else(|| ColorLensError::validation("v2 settings envelope lacks `settings`"))?;
            let (record, mut discarded) = read_current(settings)?;
            discarded.extend(
                obj.keys()
                    .filter(|k| !matches!(k.as_str(), "schemaVersion" | "settings"))
                    .cloned(),
            );
            (record, discarded)
        }
        other => {
            return Err(ColorLensError::validation(format!(
                "unsupported settings schema version {other} (newest known is {SCHEMA_VERSION})"
            )));
        }
    };

    let report = UpgradeReport {
        from_version: version,
        discarded_fields,
    };
    if version != SCHEMA_VERSION {
        tracing::info!(
            from = version,
            to = SCHEMA_VERSION,
            discarded = ?report.discarded_fields,
            "upgraded persisted settings"
        );
    } else if !report.discarded_fields.is_empty() {
        tracing::info!(discarded = ?report.discarded_fields, "discarded unknown settings fields");
    }
    Ok((record, report))
}

fn upgrade_flat(
    obj: &Map<String, Value>,
    known: &[&str],
) -> ColorLensResult<(SettingsRecord, Vec<String>)> {
    let mut kept = Map::new();
    let mut discarded = Vec::new();
    for (k, v) in obj {
        if known.contains(&k.as_str()) {
            kept.insert(k.clone(), v.clone());
        } else {
            discarded.push(k.clone());
        }
    }
    let draft: SettingsDraft = serde_json::from_value(Value::Object(kept))?;
    Ok((normalize_draft(&draft), discarded))
}

/// Read a current-layout `settings` object through the tolerant draft path.
///
/// Custom colors that are partial or malformed are demoted to "no custom mapping" and reported
/// as `settings.customColors`; every other field is kept.
fn read_current(settings: Value) -> ColorLensResult<(SettingsRecord, Vec<String>)> {
    let draft: SettingsDraft = serde_json::from_value(settings)?;
    let record = normalize_draft(&draft);
    let mut demoted = Vec::new();
    if draft.custom_colors.is_some() && record.custom_colors.is_none() {
        demoted.push("settings.customColors".to_owned());
    }
    Ok((record, demoted))
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentProfile {
    name: String,
    settings: Value,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyProfile {
    name: String,
    #[serde(default)]
    base_filter: Option<String>,
    #[serde(default, deserialize_with = "de_loose_f64")]
    contrast: Option<f64>,
    #[serde(default, deserialize_with = "de_loose_f64")]
    saturation: Option<f64>,
    #[serde(default, deserialize_with = "de_loose_bool")]
    night_vision: Option<bool>,
    #[serde(default)]
    color_map: Option<LegacyColorMap>,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct LegacyColorMap {
    #[serde(default)]
    red: Option<String>,
    #[serde(default)]
    green: Option<String>,
    #[serde(default)]
    blue: Option<String>,
    #[serde(default, deserialize_with = "de_loose_bool")]
    enabled: Option<bool>,
}

/// Convert one persisted profile, current or legacy, into a [`Profile`].
///
/// The legacy layout is `{name, baseFilter, contrast, saturation, colorMap, savedAt}`. Its
/// `colorMap` becomes custom colors only when `enabled` is set and all three colors are
/// valid. A missing `savedAt` becomes the Unix epoch. Current-layout profiles read their
/// settings as tolerantly as [`upgrade_settings`] does.
pub fn upgrade_profile(value: &Value) -> ColorLensResult<Profile> {
    if value.get("settings").is_some() {
        let current: CurrentProfile = serde_json::from_value(value.clone())?;
        let (settings, demoted) = read_current(current.settings)?;
        if !demoted.is_empty() {
            tracing::warn!(name = %current.name, ?demoted, "profile custom colors dropped");
        }
        return Ok(Profile {
            name: current.name,
            settings,
            saved_at: current.saved_at.unwrap_or_default(),
        });
    }

    let legacy: LegacyProfile = serde_json::from_value(value.clone())?;
    let custom_colors = legacy
        .color_map
        .filter(|m| m.enabled.unwrap_or(false))
        .map(|m| RawCustomColors {
            background: m.red,
            text: m.green,
            highlight: m.blue,
        });
    let draft = SettingsDraft {
        filter_id: legacy.base_filter,
        contrast: legacy.contrast,
        saturation: legacy.saturation,
        night_vision: legacy.night_vision,
        custom_colors,
        active_profile_name: None,
    };
    tracing::info!(name = %legacy.name, "upgraded legacy profile");
    Ok(Profile {
        name: legacy.name,
        settings: normalize_draft(&draft),
        saved_at: legacy.saved_at.unwrap_or_default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/settings/schema.rs"]
mod tests;
