use serde::{Deserialize, Serialize};

use crate::{filters::catalog::FilterId, foundation::core::HexColor};

/// Lower bound of the functional contrast domain.
pub const CONTRAST_MIN: f64 = 50.0;
/// Upper bound of the functional contrast domain.
pub const CONTRAST_MAX: f64 = 200.0;
/// Lower bound of the saturation domain.
pub const SATURATION_MIN: f64 = 0.0;
/// Upper bound of the saturation domain.
pub const SATURATION_MAX: f64 = 200.0;
/// Neutral value for contrast and saturation.
pub const NEUTRAL_PERCENT: f64 = 100.0;

/// Three-color linear remap targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomColors {
    /// Target for the source red channel.
    pub background: HexColor,
    /// Target for the source green channel.
    pub text: HexColor,
    /// Target for the source blue channel.
    pub highlight: HexColor,
}

impl Default for CustomColors {
    fn default() -> Self {
        Self {
            background: HexColor::RED,
            text: HexColor::GREEN,
            highlight: HexColor::BLUE,
        }
    }
}

/// Canonical settings, always in functional scale.
///
/// Value type: consumers receive copies, never shared references into a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    /// Selected catalog filter.
    pub filter_id: FilterId,
    /// Functional contrast percentage in `[50, 200]`; 100 is unmodified.
    pub contrast: f64,
    /// Saturation percentage in `[0, 200]`; 100 is unmodified.
    pub saturation: f64,
    /// Fixed tone shift toggle.
    pub night_vision: bool,
    /// Custom remap; `None` means no remapping.
    pub custom_colors: Option<CustomColors>,
    /// Profile this record was derived from, if any.
    pub active_profile_name: Option<String>,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            filter_id: FilterId::None,
            contrast: NEUTRAL_PERCENT,
            saturation: NEUTRAL_PERCENT,
            night_vision: false,
            custom_colors: None,
            active_profile_name: None,
        }
    }
}

/// Raw custom-color payload as sent by the UI: `{background, text, highlight}` hex strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCustomColors {
    /// Background target.
    #[serde(default)]
    pub background: Option<String>,
    /// Text target.
    #[serde(default)]
    pub text: Option<String>,
    /// Highlight target.
    #[serde(default)]
    pub highlight: Option<String>,
}

/// Tolerant, all-optional settings payload received at the `applySettings` boundary.
///
/// Numbers may arrive as JSON numbers or numeric strings; absent fields fall back to
/// defaults during normalization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDraft {
    /// Catalog id, display name or legacy alias.
    #[serde(default, alias = "filter")]
    pub filter_id: Option<String>,
    /// Functional contrast.
    #[serde(default, deserialize_with = "de_loose_f64")]
    pub contrast: Option<f64>,
    /// Saturation.
    #[serde(default, deserialize_with = "de_loose_f64")]
    pub saturation: Option<f64>,
    /// Night-vision toggle.
    #[serde(default, deserialize_with = "de_loose_bool")]
    pub night_vision: Option<bool>,
    /// Custom remap colors.
    #[serde(default)]
    pub custom_colors: Option<RawCustomColors>,
    /// Active profile name.
    #[serde(default)]
    pub active_profile_name: Option<String>,
}

impl From<&SettingsRecord> for SettingsDraft {
    fn from(r: &SettingsRecord) -> Self {
        Self {
            filter_id: Some(r.filter_id.as_str().to_owned()),
            contrast: Some(r.contrast),
            saturation: Some(r.saturation),
            night_vision: Some(r.night_vision),
            custom_colors: r.custom_colors.map(|c| RawCustomColors {
                background: Some(c.background.to_string()),
                text: Some(c.text.to_string()),
                highlight: Some(c.highlight.to_string()),
            }),
            active_profile_name: r.active_profile_name.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Num(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseBool {
    Bool(bool),
    Text(String),
    Num(f64),
}

/// Accept a number, a numeric string, or null; unparseable text becomes `None`.
pub(crate) fn de_loose_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<LooseNumber>::deserialize(deserializer)? {
        Some(LooseNumber::Num(n)) => Some(n),
        Some(LooseNumber::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}

pub(crate) fn de_loose_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<LooseBool>::deserialize(deserializer)? {
        Some(LooseBool::Bool(b)) => Some(b),
        Some(LooseBool::Text(s)) => match s.trim() {
            "true" | "on" | "1" => Some(true),
            "false" | "off" | "0" | "" => Some(false),
            _ => None,
        },
        Some(LooseBool::Num(n)) => Some(n != 0.0),
        None => None,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/settings/record.rs"]
mod tests;
