//! Visual/functional contrast scales and draft-to-record normalization.
//!
//! The slider shows contrast on a 0..200 "visual" scale whose lower half is compressed onto
//! functional 50..100; above 100 both scales coincide. Only functional values are ever
//! persisted or fed into filters.

use crate::{
    filters::catalog::{FilterCatalog, FilterId},
    foundation::{core::HexColor, error::ColorLensResult, math::clamp_finite},
    settings::record::{
        CONTRAST_MAX, CONTRAST_MIN, CustomColors, NEUTRAL_PERCENT, RawCustomColors,
        SATURATION_MAX, SATURATION_MIN, SettingsDraft, SettingsRecord,
    },
};

/// Upper bound of the visual slider scale.
pub const VISUAL_MAX: f64 = 200.0;

/// Map a visual slider value (`0..=200`) to functional contrast (`50..=200`).
pub fn to_functional(visual: f64) -> f64 {
    let v = clamp_finite(visual, 0.0, VISUAL_MAX, NEUTRAL_PERCENT);
    if v <= NEUTRAL_PERCENT {
        CONTRAST_MIN + (v / NEUTRAL_PERCENT) * (NEUTRAL_PERCENT - CONTRAST_MIN)
    } else {
        v
    }
}

/// Inverse of [`to_functional`].
pub fn to_visual(functional: f64) -> f64 {
    let f = clamp_finite(functional, CONTRAST_MIN, CONTRAST_MAX, NEUTRAL_PERCENT);
    if f <= NEUTRAL_PERCENT {
        (f - CONTRAST_MIN) / (NEUTRAL_PERCENT - CONTRAST_MIN) * NEUTRAL_PERCENT
    } else {
        f
    }
}

/// Canonical defaults: no filter, neutral adjustments, no remap, no profile.
pub fn defaults() -> SettingsRecord {
    SettingsRecord::default()
}

/// Clamp a contrast value into the functional domain (non-finite becomes neutral).
pub fn clamp_contrast(v: f64) -> f64 {
    clamp_finite(v, CONTRAST_MIN, CONTRAST_MAX, NEUTRAL_PERCENT)
}

/// Clamp a saturation value into its domain (non-finite becomes neutral).
pub fn clamp_saturation(v: f64) -> f64 {
    clamp_finite(v, SATURATION_MIN, SATURATION_MAX, NEUTRAL_PERCENT)
}

/// Parse a raw custom-color payload with all-or-nothing semantics.
///
/// Returns `Ok(None)` when any field is missing, and the first parse error when any field is
/// present but malformed.
pub fn parse_custom_colors(raw: &RawCustomColors) -> ColorLensResult<Option<CustomColors>> {
    let (Some(bg), Some(text), Some(hl)) = (&raw.background, &raw.text, &raw.highlight) else {
        return Ok(None);
    };
    Ok(Some(CustomColors {
        background: HexColor::parse(bg)?,
        text: HexColor::parse(text)?,
        highlight: HexColor::parse(hl)?,
    }))
}

/// Bring an arbitrary record back into canonical domains.
pub fn canonicalize(mut record: SettingsRecord) -> SettingsRecord {
    record.contrast = clamp_contrast(record.contrast);
    record.saturation = clamp_saturation(record.saturation);
    record.active_profile_name = record
        .active_profile_name
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty());
    record
}

/// Merge a draft over [`defaults`]: present fields override, absent fields fall back.
///
/// Never fails: unknown filters become `none`, out-of-range numbers are clamped, and invalid
/// custom colors are treated as "no custom mapping".
pub fn normalize_draft(draft: &SettingsDraft) -> SettingsRecord {
    let base = defaults();

    let filter_id = match draft.filter_id.as_deref() {
        None => base.filter_id,
        Some(name) => match FilterCatalog::global().lookup(name) {
            Some(entry) => entry.filter,
            None => {
                tracing::warn!(filter = name, "unknown filter; falling back to none");
                FilterId::None
            }
        },
    };

    let custom_colors = match &draft.custom_colors {
        None => None,
        Some(raw) => match parse_custom_colors(raw) {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(%err, "invalid custom colors; treating as no custom mapping");
                None
            }
        },
    };

    canonicalize(SettingsRecord {
        filter_id,
        contrast: draft.contrast.unwrap_or(base.contrast),
        saturation: draft.saturation.unwrap_or(base.saturation),
        night_vision: draft.night_vision.unwrap_or(base.night_vision),
        custom_colors,
        active_profile_name: draft.active_profile_name.clone(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/settings/normalize.rs"]
mod tests;
