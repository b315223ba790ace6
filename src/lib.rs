//! ColorLens turns color-vision settings into CSS filter pipelines and SVG color-matrix
//! primitives, and keeps those settings and named profiles persisted across schema changes.
//!
//! # Pipeline overview
//!
//! 1. **Normalize**: `SettingsDraft -> SettingsRecord` (defaults merged, values clamped)
//! 2. **Compose**: `SettingsRecord -> ComposedFilter` (ordered stages plus required primitives)
//! 3. **Reconcile**: `ComposedFilter -> DocumentLike` (idempotent primitive injection and the
//!    root `filter` assignment)
//! 4. **Persist** (optional): settings and profiles through a `KeyValueStore`, versioned and
//!    upgradable from every earlier layout
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: normalization and composition are pure; equal input gives equal output.
//! - **Single-threaded per document**: a [`DocumentSession`] serializes reconciliation and
//!   applies only the latest submitted settings.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod color;
mod document;
mod engine;
mod filters;
mod foundation;
mod profiles;
mod settings;
mod storage;

pub use color::matrix::{ALPHA_ROW, ColorMatrix};
pub use document::dom::{DocumentLike, MemoryDocument, SVG_NS};
pub use document::inject::{CONTAINER_ID, PrimitiveInjector, ReconcileReport};
pub use engine::message::{Action, ApplyOutcome, Status};
pub use engine::session::{DocumentSession, EngineOpts, FlushReport};
pub use filters::catalog::{CatalogEntry, FilterCatalog, FilterId, FilterKind};
pub use filters::compose::{
    CUSTOM_PRIMITIVE_ID, ComposedFilter, NIGHT_VISION_STAGES, PrimitiveSpec, compose, compose_with,
};
pub use filters::pipeline::{FilterPipeline, PipelineStage, parse_css_filter};
pub use foundation::core::HexColor;
pub use foundation::error::{ColorLensError, ColorLensResult, ProfileError};
pub use profiles::service::ProfileService;
pub use profiles::store::{MAX_NAME_CHARS, MAX_PROFILES, Profile, ProfileStore, ProfileSummary};
pub use settings::normalize::{
    VISUAL_MAX, canonicalize, clamp_contrast, clamp_saturation, defaults, normalize_draft,
    parse_custom_colors, to_functional, to_visual,
};
pub use settings::record::{
    CONTRAST_MAX, CONTRAST_MIN, CustomColors, NEUTRAL_PERCENT, RawCustomColors, SATURATION_MAX,
    SATURATION_MIN, SettingsDraft, SettingsRecord,
};
pub use settings::schema::{
    SCHEMA_VERSION, StoredSettings, UpgradeReport, upgrade_profile, upgrade_settings,
};
pub use storage::kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use storage::persist::{
    PROFILES_KEY, SETTINGS_KEY, load_profiles, load_settings, save_profiles, save_settings,
};
