use std::{fmt, str::FromStr};

use crate::{color::matrix::ColorMatrix, foundation::error::ColorLensError};

/// Deficiency filter selected by a settings record.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FilterId {
    /// No simulation.
    #[default]
    None,
    /// Red-blind.
    Protanopia,
    /// Green-blind.
    Deuteranopia,
    /// Blue-blind.
    Tritanopia,
    /// Red-weak.
    Protanomaly,
    /// Green-weak.
    Deuteranomaly,
    /// Blue-weak.
    Tritanomaly,
    /// Total color blindness (grayscale).
    Achromatopsia,
}

impl FilterId {
    /// Every filter id, in catalog order.
    pub const ALL: [Self; 8] = [
        Self::None,
        Self::Protanopia,
        Self::Deuteranopia,
        Self::Tritanopia,
        Self::Protanomaly,
        Self::Deuteranomaly,
        Self::Tritanomaly,
        Self::Achromatopsia,
    ];

    /// Stable catalog id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Protanopia => "protanopia",
            Self::Deuteranopia => "deuteranopia",
            Self::Tritanopia => "tritanopia",
            Self::Protanomaly => "protanomaly",
            Self::Deuteranomaly => "deuteranomaly",
            Self::Tritanomaly => "tritanomaly",
            Self::Achromatopsia => "achromatopsia",
        }
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterId {
    type Err = ColorLensError;

    /// Accepts catalog ids, display names and legacy aliases, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterCatalog::global()
            .lookup(s)
            .map(|e| e.filter)
            .ok_or_else(|| ColorLensError::validation(format!("unknown filter '{s}'")))
    }
}

/// How a catalog entry contributes to the filter pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterKind {
    /// Backed by an SVG color-matrix primitive referenced as `url(#id)`.
    Matrix(ColorMatrix),
    /// A literal CSS filter function list; empty means "contributes nothing".
    CssValue(&'static str),
}

/// One immutable catalog filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatalogEntry {
    /// Stable id; also the primitive element id for matrix entries.
    pub id: &'static str,
    /// Human-facing name.
    pub display_name: &'static str,
    /// Legacy names accepted by lookups.
    pub aliases: &'static [&'static str],
    /// Settings-level filter this entry belongs to.
    pub filter: FilterId,
    /// Payload.
    pub kind: FilterKind,
}

impl CatalogEntry {
    /// The matrix payload, for matrix-backed entries.
    pub fn matrix(&self) -> Option<&ColorMatrix> {
        match &self.kind {
            FilterKind::Matrix(m) => Some(m),
            FilterKind::CssValue(_) => None,
        }
    }

    fn matches(&self, name: &str) -> bool {
        self.id.eq_ignore_ascii_case(name)
            || self.display_name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

const GRAYSCALE: &str = "grayscale(100%)";

static ENTRIES: [CatalogEntry; 9] = [
    CatalogEntry {
        id: "protanopia",
        display_name: "Protanopia",
        aliases: &[],
        filter: FilterId::Protanopia,
        kind: FilterKind::Matrix(ColorMatrix::from_rgb_rows([
            [0.567, 0.433, 0.0, 0.0, 0.0],
            [0.558, 0.442, 0.0, 0.0, 0.0],
            [0.0, 0.242, 0.758, 0.0, 0.0],
        ])),
    },
    CatalogEntry {
        id: "deuteranopia",
        display_name: "Deuteranopia",
        aliases: &[],
        filter: FilterId::Deuteranopia,
        kind: FilterKind::Matrix(ColorMatrix::from_rgb_rows([
            [0.625, 0.375, 0.0, 0.0, 0.0],
            [0.7, 0.3, 0.0, 0.0, 0.0],
            [0.0, 0.3, 0.7, 0.0, 0.0],
        ])),
    },
    CatalogEntry {
        id: "tritanopia",
        display_name: "Tritanopia",
        aliases: &[],
        filter: FilterId::Tritanopia,
        kind: FilterKind::Matrix(ColorMatrix::from_rgb_rows([
            [0.95, 0.05, 0.0, 0.0, 0.0],
            [0.0, 0.433, 0.567, 0.0, 0.0],
            [0.0, 0.475, 0.525, 0.0, 0.0],
        ])),
    },
    CatalogEntry {
        id: "protanomaly",
        display_name: "Protanomaly",
        aliases: &["Protanomalia"],
        filter: FilterId::Protanomaly,
        kind: FilterKind::Matrix(ColorMatrix::from_rgb_rows([
            [0.817, 0.183, 0.0, 0.0, 0.0],
            [0.333, 0.667, 0.0, 0.0, 0.0],
            [0.0, 0.125, 0.875, 0.0, 0.0],
        ])),
    },
    CatalogEntry {
        id: "deuteranomaly",
        display_name: "Deuteranomaly",
        aliases: &["Deuteranomalia"],
        filter: FilterId::Deuteranomaly,
        kind: FilterKind::Matrix(ColorMatrix::from_rgb_rows([
            [0.8, 0.2, 0.0, 0.0, 0.0],
            [0.258, 0.742, 0.0, 0.0, 0.0],
            [0.0, 0.142, 0.858, 0.0, 0.0],
        ])),
    },
    CatalogEntry {
        id: "tritanomaly",
        display_name: "Tritanomaly",
        aliases: &["Tritanomalia"],
        filter: FilterId::Tritanomaly,
        kind: FilterKind::Matrix(ColorMatrix::from_rgb_rows([
            [0.967, 0.033, 0.0, 0.0, 0.0],
            [0.0, 0.733, 0.267, 0.0, 0.0],
            [0.0, 0.183, 0.817, 0.0, 0.0],
        ])),
    },
    CatalogEntry {
        id: "achromatopsia",
        display_name: "Achromatopsia",
        aliases: &[],
        filter: FilterId::Achromatopsia,
        kind: FilterKind::CssValue(GRAYSCALE),
    },
    CatalogEntry {
        id: "monochromacy",
        display_name: "Monochromacy",
        aliases: &["Monocromia"],
        filter: FilterId::Achromatopsia,
        kind: FilterKind::CssValue(GRAYSCALE),
    },
    CatalogEntry {
        id: "none",
        display_name: "None",
        aliases: &[""],
        filter: FilterId::None,
        kind: FilterKind::CssValue(""),
    },
];

static CATALOG: FilterCatalog = FilterCatalog { entries: &ENTRIES };

/// Immutable registry of simulation filters, indexed by stable string id.
#[derive(Debug)]
pub struct FilterCatalog {
    entries: &'static [CatalogEntry],
}

impl FilterCatalog {
    /// The process-wide catalog.
    pub fn global() -> &'static Self {
        &CATALOG
    }

    /// All entries, in catalog order.
    pub fn entries(&self) -> &'static [CatalogEntry] {
        self.entries
    }

    /// Exact lookup by stable id.
    pub fn get(&self, id: &str) -> Option<&'static CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The canonical entry for a settings-level filter.
    pub fn entry(&self, filter: FilterId) -> &'static CatalogEntry {
        // Every FilterId has an entry whose id equals `as_str()`.
        self.get(filter.as_str()).unwrap_or(&ENTRIES[ENTRIES.len() - 1])
    }

    /// Case-insensitive lookup by id, display name or legacy alias.
    pub fn lookup(&self, name: &str) -> Option<&'static CatalogEntry> {
        let name = name.trim();
        self.entries.iter().find(|e| e.matches(name))
    }

    /// Entries backed by a color matrix.
    pub fn matrix_entries(&self) -> impl Iterator<Item = &'static CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.kind, FilterKind::Matrix(_)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/catalog.rs"]
mod tests;
