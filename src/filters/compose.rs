use crate::{
    color::matrix::ColorMatrix,
    filters::{
        catalog::{FilterCatalog, FilterKind},
        pipeline::{FilterPipeline, PipelineStage, parse_css_filter},
    },
    foundation::math::{Fnv1a64, fmt_number},
    settings::record::{NEUTRAL_PERCENT, SettingsRecord},
};

/// Reserved element id of the user's custom-mapping primitive.
pub const CUSTOM_PRIMITIVE_ID: &str = "colorlens-custom-mapping";

/// Night-vision stages: dim and warm the already-adjusted page.
pub const NIGHT_VISION_STAGES: [(&str, &str); 2] = [("brightness", "80%"), ("sepia", "20%")];

/// A color-matrix primitive that must exist in the document.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimitiveSpec {
    /// Element id, referenced from the pipeline as `url(#id)`.
    pub id: String,
    /// Matrix coefficients.
    pub matrix: ColorMatrix,
    /// Whether the primitive's values change with user edits.
    pub custom: bool,
}

/// Output of [`compose`]: the pipeline plus the primitives it references.
#[derive(Clone, Debug, PartialEq)]
pub struct ComposedFilter {
    /// Typed stages in application order.
    pub pipeline: FilterPipeline,
    /// Rendered CSS `filter` value (empty when every stage is a no-op).
    pub css_filter: String,
    /// Custom-mapping primitive, when custom colors are set.
    pub requires_primitive: Option<PrimitiveSpec>,
    /// Catalog primitive for the selected filter, when it is matrix-backed.
    pub catalog_primitive: Option<PrimitiveSpec>,
}

impl ComposedFilter {
    /// Every primitive referenced by the pipeline, custom first.
    pub fn primitives(&self) -> Vec<PrimitiveSpec> {
        self.requires_primitive
            .iter()
            .chain(self.catalog_primitive.iter())
            .cloned()
            .collect()
    }

    /// Stable hash over the pipeline and referenced matrices.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        self.pipeline.hash_into(&mut h);
        for p in self.primitives() {
            h.write_str(&p.id);
            for v in p.matrix.to_array() {
                h.write_u64(v.to_bits());
            }
        }
        h.finish()
    }
}

/// Compose `record` into a filter pipeline using the default custom primitive id.
pub fn compose(record: &SettingsRecord) -> ComposedFilter {
    compose_with(record, CUSTOM_PRIMITIVE_ID)
}

/// Compose `record` into a filter pipeline.
///
/// Stage order is fixed: custom mapping, deficiency simulation, contrast, saturation, night
/// vision. No-op stages are omitted.
pub fn compose_with(record: &SettingsRecord, custom_primitive_id: &str) -> ComposedFilter {
    let mut pipeline = FilterPipeline::new();

    let requires_primitive = record.custom_colors.map(|c| PrimitiveSpec {
        id: custom_primitive_id.to_owned(),
        matrix: ColorMatrix::custom_mapping(c.background, c.text, c.highlight),
        custom: true,
    });
    if let Some(p) = &requires_primitive {
        pipeline.push(PipelineStage::primitive(&p.id));
    }

    let entry = FilterCatalog::global().entry(record.filter_id);
    let mut catalog_primitive = None;
    match entry.kind {
        FilterKind::Matrix(matrix) => {
            pipeline.push(PipelineStage::primitive(entry.id));
            catalog_primitive = Some(PrimitiveSpec {
                id: entry.id.to_owned(),
                matrix,
                custom: false,
            });
        }
        // Catalog literals are authored in-crate and always parse.
        FilterKind::CssValue(css) => match parse_css_filter(css) {
            Ok(stages) => pipeline.extend(stages),
            Err(err) => tracing::warn!(%err, id = entry.id, "skipping unparseable catalog value"),
        },
    }

    // Neutrality is judged on the rendered value.
    let neutral = fmt_number(NEUTRAL_PERCENT);
    for (name, value) in [("contrast", record.contrast), ("saturate", record.saturation)] {
        let rendered = fmt_number(value);
        if rendered != neutral {
            pipeline.push(PipelineStage::css(name, format!("{rendered}%")));
        }
    }
    if record.night_vision {
        for (name, args) in NIGHT_VISION_STAGES {
            pipeline.push(PipelineStage::css(name, args));
        }
    }

    let css_filter = pipeline.render();
    ComposedFilter {
        pipeline,
        css_filter,
        requires_primitive,
        catalog_primitive,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/compose.rs"]
mod tests;
