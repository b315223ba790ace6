use std::fmt;

use crate::foundation::{
    error::{ColorLensError, ColorLensResult},
    math::Fnv1a64,
};

/// One stage of a CSS `filter` pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PipelineStage {
    /// Reference to an SVG filter primitive in the document: `url(#id)`.
    Primitive {
        /// Element id of the primitive.
        id: String,
    },
    /// A CSS filter function: `name(args)`.
    CssFunction {
        /// Function name, e.g. `contrast`.
        name: String,
        /// Raw argument text, e.g. `120%`.
        args: String,
    },
}

impl PipelineStage {
    /// Build a [`PipelineStage::Primitive`] stage.
    pub fn primitive(id: impl Into<String>) -> Self {
        Self::Primitive { id: id.into() }
    }

    /// Build a [`PipelineStage::CssFunction`] stage.
    pub fn css(name: impl Into<String>, args: impl Into<String>) -> Self {
        Self::CssFunction {
            name: name.into(),
            args: args.into(),
        }
    }

    /// The referenced primitive id, for primitive stages.
    pub fn primitive_id(&self) -> Option<&str> {
        match self {
            Self::Primitive { id } => Some(id),
            Self::CssFunction { .. } => None,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { id } => write!(f, "url(#{id})"),
            Self::CssFunction { name, args } => write!(f, "{name}({args})"),
        }
    }
}

/// Ordered list of filter stages, rendered to a CSS string only at the final step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FilterPipeline {
    stages: Vec<PipelineStage>,
}

impl FilterPipeline {
    /// Empty pipeline (renders as `""`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn push(&mut self, stage: PipelineStage) {
        self.stages.push(stage);
    }

    /// Append every stage of `other`, in order.
    pub fn extend(&mut self, other: impl IntoIterator<Item = PipelineStage>) {
        self.stages.extend(other);
    }

    /// Borrow the stages in application order.
    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    /// Whether no stage is present.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Copy of this pipeline without any reference to primitive `id`.
    pub fn without_primitive(&self, id: &str) -> Self {
        Self {
            stages: self
                .stages
                .iter()
                .filter(|s| s.primitive_id() != Some(id))
                .cloned()
                .collect(),
        }
    }

    /// Primitive ids referenced by this pipeline, in order.
    pub fn primitive_ids(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().filter_map(PipelineStage::primitive_id)
    }

    /// Render as a CSS `filter` property value.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub(crate) fn hash_into(&self, h: &mut Fnv1a64) {
        h.write_u64(self.stages.len() as u64);
        for s in &self.stages {
            match s {
                PipelineStage::Primitive { id } => {
                    h.write_u8(0);
                    h.write_str(id);
                }
                PipelineStage::CssFunction { name, args } => {
                    h.write_u8(1);
                    h.write_str(name);
                    h.write_str(args);
                }
            }
        }
    }
}

impl fmt::Display for FilterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

impl IntoIterator for FilterPipeline {
    type Item = PipelineStage;
    type IntoIter = std::vec::IntoIter<PipelineStage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.into_iter()
    }
}

/// Parse a literal CSS filter list such as `grayscale(100%) sepia(20%)` into stages.
///
/// `url(#id)` terms become [`PipelineStage::Primitive`]; blank input yields an empty pipeline.
pub fn parse_css_filter(s: &str) -> ColorLensResult<FilterPipeline> {
    let mut out = FilterPipeline::new();
    let mut rest = s.trim();
    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| ColorLensError::validation(format!("expected '(' in filter '{s}'")))?;
        let close = rest[open..]
            .find(')')
            .map(|i| open + i)
            .ok_or_else(|| ColorLensError::validation(format!("unclosed '(' in filter '{s}'")))?;

        let name = rest[..open].trim();
        let args = rest[open + 1..close].trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(ColorLensError::validation(format!(
                "invalid filter function name in '{s}'"
            )));
        }

        if name == "url" {
            let id = args.trim_matches(|c| c == '"' || c == '\'');
            let id = id.strip_prefix('#').unwrap_or(id);
            out.push(PipelineStage::primitive(id));
        } else {
            out.push(PipelineStage::css(name, args));
        }
        rest = rest[close + 1..].trim_start();
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/filters/pipeline.rs"]
mod tests;
