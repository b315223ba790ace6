use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, Event},
};

use crate::{
    color::matrix::ColorMatrix,
    filters::compose::PrimitiveSpec,
    foundation::error::{ColorLensError, ColorLensResult},
};

/// SVG namespace used by the primitive container.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// The document operations the engine needs; implemented by hosts over a real DOM.
///
/// Each document owns its own container; nothing is shared across documents.
pub trait DocumentLike {
    /// Whether the document can accept new nodes.
    fn is_ready(&self) -> bool;

    /// Whether an element with `id` exists anywhere in the document.
    fn has_element(&self, id: &str) -> bool;

    /// Create the hidden, namespaced primitive container with `container_id`.
    ///
    /// Fails with [`ColorLensError::AttachmentFailed`] when the document cannot host it yet.
    fn attach_container(&mut self, container_id: &str) -> ColorLensResult<()>;

    /// Append a `<filter>` primitive under the container.
    fn insert_primitive(
        &mut self,
        container_id: &str,
        primitive: &PrimitiveSpec,
    ) -> ColorLensResult<()>;

    /// Matrix of the primitive with `id`, if present.
    fn primitive_matrix(&self, id: &str) -> Option<ColorMatrix>;

    /// Remove the element with `id`; returns whether anything was removed.
    fn remove_element(&mut self, id: &str) -> bool;

    /// Assign the CSS `filter` property of the document root.
    fn set_root_filter(&mut self, css: &str);
}

#[derive(Clone, Debug, PartialEq)]
struct FilterNode {
    id: String,
    matrix: ColorMatrix,
}

#[derive(Clone, Debug, PartialEq)]
struct ContainerNode {
    id: String,
    filters: Vec<FilterNode>,
}

/// In-memory [`DocumentLike`] used by the CLI and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryDocument {
    ready: bool,
    root_filter: String,
    container: Option<ContainerNode>,
    mutations: u64,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// A ready, empty document.
    pub fn new() -> Self {
        Self {
            ready: true,
            root_filter: String::new(),
            container: None,
            mutations: 0,
        }
    }

    /// A document that is still loading; attachment fails until [`MemoryDocument::mark_ready`].
    pub fn loading() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    /// Finish loading.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// Current root `filter` value.
    pub fn root_filter(&self) -> &str {
        &self.root_filter
    }

    /// Number of engine-owned nodes (container + `<defs>` + one `<filter>` per primitive).
    pub fn node_count(&self) -> usize {
        self.container.as_ref().map_or(0, |c| 2 + c.filters.len())
    }

    /// Primitive ids in document order.
    pub fn primitive_ids(&self) -> Vec<&str> {
        self.container
            .as_ref()
            .map(|c| c.filters.iter().map(|f| f.id.as_str()).collect())
            .unwrap_or_default()
    }

    /// Count of DOM writes performed so far (inserts, removals, root filter changes).
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    /// Serialize the container as SVG markup; empty when no container exists.
    pub fn container_markup(&self) -> ColorLensResult<String> {
        let Some(c) = &self.container else {
            return Ok(String::new());
        };
        let mut xml = Writer::new(Vec::new());

        let svg = BytesStart::new("svg").with_attributes([
            ("xmlns", SVG_NS),
            ("id", c.id.as_str()),
            ("width", "1"),
            ("height", "1"),
            ("style", "display:none"),
        ]);
        xml.write_event(Event::Start(svg)).map_err(markup_error)?;
        xml.write_event(Event::Start(BytesStart::new("defs")))
            .map_err(markup_error)?;

        for f in &c.filters {
            let values = f.matrix.to_values_attr();
            let filter = BytesStart::new("filter").with_attributes([
                ("id", f.id.as_str()),
                ("color-interpolation-filters", "sRGB"),
            ]);
            let matrix = BytesStart::new("feColorMatrix").with_attributes([
                ("in", "SourceGraphic"),
                ("type", "matrix"),
                ("values", values.as_str()),
            ]);
            xml.write_event(Event::Start(filter)).map_err(markup_error)?;
            xml.write_event(Event::Empty(matrix)).map_err(markup_error)?;
            xml.write_event(Event::End(BytesEnd::new("filter")))
                .map_err(markup_error)?;
        }

        xml.write_event(Event::End(BytesEnd::new("defs")))
            .map_err(markup_error)?;
        xml.write_event(Event::End(BytesEnd::new("svg")))
            .map_err(markup_error)?;
        String::from_utf8(xml.into_inner()).map_err(markup_error)
    }
}

impl DocumentLike for MemoryDocument {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn has_element(&self, id: &str) -> bool {
        match &self.container {
            Some(c) => c.id == id || c.filters.iter().any(|f| f.id == id),
            None => false,
        }
    }

    fn attach_container(&mut self, container_id: &str) -> ColorLensResult<()> {
        if !self.ready {
            return Err(ColorLensError::attachment("document is not ready"));
        }
        if self.container.is_some() {
            return Err(ColorLensError::attachment(
                "a primitive container is already attached",
            ));
        }
        self.container = Some(ContainerNode {
            id: container_id.to_owned(),
            filters: Vec::new(),
        });
        self.mutations += 1;
        Ok(())
    }

    fn insert_primitive(
        &mut self,
        container_id: &str,
        primitive: &PrimitiveSpec,
    ) -> ColorLensResult<()> {
        let c = self
            .container
            .as_mut()
            .filter(|c| c.id == container_id)
            .ok_or_else(|| {
                ColorLensError::attachment(format!("container '{container_id}' is not attached"))
            })?;
        c.filters.push(FilterNode {
            id: primitive.id.clone(),
            matrix: primitive.matrix,
        });
        self.mutations += 1;
        Ok(())
    }

    fn primitive_matrix(&self, id: &str) -> Option<ColorMatrix> {
        self.container
            .as_ref()?
            .filters
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.matrix)
    }

    fn remove_element(&mut self, id: &str) -> bool {
        let Some(c) = &mut self.container else {
            return false;
        };
        if c.id == id {
            self.container = None;
            self.mutations += 1;
            return true;
        }
        let before = c.filters.len();
        c.filters.retain(|f| f.id != id);
        let removed = c.filters.len() != before;
        if removed {
            self.mutations += 1;
        }
        removed
    }

    fn set_root_filter(&mut self, css: &str) {
        if self.root_filter != css {
            self.root_filter = css.to_owned();
            self.mutations += 1;
        }
    }
}

fn markup_error(err: impl std::fmt::Display) -> ColorLensError {
    ColorLensError::serde(format!("svg markup: {err}"))
}

#[cfg(test)]
#[path = "../../tests/unit/document/dom.rs"]
mod tests;
