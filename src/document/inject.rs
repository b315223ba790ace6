use crate::{
    document::dom::DocumentLike,
    filters::compose::{CUSTOM_PRIMITIVE_ID, PrimitiveSpec},
    foundation::error::{ColorLensError, ColorLensResult},
};

/// Fixed id of the hidden SVG container holding every primitive.
pub const CONTAINER_ID: &str = "colorlens-svg-filters";

/// What a [`PrimitiveInjector::reconcile`] call changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// The container was created by this call.
    pub container_created: bool,
    /// Primitives inserted for the first time.
    pub inserted: Vec<String>,
    /// Custom primitives whose stale node was removed and re-inserted.
    pub replaced: Vec<String>,
    /// Stale custom primitives removed because they are no longer required.
    pub removed: Vec<String>,
}

impl ReconcileReport {
    /// Whether the document was left untouched.
    pub fn is_noop(&self) -> bool {
        !self.container_created
            && self.inserted.is_empty()
            && self.replaced.is_empty()
            && self.removed.is_empty()
    }
}

/// Idempotently ensures required primitives exist and drops stale custom ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimitiveInjector {
    container_id: String,
    custom_id: String,
}

impl Default for PrimitiveInjector {
    fn default() -> Self {
        Self::new(CONTAINER_ID, CUSTOM_PRIMITIVE_ID)
    }
}

impl PrimitiveInjector {
    /// Injector using `container_id` for the container and `custom_id` as the reserved
    /// custom-mapping id.
    pub fn new(container_id: impl Into<String>, custom_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            custom_id: custom_id.into(),
        }
    }

    /// Container element id.
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Reconcile `doc` so that it holds exactly the custom primitive in `primitives` (if any)
    /// plus every catalog primitive ever requested.
    ///
    /// Catalog primitives are static: inserted once, never removed. Presence is checked inside
    /// the container only, so unrelated page elements sharing an id do not count. The custom primitive is
    /// replaced whenever its matrix changes. Fails with
    /// [`ColorLensError::AttachmentFailed`] when the container cannot be attached; the caller
    /// retries on the next apply.
    #[tracing::instrument(skip_all, fields(container = %self.container_id, count = primitives.len()))]
    pub fn reconcile<D: DocumentLike + ?Sized>(
        &self,
        primitives: &[PrimitiveSpec],
        doc: &mut D,
    ) -> ColorLensResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        if !doc.is_ready() {
            return Err(ColorLensError::attachment("document is not ready"));
        }
        if !doc.has_element(&self.container_id) {
            doc.attach_container(&self.container_id)?;
            report.container_created = true;
        }

        let mut wants_custom = false;
        for p in primitives {
            if p.custom || p.id == self.custom_id {
                wants_custom = true;
                match doc.primitive_matrix(&p.id) {
                    Some(existing) if existing == p.matrix => {}
                    Some(_) => {
                        doc.remove_element(&p.id);
                        doc.insert_primitive(&self.container_id, p)?;
                        report.replaced.push(p.id.clone());
                    }
                    None => {
                        doc.insert_primitive(&self.container_id, p)?;
                        report.inserted.push(p.id.clone());
                    }
                }
            } else if doc.primitive_matrix(&p.id).is_none() {
                doc.insert_primitive(&self.container_id, p)?;
                report.inserted.push(p.id.clone());
            }
        }

        if !wants_custom && doc.remove_element(&self.custom_id) {
            report.removed.push(self.custom_id.clone());
        }

        tracing::debug!(?report, "reconciled primitives");
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/inject.rs"]
mod tests;
