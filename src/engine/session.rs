use crate::{
    document::{
        dom::DocumentLike,
        inject::{CONTAINER_ID, PrimitiveInjector, ReconcileReport},
    },
    filters::compose::{CUSTOM_PRIMITIVE_ID, compose_with},
    foundation::error::ColorLensResult,
    settings::record::SettingsRecord,
};

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineOpts {
    /// Id of the hidden SVG container.
    pub container_id: String,
    /// Reserved id of the custom-mapping primitive.
    pub custom_primitive_id: String,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            container_id: CONTAINER_ID.to_owned(),
            custom_primitive_id: CUSTOM_PRIMITIVE_ID.to_owned(),
        }
    }
}

/// Result of a [`DocumentSession::flush`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Root filter now in effect.
    pub css_filter: String,
    /// Whether the document was written to.
    pub changed: bool,
    /// Primitive changes; `None` when nothing was pending.
    pub reconcile: Option<ReconcileReport>,
}

#[derive(Clone, Debug)]
struct Applied {
    record: SettingsRecord,
    css_filter: String,
    fingerprint: u64,
}

/// Serializes reconciliation for one document.
///
/// Records are queued with [`submit`](Self::submit); only the latest queued record is ever
/// applied. A record whose attachment fails stays queued for the next flush.
#[derive(Debug)]
pub struct DocumentSession<D> {
    doc: D,
    opts: EngineOpts,
    injector: PrimitiveInjector,
    pending: Option<SettingsRecord>,
    applied: Option<Applied>,
}

impl<D: DocumentLike> DocumentSession<D> {
    /// Session over `doc` with default options.
    pub fn new(doc: D) -> Self {
        Self::with_opts(doc, EngineOpts::default())
    }

    /// Session over `doc`.
    pub fn with_opts(doc: D, opts: EngineOpts) -> Self {
        let injector = PrimitiveInjector::new(&opts.container_id, &opts.custom_primitive_id);
        Self {
            doc,
            opts,
            injector,
            pending: None,
            applied: None,
        }
    }

    /// Queue `record`, superseding anything not yet applied.
    pub fn submit(&mut self, record: SettingsRecord) {
        if self.pending.replace(record).is_some() {
            tracing::debug!("superseded pending settings");
        }
    }

    /// Apply the latest queued record, if any.
    ///
    /// Primitives are always reconciled, so a container the host dropped is rebuilt. When the
    /// composed output matches what is already applied and reconciliation wrote nothing, the
    /// root filter is left alone and the report says nothing changed.
    #[tracing::instrument(skip(self), fields(container = %self.opts.container_id))]
    pub fn flush(&mut self) -> ColorLensResult<FlushReport> {
        let Some(record) = self.pending.clone() else {
            return Ok(FlushReport {
                css_filter: self.css_filter().to_owned(),
                ..FlushReport::default()
            });
        };

        let composed = compose_with(&record, &self.opts.custom_primitive_id);
        let fingerprint = composed.fingerprint();

        let reconcile = match self.injector.reconcile(&composed.primitives(), &mut self.doc) {
            Ok(r) => r,
            Err(err) => {
                if err.is_retryable() {
                    tracing::warn!(%err, "reconciliation deferred; will retry on next apply");
                } else {
                    self.pending = None;
                }
                return Err(err);
            }
        };

        let same = self.applied.as_ref().map(|a| a.fingerprint) == Some(fingerprint);
        let changed = !(same && reconcile.is_noop());
        if changed {
            self.doc.set_root_filter(&composed.css_filter);
        } else {
            tracing::debug!(fingerprint, "composition unchanged; skipping document writes");
        }

        self.pending = None;
        self.applied = Some(Applied {
            record,
            css_filter: composed.css_filter.clone(),
            fingerprint,
        });
        Ok(FlushReport {
            css_filter: composed.css_filter,
            changed,
            reconcile: Some(reconcile),
        })
    }

    /// [`submit`](Self::submit) then [`flush`](Self::flush).
    pub fn apply(&mut self, record: SettingsRecord) -> ColorLensResult<FlushReport> {
        self.submit(record);
        self.flush()
    }

    /// Record waiting to be applied.
    pub fn pending(&self) -> Option<&SettingsRecord> {
        self.pending.as_ref()
    }

    /// Record currently in effect.
    pub fn current(&self) -> Option<&SettingsRecord> {
        self.applied.as_ref().map(|a| &a.record)
    }

    /// Root filter currently in effect (empty before the first apply).
    pub fn css_filter(&self) -> &str {
        self.applied.as_ref().map_or("", |a| a.css_filter.as_str())
    }

    /// Engine options.
    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    /// Target document.
    pub fn document(&self) -> &D {
        &self.doc
    }

    /// Mutable access to the target document.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    /// Consume the session, returning the document.
    pub fn into_document(self) -> D {
        self.doc
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/session.rs"]
mod tests;
