use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    document::dom::DocumentLike,
    engine::session::DocumentSession,
    foundation::error::ColorLensResult,
    settings::{
        normalize::normalize_draft,
        record::{SettingsDraft, SettingsRecord},
    },
};

/// Messages accepted by a document session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    /// Normalize `settings` and apply them to the document.
    #[serde(alias = "injectAndApplySettings", alias = "updateSettings")]
    ApplySettings {
        /// Draft payload; missing fields fall back to defaults.
        #[serde(default)]
        settings: SettingsDraft,
    },
    /// Liveness probe.
    Ping,
}

impl Action {
    /// Parse a raw message object.
    pub fn from_value(value: &Value) -> ColorLensResult<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }
}

/// Reply status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Handled.
    Ok,
    /// Accepted but not yet applied; retried on the next apply.
    Pending,
    /// Rejected.
    Error,
}

/// Reply echoed to the sender of an [`Action`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    /// Outcome.
    pub status: Status,
    /// Root filter in effect after handling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_filter: Option<String>,
    /// Normalized settings that were applied (or queued).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsRecord>,
    /// Failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApplyOutcome {
    fn status(status: Status) -> Self {
        Self {
            status,
            css_filter: None,
            settings: None,
            error: None,
        }
    }
}

impl<D: DocumentLike> DocumentSession<D> {
    /// Handle one message. Never fails; errors are reported in the outcome.
    #[tracing::instrument(skip_all)]
    pub fn handle_message(&mut self, action: Action) -> ApplyOutcome {
        match action {
            Action::Ping => ApplyOutcome::status(Status::Ok),
            Action::ApplySettings { settings } => {
                let record = normalize_draft(&settings);
                match self.apply(record.clone()) {
                    Ok(report) => ApplyOutcome {
                        css_filter: Some(report.css_filter),
                        settings: Some(record),
                        ..ApplyOutcome::status(Status::Ok)
                    },
                    Err(err) => {
                        let status = if err.is_retryable() {
                            Status::Pending
                        } else {
                            Status::Error
                        };
                        ApplyOutcome {
                            settings: Some(record),
                            error: Some(err.to_string()),
                            ..ApplyOutcome::status(status)
                        }
                    }
                }
            }
        }
    }

    /// Parse and handle a raw message. Unparseable messages yield an error outcome.
    pub fn handle_json(&mut self, message: &Value) -> ApplyOutcome {
        match Action::from_value(message) {
            Ok(action) => self.handle_message(action),
            Err(err) => {
                tracing::warn!(%err, "rejecting unparseable message");
                ApplyOutcome {
                    error: Some(err.to_string()),
                    ..ApplyOutcome::status(Status::Error)
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/message.rs"]
mod tests;
