/// Convenience result type used across ColorLens.
pub type ColorLensResult<T> = Result<T, ColorLensError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ColorLensError {
    /// A hex color was not `#RRGGBB` (wrong length or non-hex digits).
    #[error("invalid color format: {0}")]
    InvalidColorFormat(String),

    /// The primitive container could not be attached to the target document.
    #[error("attachment failed: {0}")]
    AttachmentFailed(String),

    /// A profile store operation was rejected.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// Invalid user-provided settings data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors raised by a key-value storage backend.
    #[error("storage error: {0}")]
    Storage(String),

    /// Errors when serializing or deserializing persisted shapes.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures of profile mutations, surfaced to the UI layer for user-visible messaging.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// The store already holds the maximum number of profiles.
    #[error("profile limit reached ({limit}); delete a profile before saving a new one")]
    CapacityExceeded {
        /// Maximum number of profiles a store may hold.
        limit: usize,
    },

    /// Another profile already uses this name.
    #[error("a profile named '{0}' already exists")]
    DuplicateName(String),

    /// No profile with this name exists.
    #[error("profile '{0}' not found")]
    NotFound(String),

    /// The name is empty or too long after trimming.
    #[error("invalid profile name '{0}'")]
    InvalidName(String),
}

impl ColorLensError {
    /// Build a [`ColorLensError::InvalidColorFormat`] value.
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColorFormat(msg.into())
    }

    /// Build a [`ColorLensError::AttachmentFailed`] value.
    pub fn attachment(msg: impl Into<String>) -> Self {
        Self::AttachmentFailed(msg.into())
    }

    /// Build a [`ColorLensError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ColorLensError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`ColorLensError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the caller should retry on the next settings apply.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AttachmentFailed(_))
    }
}

impl From<serde_json::Error> for ColorLensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
