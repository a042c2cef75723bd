use crate::foundation::core::{ElementHandle, InstanceId};

/// Convenience result type used across the engine.
pub type DisruptResult<T> = Result<T, DisruptError>;

/// Top-level error taxonomy used by engine APIs.
///
/// None of these are fatal to a batch: a failure for one target never prevents other
/// targets from animating.
#[derive(thiserror::Error, Debug)]
pub enum DisruptError {
    /// The capture service could not rasterize a target. The target is skipped.
    #[error("capture failed for {element}: {reason}")]
    CaptureFailed {
        /// Element that could not be captured.
        element: ElementHandle,
        /// Collaborator-provided reason.
        reason: String,
    },

    /// A requested effect id is absent from the registry.
    #[error("unknown effect '{0}'")]
    UnknownEffect(String),

    /// An operation addressed an instance id with no live instance.
    #[error("no live disruption {0}")]
    NotFound(InstanceId),

    /// Invalid user-provided configuration or effect output.
    #[error("validation error: {0}")]
    Validation(String),

    /// Raster-level misuse (mismatched buffers, impossible sizes).
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing options and scenes.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DisruptError {
    /// Build a [`DisruptError::CaptureFailed`] value.
    pub fn capture_failed(element: ElementHandle, reason: impl Into<String>) -> Self {
        Self::CaptureFailed {
            element,
            reason: reason.into(),
        }
    }

    /// Build a [`DisruptError::UnknownEffect`] value.
    pub fn unknown_effect(id: impl Into<String>) -> Self {
        Self::UnknownEffect(id.into())
    }

    /// Build a [`DisruptError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DisruptError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`DisruptError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
