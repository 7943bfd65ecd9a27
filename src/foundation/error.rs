/// Convenience result type used across Platen.
pub type PlatenResult<T> = Result<T, PlatenError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PlatenError {
    /// Invalid user-provided or edit-state data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A filter preset id that does not name a known preset.
    #[error("unknown filter preset '{0}'")]
    InvalidPreset(String),

    /// Errors while decoding a source image or template asset.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors while encoding a composited surface to bytes.
    #[error("encode error: {0}")]
    Encode(String),

    /// Malformed PNG container data (bad signature, bogus chunk, missing IDAT).
    #[error("png format error: {0}")]
    Format(String),

    /// Errors when serializing or deserializing persisted edit state.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlatenError {
    /// Build a [`PlatenError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlatenError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PlatenError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`PlatenError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`PlatenError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
