/// Convenience result type used across homeward.
pub type HomewardResult<T> = Result<T, HomewardError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum HomewardError {
    /// Invalid configuration or out-of-contract input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A single frame could not be fetched or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// No drawing surface could be acquired for a renderer.
    #[error("surface error: {0}")]
    Surface(String),

    /// Errors raised by export sinks (png writer, ffmpeg).
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HomewardError {
    /// Build a [`HomewardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HomewardError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`HomewardError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`HomewardError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`HomewardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
