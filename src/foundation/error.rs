/// Crate-wide result alias.
pub type DanmakuResult<T> = Result<T, DanmakuError>;

/// Errors surfaced by the engine, its collaborators, and the sinks.
#[derive(thiserror::Error, Debug)]
pub enum DanmakuError {
    /// Structurally invalid input (config, log records, frame sizes).
    #[error("validation error: {0}")]
    Validation(String),

    /// Font loading, text layout or measurement failure.
    #[error("text error: {0}")]
    Text(String),

    /// Frame sink or external encoder failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Message feed failure.
    #[error("feed error: {0}")]
    Feed(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its context chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DanmakuError {
    /// Build a [`DanmakuError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DanmakuError::Text`].
    pub fn text(msg: impl Into<String>) -> Self {
        Self::Text(msg.into())
    }

    /// Build a [`DanmakuError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`DanmakuError::Feed`].
    pub fn feed(msg: impl Into<String>) -> Self {
        Self::Feed(msg.into())
    }

    /// Build a [`DanmakuError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
