use thiserror::Error;

/// Result alias used across the layout core.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Failures surfaced by layout, routing and the render pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A column/row outside the bounds the caller resolved against.
    #[error("cell ({column}, {row}) is out of range")]
    OutOfRange { column: usize, row: usize },
    /// A negative dimension, unknown routing mode or unusable model shape.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl LayoutError {
    pub fn out_of_range(column: usize, row: usize) -> Self {
        Self::OutOfRange { column, row }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Configuration errors abort a render pass; range errors are the caller's to handle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}
