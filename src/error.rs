//! Unified error types for widget-diff.
//!
//! Two failure classes exist: precondition violations (the caller handed us
//! something the contract forbids) and capture failures (the live widget's
//! render sink reported an I/O error mid-build). Both abort the calling
//! operation; neither is retried. Removing a property or attribute by a key
//! that does not exist is not an error at all; those operations return
//! `Option::None`.

use thiserror::Error;

/// Main error type for widget-diff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WidgetDiffError {
    /// A caller-side contract violation. The operation aborted before doing
    /// any work: a build root without the render-capture capability, or
    /// materializing a snapshot that has no backing widget.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// The live widget's capture sink reported a failure. The entire build
    /// aborts; no partial snapshot is returned.
    #[error("feature capture failed for widget '{widget_type}'")]
    Capture {
        widget_type: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenient Result type for widget-diff operations
pub type Result<T> = std::result::Result<T, WidgetDiffError>;

impl WidgetDiffError {
    /// Create a precondition-violation error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Create a capture-failure error for the given widget type
    pub fn capture(widget_type: impl Into<String>, source: std::io::Error) -> Self {
        Self::Capture {
            widget_type: widget_type.into(),
            source,
        }
    }

    /// Returns true if this error is a precondition violation.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }

    /// Returns true if this error is a capture failure.
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        matches!(self, Self::Capture { .. })
    }
}
