use thiserror::Error;

/// A non-fatal condition met while decorating a document.
///
/// A pass always runs to completion; diagnostics describe what was skipped or recovered.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("no handler for capture `{name}`")]
    UnhandledCapture { name: String },

    #[error("table row {row} has {found} cells, expected {expected}")]
    TableColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("table at row {row} has no columns")]
    EmptyTable { row: usize },

    #[error("`{parent}` at row {row} has no `{child}` child")]
    MissingChild {
        parent: String,
        child: &'static str,
        row: usize,
    },

    #[error("invalid link pattern `{pattern}`: {message}")]
    InvalidLinkPattern { pattern: String, message: String },
}
