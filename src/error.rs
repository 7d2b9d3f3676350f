//! Error types for resume-pdf.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for resume-pdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The browser process failed to start.
    #[error("Browser launch failed: {0}")]
    Launch(String),

    /// The page could not be loaded.
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// The page did not settle within the navigation timeout.
    #[error("Navigation to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// PDF generation or the write to disk failed.
    #[error("Export to {} failed: {reason}", path.display())]
    Export { path: PathBuf, reason: String },

    /// A page context operation failed (open, viewport, evaluation, close).
    #[error("Page error: {0}")]
    Page(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Two descriptors resolve to the same output file.
    #[error("Duplicate output file in catalog: {0}")]
    DuplicateOutput(String),

    /// A margin length could not be parsed.
    #[error("Invalid length: {0}")]
    InvalidLength(String),

    /// A catalog file could not be decoded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] serde_json::Error),

    /// Rendering a specific document failed.
    #[error("Rendering '{document}' failed: {source}")]
    Render {
        document: String,
        #[source]
        source: Box<Error>,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Launch,
    Navigation,
    Export,
    Page,
    Config,
    Io,
}

impl Error {
    /// Wrap an error with the identity of the document being rendered.
    pub fn render(document: impl Into<String>, source: Error) -> Self {
        Error::Render {
            document: document.into(),
            source: Box::new(source),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Launch(_) => ErrorKind::Launch,
            Error::Navigation { .. } | Error::Timeout { .. } => ErrorKind::Navigation,
            Error::Export { .. } => ErrorKind::Export,
            Error::Page(_) => ErrorKind::Page,
            Error::Config(_)
            | Error::DuplicateOutput(_)
            | Error::InvalidLength(_)
            | Error::Catalog(_) => ErrorKind::Config,
            Error::Render { source, .. } => source.kind(),
        }
    }

    /// The failing document, if this error carries one.
    pub fn document(&self) -> Option<&str> {
        match self {
            Error::Render { document, .. } => Some(document),
            _ => None,
        }
    }
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Page(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Timeout {
            url: "http://localhost/x".to_string(),
            timeout_ms: 30000,
        };
        assert_eq!(
            err.to_string(),
            "Navigation to http://localhost/x timed out after 30000 ms"
        );

        let err = Error::Export {
            path: PathBuf::from("out/a.pdf"),
            reason: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "Export to out/a.pdf failed: disk full");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_render_delegates_kind() {
        let err = Error::render(
            "HR Version (Korean)",
            Error::Timeout {
                url: "http://localhost/x".to_string(),
                timeout_ms: 10,
            },
        );
        assert_eq!(err.kind(), ErrorKind::Navigation);
        assert_eq!(err.document(), Some("HR Version (Korean)"));
        assert!(err.to_string().starts_with("Rendering 'HR Version (Korean)' failed"));
    }
}
