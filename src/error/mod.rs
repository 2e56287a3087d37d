//! Error types for serialization and sink I/O.
//!
//! Every failure surfaces to the immediate caller as an explicit
//! [`SaveError`]; the engine never reports partial output as success and
//! never retries. When a write fails mid-stream the engine still attempts
//! to close the sink — a failure from that best-effort close is attached
//! as secondary context (`cleanup`) rather than replacing the primary
//! error.

use std::fmt;
use std::io;

/// Source location within a markup document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters, not bytes).
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The error type returned when parsing fails.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// The primary error message.
    pub message: String,
    /// Where in the source the error occurred.
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}: {}", self.location, self.message)
    }
}

impl std::error::Error for ParseError {}

/// The kind of failure that aborted a save pipeline.
#[derive(Debug)]
pub enum SaveErrorKind {
    /// The destination could not be opened — the file could not be
    /// created, or the channel's `open` call failed.
    SinkOpen {
        /// What the engine was trying to open (a path, or `"channel"`).
        target: String,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The destination accepted fewer bytes than requested.
    ///
    /// Short writes are fatal: the channel contract has no partial-write
    /// continuation, so the engine never retries the remainder.
    ShortWrite {
        /// Number of bytes offered to the sink.
        requested: usize,
        /// Number of bytes the sink actually accepted.
        written: usize,
    },

    /// The sink's `close` call reported failure.
    ///
    /// Surfaced even when serialization itself succeeded — a failed close
    /// can mean buffered output was lost.
    SinkClose {
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The tree walk itself failed, e.g., the node handle does not belong
    /// to the document passed alongside it.
    Serialization {
        /// Human-readable description of the failure.
        message: String,
    },
}

impl fmt::Display for SaveErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SinkOpen { target, source } => {
                write!(f, "failed to open {target}: {source}")
            }
            Self::ShortWrite { requested, written } => {
                write!(f, "write failed, expected {requested}, got {written}")
            }
            Self::SinkClose { source } => write!(f, "error closing sink: {source}"),
            Self::Serialization { message } => write!(f, "serialization failed: {message}"),
        }
    }
}

/// The error type returned by all save and format operations.
///
/// Carries the primary failure plus, when a write error was followed by a
/// failed best-effort close, the close failure as secondary context.
#[derive(Debug)]
pub struct SaveError {
    /// The primary failure.
    pub kind: SaveErrorKind,
    /// A close failure that occurred during cleanup after `kind`.
    pub cleanup: Option<Box<SaveError>>,
}

impl SaveError {
    pub(crate) fn sink_open(target: impl Into<String>, source: io::Error) -> Self {
        Self {
            kind: SaveErrorKind::SinkOpen {
                target: target.into(),
                source,
            },
            cleanup: None,
        }
    }

    pub(crate) fn short_write(requested: usize, written: usize) -> Self {
        Self {
            kind: SaveErrorKind::ShortWrite { requested, written },
            cleanup: None,
        }
    }

    pub(crate) fn sink_close(source: io::Error) -> Self {
        Self {
            kind: SaveErrorKind::SinkClose { source },
            cleanup: None,
        }
    }

    pub(crate) fn serialization(message: impl Into<String>) -> Self {
        Self {
            kind: SaveErrorKind::Serialization {
                message: message.into(),
            },
            cleanup: None,
        }
    }

    /// Attaches a cleanup (close) failure to this error as secondary context.
    #[must_use]
    pub(crate) fn with_cleanup(mut self, cleanup: Option<SaveError>) -> Self {
        self.cleanup = cleanup.map(Box::new);
        self
    }

    /// Returns true if the primary failure is a short write.
    #[must_use]
    pub fn is_short_write(&self) -> bool {
        matches!(self.kind, SaveErrorKind::ShortWrite { .. })
    }
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(cleanup) = &self.cleanup {
            write!(f, "; close also failed: {cleanup}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            SaveErrorKind::SinkOpen { source, .. } | SaveErrorKind::SinkClose { source } => {
                Some(source)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError {
            message: "unexpected end of input".to_string(),
            location: SourceLocation {
                line: 1,
                column: 15,
            },
        };
        assert_eq!(
            err.to_string(),
            "parse error at 1:15: unexpected end of input"
        );
    }

    #[test]
    fn test_short_write_display() {
        let err = SaveError::short_write(4096, 17);
        assert_eq!(err.to_string(), "write failed, expected 4096, got 17");
    }

    #[test]
    fn test_sink_open_display() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let err = SaveError::sink_open("/no/such/dir/out.xml", io_err);
        assert_eq!(
            err.to_string(),
            "failed to open /no/such/dir/out.xml: permission denied"
        );
    }

    #[test]
    fn test_cleanup_failure_is_secondary() {
        let close_err = SaveError::sink_close(io::Error::other("EIO"));
        let err = SaveError::short_write(100, 50).with_cleanup(Some(close_err));

        // The primary cause stays the write failure
        assert!(err.is_short_write());
        let text = err.to_string();
        assert!(
            text.starts_with("write failed"),
            "primary cause should lead, got: {text}"
        );
        assert!(
            text.contains("close also failed"),
            "cleanup failure should be appended, got: {text}"
        );
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let err = SaveError::sink_close(io::Error::other("flush lost"));
        assert!(err.source().is_some());

        let err = SaveError::serialization("bad node");
        assert!(err.source().is_none());
    }
}
