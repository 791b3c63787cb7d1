use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptingErrorKind {
    MissingField,
    MissingFilename,
    InvalidChecksumFormat,
    UnsupportedChecksumAlgorithm,
    ChecksumMismatch,
}

impl ScriptingErrorKind {
    /// Integrity errors mean the downloaded content can't be trusted.
    pub fn is_integrity_error(self) -> bool {
        matches!(
            self,
            Self::InvalidChecksumFormat
                | Self::UnsupportedChecksumAlgorithm
                | Self::ChecksumMismatch
        )
    }
}

impl fmt::Display for ScriptingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MissingField => "missing field",
            Self::MissingFilename => "missing filename",
            Self::InvalidChecksumFormat => "invalid checksum format",
            Self::UnsupportedChecksumAlgorithm => "unsupported checksum algorithm",
            Self::ChecksumMismatch => "checksum mismatch",
        };
        f.write_str(name)
    }
}

/// An error in an installer script, reported back to the script author.
///
/// Displays as the message followed by the offending value, if any.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", context_suffix(.context))]
pub struct ScriptingError {
    pub kind: ScriptingErrorKind,
    pub message: String,
    /// The offending value (file id, checksum string, ...), if any.
    pub context: Option<String>,
}

impl ScriptingError {
    pub fn new(kind: ScriptingErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum InstallerFileError {
    #[error(transparent)]
    Scripting(#[from] ScriptingError),

    /// The file has to be supplied by the user (physical media, Steam, ...).
    #[error("file is not available for automatic download")]
    FileNotAvailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to compute checksum: {0}")]
    Checksum(#[source] anyhow::Error),
}

fn context_suffix(context: &Option<String>) -> String {
    context
        .as_deref()
        .map(|context| format!(" ({context})"))
        .unwrap_or_default()
}

impl InstallerFileError {
    pub fn scripting_kind(&self) -> Option<ScriptingErrorKind> {
        match self {
            Self::Scripting(e) => Some(e.kind),
            _ => None,
        }
    }
}
