use std::fmt;

use serde::Serialize;

use crate::checksum::Checksum;

/// Failure taxonomy for install and verify calls. Every variant is fatal to
/// the enclosing call; none is retried internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallError {
    /// The sandbox root could not be created or cleared.
    Sandbox(String),
    /// The delegated installer failed, timed out, or left an incomplete tree.
    Resolution(String),
    /// The installed tree could not be walked (unreadable file, symlink
    /// escaping the root).
    Traversal(String),
}

impl InstallError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sandbox(_) => "sandbox",
            Self::Resolution(_) => "resolution",
            Self::Traversal(_) => "traversal",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Sandbox(msg) | Self::Resolution(msg) | Self::Traversal(msg) => msg,
        }
    }
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind(), self.message())
    }
}

impl std::error::Error for InstallError {}

/// Outcome of one install call. Exactly one of `checksum`/`error` is
/// populated, matching `success`; callers branch on `success` instead of
/// catching errors.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InstallResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<Checksum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InstallResult {
    pub fn succeeded(checksum: Checksum) -> Self {
        Self {
            success: true,
            checksum: Some(checksum),
            error: None,
        }
    }

    pub fn failed(error: impl fmt::Display) -> Self {
        Self {
            success: false,
            checksum: None,
            error: Some(error.to_string()),
        }
    }
}
