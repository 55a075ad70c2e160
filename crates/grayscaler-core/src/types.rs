//! Core data types for the pair processing pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the pair an upload plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Source,
    Dest,
}

impl Role {
    /// Prefix used for output file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Source => "source",
            Role::Dest => "dest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw upload as received from the client.
///
/// `filename` is `None` when the multipart field carried no filename at all.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: Some(filename.into()),
            bytes: bytes.into(),
        }
    }

    /// Filename for log output.
    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("<none>")
    }
}

/// Hex-encoded SHA-256 digest of an upload's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub(crate) fn from_hex(hex: String) -> Self {
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered `(source, dest)` fingerprint pair, rendered as `source:dest`.
///
/// Not commutative: swapping the roles yields a different key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(source: &Fingerprint, dest: &Fingerprint) -> Self {
        Self(format!("{}:{}", source, dest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-relative locations of the two processed images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedResult {
    pub source_result: String,
    pub dest_result: String,
}
