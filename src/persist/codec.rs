//! Reading and writing the on-disk artifact.
//!
//! Layout: a fixed header (magic bytes, format version) followed by a
//! Postcard-encoded [`Payload`](super::Payload). The major version must
//! match exactly; a newer minor version and a differing crate version are
//! warned about but tolerated, mirroring how the serving side treats
//! environment drift: visible, not blocking.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::pipeline::RiskPipeline;

use super::payload::{ForestPayload, MalformedPayload, Payload, PayloadV1};

/// Magic bytes identifying an artifact file.
pub const MAGIC: [u8; 4] = *b"CRSK";

/// Current format version.
pub const FORMAT_VERSION_MAJOR: u16 = 1;
pub const FORMAT_VERSION_MINOR: u16 = 0;

const HEADER_LEN: usize = MAGIC.len() + 4;

/// Errors produced while writing an artifact.
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Encode(postcard::Error),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to write artifact: {e}"),
            Self::Encode(e) => write!(f, "failed to encode artifact: {e}"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Encode(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Errors produced while locating or reading an artifact.
#[derive(Debug)]
pub enum LoadError {
    /// None of the candidate paths exist.
    NotFound { checked: Vec<PathBuf> },
    Io(std::io::Error),
    /// The file is not an artifact (wrong magic bytes).
    BadMagic { found: [u8; 4] },
    /// The file is shorter than the fixed header.
    Truncated,
    /// Written by an incompatible format major version.
    UnsupportedVersion { major: u16, minor: u16 },
    /// The body failed to decode.
    Decode(postcard::Error),
    /// The body decoded but its arrays are inconsistent.
    Malformed(MalformedPayload),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { checked } => {
                write!(f, "no model artifact found; checked: ")?;
                for (i, path) in checked.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", path.display())?;
                }
                Ok(())
            }
            Self::Io(e) => write!(f, "failed to read artifact: {e}"),
            Self::BadMagic { found } => {
                write!(f, "not a model artifact (magic bytes {found:?})")
            }
            Self::Truncated => write!(f, "artifact is truncated"),
            Self::UnsupportedVersion { major, minor } => write!(
                f,
                "artifact format v{major}.{minor} is not supported \
                 (this build reads v{FORMAT_VERSION_MAJOR}.x)"
            ),
            Self::Decode(e) => write!(f, "failed to decode artifact: {e}"),
            Self::Malformed(e) => write!(f, "artifact is malformed: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// =============================================================================
// Save / Load
// =============================================================================

/// Serialize a fitted pipeline to `path`.
///
/// Parent directories are created as needed; an existing artifact at the
/// path is overwritten.
pub fn save(pipeline: &RiskPipeline, path: &Path) -> Result<(), SaveError> {
    let payload = Payload::V1(PayloadV1 {
        meta: pipeline.meta().clone(),
        config: pipeline.config().clone(),
        preprocessor: pipeline.preprocessor().clone(),
        forest: ForestPayload::from(pipeline.forest()),
    });
    let body = postcard::to_allocvec(&payload).map_err(SaveError::Encode)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = fs::File::create(path)?;
    file.write_all(&MAGIC)?;
    file.write_all(&FORMAT_VERSION_MAJOR.to_le_bytes())?;
    file.write_all(&FORMAT_VERSION_MINOR.to_le_bytes())?;
    file.write_all(&body)?;
    Ok(())
}

/// Deserialize a pipeline from `path`.
///
/// Fails on a wrong magic or major version. A newer minor version or a
/// crate-version mismatch recorded in the artifact only logs a warning.
pub fn load(path: &Path) -> Result<RiskPipeline, LoadError> {
    let bytes = fs::read(path)?;
    if bytes.len() < HEADER_LEN {
        return Err(LoadError::Truncated);
    }

    let (magic, rest) = bytes.split_at(MAGIC.len());
    if magic != &MAGIC[..] {
        let mut found = [0u8; 4];
        found.copy_from_slice(magic);
        return Err(LoadError::BadMagic { found });
    }

    let major = u16::from_le_bytes([rest[0], rest[1]]);
    let minor = u16::from_le_bytes([rest[2], rest[3]]);
    if major != FORMAT_VERSION_MAJOR {
        return Err(LoadError::UnsupportedVersion { major, minor });
    }
    if minor > FORMAT_VERSION_MINOR {
        warn!(
            artifact = minor,
            supported = FORMAT_VERSION_MINOR,
            "artifact minor version is newer than this build; proceeding"
        );
    }

    let payload: Payload = postcard::from_bytes(&rest[4..]).map_err(LoadError::Decode)?;
    let Payload::V1(v1) = payload;

    if v1.meta.crate_version != env!("CARGO_PKG_VERSION") {
        warn!(
            artifact = %v1.meta.crate_version,
            running = env!("CARGO_PKG_VERSION"),
            "artifact was trained by a different crate version; predictions \
             are not guaranteed to match"
        );
    }

    let forest = v1.forest.into_forest().map_err(LoadError::Malformed)?;
    Ok(RiskPipeline::from_parts(v1.preprocessor, forest, v1.config, v1.meta))
}

// =============================================================================
// Artifact location
// =============================================================================

/// The standard locations searched for a model artifact, in order.
pub fn default_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from("Model/model.crsk"),
        PathBuf::from("model.crsk"),
        PathBuf::from("../Model/model.crsk"),
    ]
}

/// First existing path among `candidates`.
///
/// On failure the error lists every path that was checked, so callers can
/// surface actionable diagnostics.
pub fn locate(candidates: &[PathBuf]) -> Result<PathBuf, LoadError> {
    for candidate in candidates {
        if candidate.exists() {
            return Ok(candidate.clone());
        }
    }
    Err(LoadError::NotFound { checked: candidates.to_vec() })
}
