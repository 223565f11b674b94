//! # Overlay Configuration
//!
//! The overlay is configured by a single environment variable, `OVERDUB`,
//! holding two colon-separated directory roots:
//!
//! ```text
//! OVERDUB=<base_root>:<scratch_root>
//! ```
//!
//! - **base root**: the read-only distribution tree.
//! - **scratch root**: the writable overlay tree.
//!
//! The variable is read and parsed exactly once per process, on first use,
//! behind a [`OnceLock`] so concurrent first calls never double-initialize
//! or observe a half-parsed value. The parsed [`OverlayConfig`] is immutable
//! for the process lifetime.
//!
//! An absent variable puts the process in permanent passthrough: every path
//! is returned unmodified and the shim is behaviorally invisible. A present
//! but malformed value (missing separator, empty or relative root) logs a
//! diagnostic and is likewise terminal passthrough; a broken value is never
//! re-parsed.
//!
//! Both roots are stored with trailing slashes trimmed so prefix matching
//! has a single spelling to deal with.

use std::env;
use std::ffi::OsStr;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, warn};

/// Name of the environment variable holding the overlay specification.
pub const OVERDUB_VAR: &str = "OVERDUB";

/// The immutable pair of overlay roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    base_root: PathBuf,
    scratch_root: PathBuf,
}

impl OverlayConfig {
    /// Build a configuration from two absolute roots.
    ///
    /// Trailing slashes are trimmed from both roots. Intended primarily for
    /// tests and embedders; the shim itself parses [`OVERDUB_VAR`].
    pub fn new(base_root: impl Into<PathBuf>, scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            base_root: trim_trailing_slashes(base_root.into()),
            scratch_root: trim_trailing_slashes(scratch_root.into()),
        }
    }

    /// Parse a `<base_root>:<scratch_root>` specification string.
    ///
    /// Returns `None` when the separator is missing or either root, after
    /// trimming trailing slashes, is empty or not absolute.
    pub fn parse_spec(spec: &OsStr) -> Option<Self> {
        let bytes = spec.as_bytes();
        let sep = bytes.iter().position(|&b| b == b':')?;
        let base = root_from_bytes(&bytes[..sep])?;
        let scratch = root_from_bytes(&bytes[sep + 1..])?;
        Some(Self {
            base_root: base,
            scratch_root: scratch,
        })
    }

    /// The read-only distribution tree root.
    pub fn base_root(&self) -> &Path {
        &self.base_root
    }

    /// The writable overlay tree root.
    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }
}

/// Validate and normalize one root taken from the specification string.
fn root_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    if bytes.first() != Some(&b'/') {
        return None;
    }
    let trimmed = trim_trailing_slashes(PathBuf::from(std::ffi::OsString::from_vec(
        bytes.to_vec(),
    )));
    Some(trimmed)
}

/// Drop trailing `/` bytes, keeping a bare `/` intact.
fn trim_trailing_slashes(path: PathBuf) -> PathBuf {
    let mut bytes = path.into_os_string().into_vec();
    while bytes.len() > 1 && bytes.last() == Some(&b'/') {
        bytes.pop();
    }
    PathBuf::from(std::ffi::OsString::from_vec(bytes))
}

static CONFIG: OnceLock<Option<OverlayConfig>> = OnceLock::new();

/// The process-wide overlay configuration, parsed on first use.
///
/// `None` means passthrough: either [`OVERDUB_VAR`] was unset or its value
/// was malformed. The decision is permanent for the process lifetime.
pub fn overlay_config() -> Option<&'static OverlayConfig> {
    CONFIG
        .get_or_init(|| {
            // Diagnostics are opt-in via RUST_LOG; ignore a logger already
            // installed by the host application.
            let _ = env_logger::try_init();
            read_config_from_env()
        })
        .as_ref()
}

/// Read and parse [`OVERDUB_VAR`], logging the outcome.
fn read_config_from_env() -> Option<OverlayConfig> {
    match env::var_os(OVERDUB_VAR) {
        None => {
            debug!("{OVERDUB_VAR} not set; every path passes through unmodified");
            None
        }
        Some(spec) => match OverlayConfig::parse_spec(&spec) {
            Some(config) => {
                debug!(
                    "overlaying {} over {}",
                    config.scratch_root().display(),
                    config.base_root().display()
                );
                Some(config)
            }
            None => {
                warn!(
                    "malformed {OVERDUB_VAR} value {:?}; every path passes through unmodified",
                    spec
                );
                None
            }
        },
    }
}
