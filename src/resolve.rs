//! # Overlay Resolver
//!
//! The overlay decision: given a path and the two configured roots, which
//! physical path should the operation actually touch?
//!
//! The rule is short. Canonicalize the path; if it lies under neither root
//! it is returned unchanged. If it lies under either root, take the suffix
//! after the matched root and prefer the base tree: the result is
//! `base_root + suffix` when that path exists, otherwise
//! `scratch_root + suffix`. The existence probe runs on every call; there
//! is no cache, so the decision always reflects current filesystem state.
//!
//! Prefix matching is byte-exact on whole segments: `/dist` matches
//! `/dist` and `/dist/app`, never `/distillery/app`.
//!
//! The result is a tagged [`Resolution`] rather than a bare path:
//! [`Resolution::Unchanged`] borrows the caller's input (the common
//! outside-the-overlay case allocates nothing), while
//! [`Resolution::Base`]/[`Resolution::Scratch`] own the rebuilt path. The
//! tag is what tells the dispatch layer whether there is anything to
//! release and whether parent materialization applies, with no pointer
//! comparisons involved.

use std::ffi::OsString;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

use log::debug;

use crate::canon::canonicalize;
use crate::config::{overlay_config, OverlayConfig};
use crate::error::Result;
use crate::materialize::materialize_parents;
use crate::real::RealFs;

/// What the calling operation is about to do with the path.
///
/// `Create` marks arguments that name a path being created or overwritten
/// (destination of a rename, target of `creat`/`mkdir`/`open(O_CREAT)`,
/// temp-file templates). Only those trigger parent-directory
/// materialization in the scratch tree; plain reads never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Read,
    Create,
}

impl Intent {
    /// Does this intent call for materializing missing parents?
    pub fn creates(self) -> bool {
        matches!(self, Intent::Create)
    }
}

/// The physical path an operation should actually touch.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The path lies outside both roots (or the overlay is unconfigured);
    /// the original input is used as-is.
    Unchanged(&'a Path),
    /// The path was redirected into the base tree.
    Base(PathBuf),
    /// The path was redirected into the scratch tree.
    Scratch(PathBuf),
}

impl Resolution<'_> {
    /// The path to hand to the real primitive.
    pub fn path(&self) -> &Path {
        match self {
            Resolution::Unchanged(p) => p,
            Resolution::Base(p) | Resolution::Scratch(p) => p,
        }
    }

    /// Was the path rewritten into one of the overlay trees?
    pub fn is_rewritten(&self) -> bool {
        !matches!(self, Resolution::Unchanged(_))
    }
}

/// Resolve `path` against the overlay, materializing scratch-side parent
/// directories when `intent` is [`Intent::Create`] and the path fell into
/// the scratch tree.
///
/// The existence probe goes through `real`, which must be the
/// unintercepted primitive; probing through the overlay's own redirected
/// operations would recurse.
///
/// # Errors
///
/// Propagates canonicalization failure (working-directory lookup); callers
/// map this to the downstream error sentinel.
pub fn resolve<'a>(
    config: &OverlayConfig,
    real: &impl RealFs,
    path: &'a Path,
    intent: Intent,
) -> Result<Resolution<'a>> {
    let canonical = canonicalize(path)?;
    let bytes = canonical.as_os_str().as_bytes();

    let suffix = match strip_root(bytes, config.base_root()) {
        Some(suffix) => suffix,
        None => match strip_root(bytes, config.scratch_root()) {
            Some(suffix) => suffix,
            None => {
                debug!("{} [unmodified]", path.display());
                return Ok(Resolution::Unchanged(path));
            }
        },
    };

    let base_candidate = join_root(config.base_root(), suffix);
    let resolution = if real.exists(&base_candidate) {
        Resolution::Base(base_candidate)
    } else {
        Resolution::Scratch(join_root(config.scratch_root(), suffix))
    };

    if intent.creates() {
        if let Resolution::Scratch(target) = &resolution {
            materialize_parents(real, target, config.scratch_root());
        }
    }

    debug!(
        "{} => {} => {}",
        path.display(),
        canonical.display(),
        resolution.path().display()
    );
    Ok(resolution)
}

/// Resolve against the process-global configuration, passing through when
/// no valid configuration is present.
pub fn resolve_or_passthrough<'a>(
    real: &impl RealFs,
    path: &'a Path,
    intent: Intent,
) -> Result<Resolution<'a>> {
    match overlay_config() {
        Some(config) => resolve(config, real, path, intent),
        None => Ok(Resolution::Unchanged(path)),
    }
}

/// If `canonical` lies under `root`, the suffix after the root; else None.
///
/// A match requires the next byte after the root to be a separator (or the
/// path to end exactly at the root), so `/dist` never claims `/distillery`.
fn strip_root<'p>(canonical: &'p [u8], root: &Path) -> Option<&'p [u8]> {
    let root = root.as_os_str().as_bytes();
    if canonical.starts_with(root)
        && (canonical.len() == root.len() || canonical[root.len()] == b'/')
    {
        Some(&canonical[root.len()..])
    } else {
        None
    }
}

fn join_root(root: &Path, suffix: &[u8]) -> PathBuf {
    let mut bytes = root.as_os_str().as_bytes().to_vec();
    bytes.extend_from_slice(suffix);
    PathBuf::from(OsString::from_vec(bytes))
}
