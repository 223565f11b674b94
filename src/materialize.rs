//! # Intermediate Directory Materializer
//!
//! An application writing `scratch_root/app/cache/data.tmp` may find that
//! `app/cache` exists only in the base tree: the scratch tree starts empty
//! and grows on demand. Before the real create-type call runs, the missing
//! ancestor directories are created in the scratch tree so the call can
//! succeed.
//!
//! This is strictly best-effort. Creation failures are logged and
//! swallowed; the subsequent real operation then fails with the genuine
//! error (`ENOENT` from an `open` whose parent is still missing), which is
//! less surprising than a synthetic error invented here.
//!
//! Implicitly created directories get mode `0o750`. There is no safe way to
//! infer the ownership or permissions the application would have chosen for
//! a directory it never knew it created, and the umask cannot be trusted to
//! encode sensitive-directory expectations, so a conservative fixed mode is
//! used.

use std::path::Path;

use log::debug;

use crate::real::RealFs;

/// Mode bits for implicitly created scratch directories: owner full access,
/// group read+execute, others nothing.
pub const SCRATCH_DIR_MODE: u32 = 0o750;

/// Ensure every ancestor of `path` below `scratch_root` exists.
///
/// Walks upward from `path`'s parent. An ancestor that already exists ends
/// the walk; its own ancestors are assumed present, the common case when
/// the scratch tree is already warm. `scratch_root` itself is assumed
/// pre-existing and is never created.
///
/// Failures are logged at debug level and ignored.
pub fn materialize_parents(real: &impl RealFs, path: &Path, scratch_root: &Path) {
    let Some(parent) = path.parent() else {
        return;
    };
    // Stop at the scratch root; anything at or above it is not ours to make.
    if parent == scratch_root || !parent.starts_with(scratch_root) {
        return;
    }
    if real.exists(parent) {
        return;
    }
    materialize_parents(real, parent, scratch_root);
    if let Err(err) = real.create_dir(parent, SCRATCH_DIR_MODE) {
        debug!("could not create {}: {}", parent.display(), err);
    }
}
