//! Integration tests for overlay resolution against real directory trees.
//!
//! These tests exercise the engine end to end with the real existence and
//! mkdir primitives (`LibcFs`): temporary base/scratch trees are laid out
//! on disk, resolution decisions are checked against them, and materialized
//! scratch directories are verified to actually appear.
//!
//! The interception layer itself is exercised in passthrough mode by its
//! unit tests; redirect behavior through `LD_PRELOAD` is identical by
//! construction, since the wrappers call the same `resolve` exercised
//! here.

use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use overdub::config::OverlayConfig;
use overdub::real::LibcFs;
use overdub::resolve::{resolve, resolve_or_passthrough, Intent, Resolution};

/// A base/scratch pair of real on-disk trees.
struct Fixture {
    temp: TempDir,
    config: OverlayConfig,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        temp.child("dist").create_dir_all().unwrap();
        temp.child("scratch").create_dir_all().unwrap();
        let config = OverlayConfig::new(temp.path().join("dist"), temp.path().join("scratch"));
        Self { temp, config }
    }

    fn base(&self, rel: &str) -> PathBuf {
        self.temp.path().join("dist").join(rel)
    }

    fn scratch(&self, rel: &str) -> PathBuf {
        self.temp.path().join("scratch").join(rel)
    }

    fn resolve<'a>(&self, path: &'a Path, intent: Intent) -> Resolution<'a> {
        resolve(&self.config, &LibcFs, path, intent).expect("resolution should succeed")
    }
}

#[test]
fn read_sees_base_copy_from_either_spelling() {
    let fx = Fixture::new();
    fx.temp.child("dist/app/x.php").write_str("base copy").unwrap();

    let base_spelling = fx.base("app/x.php");
    let via_base = fx.resolve(&base_spelling, Intent::Read);
    assert_eq!(via_base, Resolution::Base(fx.base("app/x.php")));

    let scratch_spelling = fx.scratch("app/x.php");
    let via_scratch = fx.resolve(&scratch_spelling, Intent::Read);
    assert_eq!(via_scratch, Resolution::Base(fx.base("app/x.php")));
}

#[test]
fn read_falls_back_to_scratch_copy() {
    let fx = Fixture::new();
    fx.temp
        .child("scratch/app/local.ini")
        .write_str("scratch copy")
        .unwrap();

    let input = fx.base("app/local.ini");
    let resolved = fx.resolve(&input, Intent::Read);
    assert_eq!(resolved, Resolution::Scratch(fx.scratch("app/local.ini")));
    assert_eq!(
        std::fs::read_to_string(resolved.path()).unwrap(),
        "scratch copy"
    );
}

#[test]
fn create_materializes_missing_scratch_parents() {
    let fx = Fixture::new();
    // `app/cache` exists only in the base tree.
    fx.temp.child("dist/app/cache/.keep").write_str("").unwrap();

    let target = fx.base("app/cache/data.tmp");
    let resolved = fx.resolve(&target, Intent::Create);
    assert_eq!(
        resolved,
        Resolution::Scratch(fx.scratch("app/cache/data.tmp"))
    );

    let made = fx.scratch("app/cache");
    assert!(made.is_dir(), "scratch parents should have been created");

    // Conservative mode: nothing for others, regardless of umask.
    let mode = std::fs::metadata(&made).unwrap().permissions().mode();
    assert_eq!(mode & 0o007, 0);

    // The file itself is not created; only its parents are.
    assert!(!resolved.path().exists());
}

#[test]
fn read_intent_leaves_scratch_tree_untouched() {
    let fx = Fixture::new();
    let input = fx.base("app/missing/file.txt");
    let resolved = fx.resolve(&input, Intent::Read);
    assert_eq!(
        resolved,
        Resolution::Scratch(fx.scratch("app/missing/file.txt"))
    );
    assert!(!fx.scratch("app").exists());
}

#[test]
fn path_outside_both_roots_passes_through() {
    let fx = Fixture::new();
    fx.temp.child("elsewhere/file.txt").write_str("x").unwrap();

    let outside = fx.temp.path().join("elsewhere/file.txt");
    let resolved = fx.resolve(&outside, Intent::Read);
    assert_eq!(resolved, Resolution::Unchanged(outside.as_path()));
}

#[test]
fn root_prefix_does_not_claim_sibling_directories() {
    let fx = Fixture::new();
    // `distillery` shares the `dist` byte prefix but is a different tree.
    fx.temp.child("distillery/x").write_str("x").unwrap();

    let sibling = fx.temp.path().join("distillery/x");
    let resolved = fx.resolve(&sibling, Intent::Read);
    assert_eq!(resolved, Resolution::Unchanged(sibling.as_path()));
}

#[test]
fn messy_spellings_resolve_to_the_same_place() {
    let fx = Fixture::new();
    fx.temp.child("dist/app/x.php").write_str("base").unwrap();

    let mut messy = fx.temp.path().as_os_str().to_owned();
    messy.push("/dist//app/./nowhere/../x.php");
    let messy = PathBuf::from(messy);
    let resolved = fx.resolve(&messy, Intent::Read);
    assert_eq!(resolved, Resolution::Base(fx.base("app/x.php")));
}

#[test]
fn rename_resolves_source_and_destination_independently() {
    let fx = Fixture::new();
    fx.temp.child("dist/a.txt").write_str("payload").unwrap();

    let src_input = fx.base("a.txt");
    let src = fx.resolve(&src_input, Intent::Read);
    assert_eq!(src, Resolution::Base(fx.base("a.txt")));

    // Destination parent `new` exists in neither tree.
    let dst_input = fx.scratch("new/b.txt");
    let dst = fx.resolve(&dst_input, Intent::Create);
    assert_eq!(dst, Resolution::Scratch(fx.scratch("new/b.txt")));
    assert!(fx.scratch("new").is_dir());

    // The real rename now succeeds against the resolved pair.
    std::fs::rename(src.path(), dst.path()).unwrap();
    assert_eq!(
        std::fs::read_to_string(fx.scratch("new/b.txt")).unwrap(),
        "payload"
    );
    assert!(!fx.base("a.txt").exists());
}

#[test]
fn failed_materialization_still_resolves() {
    let fx = Fixture::new();
    // An existing *file* where a directory is needed makes mkdir fail with
    // ENOTDIR for any user, including root.
    fx.temp.child("scratch/blocked").write_str("a file").unwrap();

    let input = fx.scratch("blocked/deep/x.txt");
    let resolved = fx.resolve(&input, Intent::Create);
    assert_eq!(
        resolved,
        Resolution::Scratch(fx.scratch("blocked/deep/x.txt"))
    );
    assert!(!fx.scratch("blocked/deep").exists());

    // The genuine error surfaces from the real operation that follows.
    let err = std::fs::write(resolved.path(), "payload").unwrap_err();
    assert!(matches!(
        err.raw_os_error(),
        Some(libc::ENOTDIR) | Some(libc::ENOENT)
    ));
}

#[test]
fn unconfigured_process_passes_everything_through() {
    // OVERDUB is unset for the test process, so the global configuration
    // is permanent passthrough.
    let input = Path::new("/etc/passwd");
    let resolved = resolve_or_passthrough(&LibcFs, input, Intent::Read).unwrap();
    assert_eq!(resolved, Resolution::Unchanged(input));
}
