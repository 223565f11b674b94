//! # overdub
//!
//! A transparent two-tree filesystem overlay, delivered as an `LD_PRELOAD`
//! shim. Two directory trees, an immutable **base** tree and a writable
//! **scratch** tree, are merged so a consuming application sees a single
//! logical tree:
//!
//! - a read of any path under either root sees the base copy if one
//!   exists, otherwise the scratch copy;
//! - a write always lands in the scratch tree, with missing parent
//!   directories created there on demand;
//! - paths outside both roots pass through untouched.
//!
//! Configuration is one environment variable:
//!
//! ```text
//! OVERDUB=/opt/app/dist:/var/lib/app/scratch \
//! LD_PRELOAD=liboverdub.so php -S 127.0.0.1:8080
//! ```
//!
//! If `OVERDUB` is unset the shim is behaviorally invisible.
//!
//! ## Quick Example
//!
//! The engine is an ordinary library underneath the shim and can be used
//! (and tested) directly:
//!
//! ```
//! use overdub::config::OverlayConfig;
//! use overdub::real::RealFs;
//! use overdub::resolve::{resolve, Intent, Resolution};
//! use std::path::Path;
//!
//! // An existence probe for a filesystem with no base copies at all.
//! struct Empty;
//! impl RealFs for Empty {
//!     fn exists(&self, _: &Path) -> bool {
//!         false
//!     }
//!     fn create_dir(&self, _: &Path, _: u32) -> std::io::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let config = OverlayConfig::new("/dist", "/var/scratch");
//! let resolved = resolve(&config, &Empty, Path::new("/dist/app/new.ini"), Intent::Read).unwrap();
//! assert!(matches!(resolved, Resolution::Scratch(p) if p == Path::new("/var/scratch/app/new.ini")));
//! ```
//!
//! ## Core Concepts
//!
//! - **Canonicalizer (`canon`)**: turns any input path into an absolute,
//!   lexically normalized form. Purely lexical: symlinks are never
//!   resolved.
//! - **Configuration (`config`)**: the `(base_root, scratch_root)` pair,
//!   parsed once per process from `OVERDUB`.
//! - **Resolver (`resolve`)**: the overlay decision (base copy if it
//!   exists, scratch otherwise), returning a tagged [`resolve::Resolution`]
//!   that tracks whether the input was rewritten.
//! - **Materializer (`materialize`)**: best-effort creation of missing
//!   scratch-side parent directories before create-type operations.
//! - **Real primitives (`real`)**: the unintercepted C library reached via
//!   `dlsym(RTLD_NEXT)`; the seam tests replace with fakes.
//! - **Dispatch (`interpose`)**: the exported `extern "C"` wrappers that
//!   route every intercepted call through the resolver.
//!
//! ## Control Flow
//!
//! Each intercepted call runs: dispatch → canonicalize → classify against
//! the roots → pick the physical path (probing the base candidate) →
//! optionally materialize scratch parents → call the real primitive →
//! return its result verbatim. Per-call failures degrade to the wrapped
//! primitive's own error convention; nothing here ever panics across the
//! FFI boundary.
//!
//! Diagnostics use the `log` crate; set `RUST_LOG=overdub=debug` to watch
//! every `original => canonical => resolved` transformation. The default
//! is silence.

#![warn(unsafe_op_in_unsafe_fn)]

pub mod canon;
pub mod config;
pub mod error;
pub mod interpose;
pub mod materialize;
pub mod real;
pub mod resolve;

#[cfg(test)]
mod canon_proptest;
