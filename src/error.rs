//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `overdub` engine. It uses the `thiserror` library to create an `Error`
//! enum covering the few failure modes the path-resolution core can hit,
//! together with a crate-wide `Result<T>` alias.
//!
//! The error surface is deliberately small. Almost everything this crate
//! does either succeeds, falls back to passthrough, or is best-effort and
//! swallowed (directory materialization). The two genuine per-call failure
//! modes are:
//!
//! - **`WorkingDir`**: the current working directory could not be
//!   determined while canonicalizing a relative path.
//! - **`Unresolved`**: the real implementation of an intercepted primitive
//!   could not be located via the dynamic loader.
//!
//! The interception layer maps both onto the primitive's sentinel return
//! value with an appropriate `errno`; neither ever aborts the process.

use thiserror::Error;

/// Main error type for overdub path resolution.
#[derive(Error, Debug)]
pub enum Error {
    /// The current working directory could not be obtained.
    ///
    /// Canonicalizing a relative path requires the working directory, which
    /// is fetched fresh on every call (it can change between calls). This
    /// is the only way canonicalization of a syntactically valid path can
    /// fail.
    #[error("could not determine working directory: {source}")]
    WorkingDir {
        #[source]
        source: std::io::Error,
    },

    /// The real implementation of a library function could not be resolved.
    ///
    /// The interception layer reports this to the caller as the wrapped
    /// primitive's error sentinel with `errno` set to `ENOSYS`.
    #[error("could not resolve real implementation of {symbol}")]
    Unresolved { symbol: &'static str },
}

impl Error {
    /// The `errno` value the interception layer should report for this
    /// error when failing an intercepted call.
    pub fn errno(&self) -> i32 {
        match self {
            Error::WorkingDir { source } => source.raw_os_error().unwrap_or(libc::ENOENT),
            Error::Unresolved { .. } => libc::ENOSYS,
        }
    }
}

/// Result type alias for overdub operations.
pub type Result<T> = std::result::Result<T, Error>;
