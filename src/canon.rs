//! # Path Canonicalizer
//!
//! Converts any input path to an absolute, lexically normalized form.
//!
//! "Lexically" is the important word: this canonicalizer never touches the
//! filesystem (beyond a working-directory lookup for relative inputs) and
//! never resolves symlinks. It works purely on the bytes of the path:
//!
//! - runs of `/` collapse to one separator
//! - `.` segments are dropped
//! - a `..` segment removes the preceding real segment, stopping at the
//!   filesystem root (`/..` is `/`)
//! - a leading dot in a filename (`.foo`, `..bar`) is a literal name, not a
//!   dot token. Only a separator-bounded `.` or `..` is special
//!
//! The output is always a fresh, absolute [`PathBuf`] with no empty, `.`,
//! or `..` segments. Canonicalization is idempotent.
//!
//! Operating on raw bytes via [`std::os::unix::ffi::OsStrExt`] keeps
//! non-UTF-8 paths intact; POSIX paths are byte strings, not text.

use std::env;
use std::ffi::OsString;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Convert `path` to a canonical absolute path, without resolving symlinks.
///
/// Relative paths are resolved against the current working directory, which
/// is fetched fresh on every call since it can change between calls.
///
/// # Errors
///
/// Fails only when the working-directory lookup fails for a relative input;
/// a syntactically valid absolute path always canonicalizes.
pub fn canonicalize(path: &Path) -> Result<PathBuf> {
    let bytes = path.as_os_str().as_bytes();

    // Prepend the working directory unless the input is already absolute.
    let joined: Vec<u8>;
    let input: &[u8] = if bytes.first() == Some(&b'/') {
        bytes
    } else {
        let cwd = env::current_dir().map_err(|source| Error::WorkingDir { source })?;
        let mut buf = cwd.into_os_string().into_vec();
        buf.push(b'/');
        buf.extend_from_slice(bytes);
        joined = buf;
        &joined
    };

    let mut out: Vec<u8> = Vec::with_capacity(input.len().max(1));
    for segment in input.split(|&b| b == b'/') {
        match segment {
            b"" | b"." => {}
            b".." => {
                // Drop the previous segment, never ascending above the root.
                while let Some(b) = out.pop() {
                    if b == b'/' {
                        break;
                    }
                }
            }
            name => {
                out.push(b'/');
                out.extend_from_slice(name);
            }
        }
    }
    if out.is_empty() {
        out.push(b'/');
    }

    Ok(PathBuf::from(OsString::from_vec(out)))
}
