//! # Unintercepted Primitives
//!
//! The resolver and materializer need two filesystem capabilities: an
//! existence probe and physical directory creation. Inside the preloaded
//! shim those *must not* go through the shim's own exported symbols: the
//! overlay probing itself through the overlay would recurse. They have to
//! reach the real C library behind us in the link order.
//!
//! Two pieces live here:
//!
//! - [`RealFs`]: the trait seam the engine depends on. Tests substitute
//!   in-memory fakes; the shim uses [`LibcFs`].
//! - [`RealFn`]: a named library function resolved lazily through
//!   `dlsym(RTLD_NEXT, name)` and cached in an [`AtomicPtr`] with
//!   first-writer-wins semantics. Every intercepted primitive in the
//!   dispatch layer owns one of these cells. A failed lookup is reported as
//!   [`Error::Unresolved`] (surfaced to callers as `ENOSYS`) and retried on
//!   the next call.

use std::ffi::{CStr, CString};
use std::io;
use std::marker::PhantomData;
use std::mem;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

use libc::{c_char, c_int, c_void};

use crate::error::{Error, Result};

/// The real (unintercepted) filesystem capabilities the engine needs.
///
/// Implementations must answer with the true state of the filesystem, not
/// the overlay's view of it.
pub trait RealFs {
    /// Does `path` exist? Follows symlinks, like `access(path, F_OK)`.
    fn exists(&self, path: &Path) -> bool;

    /// Create a single directory with the given mode bits.
    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()>;
}

/// A named library function, resolved once through the dynamic loader.
///
/// `F` is the function-pointer type of the real implementation. The cell
/// starts empty; the first successful `dlsym` wins the race to populate it
/// and every later call reuses the cached pointer. Readers observe either
/// the empty or the fully-resolved state, never anything partial.
pub struct RealFn<F> {
    symbol: &'static str,
    name: &'static CStr,
    ptr: AtomicPtr<c_void>,
    _signature: PhantomData<F>,
}

impl<F: Copy> RealFn<F> {
    /// Declare a lazily-resolved library function.
    ///
    /// `symbol` and `name` are the same identifier in `str` and C-string
    /// spelling; the first is for diagnostics, the second for `dlsym`.
    pub const fn new(symbol: &'static str, name: &'static CStr) -> Self {
        Self {
            symbol,
            name,
            ptr: AtomicPtr::new(ptr::null_mut()),
            _signature: PhantomData,
        }
    }

    /// The symbol this cell resolves.
    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// Fetch the real function, resolving and caching it on first use.
    ///
    /// # Errors
    ///
    /// [`Error::Unresolved`] when the dynamic loader cannot find the
    /// symbol. The cell stays empty so a later call retries.
    pub fn get(&self) -> Result<F> {
        debug_assert_eq!(mem::size_of::<F>(), mem::size_of::<*mut c_void>());
        let mut raw = self.ptr.load(Ordering::Acquire);
        if raw.is_null() {
            raw = unsafe { libc::dlsym(libc::RTLD_NEXT, self.name.as_ptr()) };
            if raw.is_null() {
                return Err(Error::Unresolved {
                    symbol: self.symbol,
                });
            }
            // First writer wins; a racing thread resolved the same symbol
            // to the same address anyway.
            let _ = self.ptr.compare_exchange(
                ptr::null_mut(),
                raw,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
        }
        // Size checked above; a non-null dlsym result is the function's
        // address in the next object along the search order.
        Ok(unsafe { mem::transmute_copy::<*mut c_void, F>(&raw) })
    }
}

type AccessFn = unsafe extern "C" fn(*const c_char, c_int) -> c_int;
type MkdirFn = unsafe extern "C" fn(*const c_char, libc::mode_t) -> c_int;

static REAL_ACCESS: RealFn<AccessFn> = RealFn::new("access", c"access");
static REAL_MKDIR: RealFn<MkdirFn> = RealFn::new("mkdir", c"mkdir");

/// [`RealFs`] over the real C library, behind the shim in link order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibcFs;

impl RealFs for LibcFs {
    fn exists(&self, path: &Path) -> bool {
        let Ok(access) = REAL_ACCESS.get() else {
            return false;
        };
        // An interior NUL cannot name an existing file.
        let Ok(cpath) = CString::new(path.as_os_str().as_bytes()) else {
            return false;
        };
        unsafe { access(cpath.as_ptr(), libc::F_OK) == 0 }
    }

    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mkdir = REAL_MKDIR
            .get()
            .map_err(|e| io::Error::from_raw_os_error(e.errno()))?;
        let cpath = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| io::Error::from_raw_os_error(libc::EINVAL))?;
        if unsafe { mkdir(cpath.as_ptr(), mode as libc::mode_t) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}
