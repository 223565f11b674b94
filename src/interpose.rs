//! # Interception Dispatch
//!
//! The mechanical layer: one `#[no_mangle] extern "C"` wrapper per POSIX
//! path primitive, exported so the dynamic linker binds the application's
//! calls here when the shim is preloaded. Every wrapper follows the same
//! contract:
//!
//! 1. fetch the real primitive through its cached [`RealFn`] cell;
//!    an unresolvable symbol fails the call with `ENOSYS`;
//! 2. resolve each path argument through the overlay engine, with
//!    [`Intent::Create`] only on arguments naming a path being created or
//!    overwritten (both arguments of two-path calls must resolve before
//!    anything is invoked);
//! 3. on resolution failure, set `errno` and return the primitive's error
//!    sentinel without calling through;
//! 4. invoke the real primitive with the resolved paths;
//! 5. return its result and `errno` untouched.
//!
//! Rewritten paths live in [`CString`]s owned by the wrapper's stack frame,
//! so they are released on every exit path; an [`Arg::Passthrough`] carries
//! the caller's own pointer and there is nothing to free. No wrapper body
//! can panic: every fallible step is matched explicitly.
//!
//! The C original exposed `open` as a variadic, reading the `mode` argument
//! only when `O_CREAT` was set. The wrapper here declares a fixed third
//! argument instead; on the System V ABI reading the register is harmless
//! when the caller omitted it, and the value is only meaningful to the real
//! `open` when `O_CREAT` is present.

use std::ffi::{CStr, CString, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use libc::{c_char, c_int, c_void, gid_t, mode_t, off_t, size_t, ssize_t, uid_t, DIR, FILE};

use crate::real::{LibcFs, RealFn};
use crate::resolve::{resolve_or_passthrough, Intent, Resolution};

/// Set the calling thread's `errno`.
fn set_errno(code: c_int) {
    unsafe {
        *libc::__errno_location() = code;
    }
}

/// Fail an integer-returning call: set `errno`, yield the sentinel.
fn fail_int(code: c_int) -> c_int {
    set_errno(code);
    -1
}

fn fail_ssize(code: c_int) -> ssize_t {
    set_errno(code);
    -1
}

fn fail_ptr<T>(code: c_int) -> *mut T {
    set_errno(code);
    ptr::null_mut()
}

/// A path argument ready to hand to the real primitive.
///
/// `Passthrough` carries the caller's pointer unchanged; `Rewritten` owns
/// the redirected path and frees it when the wrapper returns.
enum Arg {
    Passthrough(*const c_char),
    Rewritten(CString),
}

impl Arg {
    fn as_ptr(&self) -> *const c_char {
        match self {
            Arg::Passthrough(p) => *p,
            Arg::Rewritten(c) => c.as_ptr(),
        }
    }
}

/// Resolve one path argument per the dispatch contract.
///
/// On `Err` the wrapper must return its sentinel; `errno` is already set.
///
/// # Safety
///
/// `raw` must be null or a valid NUL-terminated string for the duration of
/// the call (the same requirement the real primitive has).
unsafe fn resolve_arg(raw: *const c_char, intent: Intent) -> Result<Arg, ()> {
    if raw.is_null() {
        // The real primitive reports EFAULT/EINVAL as it sees fit.
        return Ok(Arg::Passthrough(raw));
    }
    let bytes = unsafe { CStr::from_ptr(raw) }.to_bytes();
    let path = Path::new(OsStr::from_bytes(bytes));
    match resolve_or_passthrough(&LibcFs, path, intent) {
        Ok(Resolution::Unchanged(_)) => Ok(Arg::Passthrough(raw)),
        Ok(rewritten) => {
            match CString::new(rewritten.path().as_os_str().as_bytes()) {
                Ok(cpath) => Ok(Arg::Rewritten(cpath)),
                // Unreachable in practice: the bytes came from a C string.
                Err(_) => {
                    set_errno(libc::ENOENT);
                    Err(())
                }
            }
        }
        Err(err) => {
            set_errno(err.errno());
            Err(())
        }
    }
}

// ---------------------------------------------------------------------------
// stat family
// ---------------------------------------------------------------------------

#[no_mangle]
pub unsafe extern "C" fn stat(path: *const c_char, buf: *mut libc::stat) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, *mut libc::stat) -> c_int> =
        RealFn::new("stat", c"stat");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), buf) }
}

#[no_mangle]
pub unsafe extern "C" fn lstat(path: *const c_char, buf: *mut libc::stat) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, *mut libc::stat) -> c_int> =
        RealFn::new("lstat", c"lstat");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), buf) }
}

// Legacy glibc versioned-stat entry points; PHP and friends still hit these
// through older binaries.
#[no_mangle]
pub unsafe extern "C" fn __xstat(ver: c_int, path: *const c_char, buf: *mut libc::stat) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(c_int, *const c_char, *mut libc::stat) -> c_int> =
        RealFn::new("__xstat", c"__xstat");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(ver, arg.as_ptr(), buf) }
}

#[no_mangle]
pub unsafe extern "C" fn __lxstat(ver: c_int, path: *const c_char, buf: *mut libc::stat) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(c_int, *const c_char, *mut libc::stat) -> c_int> =
        RealFn::new("__lxstat", c"__lxstat");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(ver, arg.as_ptr(), buf) }
}

// ---------------------------------------------------------------------------
// single-path metadata and access
// ---------------------------------------------------------------------------

#[no_mangle]
pub unsafe extern "C" fn access(path: *const c_char, mode: c_int) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, c_int) -> c_int> =
        RealFn::new("access", c"access");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), mode) }
}

#[no_mangle]
pub unsafe extern "C" fn chdir(path: *const c_char) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char) -> c_int> =
        RealFn::new("chdir", c"chdir");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr()) }
}

#[no_mangle]
pub unsafe extern "C" fn chmod(path: *const c_char, mode: mode_t) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, mode_t) -> c_int> =
        RealFn::new("chmod", c"chmod");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), mode) }
}

#[no_mangle]
pub unsafe extern "C" fn chown(path: *const c_char, owner: uid_t, group: gid_t) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, uid_t, gid_t) -> c_int> =
        RealFn::new("chown", c"chown");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), owner, group) }
}

#[no_mangle]
pub unsafe extern "C" fn lchown(path: *const c_char, owner: uid_t, group: gid_t) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, uid_t, gid_t) -> c_int> =
        RealFn::new("lchown", c"lchown");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), owner, group) }
}

#[no_mangle]
pub unsafe extern "C" fn truncate(path: *const c_char, length: off_t) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, off_t) -> c_int> =
        RealFn::new("truncate", c"truncate");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), length) }
}

#[no_mangle]
pub unsafe extern "C" fn utime(path: *const c_char, times: *const libc::utimbuf) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, *const libc::utimbuf) -> c_int> =
        RealFn::new("utime", c"utime");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), times) }
}

#[no_mangle]
pub unsafe extern "C" fn utimes(path: *const c_char, times: *const libc::timeval) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, *const libc::timeval) -> c_int> =
        RealFn::new("utimes", c"utimes");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), times) }
}

#[no_mangle]
pub unsafe extern "C" fn unlink(path: *const c_char) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char) -> c_int> =
        RealFn::new("unlink", c"unlink");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr()) }
}

#[no_mangle]
pub unsafe extern "C" fn rmdir(path: *const c_char) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char) -> c_int> =
        RealFn::new("rmdir", c"rmdir");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr()) }
}

#[no_mangle]
pub unsafe extern "C" fn readlink(
    path: *const c_char,
    buf: *mut c_char,
    bufsiz: size_t,
) -> ssize_t {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, *mut c_char, size_t) -> ssize_t> =
        RealFn::new("readlink", c"readlink");
    let Ok(real) = REAL.get() else {
        return fail_ssize(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), buf, bufsiz) }
}

// ---------------------------------------------------------------------------
// open / create family
// ---------------------------------------------------------------------------

#[no_mangle]
pub unsafe extern "C" fn open(path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, c_int, mode_t) -> c_int> =
        RealFn::new("open", c"open");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let intent = if flags & libc::O_CREAT != 0 {
        Intent::Create
    } else {
        Intent::Read
    };
    let Ok(arg) = (unsafe { resolve_arg(path, intent) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), flags, mode) }
}

#[no_mangle]
pub unsafe extern "C" fn creat(path: *const c_char, mode: mode_t) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, mode_t) -> c_int> =
        RealFn::new("creat", c"creat");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Create) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), mode) }
}

#[no_mangle]
pub unsafe extern "C" fn fopen(path: *const c_char, mode: *const c_char) -> *mut FILE {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, *const c_char) -> *mut FILE> =
        RealFn::new("fopen", c"fopen");
    let Ok(real) = REAL.get() else {
        return fail_ptr(libc::ENOSYS);
    };
    // Only "w" and "a" modes create the file.
    let first = if mode.is_null() {
        0
    } else {
        (unsafe { *mode }) as u8
    };
    let intent = if first == b'w' || first == b'a' {
        Intent::Create
    } else {
        Intent::Read
    };
    let Ok(arg) = (unsafe { resolve_arg(path, intent) }) else {
        return ptr::null_mut();
    };
    unsafe { real(arg.as_ptr(), mode) }
}

#[no_mangle]
pub unsafe extern "C" fn opendir(path: *const c_char) -> *mut DIR {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char) -> *mut DIR> =
        RealFn::new("opendir", c"opendir");
    let Ok(real) = REAL.get() else {
        return fail_ptr(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return ptr::null_mut();
    };
    unsafe { real(arg.as_ptr()) }
}

#[no_mangle]
pub unsafe extern "C" fn mkdir(path: *const c_char, mode: mode_t) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, mode_t) -> c_int> =
        RealFn::new("mkdir", c"mkdir");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Create) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), mode) }
}

// ---------------------------------------------------------------------------
// two-path operations
// ---------------------------------------------------------------------------

#[no_mangle]
pub unsafe extern "C" fn rename(old: *const c_char, new: *const c_char) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, *const c_char) -> c_int> =
        RealFn::new("rename", c"rename");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(src) = (unsafe { resolve_arg(old, Intent::Read) }) else {
        return -1;
    };
    let Ok(dst) = (unsafe { resolve_arg(new, Intent::Create) }) else {
        return -1;
    };
    unsafe { real(src.as_ptr(), dst.as_ptr()) }
}

#[no_mangle]
pub unsafe extern "C" fn link(old: *const c_char, new: *const c_char) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, *const c_char) -> c_int> =
        RealFn::new("link", c"link");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(src) = (unsafe { resolve_arg(old, Intent::Read) }) else {
        return -1;
    };
    let Ok(dst) = (unsafe { resolve_arg(new, Intent::Create) }) else {
        return -1;
    };
    unsafe { real(src.as_ptr(), dst.as_ptr()) }
}

#[no_mangle]
pub unsafe extern "C" fn symlink(target: *const c_char, linkpath: *const c_char) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, *const c_char) -> c_int> =
        RealFn::new("symlink", c"symlink");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(src) = (unsafe { resolve_arg(target, Intent::Read) }) else {
        return -1;
    };
    let Ok(dst) = (unsafe { resolve_arg(linkpath, Intent::Create) }) else {
        return -1;
    };
    unsafe { real(src.as_ptr(), dst.as_ptr()) }
}

// ---------------------------------------------------------------------------
// temp-file creation
// ---------------------------------------------------------------------------
//
// These take a mutable template the real call scribbles the generated name
// into. When the template is rewritten into the scratch tree, the real
// call mutates the rewritten copy; the fd-returning variants leave the
// caller's template untouched (the descriptor is the useful result).
// mktemp's only output is the name, so its generated final component is
// copied back into the caller's template.

/// Run `real` on a rewritten, heap-owned copy of the template, returning
/// the call's result and the mutated buffer (NUL terminator included).
///
/// The buffer stays a `Vec` across the call so its allocation metadata is
/// ours no matter what the callee writes into it.
fn call_with_template<R>(cpath: CString, real: impl FnOnce(*mut c_char) -> R) -> (R, Vec<u8>) {
    let mut buf = cpath.into_bytes_with_nul();
    let ret = real(buf.as_mut_ptr().cast::<c_char>());
    (ret, buf)
}

#[no_mangle]
pub unsafe extern "C" fn mkstemp(template: *mut c_char) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*mut c_char) -> c_int> =
        RealFn::new("mkstemp", c"mkstemp");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    match unsafe { resolve_arg(template.cast_const(), Intent::Create) } {
        Err(()) => -1,
        Ok(Arg::Passthrough(_)) => unsafe { real(template) },
        Ok(Arg::Rewritten(cpath)) => {
            let (ret, _) = call_with_template(cpath, |raw| unsafe { real(raw) });
            ret
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn mkstemps(template: *mut c_char, suffixlen: c_int) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*mut c_char, c_int) -> c_int> =
        RealFn::new("mkstemps", c"mkstemps");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    match unsafe { resolve_arg(template.cast_const(), Intent::Create) } {
        Err(()) => -1,
        Ok(Arg::Passthrough(_)) => unsafe { real(template, suffixlen) },
        Ok(Arg::Rewritten(cpath)) => {
            let (ret, _) = call_with_template(cpath, |raw| unsafe { real(raw, suffixlen) });
            ret
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn mkostemp(template: *mut c_char, flags: c_int) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*mut c_char, c_int) -> c_int> =
        RealFn::new("mkostemp", c"mkostemp");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    match unsafe { resolve_arg(template.cast_const(), Intent::Create) } {
        Err(()) => -1,
        Ok(Arg::Passthrough(_)) => unsafe { real(template, flags) },
        Ok(Arg::Rewritten(cpath)) => {
            let (ret, _) = call_with_template(cpath, |raw| unsafe { real(raw, flags) });
            ret
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn mkostemps(template: *mut c_char, suffixlen: c_int, flags: c_int) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*mut c_char, c_int, c_int) -> c_int> =
        RealFn::new("mkostemps", c"mkostemps");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    match unsafe { resolve_arg(template.cast_const(), Intent::Create) } {
        Err(()) => -1,
        Ok(Arg::Passthrough(_)) => unsafe { real(template, suffixlen, flags) },
        Ok(Arg::Rewritten(cpath)) => {
            let (ret, _) =
                call_with_template(cpath, |raw| unsafe { real(raw, suffixlen, flags) });
            ret
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn mktemp(template: *mut c_char) -> *mut c_char {
    static REAL: RealFn<unsafe extern "C" fn(*mut c_char) -> *mut c_char> =
        RealFn::new("mktemp", c"mktemp");
    let Ok(real) = REAL.get() else {
        return fail_ptr(libc::ENOSYS);
    };
    match unsafe { resolve_arg(template.cast_const(), Intent::Create) } {
        Err(()) => ptr::null_mut(),
        Ok(Arg::Passthrough(_)) => unsafe { real(template) },
        Ok(Arg::Rewritten(cpath)) => {
            let (ret, buf) = call_with_template(cpath, |raw| unsafe { real(raw) });
            if ret.is_null() || buf.first() == Some(&0) {
                // Propagate the failure signal into the caller's template.
                unsafe { *template = 0 };
                return if ret.is_null() { ptr::null_mut() } else { template };
            }
            // The generated name is the only output; copy the final
            // component back so the caller's template names the file the
            // real call produced. Both spell the same basename, so the
            // lengths match.
            unsafe { copy_basename_back(&buf[..buf.len() - 1], template) };
            template
        }
    }
}

/// Overwrite the final path component of `template` with the final
/// component of `generated`.
///
/// # Safety
///
/// `template` must point to a writable NUL-terminated string whose final
/// component has the same length as `generated`'s.
unsafe fn copy_basename_back(generated: &[u8], template: *mut c_char) {
    let gen_base = match generated.iter().rposition(|&b| b == b'/') {
        Some(i) => &generated[i + 1..],
        None => generated,
    };
    let tmpl = unsafe { CStr::from_ptr(template) }.to_bytes();
    let tmpl_start = match tmpl.iter().rposition(|&b| b == b'/') {
        Some(i) => i + 1,
        None => 0,
    };
    if tmpl.len() - tmpl_start != gen_base.len() {
        return;
    }
    unsafe {
        ptr::copy_nonoverlapping(
            gen_base.as_ptr().cast::<c_char>(),
            template.add(tmpl_start),
            gen_base.len(),
        );
    }
}

// ---------------------------------------------------------------------------
// extended attributes
// ---------------------------------------------------------------------------

#[no_mangle]
pub unsafe extern "C" fn getxattr(
    path: *const c_char,
    name: *const c_char,
    value: *mut c_void,
    size: size_t,
) -> ssize_t {
    static REAL: RealFn<
        unsafe extern "C" fn(*const c_char, *const c_char, *mut c_void, size_t) -> ssize_t,
    > = RealFn::new("getxattr", c"getxattr");
    let Ok(real) = REAL.get() else {
        return fail_ssize(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), name, value, size) }
}

#[no_mangle]
pub unsafe extern "C" fn lgetxattr(
    path: *const c_char,
    name: *const c_char,
    value: *mut c_void,
    size: size_t,
) -> ssize_t {
    static REAL: RealFn<
        unsafe extern "C" fn(*const c_char, *const c_char, *mut c_void, size_t) -> ssize_t,
    > = RealFn::new("lgetxattr", c"lgetxattr");
    let Ok(real) = REAL.get() else {
        return fail_ssize(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), name, value, size) }
}

#[no_mangle]
pub unsafe extern "C" fn setxattr(
    path: *const c_char,
    name: *const c_char,
    value: *const c_void,
    size: size_t,
    flags: c_int,
) -> c_int {
    static REAL: RealFn<
        unsafe extern "C" fn(*const c_char, *const c_char, *const c_void, size_t, c_int) -> c_int,
    > = RealFn::new("setxattr", c"setxattr");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), name, value, size, flags) }
}

#[no_mangle]
pub unsafe extern "C" fn lsetxattr(
    path: *const c_char,
    name: *const c_char,
    value: *const c_void,
    size: size_t,
    flags: c_int,
) -> c_int {
    static REAL: RealFn<
        unsafe extern "C" fn(*const c_char, *const c_char, *const c_void, size_t, c_int) -> c_int,
    > = RealFn::new("lsetxattr", c"lsetxattr");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), name, value, size, flags) }
}

#[no_mangle]
pub unsafe extern "C" fn listxattr(path: *const c_char, list: *mut c_char, size: size_t) -> ssize_t {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, *mut c_char, size_t) -> ssize_t> =
        RealFn::new("listxattr", c"listxattr");
    let Ok(real) = REAL.get() else {
        return fail_ssize(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), list, size) }
}

#[no_mangle]
pub unsafe extern "C" fn llistxattr(
    path: *const c_char,
    list: *mut c_char,
    size: size_t,
) -> ssize_t {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, *mut c_char, size_t) -> ssize_t> =
        RealFn::new("llistxattr", c"llistxattr");
    let Ok(real) = REAL.get() else {
        return fail_ssize(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), list, size) }
}

#[no_mangle]
pub unsafe extern "C" fn removexattr(path: *const c_char, name: *const c_char) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, *const c_char) -> c_int> =
        RealFn::new("removexattr", c"removexattr");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), name) }
}

#[no_mangle]
pub unsafe extern "C" fn lremovexattr(path: *const c_char, name: *const c_char) -> c_int {
    static REAL: RealFn<unsafe extern "C" fn(*const c_char, *const c_char) -> c_int> =
        RealFn::new("lremovexattr", c"lremovexattr");
    let Ok(real) = REAL.get() else {
        return fail_int(libc::ENOSYS);
    };
    let Ok(arg) = (unsafe { resolve_arg(path, Intent::Read) }) else {
        return -1;
    };
    unsafe { real(arg.as_ptr(), name) }
}
