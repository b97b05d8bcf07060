//! Mapping shared libraries into the running process via `dlopen(3)`
//!
//! Loading is irreversible: a [`LoadedLibrary`] never calls `dlclose`, so the
//! library and every symbol it exports stay mapped until the process exits.

use crate::config::{Binding, LoaderConfig, Visibility};
use std::ffi::{CStr, CString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use tracing::debug;

/// The platform facility that maps an on-disk shared library into the process.
pub trait DynamicLoader {
    /// Handle returned for a successfully mapped library.
    type Library;

    /// Map the library at `path`. On failure the loader's own message is
    /// returned unmodified.
    fn load(&self, path: &Path) -> std::result::Result<Self::Library, String>;
}

/// `dlopen`-based loader
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLoader {
    binding: Binding,
    visibility: Visibility,
}

impl SystemLoader {
    pub fn new(binding: Binding, visibility: Visibility) -> Self {
        Self {
            binding,
            visibility,
        }
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(config.binding, config.visibility)
    }

    fn flags(&self) -> libc::c_int {
        let binding = match self.binding {
            Binding::Now => libc::RTLD_NOW,
            Binding::Lazy => libc::RTLD_LAZY,
        };
        let visibility = match self.visibility {
            Visibility::Local => libc::RTLD_LOCAL,
            Visibility::Global => libc::RTLD_GLOBAL,
        };
        binding | visibility
    }
}

/// Last `dlerror()` message for the calling thread.
fn last_dl_error() -> String {
    let err = unsafe { libc::dlerror() };
    if err.is_null() {
        return "unknown dynamic loader error".to_string();
    }
    unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned()
}

impl DynamicLoader for SystemLoader {
    type Library = LoadedLibrary;

    fn load(&self, path: &Path) -> std::result::Result<LoadedLibrary, String> {
        let path_c = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| format!("path contains a NUL byte: {}", path.display()))?;

        debug!(
            "dlopen {} (binding={}, visibility={})",
            path.display(),
            self.binding,
            self.visibility
        );
        let handle = unsafe { libc::dlopen(path_c.as_ptr(), self.flags()) };
        match NonNull::new(handle) {
            Some(handle) => Ok(LoadedLibrary {
                handle,
                path: path.to_path_buf(),
            }),
            None => Err(last_dl_error()),
        }
    }
}

/// A library mapped for the rest of the process lifetime.
///
/// Dropping this value does not unload anything; it only forgets the handle.
#[derive(Debug)]
pub struct LoadedLibrary {
    handle: NonNull<libc::c_void>,
    path: PathBuf,
}

// dlopen handles are process-global and dlsym is thread-safe.
unsafe impl Send for LoadedLibrary {}
unsafe impl Sync for LoadedLibrary {}

impl LoadedLibrary {
    /// Path the library was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Address of an exported symbol, if the library (or its dependencies)
    /// defines it.
    pub fn symbol_address(&self, name: &str) -> Option<NonNull<libc::c_void>> {
        let name = CString::new(name).ok()?;
        NonNull::new(unsafe { libc::dlsym(self.handle.as_ptr(), name.as_ptr()) })
    }

    /// Look up an exported symbol as a value of type `T`, typically an
    /// `extern "C" fn` pointer.
    ///
    /// # Safety
    ///
    /// `T` must match the actual type of the symbol. Types that are not
    /// pointer-sized are rejected at compile time.
    pub unsafe fn symbol<T: Copy>(&self, name: &str) -> Option<T> {
        const {
            assert!(
                std::mem::size_of::<T>() == std::mem::size_of::<*mut libc::c_void>(),
                "symbol type must be pointer-sized"
            )
        };
        let addr = self.symbol_address(name)?.as_ptr();
        Some(std::mem::transmute_copy::<*mut libc::c_void, T>(&addr))
    }
}
