//! resload library - load native libraries bundled as resources
//!
//! ```ignore
//! use resload::{load_library, EmbeddedResources};
//!
//! let resources = EmbeddedResources::new()
//!     .with("native/libfoo.so", &include_bytes!("../native/libfoo.so")[..]);
//! let lib = load_library(&resources, "native/libfoo.so")?;
//! ```
//!
//! Loading is a process-lifetime side effect: there is no unload.

#[cfg(not(unix))]
compile_error!("resload requires a Unix dynamic loader (dlopen)");

pub mod cleanup;
pub mod config;
pub mod loader;
pub mod resources;
pub mod utils;

pub use config::LoaderConfig;
pub use loader::{load_library, DynamicLoader, ExtractedLibrary, LibraryLoader, LoadedLibrary, SystemLoader};
pub use resources::{ArchiveResources, DirectoryResources, EmbeddedResources, ResourceChain, ResourceProvider};
pub use utils::error::{ErrorKind, ResloadError};
