//! Resource providers
//!
//! A resource is a named byte blob bundled with the application: compiled into
//! the binary, shipped in a zip archive, or laid out below a directory. Names
//! are path-like and always use `/` as the separator.

mod archive;
mod directory;
mod embedded;

pub use archive::ArchiveResources;
pub use directory::DirectoryResources;
pub use embedded::EmbeddedResources;

use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Maps a resource name to a readable byte stream.
pub trait ResourceProvider {
    /// Open the named resource.
    ///
    /// Returns `Ok(None)` when the resource does not exist. `Err` is reserved
    /// for failures while looking it up (unreadable archive, permissions).
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read + '_>>>;
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for &P {
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        (**self).open(name)
    }
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for Box<P> {
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        (**self).open(name)
    }
}

/// Ordered search path of providers; the first provider that has the
/// resource wins. Providers must be shareable across threads so a loader
/// built on a chain can serve concurrent callers.
#[derive(Default)]
pub struct ResourceChain {
    providers: Vec<Box<dyn ResourceProvider + Send + Sync>>,
}

impl ResourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, provider: impl ResourceProvider + Send + Sync + 'static) {
        self.providers.push(Box::new(provider));
    }

    pub fn with(mut self, provider: impl ResourceProvider + Send + Sync + 'static) -> Self {
        self.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ResourceProvider for ResourceChain {
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        for provider in &self.providers {
            if let Some(stream) = provider.open(name)? {
                return Ok(Some(stream));
            }
        }
        Ok(None)
    }
}

/// Build a provider for a path on disk: directories are searched directly,
/// regular files are opened as zip archives.
pub fn provider_for_path(path: &Path) -> io::Result<Box<dyn ResourceProvider + Send + Sync>> {
    if path.is_dir() {
        debug!("Using resource directory {}", path.display());
        Ok(Box::new(DirectoryResources::new(path)))
    } else {
        debug!("Using resource archive {}", path.display());
        Ok(Box::new(ArchiveResources::from_path(path)?))
    }
}

/// Read a resource fully. Mostly useful for inspection and tests.
pub fn read_resource(provider: &impl ResourceProvider, name: &str) -> io::Result<Option<Vec<u8>>> {
    match provider.open(name)? {
        Some(mut stream) => {
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf)?;
            Ok(Some(buf))
        }
        None => Ok(None),
    }
}
