//! Extracting bundled libraries and loading them into the process
//!
//! Every call works in a fresh temporary directory:
//!
//! 1. create a uniquely named directory and schedule it for removal at exit
//! 2. resolve the resource
//! 3. copy it to `<dir>/<final name segment>`
//! 4. hand the absolute path to the dynamic loader
//!
//! Nothing is cached. Loading the same resource twice extracts and maps it
//! twice; whether the platform loader tolerates that is up to the platform.

mod dynamic;

pub use dynamic::*;

use crate::cleanup;
use crate::config::LoaderConfig;
use crate::resources::ResourceProvider;
use crate::utils::error::{ResloadError, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name used for an extracted resource: the text after the last `/`.
pub fn file_name_for(resource_name: &str) -> Result<&str> {
    let name = match resource_name.rfind('/') {
        Some(idx) => &resource_name[idx + 1..],
        None => resource_name,
    };
    if name.is_empty() || name == "." || name == ".." {
        return Err(ResloadError::InvalidResourceName(resource_name.to_string()));
    }
    Ok(name)
}

/// A resource copied to disk, not yet loaded
#[derive(Debug, Clone)]
pub struct ExtractedLibrary {
    /// Temporary directory owned by this extraction
    pub dir: PathBuf,
    /// Absolute path of the extracted file
    pub path: PathBuf,
    /// Number of bytes written
    pub size: u64,
}

/// Copy `stream` to `path`, replacing any existing file. The stream is
/// dropped before returning, whatever the outcome.
fn copy_to(mut stream: Box<dyn Read + '_>, path: &Path) -> io::Result<u64> {
    let mut file = File::create(path)?;
    io::copy(&mut stream, &mut file)
}

/// Loads libraries bundled in a [`ResourceProvider`]
pub struct LibraryLoader<P, D = SystemLoader> {
    resources: P,
    dynamic: D,
    config: LoaderConfig,
}

impl<P: ResourceProvider> LibraryLoader<P, SystemLoader> {
    pub fn new(resources: P) -> Self {
        Self::with_config(resources, LoaderConfig::default())
    }

    pub fn with_config(resources: P, config: LoaderConfig) -> Self {
        let dynamic = SystemLoader::from_config(&config);
        Self::with_dynamic_loader(resources, dynamic, config)
    }
}

impl<P: ResourceProvider, D: DynamicLoader> LibraryLoader<P, D> {
    pub fn with_dynamic_loader(resources: P, dynamic: D, config: LoaderConfig) -> Self {
        Self {
            resources,
            dynamic,
            config,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn resources(&self) -> &P {
        &self.resources
    }

    fn create_temp_dir(&self) -> io::Result<PathBuf> {
        let root = match self.config.temp_root {
            Some(ref root) => root.clone(),
            None => std::env::temp_dir(),
        };
        let root = if root.is_relative() {
            std::env::current_dir()?.join(root)
        } else {
            root
        };

        let dir = tempfile::Builder::new()
            .prefix(&self.config.temp_prefix)
            .tempdir_in(&root)?;
        Ok(dir.keep())
    }

    /// Copy the named resource into a fresh temporary directory.
    pub fn extract(&self, resource_name: &str) -> Result<ExtractedLibrary> {
        let file_name = file_name_for(resource_name)?;

        let dir = self
            .create_temp_dir()
            .map_err(|source| ResloadError::DirectoryCreationFailed {
                resource: resource_name.to_string(),
                source,
            })?;
        if self.config.cleanup_on_exit {
            cleanup::delete_on_exit(&dir);
        }
        debug!("Created {} for {}", dir.display(), resource_name);

        let stream = self
            .resources
            .open(resource_name)
            .map_err(|source| ResloadError::CopyFailed {
                resource: resource_name.to_string(),
                source,
            })?
            .ok_or_else(|| ResloadError::ResourceNotFound(resource_name.to_string()))?;

        let path = dir.join(file_name);
        let size = copy_to(stream, &path).map_err(|source| ResloadError::CopyFailed {
            resource: resource_name.to_string(),
            source,
        })?;
        debug!("Extracted {} ({} bytes) to {}", resource_name, size, path.display());

        Ok(ExtractedLibrary { dir, path, size })
    }

    /// Extract the named resource and map it into the process.
    ///
    /// The library stays loaded for the rest of the process lifetime.
    pub fn load_library(&self, resource_name: &str) -> Result<D::Library> {
        let extracted = self.extract(resource_name)?;

        let library = self
            .dynamic
            .load(&extracted.path)
            .map_err(|message| ResloadError::LoaderRejected {
                resource: resource_name.to_string(),
                path: extracted.path.clone(),
                message,
            })?;
        debug!("Loaded {} from {}", resource_name, extracted.path.display());

        Ok(library)
    }
}

/// Load a bundled library with the default configuration.
pub fn load_library<P: ResourceProvider>(resources: P, resource_name: &str) -> Result<LoadedLibrary> {
    LibraryLoader::new(resources).load_library(resource_name)
}
