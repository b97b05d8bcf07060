//! Resources laid out below a directory

use super::ResourceProvider;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

/// Resolves `a/b/libfoo.so` to `<root>/a/b/libfoo.so`.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a resource name below the root; names that would escape it map to
    /// nothing.
    fn locate(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let mut path = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(path)
    }
}

impl ResourceProvider for DirectoryResources {
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        let Some(path) = self.locate(name) else {
            return Ok(None);
        };
        if !path.is_file() {
            return Ok(None);
        }
        let file = File::open(&path)?;
        Ok(Some(Box::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::read_resource;

    #[test]
    fn resolves_nested_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("native/linux")).unwrap();
        std::fs::write(dir.path().join("native/linux/libfoo.so"), b"elf").unwrap();

        let resources = DirectoryResources::new(dir.path());
        assert_eq!(
            read_resource(&resources, "native/linux/libfoo.so").unwrap().unwrap(),
            b"elf"
        );
        assert!(read_resource(&resources, "native/libfoo.so").unwrap().is_none());
    }

    #[test]
    fn directories_are_not_resources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("native")).unwrap();
        let resources = DirectoryResources::new(dir.path());
        assert!(resources.open("native").unwrap().is_none());
    }

    #[test]
    fn refuses_to_escape_root() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("root");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.so"), b"x").unwrap();

        let resources = DirectoryResources::new(&root);
        assert!(resources.open("../secret.so").unwrap().is_none());
        let absolute = outer.path().join("secret.so");
        assert!(resources.open(absolute.to_str().unwrap()).unwrap().is_none());
    }
}
