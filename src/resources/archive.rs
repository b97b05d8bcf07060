//! Resources bundled in a zip archive (jar-style)

use super::ResourceProvider;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek};
use std::path::Path;
use std::sync::Mutex;
use zip::result::ZipError;
use zip::ZipArchive;

/// Zip archive entries addressed by their stored name.
///
/// Entries are decompressed into memory when opened, so the returned stream
/// does not hold the archive.
pub struct ArchiveResources<R> {
    archive: Mutex<ZipArchive<R>>,
}

impl ArchiveResources<File> {
    /// Open an archive on disk
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::new(file)
    }
}

impl<R: Read + Seek> ArchiveResources<R> {
    pub fn new(reader: R) -> io::Result<Self> {
        let archive = ZipArchive::new(reader).map_err(io::Error::other)?;
        Ok(Self {
            archive: Mutex::new(archive),
        })
    }

    /// Names of all entries in the archive
    pub fn names(&self) -> Vec<String> {
        let archive = self.archive.lock().unwrap_or_else(|e| e.into_inner());
        archive.file_names().map(str::to_owned).collect()
    }
}

impl<R: Read + Seek> ResourceProvider for ArchiveResources<R> {
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        let mut archive = self.archive.lock().unwrap_or_else(|e| e.into_inner());
        let mut entry = match archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(io::Error::other(e)),
        };
        if entry.is_dir() {
            return Ok(None);
        }

        // The declared size comes from the archive and is not trusted.
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf)?;
        Ok(Some(Box::new(Cursor::new(buf))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::read_resource;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn sample_archive() -> Cursor<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.add_directory("native/", options).unwrap();
        zip.start_file("native/libfoo.so", options).unwrap();
        zip.write_all(b"compressed library bytes").unwrap();
        zip.start_file("README", options.compression_method(CompressionMethod::Stored))
            .unwrap();
        zip.write_all(b"hello").unwrap();
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn reads_entries() {
        let resources = ArchiveResources::new(sample_archive()).unwrap();
        assert_eq!(
            read_resource(&resources, "native/libfoo.so").unwrap().unwrap(),
            b"compressed library bytes"
        );
        assert_eq!(read_resource(&resources, "README").unwrap().unwrap(), b"hello");
        assert!(resources.names().contains(&"native/libfoo.so".to_string()));
    }

    #[test]
    fn missing_entries_and_directories_are_absent() {
        let resources = ArchiveResources::new(sample_archive()).unwrap();
        assert!(resources.open("libfoo.so").unwrap().is_none());
        assert!(resources.open("native/").unwrap().is_none());
    }

    /// Rewrite every zip64 extra field whose uncompressed size is `from`.
    fn patch_zip64_size(bytes: &mut [u8], from: u64, to: u64) -> usize {
        let mut patched = 0;
        let mut i = 0;
        while i + 12 <= bytes.len() {
            let len = u16::from_le_bytes([bytes[i + 2], bytes[i + 3]]) as usize;
            if bytes[i] == 0x01 && bytes[i + 1] == 0x00 && len >= 8 {
                let field = &mut bytes[i + 4..i + 12];
                if u64::from_le_bytes(<[u8; 8]>::try_from(&field[..]).unwrap()) == from {
                    field.copy_from_slice(&to.to_le_bytes());
                    patched += 1;
                }
            }
            i += 1;
        }
        patched
    }

    #[test]
    fn bogus_declared_size_does_not_abort() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .large_file(true);
        zip.start_file("libfoo.so", options).unwrap();
        zip.write_all(b"bytes").unwrap();
        let mut bytes = zip.finish().unwrap().into_inner();
        assert!(patch_zip64_size(&mut bytes, 5, 1 << 62) > 0);

        let resources = match ArchiveResources::new(Cursor::new(bytes)) {
            Ok(resources) => resources,
            Err(_) => return,
        };
        if let Ok(Some(mut stream)) = resources.open("libfoo.so") {
            let mut buf = Vec::new();
            let _ = stream.read_to_end(&mut buf);
            assert!(buf.len() <= 5);
        };
    }

    #[test]
    fn rejects_non_archives() {
        assert!(ArchiveResources::new(Cursor::new(b"not a zip".to_vec())).is_err());
    }

    #[test]
    fn opens_archive_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.jar");
        std::fs::write(&path, sample_archive().into_inner()).unwrap();
        let resources = ArchiveResources::from_path(&path).unwrap();
        assert!(resources.open("README").unwrap().is_some());
    }
}
