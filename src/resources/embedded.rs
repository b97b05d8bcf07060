//! Resources compiled into the binary

use super::ResourceProvider;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{self, Cursor, Read};

/// In-memory resource table, usually filled with `include_bytes!`.
///
/// ```ignore
/// let resources = EmbeddedResources::new()
///     .with("native/libfoo.so", &include_bytes!("../native/libfoo.so")[..]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct EmbeddedResources {
    entries: HashMap<String, Cow<'static, [u8]>>,
}

impl EmbeddedResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) {
        self.entries.insert(name.into(), bytes.into());
    }

    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl ResourceProvider for EmbeddedResources {
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        Ok(self
            .entries
            .get(name)
            .map(|bytes| Box::new(Cursor::new(&bytes[..])) as Box<dyn Read + '_>))
    }
}
