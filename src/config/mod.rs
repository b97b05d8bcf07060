//! Loader configuration

mod loader;

pub use loader::*;
