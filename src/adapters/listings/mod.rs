//! Listing source adapters.

mod json_directory;

pub use json_directory::{parse_source, JsonDirectorySource};
