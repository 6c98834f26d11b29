//! Error types for parsing, node access and path evaluation.

mod types;

pub use types::{Error, ErrorKind, Result};
