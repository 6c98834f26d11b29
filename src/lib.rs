//! quson — a JSON document toolkit.
//!
//! Parses a JSON byte stream into a mutable tree whose nodes remember the
//! byte range that produced them, re-serializes unmodified sub-trees
//! byte-for-byte, and queries the tree with JSONPath expressions including
//! slices, unions, recursive descent and filter predicates.
//!
//! # Decoding and fidelity
//!
//! ```
//! use quson::{unmarshal_safe, marshal};
//!
//! let root = unmarshal_safe(br#"{"name":"John","age":30}"#).expect("valid JSON");
//! // Untouched trees round-trip exactly.
//! assert_eq!(marshal(&root).expect("marshal"), br#"{"name":"John","age":30}"#);
//!
//! root.must_key("age").set_number(31.0).expect("set");
//! assert!(root.changed());
//! ```
//!
//! # Path queries
//!
//! ```
//! use quson::path;
//!
//! let data = br#"{"store":{"book":[{"price":8.95},{"price":12.99}]}}"#;
//! let cheap = path(data, "$.store.book[?(@.price < 10)].price").expect("query");
//! assert_eq!(cheap.len(), 1);
//! assert_eq!(cheap[0].must_numeric(), 8.95);
//! ```

mod buffer;
mod decoder;
mod encoder;
mod error;
mod escape;
mod indent;
mod interop;
mod literals;
mod node;
mod path;

pub use bytes::Bytes;
pub use decoder::{unmarshal, unmarshal_safe};
pub use encoder::marshal;
pub use error::{Error, ErrorKind, Result};
pub use indent::indent;
pub use literals::{
    parse_bool_literal, parse_float_literal, parse_int_literal, parse_string_literal,
};
pub use node::{must, Node, Value, ValueType};
pub use path::{apply_path, parse_path, path, paths};
