//! The encoder: serializes a node tree back to bytes.
//!
//! Unmodified nodes that still reference their source reproduce it verbatim;
//! everything else is rendered from the materialized value. Cycles cannot
//! occur in well-formed trees because a container can never be adopted into
//! its own descendants.

use crate::error::{Error, Result};
use crate::node::{Node, ValueType};

/// Serializes `node` to JSON bytes.
pub fn marshal(node: &Node) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_node(&mut out, node)?;
    Ok(out)
}

fn write_node(out: &mut Vec<u8>, node: &Node) -> Result<()> {
    if node.changed() {
        match node.kind() {
            ValueType::Null => out.extend_from_slice(b"null"),
            ValueType::Number => {
                let value = node.get_numeric()?;
                out.extend_from_slice(format_number(value).as_bytes());
            }
            ValueType::String => {
                let value = node.get_string()?;
                write_quoted(out, &value);
            }
            ValueType::Bool => {
                let value = node.get_bool()?;
                out.extend_from_slice(if value { b"true" } else { b"false" });
            }
            ValueType::Array => {
                out.push(b'[');
                for i in 0..node.size() {
                    if i != 0 {
                        out.push(b',');
                    }
                    let element = node.get_index(i as isize).map_err(|_| {
                        Error::not_serializable(format!("array element {i} is not found"))
                    })?;
                    write_node(out, &element)?;
                }
                out.push(b']');
            }
            ValueType::Object => {
                out.push(b'{');
                let mut first = true;
                let members = node.get_object()?;
                for (key, member) in &members {
                    if !first {
                        out.push(b',');
                    }
                    first = false;
                    write_quoted(out, key);
                    out.push(b':');
                    write_node(out, member)?;
                }
                out.push(b'}');
            }
        }
        return Ok(());
    }

    if let Some(source) = node.source() {
        out.extend_from_slice(&source);
        return Ok(());
    }

    Err(Error::not_serializable(
        "node has neither source bytes nor a modified value",
    ))
}

/// Shortest decimal rendering of an `f64` that round-trips.
fn format_number(value: f64) -> String {
    format!("{value}")
}

/// JSON-quotes a decoded string: borders, the two mandatory escapes, the
/// short control escapes, and `\u00XX` for the remaining control bytes.
pub(crate) fn write_quoted(out: &mut Vec<u8>, s: &str) {
    out.push(b'"');
    for b in s.bytes() {
        match b {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x0C => out.extend_from_slice(b"\\f"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            b if b < 0x20 => {
                out.extend_from_slice(format!("\\u{:04x}", b).as_bytes());
            }
            b => out.push(b),
        }
    }
    out.push(b'"');
}
