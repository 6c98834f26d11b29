//! The decoder: drives the automaton over an input buffer and builds a
//! [`Node`] tree that remembers where each value came from.

use bytes::Bytes;

use crate::buffer::tables::{
    AC, AO, AR, CA, CN, CO, F1, GO, IN, KE, MI, N1, OB, OC, OE, OK, OO, ST, T1, VA, ZE, __,
};
use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::escape::unquote;
use crate::node::{Node, ValueType};

/// Hard cap on container nesting. Inputs deeper than this are rejected
/// rather than risking unbounded recursion further down the pipeline.
pub(crate) const MAX_NESTING_DEPTH: usize = 10_000;

/// Decodes a JSON document into a node tree sharing the given buffer.
///
/// The tree holds reference-counted slices of `data`, so the backing
/// allocation lives exactly as long as any node needs it.
pub fn unmarshal(data: Bytes) -> Result<Node> {
    decode(data)
}

/// Decodes a JSON document from a borrowed slice, copying it first so the
/// resulting tree owns its backing bytes. Use this when the caller's buffer
/// is scratch space that will be reused.
pub fn unmarshal_safe(data: &[u8]) -> Result<Node> {
    decode(Bytes::copy_from_slice(data))
}

fn decode(data: Bytes) -> Result<Node> {
    let mut buf = Buffer::new(&data);
    let mut key: Option<String> = None;
    let mut current: Option<Node> = None;
    let mut depth: usize = 0;

    buf.first().map_err(|_| Error::eof())?;

    loop {
        let state = buf.get_state();
        if state == __ {
            return Err(Error::unexpected_token(buf.index));
        }

        if state >= GO {
            match state {
                ST => {
                    let wants_key =
                        key.is_none() && current.as_ref().is_some_and(Node::is_object);
                    if wants_key {
                        key = Some(read_key(&mut buf)?);
                        buf.state = CO;
                    } else {
                        let node = Node::parsed(
                            current.as_ref(),
                            &data,
                            buf.index,
                            ValueType::String,
                            key.take(),
                        )?;
                        buf.string(b'"', false)?;
                        node.close_border(buf.index + 1);
                        buf.state = OK;
                        current = Some(node.parent().unwrap_or(node));
                    }
                }
                MI | ZE | IN => {
                    let node = Node::parsed(
                        current.as_ref(),
                        &data,
                        buf.index,
                        ValueType::Number,
                        key.take(),
                    )?;
                    buf.numeric(false)?;
                    node.close_border(buf.index);
                    // The numeric scan stops on the byte after the number.
                    buf.index -= 1;
                    buf.state = OK;
                    current = Some(node.parent().unwrap_or(node));
                }
                T1 | F1 => {
                    let node = Node::parsed(
                        current.as_ref(),
                        &data,
                        buf.index,
                        ValueType::Bool,
                        key.take(),
                    )?;
                    buf.word(if state == T1 { b"true" } else { b"false" })?;
                    node.close_border(buf.index + 1);
                    buf.state = OK;
                    current = Some(node.parent().unwrap_or(node));
                }
                N1 => {
                    let node = Node::parsed(
                        current.as_ref(),
                        &data,
                        buf.index,
                        ValueType::Null,
                        key.take(),
                    )?;
                    buf.word(b"null")?;
                    node.close_border(buf.index + 1);
                    buf.state = OK;
                    current = Some(node.parent().unwrap_or(node));
                }
                _ => return Err(Error::unexpected_token(buf.index)),
            }
        } else {
            match state {
                OE | OC => {
                    // An empty close arrives while a key would still be
                    // pending only on malformed input like `{"a":}`.
                    if state == OE && key.is_some() {
                        return Err(Error::unexpected_token(buf.index));
                    }
                    match &current {
                        Some(node) if node.is_object() && !node.ready() => {
                            node.close_border(buf.index + 1);
                            depth = depth.saturating_sub(1);
                            if let Some(parent) = node.parent() {
                                current = Some(parent);
                            }
                        }
                        _ => return Err(Error::unexpected_token(buf.index)),
                    }
                    buf.state = OK;
                }
                AC => {
                    match &current {
                        Some(node) if node.is_array() && !node.ready() => {
                            node.close_border(buf.index + 1);
                            depth = depth.saturating_sub(1);
                            if let Some(parent) = node.parent() {
                                current = Some(parent);
                            }
                        }
                        _ => return Err(Error::unexpected_token(buf.index)),
                    }
                    buf.state = OK;
                }
                OO => {
                    depth += 1;
                    check_depth(depth, buf.index)?;
                    let node = Node::parsed(
                        current.as_ref(),
                        &data,
                        buf.index,
                        ValueType::Object,
                        key.take(),
                    )?;
                    current = Some(node);
                    buf.state = OB;
                }
                AO => {
                    depth += 1;
                    check_depth(depth, buf.index)?;
                    let node = Node::parsed(
                        current.as_ref(),
                        &data,
                        buf.index,
                        ValueType::Array,
                        key.take(),
                    )?;
                    current = Some(node);
                    buf.state = AR;
                }
                CA => match &current {
                    Some(node) if node.is_object() => buf.state = KE,
                    Some(node) if node.is_array() => buf.state = VA,
                    _ => return Err(Error::unexpected_token(buf.index)),
                },
                CN => {
                    let in_object = current.as_ref().is_some_and(Node::is_object);
                    if !in_object || key.is_none() {
                        return Err(Error::unexpected_token(buf.index));
                    }
                    buf.state = VA;
                }
                _ => return Err(Error::unexpected_token(buf.index)),
            }
        }

        if buf.step().is_err() {
            break;
        }
        if buf.first().is_err() {
            break;
        }
    }

    let current = current.ok_or_else(Error::eof)?;
    if buf.state != OK {
        return Err(Error::eof());
    }

    let root = current.root();
    if !root.ready() {
        return Err(Error::eof());
    }
    Ok(root)
}

fn check_depth(depth: usize, index: usize) -> Result<()> {
    if depth > MAX_NESTING_DEPTH {
        tracing::warn!(
            target: "quson::decoder",
            depth,
            index,
            "rejecting input nested beyond the depth limit"
        );
        return Err(Error::nesting_too_deep(index));
    }
    Ok(())
}

/// Extracts an object key: advances through the quoted literal and decodes
/// its interior.
fn read_key(buf: &mut Buffer<'_>) -> Result<String> {
    let start = buf.index;
    buf.string(b'"', false)?;
    let raw = buf.slice_from_indices(start, buf.index + 1);
    unquote(raw, b'"').map_err(|_| Error::unexpected_token(start))
}
