//! JSONPath evaluation: segment dispatch over a node tree.
//!
//! A parsed path is a list of segment strings (see [`parser`]); evaluation
//! walks them left to right, mapping the current selection of nodes to the
//! next one. Within a segment, ordering follows the previous selection:
//! array children by index, object children in stored key order.

pub(crate) mod eval;
pub(crate) mod filter;
pub(crate) mod parser;

use crate::buffer::Buffer;
use crate::decoder::unmarshal_safe;
use crate::error::{Error, Result};
use crate::node::Node;

pub use parser::parse_path;

/// Evaluates a JSONPath expression against raw JSON bytes.
///
/// The data is decoded first; the returned nodes are live handles into the
/// resulting tree, so mutating them and re-marshaling the root works.
pub fn path(data: &[u8], path: &str) -> Result<Vec<Node>> {
    let segments =
        parse_path(path).map_err(|e| Error::invalid_path(format!("failed to parse path: {e}")))?;
    let root = unmarshal_safe(data)
        .map_err(|e| Error::invalid_path(format!("failed to unmarshal JSON: {e}")))?;
    apply_path(&root, &segments)
}

/// Path expressions of each node in the given collection.
#[must_use]
pub fn paths(nodes: &[Node]) -> Vec<String> {
    nodes.iter().map(Node::path).collect()
}

/// Applies pre-parsed segments to an existing tree.
///
/// A leading `$` seeds the selection with the node's document root, a
/// leading `@` with the node itself; this is also the re-entry point for
/// sub-paths inside filter expressions.
pub fn apply_path(node: &Node, segments: &[String]) -> Result<Vec<Node>> {
    let mut selection: Vec<Node> = Vec::new();

    for (i, segment) in segments.iter().enumerate() {
        if i == 0 && (segment == "$" || segment == "@") {
            selection.push(if segment == "$" {
                node.root()
            } else {
                node.clone()
            });
            continue;
        }
        selection = process_command(segment, selection)?;
    }

    Ok(selection)
}

/// Applies one segment to the current selection.
fn process_command(segment: &str, nodes: Vec<Node>) -> Result<Vec<Node>> {
    match segment {
        ".." => Ok(process_recursive_descent(nodes)),
        "*" => Ok(process_wildcard(nodes)),
        _ if segment.starts_with("?(") && segment.ends_with(')') => {
            process_filter(segment, nodes)
        }
        _ if segment.contains(':') => process_slice(segment, nodes),
        _ => process_key_union(segment, nodes),
    }
}

/// `..`: every selected container followed by all its container
/// descendants, direct children before their expansions.
fn process_recursive_descent(nodes: Vec<Node>) -> Vec<Node> {
    let mut result = Vec::new();
    for node in &nodes {
        if node.is_container() {
            result.push(node.clone());
        }
        result.extend(recursive_children(node));
    }
    result
}

fn recursive_children(node: &Node) -> Vec<Node> {
    let level: Vec<Node> = node
        .sorted_children()
        .into_iter()
        .filter(Node::is_container)
        .collect();

    let mut result = level.clone();
    for child in &level {
        result.extend(recursive_children(child));
    }
    result
}

/// `*`: the ordered children of every selected container.
fn process_wildcard(nodes: Vec<Node>) -> Vec<Node> {
    let mut result = Vec::new();
    for node in &nodes {
        result.extend(node.sorted_children());
    }
    result
}

/// `from:to[:step]`: arithmetic index selection over array nodes.
///
/// Empty components default to `0`, `size` and `1`; negative bounds are
/// relative to the array size; a non-positive step or an empty range
/// selects nothing.
fn process_slice(segment: &str, nodes: Vec<Node>) -> Result<Vec<Node>> {
    let (from, to, step) = parse_slice_params(segment)?;

    let mut result = Vec::new();
    for node in &nodes {
        if !node.is_array() {
            continue;
        }

        let size = node.size() as i64;
        let mut from = from.unwrap_or(0);
        let mut to = to.unwrap_or(size);
        if from < 0 {
            from += size;
        }
        if to < 0 {
            to += size;
        }
        from = from.clamp(0, size);
        to = to.clamp(0, size);

        if step <= 0 || from >= to {
            continue;
        }

        let mut i = from;
        while i < to {
            if let Ok(child) = node.get_index(i as isize) {
                result.push(child);
            }
            i += step;
        }
    }

    Ok(result)
}

fn parse_slice_params(segment: &str) -> Result<(Option<i64>, Option<i64>, i64)> {
    let parts: Vec<&str> = segment.split(':').collect();
    if parts.len() > 3 {
        return Err(Error::invalid_path("invalid slice path syntax"));
    }

    let parse = |text: &str, what: &str| -> Result<Option<i64>> {
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<i64>()
            .map(Some)
            .map_err(|_| Error::invalid_path(format!("invalid slice {what} value")))
    };

    let from = parse(parts[0], "from")?;
    let to = parse(parts.get(1).copied().unwrap_or(""), "to")?;
    let step = parse(parts.get(2).copied().unwrap_or(""), "step")?.unwrap_or(1);

    Ok((from, to, step))
}

/// `?(expr)`: keeps each direct child of every selected container for which
/// the filter evaluates to a truthy node. A sub-path that resolves to
/// nothing excludes the candidate; an evaluation error (a kind mismatch in
/// an ordering, say) aborts the whole query.
fn process_filter(segment: &str, nodes: Vec<Node>) -> Result<Vec<Node>> {
    let rpn = filter::parse_filter_expression(segment)?;

    let mut result = Vec::new();
    for node in &nodes {
        if !node.is_container() {
            continue;
        }
        for child in node.sorted_children() {
            if let Some(value) = eval::eval(&child, &rpn)? {
                if value.truthy()? {
                    result.push(child);
                }
            }
        }
    }

    Ok(result)
}

/// A comma-separated list of member names or array indices. Quoted names
/// are unwrapped; array parents also understand `length` and negative
/// indices.
fn process_key_union(segment: &str, nodes: Vec<Node>) -> Result<Vec<Node>> {
    let mut buf = Buffer::new(segment.as_bytes());
    let mut keys: Vec<String> = Vec::new();

    loop {
        let c = buf.first().map_err(|_| Error::eof())?;
        if c == b',' {
            return Err(Error::invalid_path("empty key in path union"));
        }

        let from = buf.index;
        buf.path_token()?;
        let mut key = String::from_utf8_lossy(buf.slice_from_indices(from, buf.index)).into_owned();
        if key.len() > 2 && key.starts_with('\'') && key.ends_with('\'') {
            key = key[1..key.len() - 1].to_string();
        }
        keys.push(key);

        match buf.first() {
            Err(_) => break,
            Ok(b',') => buf.step().map_err(|_| Error::eof())?,
            Ok(_) => return Err(Error::invalid_path("unexpected character in path union")),
        }
    }

    let mut result = Vec::new();
    for node in &nodes {
        if !node.is_container() {
            continue;
        }

        for key in &keys {
            if node.is_object() {
                if let Ok(child) = node.get_key(key) {
                    result.push(child);
                }
                continue;
            }

            // Array parent: `length` yields a synthetic count node, anything
            // else must be a decimal index (negative counts from the end).
            if key == "length" {
                result.push(eval::length_function(node)?);
            } else if let Ok(index) = key.parse::<isize>() {
                if let Ok(child) = node.get_index(index) {
                    result.push(child);
                }
            }
        }
    }

    Ok(result)
}
