//! Stack evaluator for filter expressions in RPN, operating over nodes.
//!
//! Operands that start with `@` or `$` re-enter the segmenter and
//! dispatcher against the candidate node (`@`) or its document root (`$`).
//! A sub-path that resolves to zero or several nodes makes the whole
//! expression evaluate to "no result", which the enclosing filter treats as
//! false.

use crate::error::{Error, Result};
use crate::node::Node;
use crate::decoder::unmarshal_safe;

use super::filter::is_operator;
use super::{apply_path, parser::parse_path};

/// Names understood by the function-call syntax inside filters.
pub(crate) const FUNCTION_NAMES: [&str; 1] = ["length"];

/// Evaluates an RPN token run against `ctx`. `Ok(None)` means "no result".
pub(crate) fn eval(ctx: &Node, rpn: &[String]) -> Result<Option<Node>> {
    let mut stack: Vec<Node> = Vec::new();

    for token in rpn {
        if is_operator(token) {
            let Some(rhs) = stack.pop() else {
                return Err(Error::invalid_path(format!(
                    "insufficient operands for operator: {token}"
                )));
            };
            let Some(lhs) = stack.pop() else {
                return Err(Error::invalid_path(format!(
                    "insufficient operands for operator: {token}"
                )));
            };
            stack.push(apply_operation(token, &lhs, &rhs)?);
        } else if FUNCTION_NAMES.contains(&token.as_str()) {
            let Some(arg) = stack.pop() else {
                return Err(Error::invalid_path(format!(
                    "missing argument for function: {token}"
                )));
            };
            stack.push(apply_function(token, &arg)?);
        } else if token.starts_with('@') || token.starts_with('$') {
            let segments = parse_path(token)?;
            let selected = apply_path(ctx, &segments)?;
            if selected.len() == 1 {
                stack.push(selected.into_iter().next().unwrap_or_else(|| ctx.clone()));
            } else {
                tracing::debug!(
                    target: "quson::path::eval",
                    token = %token,
                    matches = selected.len(),
                    "sub-path did not resolve to a single node"
                );
                return Ok(None);
            }
        } else {
            stack.push(literal_operand(token)?);
        }
    }

    match stack.len() {
        1 => Ok(stack.pop()),
        0 => Ok(None),
        _ => Err(Error::invalid_path("invalid filter expression")),
    }
}

/// Materializes a literal token as a detached node: quoted text becomes a
/// string node, everything else re-routes through the JSON decoder.
fn literal_operand(token: &str) -> Result<Node> {
    let bytes = token.as_bytes();

    let quoted = |border: u8| {
        bytes.len() > 1 && bytes[0] == border && bytes[bytes.len() - 1] == border
    };
    if quoted(b'\'') || quoted(b'"') {
        let interior = &token[1..token.len() - 1];
        return Ok(Node::string("", interior));
    }

    unmarshal_safe(bytes)
        .map_err(|_| Error::invalid_path(format!("invalid operand in filter: {token}")))
}

fn apply_operation(op: &str, lhs: &Node, rhs: &Node) -> Result<Node> {
    match op {
        "==" => lhs.equals(rhs).map(|b| Node::boolean("", b)),
        "!=" => lhs.equals(rhs).map(|b| Node::boolean("", !b)),
        ">" => lhs.gt(rhs).map(|b| Node::boolean("", b)),
        ">=" => lhs.gte(rhs).map(|b| Node::boolean("", b)),
        "<" => lhs.lt(rhs).map(|b| Node::boolean("", b)),
        "<=" => lhs.lte(rhs).map(|b| Node::boolean("", b)),
        "&&" => {
            if !lhs.truthy()? {
                return Ok(Node::boolean("", false));
            }
            rhs.truthy().map(|b| Node::boolean("", b))
        }
        "||" => {
            if lhs.truthy()? {
                return Ok(Node::boolean("", true));
            }
            rhs.truthy().map(|b| Node::boolean("", b))
        }
        "+" | "-" | "*" | "/" | "%" => {
            let l = lhs.get_numeric()?;
            let r = rhs.get_numeric()?;
            let value = match op {
                "+" => l + r,
                "-" => l - r,
                "*" => l * r,
                "/" => l / r,
                _ => l % r,
            };
            Ok(Node::number("", value))
        }
        _ => Err(Error::invalid_path(format!("unknown operation: {op}"))),
    }
}

fn apply_function(name: &str, arg: &Node) -> Result<Node> {
    match name {
        "length" => length_function(arg),
        _ => Err(Error::invalid_path(format!("unknown function: {name}"))),
    }
}

/// `length(node)`: element count for containers, byte length for strings,
/// `1` for every other kind.
pub(crate) fn length_function(node: &Node) -> Result<Node> {
    if node.is_container() {
        return Ok(Node::number("", node.size() as f64));
    }
    if node.is_string() {
        let text = node.get_string()?;
        return Ok(Node::number("", text.len() as f64));
    }
    Ok(Node::number("", 1.0))
}
