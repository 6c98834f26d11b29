//! Pure byte-to-byte pretty printer.
//!
//! Two spaces per nesting level, `": "` between keys and values, a newline
//! after every comma, and empty containers kept on one line. String literal
//! contents pass through untouched, and whitespace between tokens is
//! normalized away so the transform is idempotent.

use crate::error::Result;

const INDENT: &[u8] = b"  ";

/// Re-renders compact JSON bytes with two-space indentation.
pub fn indent(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut level: usize = 0;
    let mut in_string = false;

    let mut i = 0;
    while i < data.len() {
        let c = data[i];

        if in_string {
            out.push(c);
            if c == b'\\' {
                // Keep the escaped byte with its backslash.
                if i + 1 < data.len() {
                    out.push(data[i + 1]);
                    i += 1;
                }
            } else if c == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match c {
            b'"' => {
                in_string = true;
                out.push(c);
            }
            b'{' | b'[' => {
                let empty_close = matches!(data.get(i + 1), Some(b'}') | Some(b']'));
                out.push(c);
                if empty_close {
                    i += 1;
                    out.push(data[i]);
                } else {
                    level += 1;
                    write_newline_and_indent(&mut out, level);
                }
            }
            b'}' | b']' => {
                level = level.saturating_sub(1);
                write_newline_and_indent(&mut out, level);
                out.push(c);
            }
            b',' => {
                out.push(c);
                write_newline_and_indent(&mut out, level);
            }
            b':' => {
                out.push(c);
                out.push(b' ');
            }
            b' ' | b'\t' | b'\r' | b'\n' => {}
            _ => out.push(c),
        }

        i += 1;
    }

    Ok(out)
}

fn write_newline_and_indent(out: &mut Vec<u8>, level: usize) {
    out.push(b'\n');
    for _ in 0..level {
        out.extend_from_slice(INDENT);
    }
}
