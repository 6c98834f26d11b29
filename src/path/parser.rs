//! JSONPath segmenter: splits a path string into ordered segment strings.
//!
//! The closed segment set is `$`, `@`, `..`, `*`, a bare member name, a
//! union (`'a','b'` / `0,2`), a slice (`from:to:step`) and a filter
//! (`?(expr)` kept verbatim). Bracket contents that are not a single quoted
//! name run to the *matching* `]`, so unions and filters may contain nested
//! brackets and quotes.

use crate::buffer::Buffer;
use crate::error::{Error, Result};

/// Splits `path` into segments for the dispatcher.
pub fn parse_path(path: &str) -> Result<Vec<String>> {
    let mut buf = Buffer::new(path.as_bytes());
    let mut segments: Vec<String> = Vec::new();

    loop {
        let Ok(b) = buf.current() else { break };
        match b {
            b'$' => segments.push("$".to_string()),
            b'@' => segments.push("@".to_string()),
            b'.' => process_dot(&mut buf, &mut segments)?,
            b'[' => process_bracket(&mut buf, &mut segments)?,
            _ => {
                return Err(Error::invalid_path(format!(
                    "unexpected character in path at index {}",
                    buf.index
                )))
            }
        }
        if buf.step().is_err() {
            break;
        }
    }

    Ok(segments)
}

/// Handles a `.`: either the recursive-descent marker or a leaf name that
/// runs to the next `.` or `[`.
fn process_dot(buf: &mut Buffer<'_>, segments: &mut Vec<String>) -> Result<()> {
    let start = buf.index;

    let Ok(b) = buf.next() else {
        // A trailing dot selects nothing extra.
        return Ok(());
    };

    if b == b'.' {
        segments.push("..".to_string());
        buf.index -= 1;
        return Ok(());
    }

    let stop = match buf.skip_any(&[b'.', b'[']) {
        Ok(delimiter) => {
            buf.index -= 1;
            delimiter
        }
        Err(_) => buf.length,
    };

    if start + 1 < stop {
        let text = buf.slice_from_indices(start + 1, stop);
        segments.push(String::from_utf8_lossy(text).into_owned());
    }
    Ok(())
}

/// Handles a `[`: a single `'name'` collapses to the bare name, anything
/// else is kept verbatim up to the matching `]`.
fn process_bracket(buf: &mut Buffer<'_>, segments: &mut Vec<String>) -> Result<()> {
    let b = buf.next().map_err(|_| Error::eof())?;
    let start = buf.index;

    if b == b'\'' {
        buf.string(b'\'', true)
            .map_err(|_| Error::invalid_path("string not closed in path"))?;
        let stop = buf.index;
        let after = buf.next().map_err(|_| Error::eof())?;
        if after == b']' {
            let name = buf.slice_from_indices(start + 1, stop);
            segments.push(String::from_utf8_lossy(name).into_owned());
            return Ok(());
        }
        // Not a bare name; rescan as a union from the opening quote.
        buf.index = start;
    }

    let stop = scan_to_matching_bracket(buf)?;
    let content = buf.slice_from_indices(start, stop);
    segments.push(String::from_utf8_lossy(content).into_owned());
    Ok(())
}

/// Advances to the `]` matching the already-consumed `[`, honoring nested
/// brackets and quoted runs. Returns the index of that `]`.
fn scan_to_matching_bracket(buf: &mut Buffer<'_>) -> Result<usize> {
    let mut depth: usize = 1;

    while buf.index < buf.length {
        match buf.data[buf.index] {
            quote @ (b'\'' | b'"') => {
                buf.step().map_err(|_| Error::eof())?;
                buf.skip(quote)
                    .map_err(|_| Error::invalid_path("string not closed in path"))?;
            }
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(buf.index);
                }
            }
            _ => {}
        }
        buf.index += 1;
    }

    Err(Error::invalid_path("bracket not closed in path"))
}
