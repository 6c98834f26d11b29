//! The cursor itself: movement, skipping and DFA-driven recognizers.

use crate::error::{Error, Result};

use super::tables::{
    Class, State, ASCII_CLASSES, C_ETC, E3, FR, GO, IN, MI, QUOTE_ASCII_CLASSES,
    STATE_TRANSITION_TABLE, ZE, __,
};

/// Borrowing byte cursor shared by the decoder and the path engine.
///
/// `last` and `state` hold the automaton position between recognizer calls;
/// `class` is the classification of the byte most recently looked at.
pub(crate) struct Buffer<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) length: usize,
    pub(crate) index: usize,

    pub(crate) last: State,
    pub(crate) state: State,
    class: Class,
}

impl<'a> Buffer<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            length: data.len(),
            index: 0,
            last: GO,
            state: GO,
            class: C_ETC,
        }
    }

    /// Skips space, tab, CR and LF, leaving the cursor on the first
    /// significant byte and returning it.
    pub(crate) fn first(&mut self) -> Result<u8> {
        while self.index < self.length {
            let c = self.data[self.index];
            if !matches!(c, b' ' | b'\t' | b'\r' | b'\n') {
                return Ok(c);
            }
            self.index += 1;
        }
        Err(Error::eof())
    }

    /// Returns the byte under the cursor.
    pub(crate) fn current(&self) -> Result<u8> {
        if self.index >= self.length {
            return Err(Error::eof());
        }
        Ok(self.data[self.index])
    }

    /// Moves to the next byte and returns it.
    pub(crate) fn next(&mut self) -> Result<u8> {
        self.index += 1;
        self.current()
    }

    /// Moves to the next position, reporting EOF on overrun.
    pub(crate) fn step(&mut self) -> Result<()> {
        self.next().map(|_| ())
    }

    /// Returns `data[start..stop]`, clamping both ends to the buffer length.
    pub(crate) fn slice_from_indices(&self, start: usize, stop: usize) -> &'a [u8] {
        let start = start.min(self.length);
        let stop = stop.min(self.length);
        &self.data[start..stop]
    }

    /// Advances until `target` is found unescaped (odd-backslash rule).
    pub(crate) fn skip(&mut self, target: u8) -> Result<()> {
        while self.index < self.length {
            if self.data[self.index] == target && !self.backslash() {
                return Ok(());
            }
            self.index += 1;
        }
        Err(Error::eof())
    }

    /// Advances until one of `end_tokens` is found, returning its index.
    pub(crate) fn skip_any(&mut self, end_tokens: &[u8]) -> Result<usize> {
        while self.index < self.length {
            if end_tokens.contains(&self.data[self.index]) {
                return Ok(self.index);
            }
            self.index += 1;
        }
        Err(Error::eof())
    }

    /// True iff an odd number of backslashes immediately precedes the cursor,
    /// which is how an escaped delimiter is told apart from a real one.
    pub(crate) fn backslash(&self) -> bool {
        let mut count = 0;
        let mut i = self.index;
        while i > 0 && self.data[i - 1] == b'\\' {
            count += 1;
            i -= 1;
        }
        count % 2 != 0
    }

    fn classes(&self, border: u8) -> Class {
        let b = self.data[self.index];
        if b >= 128 {
            return C_ETC;
        }
        if border == b'\'' {
            QUOTE_ASCII_CLASSES[b as usize]
        } else {
            ASCII_CLASSES[b as usize]
        }
    }

    /// One automaton step at the current byte: promotes `state` to `last`
    /// and returns the new state (or action / error code).
    pub(crate) fn get_state(&mut self) -> State {
        self.last = self.state;
        self.class = self.classes(b'"');
        if self.class == __ {
            return __;
        }
        self.state = STATE_TRANSITION_TABLE[self.last as usize][self.class as usize];
        self.state
    }

    /// Advances through a string literal bounded by `border`, honoring
    /// escapes. The cursor stops on the closing border byte. With
    /// `token_mode` the automaton restarts at [`GO`], which lets a fragment
    /// in the middle of a path be recognized on its own.
    pub(crate) fn string(&mut self, border: u8, token_mode: bool) -> Result<()> {
        if token_mode {
            self.last = GO;
        }

        loop {
            if self.index >= self.length {
                return Err(Error::eof());
            }

            self.class = self.classes(border);
            if self.class == __ {
                return Err(Error::unexpected_token(self.index));
            }

            self.state = STATE_TRANSITION_TABLE[self.last as usize][self.class as usize];
            if self.state == __ {
                return Err(Error::unexpected_token(self.index));
            }
            if self.state < __ {
                // Closing border reached.
                return Ok(());
            }

            self.last = self.state;
            self.index += 1;
        }
    }

    /// Advances through a JSON number. In non-token mode the final sub-state
    /// must be an accepting one (`ZE`/`IN`/`FR`/`E3`); in token mode the
    /// recognizer stops quietly at the first byte no number can contain.
    pub(crate) fn numeric(&mut self, token_mode: bool) -> Result<()> {
        if token_mode {
            self.last = GO;
        }

        while self.index < self.length {
            self.class = self.classes(b'"');
            if self.class == __ {
                return Err(Error::unexpected_token(self.index));
            }

            self.state = STATE_TRANSITION_TABLE[self.last as usize][self.class as usize];
            if self.state == __ {
                if token_mode {
                    break;
                }
                return Err(Error::unexpected_token(self.index));
            }
            if self.state < __ {
                // Structural byte ends the number.
                return Ok(());
            }
            if self.state < MI || self.state > E3 {
                // Whitespace pushed the automaton to OK.
                return Ok(());
            }

            self.last = self.state;
            self.index += 1;
        }

        if !matches!(self.last, ZE | IN | FR | E3) {
            return Err(Error::unexpected_token(self.index));
        }
        Ok(())
    }

    /// Matches a fixed literal word (`true` / `false` / `null`), leaving the
    /// cursor on its last byte.
    pub(crate) fn word(&mut self, expected: &[u8]) -> Result<()> {
        let mut pos = 0;

        while self.index < self.length {
            if self.data[self.index] != expected[pos] {
                return Err(Error::unexpected_token(self.index));
            }
            pos += 1;
            if pos >= expected.len() {
                break;
            }
            self.index += 1;
        }

        if pos != expected.len() {
            return Err(Error::unexpected_token(self.index));
        }
        Ok(())
    }

    /// Advances through one path token, honoring bracket/paren nesting and
    /// embedded quotes. The cursor stops on the first byte past the token.
    pub(crate) fn path_token(&mut self) -> Result<()> {
        let mut stack: Vec<u8> = Vec::new();
        let mut in_token = false;
        let mut in_number = false;
        let first = self.index;

        'scan: while self.index < self.length {
            let c = self.data[self.index];
            match c {
                b'"' | b'\'' => {
                    in_token = true;
                    self.step()
                        .map_err(|_| Error::invalid_path("unmatched quote in path"))?;
                    self.skip(c)
                        .map_err(|_| Error::invalid_path("unmatched quote in path"))?;
                    if self.index >= self.length {
                        return Err(Error::invalid_path("unmatched quote in path"));
                    }
                }
                b'[' | b'(' => {
                    in_token = true;
                    stack.push(c);
                }
                b']' | b')' => {
                    in_token = true;
                    let open = if c == b']' { b'[' } else { b'(' };
                    if stack.pop() != Some(open) {
                        return Err(Error::invalid_path("mismatched bracket or parenthesis"));
                    }
                }
                b',' => {
                    // Top-level comma separates union members.
                    if stack.is_empty() {
                        break 'scan;
                    }
                    in_token = true;
                }
                b'.' | b'$' | b'@' | b'*' | b'&' | b'|' => in_token = true,
                c if c.is_ascii_alphanumeric() => in_token = true,
                b'+' | b'-' => {
                    let after_exponent =
                        self.index > 0 && matches!(self.data[self.index - 1], b'e' | b'E');
                    let starts_number = self.index + 1 < self.length
                        && self.data[self.index + 1].is_ascii_digit();
                    if in_number || after_exponent {
                        in_token = true;
                    } else if !in_token && starts_number {
                        in_token = true;
                        in_number = true;
                    } else if !in_token {
                        return Err(Error::invalid_path("unexpected operator at start of token"));
                    }
                }
                _ => {
                    if stack.is_empty() && !in_token {
                        break 'scan;
                    }
                    in_token = true;
                }
            }
            self.index += 1;
        }

        if !stack.is_empty() {
            return Err(Error::invalid_path(
                "unclosed bracket or parenthesis at end of path",
            ));
        }
        if first == self.index {
            return Err(Error::invalid_path("no token found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_skips_leading_whitespace() {
        let mut buf = Buffer::new(b" \t\r\n {}");
        assert_eq!(buf.first().expect("byte"), b'{');
        assert_eq!(buf.index, 5);
    }

    #[test]
    fn backslash_counts_odd_prefixes_only() {
        let data = br#"a\\\"b"#;
        let mut buf = Buffer::new(data);
        buf.index = 4; // the double quote
        assert!(buf.backslash());
        buf.index = 3; // the last backslash
        assert!(!buf.backslash());
    }

    #[test]
    fn numeric_accepts_terminated_and_eof_numbers() {
        let mut buf = Buffer::new(b"10.25e2,");
        assert!(buf.numeric(true).is_ok());
        assert_eq!(buf.index, 7);

        let mut eof = Buffer::new(b"-3.5");
        assert!(eof.numeric(true).is_ok());
        assert_eq!(eof.index, 4);
    }

    #[test]
    fn numeric_rejects_dangling_minus() {
        let mut buf = Buffer::new(b"-");
        assert!(buf.numeric(true).is_err());
    }

    #[test]
    fn string_stops_on_closing_border() {
        let mut buf = Buffer::new(br#""ab\"c" :"#);
        assert!(buf.string(b'"', true).is_ok());
        assert_eq!(buf.data[buf.index], b'"');
        assert_eq!(buf.index, 6);
    }

    #[test]
    fn string_reports_unterminated_literal() {
        let mut buf = Buffer::new(br#""abc"#);
        assert!(buf.string(b'"', true).is_err());
    }

    #[test]
    fn path_token_stops_at_union_comma() {
        let mut buf = Buffer::new(b"'first','city'");
        assert!(buf.path_token().is_ok());
        assert_eq!(buf.index, 7);
        assert_eq!(buf.data[buf.index], b',');
    }

    #[test]
    fn path_token_tracks_nesting() {
        let mut buf = Buffer::new(b"a[0],b");
        assert!(buf.path_token().is_ok());
        assert_eq!(buf.index, 4);

        let mut bad = Buffer::new(b"a[0)");
        assert!(bad.path_token().is_err());
    }
}
