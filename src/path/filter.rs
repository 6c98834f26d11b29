//! Filter expression front end: tokenizer and infix-to-RPN conversion.
//!
//! `?(...)` bodies are tokenized into quoted strings, standalone
//! punctuation, `@.ident` chains and free-form words, then rearranged into
//! reverse Polish notation by a shunting-yard pass with single-argument
//! function support.

use crate::error::{Error, Result};

/// Parses a `?(expr)` segment body into RPN tokens, ready for the stack
/// evaluator.
pub(crate) fn parse_filter_expression(segment: &str) -> Result<Vec<String>> {
    let expr = segment
        .strip_prefix("?(")
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| Error::invalid_path("filter segment must have the form ?(expr)"))?;

    let tokens = tokenize_expression(expr)?;
    convert_to_rpn(&tokens)
}

/// Splits an infix filter expression into tokens.
///
/// Single-quoted runs stay one token including their quotes; parentheses,
/// commas and the four arithmetic bytes stand alone; `@` pulls a following
/// `.ident[.ident]*` chain into itself; whitespace separates everything
/// else.
pub(crate) fn tokenize_expression(expr: &str) -> Result<Vec<String>> {
    let bytes = expr.as_bytes();
    let mut tokens: Vec<String> = Vec::new();
    let mut token = String::new();
    let mut in_quotes = false;

    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];

        if c == b'\'' {
            if in_quotes {
                token.push('\'');
                tokens.push(std::mem::take(&mut token));
                in_quotes = false;
            } else {
                flush(&mut tokens, &mut token);
                token.push('\'');
                in_quotes = true;
            }
        } else if in_quotes {
            token.push(c as char);
        } else if matches!(c, b'(' | b')' | b',' | b'+' | b'-' | b'*' | b'/') {
            flush(&mut tokens, &mut token);
            tokens.push((c as char).to_string());
        } else if c == b' ' {
            flush(&mut tokens, &mut token);
        } else if c == b'@' {
            flush(&mut tokens, &mut token);
            token.push('@');
            if i + 1 < bytes.len() && bytes[i + 1] == b'.' {
                i += 1;
                token.push('.');
                while i + 1 < bytes.len()
                    && (bytes[i + 1].is_ascii_alphanumeric()
                        || bytes[i + 1] == b'_'
                        || bytes[i + 1] == b'.')
                {
                    i += 1;
                    token.push(bytes[i] as char);
                }
            }
        } else {
            token.push(c as char);
        }

        i += 1;
    }

    if in_quotes {
        return Err(Error::invalid_path("unmatched quote in filter expression"));
    }
    flush(&mut tokens, &mut token);
    Ok(tokens)
}

fn flush(tokens: &mut Vec<String>, token: &mut String) {
    if !token.is_empty() {
        tokens.push(std::mem::take(token));
    }
}

/// Operator precedence; higher binds tighter. Zero means "not an operator".
pub(crate) fn precedence(token: &str) -> u8 {
    match token {
        "||" => 1,
        "&&" => 2,
        "==" | "!=" => 3,
        "<" | "<=" | ">" | ">=" => 4,
        "+" | "-" => 5,
        "*" | "/" | "%" => 6,
        _ => 0,
    }
}

pub(crate) fn is_operator(token: &str) -> bool {
    precedence(token) > 0
}

pub(crate) fn is_function(token: &str) -> bool {
    super::eval::FUNCTION_NAMES.contains(&token)
}

fn is_operand(token: &str) -> bool {
    !is_operator(token) && !is_function(token) && !matches!(token, "(" | ")" | ",")
}

/// Rearranges infix tokens into RPN. All operators are left-associative;
/// parentheses group; a function name waits on the stack until its closing
/// parenthesis pops it.
pub(crate) fn convert_to_rpn(tokens: &[String]) -> Result<Vec<String>> {
    let mut output: Vec<String> = Vec::new();
    let mut stack: Vec<String> = Vec::new();

    for token in tokens {
        if is_function(token) {
            stack.push(token.clone());
        } else if is_operand(token) {
            output.push(token.clone());
        } else if is_operator(token) {
            while stack
                .last()
                .is_some_and(|top| precedence(token) <= precedence(top))
            {
                output.push(stack.pop().unwrap_or_default());
            }
            stack.push(token.clone());
        } else if token == "(" {
            stack.push(token.clone());
        } else if token == "," {
            while stack.last().is_some_and(|top| top != "(") {
                output.push(stack.pop().unwrap_or_default());
            }
            if stack.is_empty() {
                return Err(Error::invalid_path("parenthesis mismatch in path"));
            }
        } else {
            // ")"
            while stack.last().is_some_and(|top| top != "(") {
                output.push(stack.pop().unwrap_or_default());
            }
            if stack.pop().is_none() {
                return Err(Error::invalid_path("parenthesis mismatch in path"));
            }
            if stack.last().is_some_and(|top| is_function(top)) {
                output.push(stack.pop().unwrap_or_default());
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top == "(" {
            return Err(Error::invalid_path("parenthesis mismatch in path"));
        }
        output.push(top);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn tokenizer_splits_operators_and_chains() {
        let cases: Vec<(&str, Vec<&str>)> = vec![
            ("@.name == 'John'", vec!["@.name", "==", "'John'"]),
            ("@.age > 30", vec!["@.age", ">", "30"]),
            (
                "@.age > 30 && @.city == 'New York'",
                vec!["@.age", ">", "30", "&&", "@.city", "==", "'New York'"],
            ),
            (
                "(@.age > 30 && @.city == 'New York') || (@.age < 18 && @.city == 'Los Angeles')",
                vec![
                    "(", "@.age", ">", "30", "&&", "@.city", "==", "'New York'", ")", "||", "(",
                    "@.age", "<", "18", "&&", "@.city", "==", "'Los Angeles'", ")",
                ],
            ),
            ("@.name != 'John'", vec!["@.name", "!=", "'John'"]),
            ("@.age >= 21", vec!["@.age", ">=", "21"]),
            ("@.age <= 21", vec!["@.age", "<=", "21"]),
            ("@.price * 2 < 20", vec!["@.price", "*", "2", "<", "20"]),
            (
                "length(@.items) == 3",
                vec!["length", "(", "@.items", ")", "==", "3"],
            ),
            ("@.a.b == 1", vec!["@.a.b", "==", "1"]),
        ];

        for (expr, expected) in cases {
            assert_eq!(
                tokenize_expression(expr).expect(expr),
                toks(&expected),
                "expr: {expr}"
            );
        }
    }

    #[test]
    fn rpn_conversion_orders_by_precedence() {
        let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
            (
                vec!["@.name", "==", "'John'"],
                vec!["@.name", "'John'", "=="],
            ),
            (
                vec!["@.age", ">", "30", "&&", "@.city", "==", "'New York'"],
                vec!["@.age", "30", ">", "@.city", "'New York'", "==", "&&"],
            ),
            (
                vec![
                    "(", "@.age", ">", "30", ")", "&&", "(", "@.city", "==", "'New York'", "||",
                    "@.city", "==", "'London'", ")",
                ],
                vec![
                    "@.age", "30", ">", "@.city", "'New York'", "==", "@.city", "'London'", "==",
                    "||", "&&",
                ],
            ),
            (
                vec!["@.price", "*", "2", "<", "20"],
                vec!["@.price", "2", "*", "20", "<"],
            ),
            (
                vec!["length", "(", "@.items", ")", "==", "3"],
                vec!["@.items", "length", "3", "=="],
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(
                convert_to_rpn(&toks(&input)).expect("rpn"),
                toks(&expected)
            );
        }
    }

    #[test]
    fn mismatched_parentheses_are_rejected() {
        let open = toks(&["(", "@.age", ">", "30"]);
        assert!(convert_to_rpn(&open).is_err());

        let close = toks(&["@.age", ">", "30", ")"]);
        assert!(convert_to_rpn(&close).is_err());

        assert!(parse_filter_expression("?(@.age > 30 && (@.city == 'x')").is_err());
    }

    #[test]
    fn filter_segment_shape_is_enforced() {
        assert!(parse_filter_expression("?(@.a == 1)").is_ok());
        assert!(parse_filter_expression("(@.a == 1)").is_err());
    }
}
