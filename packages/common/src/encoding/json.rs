//! JSON layout helpers
//!
//! These operate on the text itself rather than a parsed value so member
//! order, number formatting and string escapes survive untouched.

use serde_json::Value;

use crate::error::{EncodingError, Result};

const INDENTATION: usize = 4;

/// Walks JSON text tracking whether the cursor sits inside a string literal.
struct Scanner {
    in_string: bool,
    escaped: bool,
}

impl Scanner {
    fn new() -> Self {
        Self {
            in_string: false,
            escaped: false,
        }
    }

    /// Advance over `c`, returning whether it was structural (outside a string).
    fn step(&mut self, c: char) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_string = false;
            }
            false
        } else {
            if c == '"' {
                self.in_string = true;
                return false;
            }
            true
        }
    }
}

fn ensure_object_or_array(json: &str) -> Result<()> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(_) | Value::Array(_)) => Ok(()),
        Ok(_) => Err(EncodingError::json("expected a JSON object or array")),
        Err(e) => Err(EncodingError::json(e.to_string())),
    }
}

/// Strip insignificant whitespace from a JSON object or array
pub fn compact_json(json: &str) -> Result<String> {
    ensure_object_or_array(json)?;

    let mut scanner = Scanner::new();
    let mut compacted = String::with_capacity(json.len());
    for c in json.chars() {
        let structural = scanner.step(c);
        if structural && matches!(c, ' ' | '\n' | '\r' | '\t') {
            continue;
        }
        compacted.push(c);
    }
    Ok(compacted)
}

/// Pretty print a JSON object or array with four space indentation
pub fn pretty_print_json(json: &str) -> Result<String> {
    let compacted = compact_json(json)?;

    let mut scanner = Scanner::new();
    let mut printed = String::with_capacity(compacted.len() * 2);
    let mut level: usize = 0;
    let mut chars = compacted.chars().peekable();

    while let Some(c) = chars.next() {
        if !scanner.step(c) {
            printed.push(c);
            continue;
        }
        match c {
            '{' | '[' => {
                let close = if c == '{' { '}' } else { ']' };
                if chars.peek() == Some(&close) {
                    chars.next();
                    printed.push(c);
                    printed.push(close);
                    continue;
                }
                level += 1;
                printed.push(c);
                newline(&mut printed, level);
            }
            '}' | ']' => {
                level = level.saturating_sub(1);
                newline(&mut printed, level);
                printed.push(c);
            }
            ':' => printed.push_str(": "),
            ',' => {
                printed.push(',');
                newline(&mut printed, level);
            }
            _ => printed.push(c),
        }
    }
    Ok(printed)
}

fn newline(out: &mut String, level: usize) {
    out.push('\n');
    out.push_str(&" ".repeat(level * INDENTATION));
}

/// Whether the text is a JSON object or array without insignificant whitespace
#[must_use]
pub fn is_json_compact(json: &str) -> bool {
    compact_json(json).is_ok_and(|compacted| compacted == json)
}

/// Whether the text parses as a JSON object
#[must_use]
pub fn is_json_object(json: &str) -> bool {
    matches!(serde_json::from_str::<Value>(json), Ok(Value::Object(_)))
}
