#![allow(clippy::module_inception)]

use std::{fmt::Write, rc::Rc};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod logging;
pub mod macros;
pub mod parser;
pub mod type_checker;
pub mod vm;

extern crate regex;

#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Span covering both `self` and `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}

/// Returns `(line number, line text, column)` for a byte offset into `content`.
///
/// Lines and columns are 1-based and 0-based respectively. The column counts
/// characters, not bytes. Offsets past the
/// end of the input resolve to the end of the last line, which is where
/// end-of-stream errors are reported.
pub fn get_line_at_position(content: &str, position: u32) -> (usize, String, usize) {
    let pos = (position as usize).min(content.len());

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let column = line
                .char_indices()
                .take_while(|(index, _)| *index < pos - start)
                .count();
            return (line_number, line.to_string(), column);
        }

        start = end;
        line_number += 1;
    }

    // Offset sits exactly at the end of the input.
    match content.split_inclusive('\n').last() {
        Some(line) if !line.ends_with('\n') => {
            (line_number - 1, line.to_string(), line.chars().count())
        }
        _ => (line_number, String::new(), 0),
    }
}

/// Renders an error with its source location and a caret under the offending column.
///
/// ```text
/// Error: UnrecognisedToken
/// -> main.cx:1:9
///   |
/// 1 | let a = #;
///   | --------^
/// ```
pub fn format_error(error: &Error, source: &str) -> String {
    let position = error.get_position();
    let (line, line_text, line_pos) = get_line_at_position(source, position.0);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        let _ = writeln!(out, "Error: {}", error.get_error_name());
    } else {
        let _ = writeln!(out, "Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    let _ = writeln!(out, "-> {}:{}:{}", position.1, line, line_pos + 1);
    let _ = writeln!(out, "{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    let _ = writeln!(out, "{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    let _ = writeln!(out, "{:>padding$} {:->arrows$}", "|", "^");
    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{
        errors::errors::{Error, ErrorImpl},
        Position,
    };

    const SOURCE: &str = "Hello, world!\nfoo\n\n  Testing { }\n";

    #[test]
    fn test_get_line_at_position() {
        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 10);
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 29);
        assert_eq!(line_number, 4);
        assert_eq!(line, "  Testing { }\n");
        assert_eq!(line_pos, 10);
    }

    #[test]
    fn test_get_line_past_end() {
        let (line_number, line, line_pos) = super::get_line_at_position("let a = 1", 40);
        assert_eq!(line_number, 1);
        assert_eq!(line, "let a = 1");
        assert_eq!(line_pos, 9);
    }

    #[test]
    fn test_format_error_caret() {
        let source = "let x = 1;\nlet a = #;\n";
        let error = Error::new(
            ErrorImpl::UnrecognisedToken {
                token: String::from("#"),
            },
            Position(19, Rc::new(String::from("main.cx"))),
        );

        let rendered = super::format_error(&error, source);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Error: UnrecognisedToken");
        assert_eq!(lines[1], "-> main.cx:2:9");
        assert_eq!(lines[3], "2 | let a = #;");
        assert_eq!(lines[4], "  | --------^");
    }

    #[test]
    fn test_column_counts_characters() {
        // `é` and `ü` take two bytes each; `#` sits at byte 15, character 13.
        let source = "let é = \"ü\"; #";
        let (_, _, line_pos) = super::get_line_at_position(source, 15);
        assert_eq!(line_pos, 13);

        let (_, _, line_pos) = super::get_line_at_position(source, 100);
        assert_eq!(line_pos, 14);

        let error = Error::new(
            ErrorImpl::UnrecognisedToken {
                token: String::from("#"),
            },
            Position(15, Rc::new(String::from("main.cx"))),
        );
        let rendered = super::format_error(&error, source);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[1], "-> main.cx:1:14");
        assert_eq!(lines[4], "  | -------------^");
    }
}
