#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod semantic_checker;

extern crate regex;

/// Byte offset into a source file, tagged with the file name.
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

/// Finds the line containing `position`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` inside that line. A position at the very end of the source
/// resolves to the last line.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;
    let mut last = None;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        last = Some((line_number, line.to_string(), line.len()));
        start = end;
        line_number += 1;
    }

    // EOF position
    last.or(Some((1, String::new(), 0)))
}


/// Prints a syntax error with the offending source line.
pub fn display_error(error: &Error, source: &str) {
    /*
        Error: message
        -> main.hulk
           |
        20 | let a = #;
           | --------^
    */

    let position = error.get_position();
    let file = Rc::clone(&position.1);

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", file);

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return;
    };

    let line_str = line.to_string();
    let padding = line_str.len() + 2;

    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_str, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
