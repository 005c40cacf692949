#![allow(clippy::module_inception)]

use std::{
    rc::Rc,
    time::{Duration, Instant},
};

use crate::{
    compiler::{compiler::build_module, emit::emit_module},
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Runs the whole pipeline over one module and returns the generated C text.
///
/// Nothing is produced unless every phase succeeds.
pub fn compile_source(source: &str, file_name: &str) -> Result<String, Error> {
    compile_source_timed(source, file_name, |_, _| {})
}

/// Same as `compile_source`, reporting each finished phase and its duration
/// (`"Tokenized"`, `"Parsed"`, `"Type checked"`, `"Lowered"`, `"Emitted"`).
pub fn compile_source_timed(
    source: &str,
    file_name: &str,
    mut on_phase: impl FnMut(&str, Duration),
) -> Result<String, Error> {
    let start = Instant::now();
    let tokens = tokenize(String::from(source), Some(String::from(file_name)))?;
    on_phase("Tokenized", start.elapsed());

    let start = Instant::now();
    let ast = parse(tokens, Rc::new(String::from(file_name)))?;
    on_phase("Parsed", start.elapsed());

    let start = Instant::now();
    let typed_module = type_check(&ast)?;
    on_phase("Type checked", start.elapsed());

    let start = Instant::now();
    let acir_module = build_module(&typed_module)?;
    on_phase("Lowered", start.elapsed());

    let start = Instant::now();
    let c_source = emit_module(&acir_module);
    on_phase("Emitted", start.elapsed());

    Ok(c_source)
}

/// Finds the line containing a byte offset.
///
/// Returns the 1-based line number, the line text and the offset inside it.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;
    let mut start = 0;

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((index + 1, line.to_string(), pos - start));
        }

        start = end;
    }

    // Errors at end of input point just past the last line
    source
        .split_inclusive('\n')
        .enumerate()
        .last()
        .map(|(index, line)| (index + 1, line.to_string(), line.len()))
}

pub fn display_error(error: &Error, file: &str, source: &str) {
    /*
        Error: message
        -> final.aj
           |
        20 | let a = #;
           | --------^
    */

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}", file);

    let Some((line, line_text, line_pos)) = get_line_at_position(source, error.get_position().0)
    else {
        return;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    println!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    println!("{:>padding$} {:->arrows$}", "|", "^");
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
