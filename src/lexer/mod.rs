//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - String literal validation (escapes, newlines, termination)
//! - Byte offset tracking for error reporting

pub mod lexer;
pub mod tokens;
