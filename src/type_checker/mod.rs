//! Type checking and semantic analysis module.
//!
//! This module performs type checking and semantic analysis on the AST.
//! It transforms the untyped AST into a typed AST while:
//!
//! - Verifying type correctness of expressions and declarations
//! - Resolving variables to their defining environment and level
//! - Checking procedure signatures and argument types
//! - Assigning garbage-collector root slots to heap-referencing results
//!
//! Scopes are kept in an arena of environments owned by the checker for the
//! duration of one compilation.

pub mod builtins;
pub mod environment;
pub mod type_checker;
pub mod typed_ast;

#[cfg(test)]
mod tests;
