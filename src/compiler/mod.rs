//! Code generation module for the compiler.
//!
//! This module lowers the typed AST into ACIR, the per-procedure instruction
//! representation, and renders ACIR as C source. It handles:
//!
//! - Lowering of expressions into pure push-values and statements
//! - Lifting of procedure literals into their own C procedures
//! - Root table and frame setup for every activation
//! - Deterministic emission of the C translation unit

pub mod acir;
pub mod compiler;
pub mod emit;
pub mod expr;
