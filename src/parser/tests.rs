//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs including:
//! - Top-level procedures, constants, variables and the entry block
//! - Expressions and operator precedence
//! - Blocks, `if`, `let` and procedure literals
//! - Type annotations
//! - Error cases

use std::rc::Rc;

use super::parser::parse;
use crate::{
    ast::{
        ast::{Expr, Stmt},
        statements::ModuleStmt,
        types::TypeAnnotation,
    },
    errors::errors::{Error, ErrorCategory, ErrorImpl},
    lexer::{lexer::tokenize, tokens::TokenKind},
};

fn parse_source(source: &str) -> Result<ModuleStmt, Error> {
    let tokens = tokenize(source.to_string(), Some("test.aj".to_string())).unwrap();
    parse(tokens, Rc::new("test.aj".to_string()))
}

/// Parses `entry { <source> }` and returns the single expression inside.
fn parse_entry_expr(source: &str) -> Expr {
    let module = parse_source(&format!("entry {{ {} }}", source)).unwrap();
    let Some(Stmt::Entry(entry)) = module.body.into_iter().next() else {
        panic!("Expected entry block");
    };
    let Expr::Sequence(mut sequence) = entry.body else {
        panic!("Expected sequence");
    };
    assert_eq!(sequence.body.len(), 1);
    sequence.body.remove(0)
}

#[test]
fn test_parse_empty_module() {
    let module = parse_source("").unwrap();
    assert!(module.body.is_empty());
    assert!(module.entry().is_none());
}

#[test]
fn test_parse_proc_declaration() {
    let module = parse_source("proc add(a: i32, b: i32) -> i32 { a + b }").unwrap();

    let Stmt::ProcDecl(decl) = &module.body[0] else {
        panic!("Expected procedure declaration");
    };
    assert_eq!(decl.identifier, "add");
    assert_eq!(decl.literal.parameters.len(), 2);
    assert_eq!(decl.literal.parameters[1].name, "b");
    assert!(decl.literal.parameters[0].explicit_type.is_some());
    assert!(decl.literal.return_type.is_some());

    let Expr::Sequence(body) = decl.literal.body.as_ref() else {
        panic!("Expected sequence body");
    };
    assert!(matches!(body.body[0], Expr::Binary(_)));
}

#[test]
fn test_parse_proc_without_signature() {
    let module = parse_source("proc f(a) { a }").unwrap();

    let Stmt::ProcDecl(decl) = &module.body[0] else {
        panic!("Expected procedure declaration");
    };
    assert!(decl.literal.parameters[0].explicit_type.is_none());
    assert!(decl.literal.return_type.is_none());
}

#[test]
fn test_parse_const_and_var() {
    let module = parse_source("const limit: i32 = 10; var count = 0;").unwrap();

    let Stmt::ConstDecl(constant) = &module.body[0] else {
        panic!("Expected const");
    };
    assert_eq!(constant.identifier, "limit");
    assert!(matches!(constant.assigned_value, Expr::Number(_)));
    assert!(matches!(module.body[1], Stmt::VarDecl(_)));
}

#[test]
fn test_parse_entry() {
    let module = parse_source("entry { println_i32(1); }").unwrap();
    let entry = module.entry().unwrap();

    let Expr::Sequence(sequence) = &entry.body else {
        panic!("Expected sequence");
    };
    // The trailing semicolon appends a unit value
    assert_eq!(sequence.body.len(), 2);
    assert!(matches!(sequence.body[0], Expr::Call(_)));
    assert!(matches!(sequence.body[1], Expr::Unit(_)));
}

#[test]
fn test_duplicate_entry() {
    let error = parse_source("entry { } entry { }").unwrap_err();

    assert_eq!(error.get_internal_error(), &ErrorImpl::DuplicateEntry);
    assert_eq!(error.get_category(), ErrorCategory::ParseError);
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_operator_precedence() {
    let expr = parse_entry_expr("1 + 2 * 3");

    let Expr::Binary(binary) = expr else {
        panic!("Expected binary expression");
    };
    assert_eq!(binary.operator.kind, TokenKind::Plus);
    assert!(matches!(*binary.left, Expr::Number(_)));

    let Expr::Binary(right) = *binary.right else {
        panic!("Expected nested binary expression");
    };
    assert_eq!(right.operator.kind, TokenKind::Star);
}

#[test]
fn test_binary_is_left_associative() {
    let Expr::Binary(binary) = parse_entry_expr("10 - 3 - 2") else {
        panic!("Expected binary expression");
    };

    assert!(matches!(*binary.left, Expr::Binary(_)));
    assert!(matches!(*binary.right, Expr::Number(_)));
}

#[test]
fn test_logical_binds_looser_than_comparison() {
    let Expr::Binary(binary) = parse_entry_expr("a < b && c == d") else {
        panic!("Expected binary expression");
    };

    assert_eq!(binary.operator.kind, TokenKind::And);
    assert!(matches!(*binary.left, Expr::Binary(_)));
    assert!(matches!(*binary.right, Expr::Binary(_)));
}

#[test]
fn test_and_binds_tighter_than_or() {
    let Expr::Binary(binary) = parse_entry_expr("a || b && c") else {
        panic!("Expected binary expression");
    };

    assert_eq!(binary.operator.kind, TokenKind::Or);
    assert!(matches!(*binary.left, Expr::Symbol(_)));

    let Expr::Binary(right) = *binary.right else {
        panic!("Expected nested binary expression");
    };
    assert_eq!(right.operator.kind, TokenKind::And);
}

#[test]
fn test_prefix_binds_tighter_than_binary() {
    let Expr::Binary(binary) = parse_entry_expr("-a + b") else {
        panic!("Expected binary expression");
    };

    assert_eq!(binary.operator.kind, TokenKind::Plus);
    let Expr::Prefix(prefix) = *binary.left else {
        panic!("Expected prefix expression");
    };
    assert_eq!(prefix.operator.kind, TokenKind::Dash);
}

#[test]
fn test_prefix_applies_to_call() {
    let Expr::Prefix(prefix) = parse_entry_expr("!f(x)") else {
        panic!("Expected prefix expression");
    };

    assert_eq!(prefix.operator.kind, TokenKind::Not);
    assert!(matches!(*prefix.right_expr, Expr::Call(_)));
}

#[test]
fn test_parse_call_arguments() {
    let Expr::Call(call) = parse_entry_expr("str_slice(s, 0, 3)") else {
        panic!("Expected call");
    };

    assert_eq!(call.arguments.len(), 3);
    let Expr::Symbol(callee) = *call.callee else {
        panic!("Expected symbol callee");
    };
    assert_eq!(callee.value, "str_slice");
}

#[test]
fn test_parse_literals() {
    assert!(matches!(parse_entry_expr("()"), Expr::Unit(_)));
    assert!(matches!(parse_entry_expr("true"), Expr::Boolean(b) if b.value));
    assert!(matches!(parse_entry_expr("false"), Expr::Boolean(b) if !b.value));
    assert!(matches!(parse_entry_expr("\"hi\""), Expr::String(s) if s.value == "hi"));
    assert!(matches!(parse_entry_expr("(42)"), Expr::Number(n) if n.value == 42));
}

#[test]
fn test_number_out_of_range() {
    let error = parse_source("entry { 2147483648 }").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::NumberParseError {
            token: "2147483648".to_string()
        }
    );
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_parse_if_without_else() {
    let Expr::If(if_expr) = parse_entry_expr("if x > 0 { print_i32(x) }") else {
        panic!("Expected if expression");
    };

    assert!(matches!(*if_expr.condition, Expr::Binary(_)));
    assert!(if_expr.else_body.is_none());
}

#[test]
fn test_parse_else_if_chain() {
    let Expr::If(if_expr) = parse_entry_expr("if a { 1 } else if b { 2 } else { 3 }") else {
        panic!("Expected if expression");
    };

    let Some(else_body) = if_expr.else_body else {
        panic!("Expected else branch");
    };
    let Expr::If(nested) = *else_body else {
        panic!("Expected nested if");
    };
    assert!(nested.else_body.is_some());
}

#[test]
fn test_parse_let_expression() {
    let Expr::Let(let_expr) = parse_entry_expr("let x = f(), y: str = x { y }") else {
        panic!("Expected let expression");
    };

    assert_eq!(let_expr.declarations.len(), 2);
    assert_eq!(let_expr.declarations[0].name, "x");
    assert!(matches!(let_expr.declarations[0].value, Expr::Call(_)));
    assert!(matches!(
        let_expr.declarations[1].explicit_type,
        Some(TypeAnnotation::Symbol(ref symbol)) if symbol.name == "str"
    ));
    assert!(matches!(*let_expr.body, Expr::Sequence(_)));
}

#[test]
fn test_parse_inline_proc_literal_call() {
    let Expr::Call(call) = parse_entry_expr("proc(a) { -a }(5)") else {
        panic!("Expected call");
    };

    let Expr::ProcLiteral(literal) = *call.callee else {
        panic!("Expected procedure literal callee");
    };
    assert_eq!(literal.parameters.len(), 1);
    assert!(literal.parameters[0].explicit_type.is_none());
    assert_eq!(call.arguments.len(), 1);
}

#[test]
fn test_parse_nested_blocks() {
    let Expr::Sequence(sequence) = parse_entry_expr("{ 1; { 2 } }") else {
        panic!("Expected sequence");
    };

    assert_eq!(sequence.body.len(), 2);
    assert!(matches!(sequence.body[1], Expr::Sequence(_)));
}

#[test]
fn test_parse_proc_and_array_types() {
    let module =
        parse_source("proc apply(f: proc(i32, bool) -> str, xs: i32[]) -> unit { () }").unwrap();

    let Stmt::ProcDecl(decl) = &module.body[0] else {
        panic!("Expected procedure declaration");
    };

    let Some(TypeAnnotation::Proc(proc_type)) = &decl.literal.parameters[0].explicit_type else {
        panic!("Expected procedure type");
    };
    assert_eq!(proc_type.arguments.len(), 2);
    assert!(matches!(
        decl.literal.parameters[1].explicit_type,
        Some(TypeAnnotation::Array(_))
    ));
}

#[test]
fn test_missing_separator_between_expressions() {
    let error = parse_source("entry { 1 2 }").unwrap_err();

    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnexpectedTokenDetailed { .. }
    ));
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_unclosed_block() {
    let error = parse_source("entry { 1;").unwrap_err();
    assert_eq!(error.get_category(), ErrorCategory::ParseError);
}

#[test]
fn test_expression_at_top_level_is_rejected() {
    let error = parse_source("1 + 2;").unwrap_err();

    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnexpectedTokenDetailed { .. }
    ));
    assert_eq!(error.get_position().0, 0);
}

#[test]
fn test_spans_use_byte_offsets() {
    let module = parse_source("entry { foo }").unwrap();
    let entry = module.entry().unwrap();

    assert_eq!(entry.span.start.0, 0);
    assert_eq!(entry.span.end.0, 13);

    let Expr::Sequence(sequence) = &entry.body else {
        panic!("Expected sequence");
    };
    assert_eq!(sequence.body[0].get_span().start.0, 8);
    assert_eq!(sequence.body[0].get_span().end.0, 11);
}
