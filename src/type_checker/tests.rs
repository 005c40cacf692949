//! Unit tests for the type checker.
//!
//! Covers signatures, scope levels, root slot allocation, the unary
//! inference rule and the error cases of the analyzer.

use std::rc::Rc;

use super::{
    type_checker::{logical_length, type_check},
    typed_ast::{TypedCallee, TypedExpr, TypedExprKind, TypedModule, VariableOrigin},
};
use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorCategory, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

fn check_source(source: &str) -> Result<TypedModule, Error> {
    let tokens = tokenize(source.to_string(), Some("test.aj".to_string())).unwrap();
    let ast = parse(tokens, Rc::new("test.aj".to_string())).unwrap();
    type_check(&ast)
}

fn check_error(source: &str) -> Error {
    check_source(source).unwrap_err()
}

fn entry_body(module: &TypedModule) -> &Vec<TypedExpr> {
    let entry = module.entry.as_ref().expect("Expected entry block");
    let TypedExprKind::Sequence(body) = &entry.body.kind else {
        panic!("Expected sequence");
    };
    body
}

fn unsupported(feature: &str) -> ErrorImpl {
    ErrorImpl::UnsupportedFeature {
        feature: feature.to_string(),
    }
}

#[test]
fn test_proc_signature() {
    let module = check_source("proc add(a: i32, b: i32) -> i32 { a + b } entry { add(1, 2) }")
        .unwrap();

    assert_eq!(module.procs.len(), 1);
    assert_eq!(
        module.procs[0].literal.get_type(),
        Type::proc(vec![Type::i32(), Type::i32()], Type::i32())
    );

    let call = &entry_body(&module)[0];
    assert_eq!(call.ty, Type::i32());
    assert!(call.root_index.is_none());
    assert_eq!(module.entry.as_ref().unwrap().root_table_size, 0);
}

#[test]
fn test_procs_can_be_called_before_declaration() {
    let module = check_source("entry { twice(2) } proc twice(n: i32) -> i32 { n * 2 }").unwrap();

    let TypedExprKind::Call { callee, .. } = &entry_body(&module)[0].kind else {
        panic!("Expected call");
    };
    assert!(matches!(callee, TypedCallee::Global(name) if name == "twice"));
}

#[test]
fn test_let_root_slots() {
    let module = check_source(r#"proc f() -> str { "x" } entry { let x = f(), y = x { y } }"#)
        .unwrap();

    let let_expr = &entry_body(&module)[0];
    let TypedExprKind::Let {
        declarations, body, ..
    } = &let_expr.kind
    else {
        panic!("Expected let");
    };

    assert_eq!(declarations[0].value.root_index, Some(0));
    assert!(declarations[1].value.root_index.is_none());
    assert_eq!(let_expr.root_index, Some(1));
    assert_eq!(body.ty, Type::str());
    assert_eq!(module.entry.as_ref().unwrap().root_table_size, 2);
}

#[test]
fn test_heap_calls_take_distinct_slots() {
    let module =
        check_source(r#"entry { str_concat("a", "b"); str_repeat("c", 2); println_i32(1) }"#)
            .unwrap();

    let body = entry_body(&module);
    assert_eq!(body[0].root_index, Some(0));
    assert_eq!(body[1].root_index, Some(1));
    assert!(body[2].root_index.is_none());
    assert_eq!(module.entry.as_ref().unwrap().root_table_size, 2);
}

#[test]
fn test_nested_literal_owns_its_root_table() {
    let module = check_source(r#"entry { proc() { str_concat("a", "b") }() }"#).unwrap();

    let call = &entry_body(&module)[0];
    let TypedExprKind::Call {
        callee: TypedCallee::Literal(literal),
        ..
    } = &call.kind
    else {
        panic!("Expected literal call");
    };

    assert_eq!(literal.root_table_size, 1);
    assert_eq!(call.root_index, Some(0));
    assert_eq!(module.entry.as_ref().unwrap().root_table_size, 1);
}

#[test]
fn test_variable_levels() {
    let module =
        check_source("proc f(a: i32) -> i32 { let b = a { let c = b { a + c } } }").unwrap();

    let TypedExprKind::Sequence(body) = &module.procs[0].literal.body.kind else {
        panic!("Expected sequence");
    };
    let TypedExprKind::Let {
        declarations: outer_declarations,
        body: outer_body,
        ..
    } = &body[0].kind
    else {
        panic!("Expected let");
    };
    // `a` as the initializer of `b` is seen from the outer let
    assert!(matches!(
        outer_declarations[0].value.kind,
        TypedExprKind::Variable { level: 1, .. }
    ));

    let TypedExprKind::Sequence(outer_body) = &outer_body.kind else {
        panic!("Expected sequence");
    };
    let TypedExprKind::Let {
        declarations: inner_declarations,
        body: inner_body,
        ..
    } = &outer_body[0].kind
    else {
        panic!("Expected let");
    };
    assert!(matches!(
        inner_declarations[0].value.kind,
        TypedExprKind::Variable { level: 1, .. }
    ));

    let TypedExprKind::Sequence(inner_body) = &inner_body.kind else {
        panic!("Expected sequence");
    };
    let TypedExprKind::Binary { left, right, .. } = &inner_body[0].kind else {
        panic!("Expected binary");
    };
    assert!(matches!(left.kind, TypedExprKind::Variable { level: 2, .. }));
    assert!(matches!(right.kind, TypedExprKind::Variable { level: 0, .. }));
}

#[test]
fn test_global_level_is_depth_of_reference() {
    let module = check_source("const limit: i32 = 3; entry { limit }").unwrap();

    assert!(matches!(
        &entry_body(&module)[0].kind,
        TypedExprKind::Variable {
            level: 1,
            origin: VariableOrigin::Global,
            ..
        }
    ));
    assert_eq!(module.consts[0].ty, Type::i32());
}

#[test]
fn test_negative_const() {
    let module = check_source("const low: i32 = -5;").unwrap();
    assert!(matches!(
        module.consts[0].value.kind,
        TypedExprKind::Unary { .. }
    ));
}

#[test]
fn test_if_branches() {
    let module = check_source("proc f(a: i32) -> i32 { if a == 0 { 1 } else { 2 } }").unwrap();
    assert_eq!(module.procs[0].literal.return_type, Type::i32());

    let error = check_error("proc f(a: i32) -> i32 { if a == 0 { 1 } else { true } }");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeMatchError {
            expected: "i32".to_string(),
            received: "bool".to_string(),
        }
    );
}

#[test]
fn test_if_without_else_is_unit() {
    let module = check_source("entry { if true { println_i32(1) } }").unwrap();
    assert_eq!(entry_body(&module)[0].ty, Type::unit());

    let error = check_error("entry { if true { 1 } }");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeMatchError {
            expected: "i32".to_string(),
            received: "unit".to_string(),
        }
    );
}

#[test]
fn test_if_condition_must_be_bool() {
    let error = check_error("entry { if 1 { 2 } else { 3 } }");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeMatchError {
            expected: "bool".to_string(),
            received: "i32".to_string(),
        }
    );
    assert_eq!(error.get_position().0, 11);
}

#[test]
fn test_unary_fixes_parameter_for_every_reference() {
    let module = check_source("entry { proc(a) { a; -a }(5) }").unwrap();

    let TypedExprKind::Call {
        callee: TypedCallee::Literal(literal),
        ..
    } = &entry_body(&module)[0].kind
    else {
        panic!("Expected literal call");
    };

    assert_eq!(literal.parameters, vec![("a".to_string(), Type::i32())]);

    let TypedExprKind::Sequence(body) = &literal.body.kind else {
        panic!("Expected sequence");
    };
    // The reference before the operator sees the fixed type too
    assert_eq!(body[0].ty, Type::i32());
    assert_eq!(body[1].ty, Type::i32());
}

fn literal_parameters(module: &TypedModule) -> Vec<(String, Type)> {
    let TypedExprKind::Call {
        callee: TypedCallee::Literal(literal),
        ..
    } = &entry_body(module)[0].kind
    else {
        panic!("Expected literal call");
    };
    literal.parameters.clone()
}

#[test]
fn test_fix_reaches_earlier_argument_use() {
    let module = check_source("entry { proc(a) { print_i32(a); -a }(1); }").unwrap();
    assert_eq!(literal_parameters(&module), vec![("a".to_string(), Type::i32())]);
}

#[test]
fn test_fix_reaches_earlier_binary_operand() {
    let module = check_source("entry { proc(a) { a + 1; -a }(1); }").unwrap();
    assert_eq!(literal_parameters(&module), vec![("a".to_string(), Type::i32())]);
}

#[test]
fn test_fix_reaches_earlier_if_condition() {
    let module = check_source("entry { proc(f) { if f { 1 } else { 2 }; !f }(true); }").unwrap();
    assert_eq!(literal_parameters(&module), vec![("f".to_string(), Type::bool())]);
}

#[test]
fn test_fixed_type_is_checked_against_earlier_uses() {
    let error = check_error("entry { proc(a) { print_str(a); -a }(1); }");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ArgumentTypeMatchError {
            expected: "str".to_string(),
            received: "i32".to_string()
        }
    );
}

#[test]
fn test_not_fixes_parameter_to_bool() {
    let module = check_source("entry { proc(flag) { !flag }(true) }").unwrap();
    assert_eq!(entry_body(&module)[0].ty, Type::bool());
}

#[test]
fn test_unfixed_parameter_is_ambiguous() {
    let error = check_error("entry { proc(a) { 1 }(2) }");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::AmbiguousType {
            parameter: "a".to_string()
        }
    );
    assert_eq!(error.get_position().0, 13);
}

#[test]
fn test_missing_signature() {
    let error = check_error("proc f(a) -> i32 { 1 }");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::MissingSignature {
            name: "f".to_string()
        }
    );

    let error = check_error("proc f(a: i32) { a }");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::MissingSignature { .. }
    ));

    let error = check_error("const limit = 3;");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::MissingSignature { .. }
    ));
}

#[test]
fn test_redeclarations() {
    let error = check_error("proc f() -> i32 { 1 } proc f() -> i32 { 2 }");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::FunctionAlreadyDeclared {
            function: "f".to_string()
        }
    );
    assert_eq!(error.get_position().0, 22);

    let error = check_error("proc gc() -> unit { () }");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::BuiltinRedefinition {
            name: "gc".to_string()
        }
    );

    let error = check_error("proc f(a: i32, a: i32) -> i32 { a }");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::DuplicateParameter {
            parameter: "a".to_string()
        }
    );
}

#[test]
fn test_builtin_can_be_shadowed_locally() {
    let module = check_source("entry { let flush = 1 { flush + 1 } }").unwrap();
    assert_eq!(entry_body(&module)[0].ty, Type::i32());
}

#[test]
fn test_undeclared_variable() {
    let error = check_error("entry { missing }");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::VariableNotDeclared {
            variable: "missing".to_string()
        }
    );
    assert_eq!(error.get_category(), ErrorCategory::TypeError);
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_arity_errors() {
    let error = check_error("entry { println_i32(1, 2) }");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedArguments {
            expected: 1,
            received: 2
        }
    );
    assert_eq!(error.get_position().0, 23);

    let error = check_error(r#"entry { str_concat("a") }"#);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::MissingArguments {
            expected: 2,
            received: 1
        }
    );
}

#[test]
fn test_argument_type_mismatch() {
    let error = check_error("entry { println_i32(true) }");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ArgumentTypeMatchError {
            expected: "i32".to_string(),
            received: "bool".to_string(),
        }
    );
    assert_eq!(error.get_position().0, 20);
}

#[test]
fn test_not_callable() {
    let error = check_error("const limit: i32 = 3; entry { limit(1) }");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::NotCallable {
            received: "i32".to_string()
        }
    );

    let error = check_error("entry { let x = 1 { x() } }");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::NotCallable { .. }
    ));
}

#[test]
fn test_first_class_procedures_are_rejected() {
    let error = check_error("proc f() -> i32 { 1 } entry { f }");
    assert_eq!(
        error.get_internal_error(),
        &unsupported("first-class procedure values")
    );
    assert_eq!(error.get_category(), ErrorCategory::UnsupportedFeature);

    let error = check_error("entry { let g = proc() { 1 } { 0 } }");
    assert_eq!(
        error.get_internal_error(),
        &unsupported("first-class procedure values")
    );

    let error = check_error("proc apply(g: proc(i32) -> i32) -> i32 { g(1) }");
    assert_eq!(
        error.get_internal_error(),
        &unsupported("first-class procedure values")
    );
}

#[test]
fn test_captured_variables_are_rejected() {
    let error = check_error("proc f(a: i32) -> i32 { proc() { a }() }");
    assert_eq!(error.get_internal_error(), &unsupported("captured variables"));
}

#[test]
fn test_module_level_restrictions() {
    let error = check_error("var count = 0;");
    assert_eq!(
        error.get_internal_error(),
        &unsupported("module-level mutable variables")
    );

    let error = check_error("const sum: i32 = 1 + 2;");
    assert_eq!(
        error.get_internal_error(),
        &unsupported("non-constant module-level initializers")
    );

    let error = check_error("const flag: bool = 1;");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::TypeMatchError { .. }
    ));
}

#[test]
fn test_annotation_types() {
    let error = check_error("proc f(xs: i32[]) -> i32 { 1 }");
    assert_eq!(error.get_internal_error(), &unsupported("collection types"));

    let error = check_error("proc f(p: Point) -> i32 { 1 }");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnknownType {
            type_: "Point".to_string()
        }
    );
    assert_eq!(error.get_category(), ErrorCategory::UnsupportedFeature);
}

#[test]
fn test_operand_errors() {
    let error = check_error(r#"entry { "a" + "b" }"#);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::InvalidBinaryOperand {
            operator: "+".to_string(),
            received: "str".to_string(),
        }
    );

    let error = check_error("entry { 1 && 2 }");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::InvalidBinaryOperand { .. }
    ));

    let error = check_error("entry { 1 == true }");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::TypeMatchError { .. }
    ));

    let error = check_error("entry { !1 }");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::InvalidUnaryOperand {
            operator: "!".to_string(),
            received: "i32".to_string(),
        }
    );
}

#[test]
fn test_comparison_produces_bool() {
    let module = check_source("entry { 1 < 2 && true != false }").unwrap();
    assert_eq!(entry_body(&module)[0].ty, Type::bool());
}

#[test]
fn test_return_annotation_must_match() {
    let error = check_error("proc f() -> i32 { true }");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeMatchError {
            expected: "i32".to_string(),
            received: "bool".to_string(),
        }
    );
}

#[test]
fn test_let_annotation_must_match() {
    let error = check_error("entry { let x: bool = 1 { x } }");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::TypeMatchError { .. }
    ));

    let module = check_source("entry { let x: i32 = 1, y = x + 1 { y } }").unwrap();
    assert_eq!(entry_body(&module)[0].ty, Type::i32());
}

#[test]
fn test_empty_block_is_unit() {
    let module = check_source("proc nothing() -> unit { } entry { nothing() }").unwrap();
    assert_eq!(module.procs[0].literal.return_type, Type::unit());
}

#[test]
fn test_string_length() {
    let module = check_source(r#"entry { "a\nb" }"#).unwrap();

    let TypedExprKind::Str { value, length } = &entry_body(&module)[0].kind else {
        panic!("Expected string");
    };
    assert_eq!(value, "a\\nb");
    assert_eq!(*length, 3);

    assert_eq!(logical_length(""), 0);
    assert_eq!(logical_length("\\\\\\\""), 2);
}
