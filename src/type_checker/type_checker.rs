use std::collections::{HashMap, HashSet};

use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::{
            BinaryExpr, CallExpr, IfExpr, LetExpr, PrefixExpr, ProcLiteralExpr, SequenceExpr,
            SymbolExpr,
        },
        statements::{ConstDeclStmt, ModuleStmt, ProcDeclStmt, VarDeclStmt},
        types::{PrimitiveType, Type, TypeAnnotation},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Position, Span,
};

use super::{
    builtins::lookup_builtin,
    environment::{EnvId, EnvironmentKind, EnvironmentTree},
    typed_ast::{
        BinaryOperator, TypedCallee, TypedConstDecl, TypedExpr, TypedExprKind,
        TypedLetDeclaration, TypedModule, TypedProcDecl, TypedProcLiteral, UnaryOperator,
        VariableOrigin,
    },
};

#[derive(Debug)]
pub struct TypeChecker {
    pub environments: EnvironmentTree,
    /// Declared types of every top-level procedure and constant.
    pub globals: HashMap<String, Type>,
    pub module_env: EnvId,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        let mut environments = EnvironmentTree::new();
        let module_env = environments.create(EnvironmentKind::Module, None);

        TypeChecker {
            environments,
            globals: HashMap::new(),
            module_env,
        }
    }

    pub fn convert_type(&self, annotation: &TypeAnnotation) -> Result<Type, Error> {
        match annotation {
            TypeAnnotation::Symbol(symbol) => PrimitiveType::from_name(&symbol.name)
                .map(Type::Primitive)
                .ok_or_else(|| {
                    Error::new(
                        ErrorImpl::UnknownType {
                            type_: symbol.name.clone(),
                        },
                        symbol.get_position(),
                    )
                }),
            TypeAnnotation::Array(array) => Err(Error::new(
                ErrorImpl::unsupported("collection types"),
                array.position.clone(),
            )),
            TypeAnnotation::Proc(proc_type) => {
                let arguments = proc_type
                    .arguments
                    .iter()
                    .map(|argument| self.convert_type(argument))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Type::proc(arguments, self.convert_type(&proc_type.result)?))
            }
        }
    }

    /// Looks a name up through the lexical chain, then the globals, then the builtins.
    ///
    /// Globals and builtins report the depth of `env` as their level.
    pub fn fetch_variable_type(
        &self,
        env: EnvId,
        name: &str,
    ) -> Option<(Type, usize, VariableOrigin)> {
        if let Some(resolution) = self.environments.resolve(env, name) {
            Some((
                resolution.ty,
                resolution.level,
                VariableOrigin::Local {
                    env_id: resolution.env_id,
                },
            ))
        } else if let Some(ty) = self.globals.get(name) {
            Some((ty.clone(), self.environments.depth(env), VariableOrigin::Global))
        } else {
            lookup_builtin(name).map(|builtin| {
                (
                    builtin.get_type(),
                    self.environments.depth(env),
                    VariableOrigin::Builtin,
                )
            })
        }
    }

    /// Locals must live in the same activation as the reference.
    fn check_not_captured(
        &self,
        env: EnvId,
        defining_env: EnvId,
        position: &Position,
    ) -> Result<(), Error> {
        if self.environments.nearest_proc(env) != self.environments.nearest_proc(defining_env) {
            return Err(Error::new(
                ErrorImpl::unsupported("captured variables"),
                position.clone(),
            ));
        }

        Ok(())
    }

    fn check_global_name(&self, name: &str, position: &Position) -> Result<(), Error> {
        if lookup_builtin(name).is_some() {
            return Err(Error::new(
                ErrorImpl::BuiltinRedefinition {
                    name: String::from(name),
                },
                position.clone(),
            ));
        }

        if self.globals.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::FunctionAlreadyDeclared {
                    function: String::from(name),
                },
                position.clone(),
            ));
        }

        Ok(())
    }

    /// Records the declared type of every top-level item before any body is checked.
    fn declare_globals(&mut self, module: &ModuleStmt) -> Result<(), Error> {
        for stmt in &module.body {
            match stmt {
                Stmt::ProcDecl(decl) => {
                    self.check_global_name(&decl.identifier, &decl.span.start)?;
                    let signature = self.convert_signature(decl)?;
                    self.globals.insert(decl.identifier.clone(), signature);
                }
                Stmt::ConstDecl(decl) => {
                    self.check_global_name(&decl.identifier, &decl.span.start)?;
                    let Some(annotation) = &decl.explicit_type else {
                        return Err(missing_signature(&decl.identifier, &decl.span.start));
                    };
                    let ty = self.convert_type(annotation)?;
                    self.globals.insert(decl.identifier.clone(), ty);
                }
                Stmt::VarDecl(decl) => return Err(module_variable_error(decl)),
                Stmt::Entry(_) => {}
            }
        }

        Ok(())
    }

    fn convert_signature(&self, decl: &ProcDeclStmt) -> Result<Type, Error> {
        let mut arguments = vec![];
        for parameter in &decl.literal.parameters {
            let Some(annotation) = &parameter.explicit_type else {
                return Err(missing_signature(&decl.identifier, &decl.span.start));
            };
            arguments.push(self.convert_type(annotation)?);
        }

        let Some(return_type) = &decl.literal.return_type else {
            return Err(missing_signature(&decl.identifier, &decl.span.start));
        };

        Ok(Type::proc(arguments, self.convert_type(return_type)?))
    }
}

fn missing_signature(name: &str, position: &Position) -> Error {
    Error::new(
        ErrorImpl::MissingSignature {
            name: String::from(name),
        },
        position.clone(),
    )
}

fn module_variable_error(decl: &VarDeclStmt) -> Error {
    Error::new(
        ErrorImpl::unsupported("module-level mutable variables"),
        decl.span.start.clone(),
    )
}

fn first_class_procedure_error(position: &Position) -> Error {
    Error::new(
        ErrorImpl::unsupported("first-class procedure values"),
        position.clone(),
    )
}

fn type_match_error(expected: &Type, received: &Type, position: &Position) -> Error {
    Error::new(
        ErrorImpl::TypeMatchError {
            expected: expected.to_string(),
            received: received.to_string(),
        },
        position.clone(),
    )
}

/// Exact equality, except that a parameter still waiting to be fixed agrees
/// with anything. The re-pass over its procedure checks it again once fixed.
fn types_agree(expected: &Type, received: &Type) -> bool {
    expected.is_dummy() || received.is_dummy() || expected == received
}

/// Picks the type a pair of agreeing types stands for.
fn settled_type(first: &Type, second: &Type) -> Type {
    if first.is_dummy() {
        second.clone()
    } else {
        first.clone()
    }
}

/// Length of a raw string payload once its escapes are decoded.
pub fn logical_length(raw: &str) -> usize {
    let bytes = raw.as_bytes();
    let mut index = 0;
    let mut length = 0;

    while index < bytes.len() {
        index += if bytes[index] == b'\\' { 2 } else { 1 };
        length += 1;
    }

    length
}

pub fn type_check_expr(
    type_checker: &mut TypeChecker,
    ast: &Expr,
    env: EnvId,
) -> Result<TypedExpr, Error> {
    match ast {
        Expr::Number(number) => Ok(TypedExpr::new(
            TypedExprKind::Integer(number.value),
            Type::i32(),
            number.span.clone(),
        )),
        Expr::String(string) => Ok(TypedExpr::new(
            TypedExprKind::Str {
                value: string.value.clone(),
                length: logical_length(&string.value),
            },
            Type::str(),
            string.span.clone(),
        )),
        Expr::Boolean(boolean) => Ok(TypedExpr::new(
            TypedExprKind::Boolean(boolean.value),
            Type::bool(),
            boolean.span.clone(),
        )),
        Expr::Unit(unit) => Ok(TypedExpr::new(
            TypedExprKind::Unit,
            Type::unit(),
            unit.span.clone(),
        )),
        Expr::Symbol(symbol) => type_check_symbol_expr(type_checker, symbol, env),
        Expr::Prefix(prefix) => type_check_prefix_expr(type_checker, prefix, env),
        Expr::Binary(binary) => type_check_binary_expr(type_checker, binary, env),
        Expr::Call(call) => type_check_call_expr(type_checker, call, env),
        Expr::If(if_expr) => type_check_if_expr(type_checker, if_expr, env),
        Expr::Let(let_expr) => type_check_let_expr(type_checker, let_expr, env),
        Expr::ProcLiteral(literal) => Err(first_class_procedure_error(&literal.span.start)),
        Expr::Sequence(sequence) => type_check_sequence_expr(type_checker, sequence, env),
    }
}

fn type_check_symbol_expr(
    type_checker: &mut TypeChecker,
    symbol: &SymbolExpr,
    env: EnvId,
) -> Result<TypedExpr, Error> {
    let Some((ty, level, origin)) = type_checker.fetch_variable_type(env, &symbol.value) else {
        return Err(Error::new(
            ErrorImpl::VariableNotDeclared {
                variable: symbol.value.clone(),
            },
            symbol.span.start.clone(),
        ));
    };

    if let VariableOrigin::Local { env_id } = origin {
        type_checker.check_not_captured(env, env_id, &symbol.span.start)?;
    }

    if ty.is_proc() {
        return Err(first_class_procedure_error(&symbol.span.start));
    }

    Ok(TypedExpr::new(
        TypedExprKind::Variable {
            name: symbol.value.clone(),
            level,
            origin,
        },
        ty,
        symbol.span.clone(),
    ))
}

fn type_check_prefix_expr(
    type_checker: &mut TypeChecker,
    prefix: &PrefixExpr,
    env: EnvId,
) -> Result<TypedExpr, Error> {
    let Some(operator) = UnaryOperator::from_token_kind(prefix.operator.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: prefix.operator.value.clone(),
            },
            prefix.span.start.clone(),
        ));
    };

    let mut operand = type_check_expr(type_checker, &prefix.right_expr, env)?;
    let expected = operator.operand_type();

    // A placeholder parameter takes the operator's type from here on
    if operand.ty.is_dummy() {
        if let TypedExprKind::Variable {
            name,
            origin: VariableOrigin::Local { env_id },
            ..
        } = &operand.kind
        {
            type_checker
                .environments
                .define(*env_id, name, expected.clone());
            operand.ty = expected.clone();
        }
    }

    if operand.ty != expected {
        return Err(Error::new(
            ErrorImpl::InvalidUnaryOperand {
                operator: String::from(operator.symbol()),
                received: operand.ty.to_string(),
            },
            prefix.span.start.clone(),
        ));
    }

    Ok(TypedExpr::new(
        TypedExprKind::Unary {
            operator,
            operand: Box::new(operand),
        },
        expected,
        prefix.span.clone(),
    ))
}

fn type_check_binary_expr(
    type_checker: &mut TypeChecker,
    binary: &BinaryExpr,
    env: EnvId,
) -> Result<TypedExpr, Error> {
    let Some(operator) = BinaryOperator::from_token_kind(binary.operator.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: binary.operator.value.clone(),
            },
            binary.operator.span.start.clone(),
        ));
    };

    let left = type_check_expr(type_checker, &binary.left, env)?;
    let right = type_check_expr(type_checker, &binary.right, env)?;

    if !types_agree(&left.ty, &right.ty) {
        return Err(type_match_error(&left.ty, &right.ty, &right.span.start));
    }

    let operand_type = settled_type(&left.ty, &right.ty);
    if !operand_type.is_dummy() && !operator.accepts(&operand_type) {
        return Err(Error::new(
            ErrorImpl::InvalidBinaryOperand {
                operator: String::from(operator.symbol()),
                received: operand_type.to_string(),
            },
            binary.operator.span.start.clone(),
        ));
    }

    let ty = if operator.produces_bool() {
        Type::bool()
    } else {
        operand_type
    };

    Ok(TypedExpr::new(
        TypedExprKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
        ty,
        binary.span.clone(),
    ))
}

/// Resolves a named callee. Only top-level procedures and builtins can be called.
fn resolve_callee(
    type_checker: &TypeChecker,
    symbol: &SymbolExpr,
    env: EnvId,
) -> Result<(TypedCallee, Type), Error> {
    let position = &symbol.span.start;

    if let Some(resolution) = type_checker.environments.resolve(env, &symbol.value) {
        type_checker.check_not_captured(env, resolution.env_id, position)?;

        if resolution.ty.is_proc() {
            return Err(first_class_procedure_error(position));
        }

        return Err(Error::new(
            ErrorImpl::NotCallable {
                received: resolution.ty.to_string(),
            },
            position.clone(),
        ));
    }

    if let Some(ty) = type_checker.globals.get(&symbol.value) {
        if !ty.is_proc() {
            return Err(Error::new(
                ErrorImpl::NotCallable {
                    received: ty.to_string(),
                },
                position.clone(),
            ));
        }

        return Ok((TypedCallee::Global(symbol.value.clone()), ty.clone()));
    }

    if let Some(builtin) = lookup_builtin(&symbol.value) {
        return Ok((
            TypedCallee::Builtin(symbol.value.clone()),
            builtin.get_type(),
        ));
    }

    Err(Error::new(
        ErrorImpl::VariableNotDeclared {
            variable: symbol.value.clone(),
        },
        position.clone(),
    ))
}

fn type_check_arguments(
    type_checker: &mut TypeChecker,
    call: &CallExpr,
    env: EnvId,
    expected: &[Type],
) -> Result<Vec<TypedExpr>, Error> {
    if call.arguments.len() > expected.len() {
        return Err(Error::new(
            ErrorImpl::UnexpectedArguments {
                expected: expected.len(),
                received: call.arguments.len(),
            },
            call.arguments[expected.len()].get_span().start.clone(),
        ));
    } else if call.arguments.len() < expected.len() {
        return Err(Error::new(
            ErrorImpl::MissingArguments {
                expected: expected.len(),
                received: call.arguments.len(),
            },
            call.span.end.clone(),
        ));
    }

    let mut arguments = vec![];
    for (argument, expected_type) in call.arguments.iter().zip(expected) {
        let typed = type_check_expr(type_checker, argument, env)?;

        if !types_agree(expected_type, &typed.ty) {
            return Err(Error::new(
                ErrorImpl::ArgumentTypeMatchError {
                    expected: expected_type.to_string(),
                    received: typed.ty.to_string(),
                },
                typed.span.start.clone(),
            ));
        }

        arguments.push(typed);
    }

    Ok(arguments)
}

fn type_check_call_expr(
    type_checker: &mut TypeChecker,
    call: &CallExpr,
    env: EnvId,
) -> Result<TypedExpr, Error> {
    let (callee, signature) = match call.callee.as_ref() {
        Expr::ProcLiteral(literal) => {
            let typed = type_check_proc_literal(type_checker, literal, env)?;
            let signature = typed.get_type();
            (TypedCallee::Literal(Box::new(typed)), signature)
        }
        Expr::Symbol(symbol) => resolve_callee(type_checker, symbol, env)?,
        other => {
            let typed = type_check_expr(type_checker, other, env)?;
            if typed.ty.is_proc() {
                return Err(first_class_procedure_error(&typed.span.start));
            }

            return Err(Error::new(
                ErrorImpl::NotCallable {
                    received: typed.ty.to_string(),
                },
                typed.span.start.clone(),
            ));
        }
    };

    let Type::Proc { arguments, body } = &signature else {
        return Err(Error::new(
            ErrorImpl::NotCallable {
                received: signature.to_string(),
            },
            call.span.start.clone(),
        ));
    };

    let typed_arguments = type_check_arguments(type_checker, call, env, arguments)?;

    let mut typed = TypedExpr::new(
        TypedExprKind::Call {
            callee,
            arguments: typed_arguments,
        },
        body.as_ref().clone(),
        call.span.clone(),
    );

    if typed.ty.may_be_heap_obj() {
        typed.root_index = Some(
            type_checker
                .environments
                .fresh_root_slot(env, &call.span.start)?,
        );
    }

    Ok(typed)
}

fn type_check_if_expr(
    type_checker: &mut TypeChecker,
    if_expr: &IfExpr,
    env: EnvId,
) -> Result<TypedExpr, Error> {
    let condition = type_check_expr(type_checker, &if_expr.condition, env)?;
    if !types_agree(&Type::bool(), &condition.ty) {
        return Err(type_match_error(
            &Type::bool(),
            &condition.ty,
            &condition.span.start,
        ));
    }

    let then_body = type_check_expr(type_checker, &if_expr.then_body, env)?;
    let else_body = match &if_expr.else_body {
        Some(else_body) => type_check_expr(type_checker, else_body, env)?,
        None => TypedExpr::new(
            TypedExprKind::Unit,
            Type::unit(),
            Span {
                start: if_expr.span.end.clone(),
                end: if_expr.span.end.clone(),
            },
        ),
    };

    if !types_agree(&then_body.ty, &else_body.ty) {
        return Err(type_match_error(
            &then_body.ty,
            &else_body.ty,
            &else_body.span.start,
        ));
    }

    let ty = settled_type(&then_body.ty, &else_body.ty);
    Ok(TypedExpr::new(
        TypedExprKind::If {
            condition: Box::new(condition),
            then_body: Box::new(then_body),
            else_body: Box::new(else_body),
        },
        ty,
        if_expr.span.clone(),
    ))
}

fn type_check_let_expr(
    type_checker: &mut TypeChecker,
    let_expr: &LetExpr,
    env: EnvId,
) -> Result<TypedExpr, Error> {
    let let_env = type_checker
        .environments
        .create(EnvironmentKind::Let, Some(env));

    // Each declaration only sees the ones before it
    let mut declarations = vec![];
    for declaration in &let_expr.declarations {
        let value = type_check_expr(type_checker, &declaration.value, let_env)?;

        if let Some(annotation) = &declaration.explicit_type {
            let declared = type_checker.convert_type(annotation)?;
            if !types_agree(&declared, &value.ty) {
                return Err(type_match_error(
                    &declared,
                    &value.ty,
                    &declaration.span.start,
                ));
            }
        }

        type_checker
            .environments
            .define(let_env, &declaration.name, value.ty.clone());
        declarations.push(TypedLetDeclaration {
            name: declaration.name.clone(),
            value,
        });
    }

    let body = type_check_expr(type_checker, &let_expr.body, let_env)?;
    let ty = body.ty.clone();

    let mut typed = TypedExpr::new(
        TypedExprKind::Let {
            env_id: let_env,
            declarations,
            body: Box::new(body),
        },
        ty,
        let_expr.span.clone(),
    );

    if typed.ty.may_be_heap_obj() {
        typed.root_index = Some(
            type_checker
                .environments
                .fresh_root_slot(let_env, &let_expr.span.start)?,
        );
    }

    Ok(typed)
}

fn type_check_sequence_expr(
    type_checker: &mut TypeChecker,
    sequence: &SequenceExpr,
    env: EnvId,
) -> Result<TypedExpr, Error> {
    let body = sequence
        .body
        .iter()
        .map(|expr| type_check_expr(type_checker, expr, env))
        .collect::<Result<Vec<_>, _>>()?;

    let ty = body.last().map(|last| last.ty.clone()).unwrap_or_else(Type::unit);

    Ok(TypedExpr::new(
        TypedExprKind::Sequence(body),
        ty,
        sequence.span.clone(),
    ))
}

fn type_check_proc_body(
    type_checker: &mut TypeChecker,
    literal: &ProcLiteralExpr,
    parent: EnvId,
    parameter_types: &[Type],
) -> Result<(EnvId, TypedExpr), Error> {
    let env_id = type_checker
        .environments
        .create(EnvironmentKind::Proc, Some(parent));

    for (parameter, ty) in literal.parameters.iter().zip(parameter_types) {
        type_checker
            .environments
            .define(env_id, &parameter.name, ty.clone());
    }

    let body = type_check_expr(type_checker, &literal.body, env_id)?;
    Ok((env_id, body))
}

/// Checks a procedure literal in a fresh proc environment under `parent`.
///
/// Unannotated parameters start as `Dummy`. If the body fixes any of them the
/// body is checked again from scratch with the fixed types, so every
/// reference agrees on the parameter's type.
pub fn type_check_proc_literal(
    type_checker: &mut TypeChecker,
    literal: &ProcLiteralExpr,
    parent: EnvId,
) -> Result<TypedProcLiteral, Error> {
    let mut seen = HashSet::new();
    for parameter in &literal.parameters {
        if !seen.insert(parameter.name.as_str()) {
            return Err(Error::new(
                ErrorImpl::DuplicateParameter {
                    parameter: parameter.name.clone(),
                },
                parameter.span.start.clone(),
            ));
        }
    }

    let mut parameter_types = literal
        .parameters
        .iter()
        .map(|parameter| match &parameter.explicit_type {
            Some(annotation) => type_checker.convert_type(annotation),
            None => Ok(Type::Dummy),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (mut env_id, mut body) =
        type_check_proc_body(type_checker, literal, parent, &parameter_types)?;

    let fixed_types = literal
        .parameters
        .iter()
        .zip(&parameter_types)
        .map(|(parameter, ty)| {
            type_checker
                .environments
                .lookup_local(env_id, &parameter.name)
                .cloned()
                .unwrap_or_else(|| ty.clone())
        })
        .collect::<Vec<_>>();

    let was_fixed = parameter_types
        .iter()
        .zip(&fixed_types)
        .any(|(before, after)| before.is_dummy() && !after.is_dummy());

    if was_fixed {
        parameter_types = fixed_types;
        (env_id, body) = type_check_proc_body(type_checker, literal, parent, &parameter_types)?;
    }

    for (parameter, ty) in literal.parameters.iter().zip(&parameter_types) {
        if ty.is_dummy() {
            return Err(Error::new(
                ErrorImpl::AmbiguousType {
                    parameter: parameter.name.clone(),
                },
                parameter.span.start.clone(),
            ));
        }
    }

    if let Some(annotation) = &literal.return_type {
        let declared = type_checker.convert_type(annotation)?;
        if declared != body.ty {
            return Err(type_match_error(
                &declared,
                &body.ty,
                &annotation.get_position(),
            ));
        }
    }

    Ok(TypedProcLiteral {
        env_id,
        parameters: literal
            .parameters
            .iter()
            .map(|parameter| parameter.name.clone())
            .zip(parameter_types)
            .collect(),
        return_type: body.ty.clone(),
        root_table_size: type_checker.environments.root_table_size(env_id),
        body,
        span: literal.span.clone(),
    })
}

fn type_check_const_decl(
    type_checker: &mut TypeChecker,
    decl: &ConstDeclStmt,
) -> Result<TypedConstDecl, Error> {
    let is_literal = match &decl.assigned_value {
        Expr::Number(_) | Expr::Boolean(_) | Expr::String(_) => true,
        Expr::Prefix(prefix) => {
            prefix.operator.kind == TokenKind::Dash
                && matches!(prefix.right_expr.as_ref(), Expr::Number(_))
        }
        _ => false,
    };

    if !is_literal {
        return Err(Error::new(
            ErrorImpl::unsupported("non-constant module-level initializers"),
            decl.assigned_value.get_span().start.clone(),
        ));
    }

    let Some(annotation) = &decl.explicit_type else {
        return Err(missing_signature(&decl.identifier, &decl.span.start));
    };
    let ty = type_checker.convert_type(annotation)?;

    let module_env = type_checker.module_env;
    let value = type_check_expr(type_checker, &decl.assigned_value, module_env)?;

    if ty != value.ty {
        return Err(type_match_error(&ty, &value.ty, &value.span.start));
    }

    Ok(TypedConstDecl {
        name: decl.identifier.clone(),
        ty,
        value,
    })
}

fn type_check_entry(
    type_checker: &mut TypeChecker,
    body: &Expr,
    span: &Span,
) -> Result<TypedProcLiteral, Error> {
    let env_id = type_checker
        .environments
        .create(EnvironmentKind::Proc, Some(type_checker.module_env));
    let body = type_check_expr(type_checker, body, env_id)?;

    Ok(TypedProcLiteral {
        env_id,
        parameters: vec![],
        return_type: body.ty.clone(),
        root_table_size: type_checker.environments.root_table_size(env_id),
        body,
        span: span.clone(),
    })
}

/// Checks a whole module.
///
/// Every top-level signature is collected first so procedures can call each
/// other regardless of order. The first violation aborts the pass.
pub fn type_check(ast: &ModuleStmt) -> Result<TypedModule, Error> {
    let mut type_checker = TypeChecker::new();
    type_checker.declare_globals(ast)?;

    let mut module = TypedModule {
        procs: vec![],
        consts: vec![],
        entry: None,
    };

    for stmt in &ast.body {
        match stmt {
            Stmt::ProcDecl(decl) => {
                let module_env = type_checker.module_env;
                let literal = type_check_proc_literal(&mut type_checker, &decl.literal, module_env)?;
                module.procs.push(TypedProcDecl {
                    name: decl.identifier.clone(),
                    literal,
                });
            }
            Stmt::ConstDecl(decl) => {
                module
                    .consts
                    .push(type_check_const_decl(&mut type_checker, decl)?);
            }
            Stmt::VarDecl(decl) => return Err(module_variable_error(decl)),
            Stmt::Entry(entry) => {
                module.entry = Some(type_check_entry(
                    &mut type_checker,
                    &entry.body,
                    &entry.span,
                )?);
            }
        }
    }

    Ok(module)
}
