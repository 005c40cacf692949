use crate::Span;

use super::{
    ast::{Expr, Stmt},
    expressions::ProcLiteralExpr,
    types::TypeAnnotation,
};

/// `proc name(params) -> R { ... }` at module level.
#[derive(Debug, Clone)]
pub struct ProcDeclStmt {
    pub identifier: String,
    pub literal: ProcLiteralExpr,
    pub span: Span,
}

/// `const name: T = value;`
#[derive(Debug, Clone)]
pub struct ConstDeclStmt {
    pub identifier: String,
    pub explicit_type: Option<TypeAnnotation>,
    pub assigned_value: Expr,
    pub span: Span,
}

/// `var name: T = value;`, parsed only to be rejected.
#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub identifier: String,
    pub explicit_type: Option<TypeAnnotation>,
    pub assigned_value: Expr,
    pub span: Span,
}

/// `entry { ... }`, the program's starting point.
#[derive(Debug, Clone)]
pub struct EntryStmt {
    pub body: Expr,
    pub span: Span,
}

/// A whole source file.
#[derive(Debug, Clone)]
pub struct ModuleStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl ModuleStmt {
    pub fn entry(&self) -> Option<&EntryStmt> {
        self.body.iter().find_map(|stmt| match stmt {
            Stmt::Entry(entry) => Some(entry),
            _ => None,
        })
    }
}
