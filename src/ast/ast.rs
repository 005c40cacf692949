use crate::Span;

use super::{
    expressions::{
        BinaryExpr, BooleanExpr, CallExpr, IfExpr, LetExpr, NumberExpr, PrefixExpr,
        ProcLiteralExpr, SequenceExpr, StringExpr, SymbolExpr, UnitExpr,
    },
    statements::{ConstDeclStmt, EntryStmt, ProcDeclStmt, VarDeclStmt},
};

/// A top-level item of a module.
#[derive(Debug, Clone)]
pub enum Stmt {
    ProcDecl(ProcDeclStmt),
    ConstDecl(ConstDeclStmt),
    VarDecl(VarDeclStmt),
    Entry(EntryStmt),
}

/// Every construct in the language is an expression.
#[derive(Debug, Clone)]
pub enum Expr {
    Number(NumberExpr),
    String(StringExpr),
    Boolean(BooleanExpr),
    Unit(UnitExpr),
    Symbol(SymbolExpr),
    Prefix(PrefixExpr),
    Binary(BinaryExpr),
    Call(CallExpr),
    If(IfExpr),
    Let(LetExpr),
    ProcLiteral(ProcLiteralExpr),
    Sequence(SequenceExpr),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Number(expr) => &expr.span,
            Expr::String(expr) => &expr.span,
            Expr::Boolean(expr) => &expr.span,
            Expr::Unit(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::If(expr) => &expr.span,
            Expr::Let(expr) => &expr.span,
            Expr::ProcLiteral(expr) => &expr.span,
            Expr::Sequence(expr) => &expr.span,
        }
    }
}
