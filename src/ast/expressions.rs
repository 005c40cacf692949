use crate::{lexer::tokens::Token, Span};

use super::{ast::Expr, types::TypeAnnotation};

// LITERALS

/// Number Expression
/// Represents an integer literal in the AST.
#[derive(Debug, Clone)]
pub struct NumberExpr {
    pub value: i32,
    pub span: Span,
}

/// String Expression
/// Represents a string literal. `value` is the raw text between the quotes,
/// escapes included.
#[derive(Debug, Clone)]
pub struct StringExpr {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BooleanExpr {
    pub value: bool,
    pub span: Span,
}

/// The `()` literal.
#[derive(Debug, Clone)]
pub struct UnitExpr {
    pub span: Span,
}

// COMPLEX

/// Symbol Expression
/// Represents a name reference in the AST.
#[derive(Debug, Clone)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

/// Prefix Expression
/// Represents a unary `-` or `!` applied to an expression.
#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub operator: Token,
    pub right_expr: Box<Expr>,
    pub span: Span,
}

/// Binary Expression
/// Represents a binary operation in the AST.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Call Expression
/// Represents a procedure call. The callee is any expression, though only
/// names and inline procedure literals survive type checking.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// If Expression
/// `else_body` is `None` when the source omits the else branch.
#[derive(Debug, Clone)]
pub struct IfExpr {
    pub condition: Box<Expr>,
    pub then_body: Box<Expr>,
    pub else_body: Option<Box<Expr>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct LetDeclaration {
    pub name: String,
    pub explicit_type: Option<TypeAnnotation>,
    pub value: Expr,
    pub span: Span,
}

/// Let Expression
/// Binds each declaration in order, then evaluates the body in their scope.
#[derive(Debug, Clone)]
pub struct LetExpr {
    pub declarations: Vec<LetDeclaration>,
    pub body: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub explicit_type: Option<TypeAnnotation>,
    pub span: Span,
}

/// Procedure Literal Expression
/// `proc(a: i32, b) -> i32 { ... }`, either inline or as the body of a
/// top-level procedure declaration.
#[derive(Debug, Clone)]
pub struct ProcLiteralExpr {
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeAnnotation>,
    pub body: Box<Expr>,
    pub span: Span,
}

/// Sequence Expression
/// A braced block. Its value is the value of the last element, or unit when
/// empty.
#[derive(Debug, Clone)]
pub struct SequenceExpr {
    pub body: Vec<Expr>,
    pub span: Span,
}
