//! The decorated syntax tree produced by the type checker.
//!
//! Every node carries its type. Variable references carry their resolved
//! level and origin, and calls and lets whose result may reference the heap
//! carry the root slot assigned to them.

use crate::{ast::types::Type, lexer::tokens::TokenKind, Span};

use super::environment::EnvId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl UnaryOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<UnaryOperator> {
        match kind {
            TokenKind::Dash => Some(UnaryOperator::Negate),
            TokenKind::Not => Some(UnaryOperator::Not),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Not => "!",
        }
    }

    /// The only type the operator accepts, which is also its result type.
    pub fn operand_type(&self) -> Type {
        match self {
            UnaryOperator::Negate => Type::i32(),
            UnaryOperator::Not => Type::bool(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<BinaryOperator> {
        match kind {
            TokenKind::Plus => Some(BinaryOperator::Add),
            TokenKind::Dash => Some(BinaryOperator::Sub),
            TokenKind::Star => Some(BinaryOperator::Mul),
            TokenKind::Slash => Some(BinaryOperator::Div),
            TokenKind::Percent => Some(BinaryOperator::Mod),
            TokenKind::Equals => Some(BinaryOperator::Eq),
            TokenKind::NotEquals => Some(BinaryOperator::Ne),
            TokenKind::Less => Some(BinaryOperator::Lt),
            TokenKind::LessEquals => Some(BinaryOperator::Le),
            TokenKind::Greater => Some(BinaryOperator::Gt),
            TokenKind::GreaterEquals => Some(BinaryOperator::Ge),
            TokenKind::And => Some(BinaryOperator::And),
            TokenKind::Or => Some(BinaryOperator::Or),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }

    pub fn produces_bool(&self) -> bool {
        !matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Sub
                | BinaryOperator::Mul
                | BinaryOperator::Div
                | BinaryOperator::Mod
        )
    }

    pub fn is_short_circuit(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    /// Whether the operator is defined on operands of type `ty`.
    pub fn accepts(&self, ty: &Type) -> bool {
        match self {
            BinaryOperator::And | BinaryOperator::Or => *ty == Type::bool(),
            BinaryOperator::Eq | BinaryOperator::Ne => *ty == Type::i32() || *ty == Type::bool(),
            _ => *ty == Type::i32(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableOrigin {
    /// Bound in a lexical environment (parameter or let declaration).
    Local { env_id: EnvId },
    /// A top-level procedure or constant.
    Global,
    Builtin,
}

#[derive(Debug, Clone)]
pub enum TypedCallee {
    Builtin(String),
    Global(String),
    Literal(Box<TypedProcLiteral>),
}

#[derive(Debug, Clone)]
pub struct TypedLetDeclaration {
    pub name: String,
    pub value: TypedExpr,
}

#[derive(Debug, Clone)]
pub enum TypedExprKind {
    Integer(i32),
    Boolean(bool),
    /// Raw payload (escapes as written) and its length once decoded.
    Str {
        value: String,
        length: usize,
    },
    Unit,
    Variable {
        name: String,
        /// Hops from the reference to the defining environment. Only kept for
        /// diagnostics: captured locals are rejected, so lowering never needs it.
        level: usize,
        origin: VariableOrigin,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<TypedExpr>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<TypedExpr>,
        right: Box<TypedExpr>,
    },
    Call {
        callee: TypedCallee,
        arguments: Vec<TypedExpr>,
    },
    If {
        condition: Box<TypedExpr>,
        then_body: Box<TypedExpr>,
        else_body: Box<TypedExpr>,
    },
    Let {
        env_id: EnvId,
        declarations: Vec<TypedLetDeclaration>,
        body: Box<TypedExpr>,
    },
    Sequence(Vec<TypedExpr>),
}

#[derive(Debug, Clone)]
pub struct TypedExpr {
    pub kind: TypedExprKind,
    pub ty: Type,
    pub root_index: Option<usize>,
    pub span: Span,
}

impl TypedExpr {
    pub fn new(kind: TypedExprKind, ty: Type, span: Span) -> Self {
        TypedExpr {
            kind,
            ty,
            root_index: None,
            span,
        }
    }
}

/// A checked procedure body, either a top-level procedure, an inline literal
/// or the entry block.
#[derive(Debug, Clone)]
pub struct TypedProcLiteral {
    pub env_id: EnvId,
    pub parameters: Vec<(String, Type)>,
    pub return_type: Type,
    pub body: TypedExpr,
    pub root_table_size: usize,
    pub span: Span,
}

impl TypedProcLiteral {
    pub fn get_type(&self) -> Type {
        Type::proc(
            self.parameters.iter().map(|(_, ty)| ty.clone()).collect(),
            self.return_type.clone(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct TypedProcDecl {
    pub name: String,
    pub literal: TypedProcLiteral,
}

#[derive(Debug, Clone)]
pub struct TypedConstDecl {
    pub name: String,
    pub ty: Type,
    pub value: TypedExpr,
}

#[derive(Debug, Clone)]
pub struct TypedModule {
    pub procs: Vec<TypedProcDecl>,
    pub consts: Vec<TypedConstDecl>,
    pub entry: Option<TypedProcLiteral>,
}
