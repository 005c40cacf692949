use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

/// The four failure families of a compilation.
///
/// Every one of them aborts the pipeline; the category only decides how the
/// failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    LexError,
    ParseError,
    TypeError,
    UnsupportedFeature,
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnterminatedString
            | ErrorImpl::NewlineInString
            | ErrorImpl::InvalidEscape { .. } => ErrorCategory::LexError,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::DuplicateEntry => ErrorCategory::ParseError,
            ErrorImpl::UnsupportedFeature { .. } | ErrorImpl::UnknownType { .. } => {
                ErrorCategory::UnsupportedFeature
            }
            _ => ErrorCategory::TypeError,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::NewlineInString => "NewlineInString",
            ErrorImpl::InvalidEscape { .. } => "InvalidEscape",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::DuplicateEntry => "DuplicateEntry",
            ErrorImpl::MissingSignature { .. } => "MissingSignature",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::InvalidUnaryOperand { .. } => "InvalidUnaryOperand",
            ErrorImpl::InvalidBinaryOperand { .. } => "InvalidBinaryOperand",
            ErrorImpl::AmbiguousType { .. } => "AmbiguousType",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::BuiltinRedefinition { .. } => "BuiltinRedefinition",
            ErrorImpl::DuplicateParameter { .. } => "DuplicateParameter",
            ErrorImpl::NoActivationFrame => "NoActivationFrame",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::UnsupportedFeature { .. } => "UnsupportedFeature",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("String literal is missing its closing quote"))
            }
            ErrorImpl::NewlineInString => ErrorTip::Suggestion(String::from(
                "String literals cannot span lines, use `\\n` instead",
            )),
            ErrorImpl::InvalidEscape { sequence } => ErrorTip::Suggestion(format!(
                "Unknown escape `{}`, expected one of `\\n`, `\\t`, `\\r`, `\\\\`, `\\\"`",
                sequence
            )),
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the i32 limit?",
                token
            )),
            ErrorImpl::DuplicateEntry => {
                ErrorTip::Suggestion(String::from("A module can only have one `entry` block"))
            }
            ErrorImpl::MissingSignature { name } => ErrorTip::Suggestion(format!(
                "Top-level definition `{}` needs explicit parameter and result types",
                name
            )),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::ArgumentTypeMatchError { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::InvalidUnaryOperand { operator, received } => ErrorTip::Suggestion(
                format!("Operator `{}` cannot be applied to `{}`", operator, received),
            ),
            ErrorImpl::InvalidBinaryOperand { operator, received } => {
                if received == "str" {
                    ErrorTip::Suggestion(format!(
                        "Operator `{}` cannot be applied to `str`, use the `str_*` builtins",
                        operator
                    ))
                } else {
                    ErrorTip::Suggestion(format!(
                        "Operator `{}` cannot be applied to `{}`",
                        operator, received
                    ))
                }
            }
            ErrorImpl::AmbiguousType { parameter } => ErrorTip::Suggestion(format!(
                "Type of parameter `{}` cannot be inferred, add an annotation",
                parameter
            )),
            ErrorImpl::NotCallable { received } => {
                ErrorTip::Suggestion(format!("Value of type `{}` is not callable", received))
            }
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Procedure `{}` already declared", function))
            }
            ErrorImpl::BuiltinRedefinition { name } => ErrorTip::Suggestion(format!(
                "`{}` is a builtin and cannot be redefined at the top level",
                name
            )),
            ErrorImpl::DuplicateParameter { parameter } => {
                ErrorTip::Suggestion(format!("Parameter `{}` declared twice", parameter))
            }
            ErrorImpl::NoActivationFrame => ErrorTip::None,
            ErrorImpl::UnknownType { type_ } => ErrorTip::Suggestion(format!(
                "Unknown type `{}` found, user-defined types are not supported",
                type_
            )),
            ErrorImpl::UnsupportedFeature { feature } => {
                ErrorTip::Suggestion(format!("Ajisai does not support {}", feature))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}: {}",
            self.get_category(),
            self.position.1,
            self.position.0,
            self.internal_error
        )
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexing
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("newline in string literal")]
    NewlineInString,
    #[error("invalid escape sequence {sequence:?}")]
    InvalidEscape { sequence: String },

    // Parsing
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("duplicate entry block")]
    DuplicateEntry,

    // Typing
    #[error("definition {name:?} has no explicit signature")]
    MissingSignature { name: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("unexpected arguments: expected {expected:?}, received {received:?}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("missing arguments: expected {expected:?}, received {received:?}")]
    MissingArguments { expected: usize, received: usize },
    #[error("argument types do not match: expected {expected:?}, received {received:?}")]
    ArgumentTypeMatchError { expected: String, received: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMatchError { expected: String, received: String },
    #[error("invalid operand for unary {operator:?}: {received:?}")]
    InvalidUnaryOperand { operator: String, received: String },
    #[error("invalid operands for binary {operator:?}: {received:?}")]
    InvalidBinaryOperand { operator: String, received: String },
    #[error("ambiguous type for parameter {parameter:?}")]
    AmbiguousType { parameter: String },
    #[error("value of type {received:?} is not callable")]
    NotCallable { received: String },
    #[error("procedure {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },
    #[error("builtin {name:?} cannot be redefined")]
    BuiltinRedefinition { name: String },
    #[error("parameter {parameter:?} declared twice")]
    DuplicateParameter { parameter: String },
    #[error("module scope has no activation frame for root slots")]
    NoActivationFrame,

    // Unsupported
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("unsupported feature: {feature}")]
    UnsupportedFeature { feature: String },
}

impl ErrorImpl {
    pub fn unsupported(feature: &str) -> Self {
        ErrorImpl::UnsupportedFeature {
            feature: String::from(feature),
        }
    }
}
