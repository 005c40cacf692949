//! Type system definitions.
//!
//! This module defines two families of types:
//!
//! - Annotation types (`SymbolType`, `ArrayType`, `ProcTypeAnnotation`), which
//!   are what the parser reads after a `:` or `->`
//! - Semantic types (`Type`), which the type checker assigns to every
//!   expression and which the C emitter maps onto C type names
//!
//! `Type::Dummy` is the placeholder for a procedure parameter whose type is
//! not yet known. It only ever equals itself and must be resolved before code
//! generation.

use std::fmt::Display;

use crate::{errors::errors::ErrorImpl, Position};

/// The builtin value types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    I32,
    Bool,
    Str,
    Unit,
}

impl PrimitiveType {
    pub fn from_name(name: &str) -> Option<PrimitiveType> {
        match name {
            "i32" => Some(PrimitiveType::I32),
            "bool" => Some(PrimitiveType::Bool),
            "str" => Some(PrimitiveType::Str),
            "unit" => Some(PrimitiveType::Unit),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::I32 => "i32",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Str => "str",
            PrimitiveType::Unit => "unit",
        }
    }
}

/// Semantic type of an expression.
#[derive(Debug, Clone)]
pub enum Type {
    Primitive(PrimitiveType),
    Proc { arguments: Vec<Type>, body: Box<Type> },
    Dummy,
}

impl Type {
    pub fn i32() -> Type {
        Type::Primitive(PrimitiveType::I32)
    }

    pub fn bool() -> Type {
        Type::Primitive(PrimitiveType::Bool)
    }

    pub fn str() -> Type {
        Type::Primitive(PrimitiveType::Str)
    }

    pub fn unit() -> Type {
        Type::Primitive(PrimitiveType::Unit)
    }

    pub fn proc(arguments: Vec<Type>, body: Type) -> Type {
        Type::Proc {
            arguments,
            body: Box::new(body),
        }
    }

    pub fn is_dummy(&self) -> bool {
        matches!(self, Type::Dummy)
    }

    pub fn is_proc(&self) -> bool {
        matches!(self, Type::Proc { .. })
    }

    /// Whether a value of this type may reference the runtime heap.
    ///
    /// Anything that is not a plain scalar is treated as a potential heap object.
    pub fn may_be_heap_obj(&self) -> bool {
        !matches!(
            self,
            Type::Primitive(PrimitiveType::I32 | PrimitiveType::Bool | PrimitiveType::Unit)
        )
    }

    pub fn to_c_type(&self) -> Result<&'static str, ErrorImpl> {
        match self {
            Type::Primitive(PrimitiveType::I32) => Ok("int32_t"),
            Type::Primitive(PrimitiveType::Bool) => Ok("bool"),
            Type::Primitive(PrimitiveType::Str) => Ok("AjisaiString *"),
            Type::Primitive(PrimitiveType::Unit) => Ok("AjisaiUnit"),
            Type::Proc { .. } => Err(ErrorImpl::unsupported("first-class procedure values")),
            Type::Dummy => Err(ErrorImpl::unsupported("unresolved types in generated code")),
        }
    }
}

/// Structural type equality.
///
/// Procedure types compare arity, each argument and the result.
pub fn types_equal(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Dummy, Type::Dummy) => true,
        (Type::Primitive(left), Type::Primitive(right)) => left == right,
        (
            Type::Proc {
                arguments: left_args,
                body: left_body,
            },
            Type::Proc {
                arguments: right_args,
                body: right_body,
            },
        ) => {
            left_args.len() == right_args.len()
                && left_args
                    .iter()
                    .zip(right_args.iter())
                    .all(|(left, right)| types_equal(left, right))
                && types_equal(left_body, right_body)
        }
        _ => false,
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        types_equal(self, other)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Primitive(primitive) => write!(f, "{}", primitive.name()),
            Type::Proc { arguments, body } => {
                let arguments = arguments
                    .iter()
                    .map(|argument| argument.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "proc({}) -> {}", arguments, body)
            }
            Type::Dummy => write!(f, "_"),
        }
    }
}

/// A named type reference such as `i32`.
#[derive(Debug, Clone)]
pub struct SymbolType {
    pub name: String,
    pub position: Position,
}

impl SymbolType {
    pub fn get_position(&self) -> Position {
        self.position.clone()
    }
}

/// `T[]` in an annotation. Parsed so it can be rejected with a clear error.
#[derive(Debug, Clone)]
pub struct ArrayType {
    pub underlying: Box<TypeAnnotation>,
    pub position: Position,
}

/// `proc(T, ...) -> R` in an annotation.
#[derive(Debug, Clone)]
pub struct ProcTypeAnnotation {
    pub arguments: Vec<TypeAnnotation>,
    pub result: Box<TypeAnnotation>,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub enum TypeAnnotation {
    Symbol(SymbolType),
    Array(ArrayType),
    Proc(ProcTypeAnnotation),
}

impl TypeAnnotation {
    pub fn get_position(&self) -> Position {
        match self {
            TypeAnnotation::Symbol(symbol) => symbol.get_position(),
            TypeAnnotation::Array(array) => array.position.clone(),
            TypeAnnotation::Proc(proc_type) => proc_type.position.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_only_equals_itself() {
        assert!(types_equal(&Type::Dummy, &Type::Dummy));
        assert!(!types_equal(&Type::Dummy, &Type::i32()));
        assert!(!types_equal(&Type::str(), &Type::Dummy));
        assert!(!types_equal(
            &Type::proc(vec![Type::i32()], Type::bool()),
            &Type::Dummy
        ));
    }

    #[test]
    fn test_primitive_equality() {
        assert_eq!(Type::i32(), Type::i32());
        assert_ne!(Type::i32(), Type::bool());
        assert_ne!(Type::str(), Type::unit());
    }

    #[test]
    fn test_proc_equality() {
        let a = Type::proc(vec![Type::i32(), Type::bool()], Type::str());
        let b = Type::proc(vec![Type::i32(), Type::bool()], Type::str());
        let different_arity = Type::proc(vec![Type::i32()], Type::str());
        let different_result = Type::proc(vec![Type::i32(), Type::bool()], Type::unit());
        let with_dummy = Type::proc(vec![Type::Dummy, Type::bool()], Type::str());

        assert_eq!(a, b);
        assert_ne!(a, different_arity);
        assert_ne!(a, different_result);
        assert_ne!(a, with_dummy);
        assert_ne!(a, Type::i32());
    }

    #[test]
    fn test_c_type_mapping() {
        assert_eq!(Type::i32().to_c_type().unwrap(), "int32_t");
        assert_eq!(Type::bool().to_c_type().unwrap(), "bool");
        assert_eq!(Type::str().to_c_type().unwrap(), "AjisaiString *");
        assert_eq!(Type::unit().to_c_type().unwrap(), "AjisaiUnit");
        assert!(matches!(
            Type::proc(vec![], Type::unit()).to_c_type(),
            Err(ErrorImpl::UnsupportedFeature { .. })
        ));
        assert!(Type::Dummy.to_c_type().is_err());
    }

    #[test]
    fn test_heap_types() {
        assert!(Type::str().may_be_heap_obj());
        assert!(!Type::i32().may_be_heap_obj());
        assert!(!Type::bool().may_be_heap_obj());
        assert!(!Type::unit().may_be_heap_obj());
        assert!(Type::proc(vec![], Type::str()).may_be_heap_obj());
        assert!(Type::Dummy.may_be_heap_obj());
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::i32().to_string(), "i32");
        assert_eq!(Type::Dummy.to_string(), "_");
        assert_eq!(
            Type::proc(vec![Type::i32(), Type::bool()], Type::str()).to_string(),
            "proc(i32, bool) -> str"
        );
        assert_eq!(Type::proc(vec![], Type::unit()).to_string(), "proc() -> unit");
    }
}
