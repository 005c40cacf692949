//! The fixed set of runtime-provided procedures.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ast::types::Type;

#[derive(Debug, Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub arguments: Vec<Type>,
    pub result: Type,
    /// Receives the caller's frame as its first C argument.
    pub consumes_frame: bool,
}

impl Builtin {
    pub fn get_type(&self) -> Type {
        Type::proc(self.arguments.clone(), self.result.clone())
    }
}

fn builtin(
    name: &'static str,
    arguments: Vec<Type>,
    result: Type,
    consumes_frame: bool,
) -> (&'static str, Builtin) {
    (
        name,
        Builtin {
            name,
            arguments,
            result,
            consumes_frame,
        },
    )
}

lazy_static! {
    pub static ref BUILTINS: HashMap<&'static str, Builtin> = HashMap::from([
        builtin("print_i32", vec![Type::i32()], Type::unit(), false),
        builtin("println_i32", vec![Type::i32()], Type::unit(), false),
        builtin("print_bool", vec![Type::bool()], Type::unit(), false),
        builtin("println_bool", vec![Type::bool()], Type::unit(), false),
        builtin("print_str", vec![Type::str()], Type::unit(), false),
        builtin("println_str", vec![Type::str()], Type::unit(), false),
        builtin("flush", vec![], Type::unit(), false),
        builtin("str_concat", vec![Type::str(), Type::str()], Type::str(), true),
        builtin("str_slice", vec![Type::str(), Type::i32(), Type::i32()], Type::str(), true),
        builtin("str_eq", vec![Type::str(), Type::str()], Type::bool(), false),
        builtin("str_repeat", vec![Type::str(), Type::i32()], Type::str(), true),
        builtin("gc", vec![], Type::unit(), true),
    ]);
}

pub fn lookup_builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_consuming_builtins() {
        let mut consuming = BUILTINS
            .values()
            .filter(|builtin| builtin.consumes_frame)
            .map(|builtin| builtin.name)
            .collect::<Vec<_>>();
        consuming.sort();

        assert_eq!(consuming, vec!["gc", "str_concat", "str_repeat", "str_slice"]);
        assert_eq!(BUILTINS.len(), 12);
    }

    #[test]
    fn test_builtin_signatures() {
        assert_eq!(
            lookup_builtin("str_slice").unwrap().get_type(),
            Type::proc(vec![Type::str(), Type::i32(), Type::i32()], Type::str())
        );
        assert_eq!(
            lookup_builtin("str_eq").unwrap().get_type().to_string(),
            "proc(str, str) -> bool"
        );
        assert!(lookup_builtin("printf").is_none());
    }
}
