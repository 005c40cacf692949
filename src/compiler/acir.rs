//! The intermediate instruction representation between the typed AST and C.
//!
//! Push-values are pure and compose into larger expressions. Instructions are
//! the statements of a procedure body. Both are closed enums so the emitter can
//! render them with a total match.

use crate::type_checker::{environment::EnvId, typed_ast::BinaryOperator};

/// Name of a generated C procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcName {
    User(String),
    /// A procedure literal lifted out of its enclosing body, named by its environment.
    Literal(EnvId),
}

/// A C local owned by one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Local {
    EnvVar { env_id: EnvId, name: String },
    Temp { env_id: EnvId, index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushValue {
    LoadBuiltin(String),
    LoadGlobal(String),
    LoadEnvVar {
        env_id: EnvId,
        name: String,
    },
    LoadTemp {
        env_id: EnvId,
        index: usize,
    },
    CallBuiltin {
        name: String,
        arguments: Vec<PushValue>,
    },
    /// Builtin that receives the caller's frame as its first argument.
    CallBuiltinWithFrame {
        name: String,
        arguments: Vec<PushValue>,
    },
    CallProc {
        name: ProcName,
        arguments: Vec<PushValue>,
    },
    Integer(i32),
    Boolean(bool),
    /// Index into the module's string literal table.
    StringLiteral(usize),
    Negate(Box<PushValue>),
    Not(Box<PushValue>),
    Binary {
        operator: BinaryOperator,
        left: Box<PushValue>,
        right: Box<PushValue>,
    },
}

impl PushValue {
    pub fn load(local: &Local) -> PushValue {
        match local {
            Local::EnvVar { env_id, name } => PushValue::LoadEnvVar {
                env_id: *env_id,
                name: name.clone(),
            },
            Local::Temp { env_id, index } => PushValue::LoadTemp {
                env_id: *env_id,
                index: *index,
            },
        }
    }

    pub fn unit() -> PushValue {
        PushValue::LoadBuiltin(String::from("unit"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    RootTableInit {
        size: usize,
    },
    RootRegister {
        slot: usize,
        value: PushValue,
    },
    RootUnregister {
        slot: usize,
    },
    FrameInit {
        root_table_size: usize,
    },
    DefineLocal {
        c_type: &'static str,
        local: Local,
        value: Option<PushValue>,
    },
    StoreLocal {
        local: Local,
        value: PushValue,
    },
    Return(PushValue),
    Branch {
        condition: PushValue,
        then_body: Vec<Instruction>,
        else_body: Vec<Instruction>,
    },
    Push(PushValue),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcirParameter {
    pub env_id: EnvId,
    pub name: String,
    pub c_type: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcirPrototype {
    pub name: ProcName,
    pub parameters: Vec<AcirParameter>,
    pub result_type: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcirProc {
    pub prototype: AcirPrototype,
    pub env_id: EnvId,
    pub body: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcirConst {
    pub name: String,
    pub c_type: &'static str,
    pub value: PushValue,
}

/// A string literal as written in the source, escapes left undecoded.
#[derive(Debug, Clone, PartialEq)]
pub struct AcirString {
    pub value: String,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcirEntry {
    pub env_id: EnvId,
    pub body: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AcirModule {
    pub prototypes: Vec<AcirPrototype>,
    pub procs: Vec<AcirProc>,
    pub strings: Vec<AcirString>,
    pub consts: Vec<AcirConst>,
    pub entry: Option<AcirEntry>,
}
