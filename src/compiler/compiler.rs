//! Main compiler module.
//!
//! This module contains the `AcirBuilder` and the entry point that lowers a
//! typed module into one ACIR module: a prototype and a definition per
//! procedure, the module constants, the string literal table and the entry
//! block.

use std::collections::HashMap;

use crate::{
    ast::types::Type,
    errors::errors::Error,
    type_checker::{
        environment::EnvId,
        typed_ast::{TypedModule, TypedProcLiteral},
    },
    Position,
};

use super::{
    acir::{
        AcirConst, AcirEntry, AcirModule, AcirParameter, AcirProc, AcirPrototype, AcirString,
        Instruction, Local, ProcName,
    },
    expr::lower_expr,
};

/// Holds the state of one lowering pass.
///
/// The temporary counter and the string table live here, so two builds of the
/// same typed module produce the same output.
#[derive(Debug, Default)]
pub struct AcirBuilder {
    /// The module being built
    pub module: AcirModule,
    /// Environment of the procedure whose body is being lowered
    pub current_proc: EnvId,

    string_indices: HashMap<String, usize>,
    temp_counter: usize,
}

impl AcirBuilder {
    pub fn new() -> Self {
        AcirBuilder {
            module: AcirModule::default(),
            current_proc: 0,
            string_indices: HashMap::new(),
            temp_counter: 0,
        }
    }

    pub fn fresh_temp(&mut self) -> Local {
        let index = self.temp_counter;
        self.temp_counter += 1;

        Local::Temp {
            env_id: self.current_proc,
            index,
        }
    }

    /// Returns the table index of a string literal, adding it on first sight.
    pub fn intern_string(&mut self, value: &str, length: usize) -> usize {
        if let Some(index) = self.string_indices.get(value) {
            return *index;
        }

        let index = self.module.strings.len();
        self.module.strings.push(AcirString {
            value: String::from(value),
            length,
        });
        self.string_indices.insert(String::from(value), index);
        index
    }
}

pub fn c_type_of(ty: &Type, position: &Position) -> Result<&'static str, Error> {
    ty.to_c_type()
        .map_err(|error| Error::new(error, position.clone()))
}

pub fn build_prototype(name: ProcName, literal: &TypedProcLiteral) -> Result<AcirPrototype, Error> {
    let position = &literal.span.start;

    let parameters = literal
        .parameters
        .iter()
        .map(|(name, ty)| -> Result<AcirParameter, Error> {
            Ok(AcirParameter {
                env_id: literal.env_id,
                name: name.clone(),
                c_type: c_type_of(ty, position)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AcirPrototype {
        name,
        parameters,
        result_type: c_type_of(&literal.return_type, position)?,
    })
}

/// Root table (when needed) followed by the frame linked to the caller.
fn frame_setup(root_table_size: usize) -> Vec<Instruction> {
    let mut body = vec![];

    if root_table_size > 0 {
        body.push(Instruction::RootTableInit {
            size: root_table_size,
        });
    }
    body.push(Instruction::FrameInit { root_table_size });

    body
}

/// Lowers the body of a procedure, leaving the builder where it found it.
pub fn lower_proc(
    builder: &mut AcirBuilder,
    prototype: AcirPrototype,
    literal: &TypedProcLiteral,
) -> Result<AcirProc, Error> {
    let enclosing = builder.current_proc;
    builder.current_proc = literal.env_id;

    let mut body = frame_setup(literal.root_table_size);
    let result = lower_expr(builder, &literal.body, &mut body);

    builder.current_proc = enclosing;
    body.push(Instruction::Return(result?));

    Ok(AcirProc {
        prototype,
        env_id: literal.env_id,
        body,
    })
}

fn lower_entry(builder: &mut AcirBuilder, entry: &TypedProcLiteral) -> Result<AcirEntry, Error> {
    builder.current_proc = entry.env_id;

    let mut body = frame_setup(entry.root_table_size);
    // The entry block's value is discarded
    lower_expr(builder, &entry.body, &mut body)?;

    Ok(AcirEntry {
        env_id: entry.env_id,
        body,
    })
}

/// Lowers a whole typed module.
///
/// User procedures get their prototypes in declaration order. Procedure
/// literals are lifted as they are met and get theirs appended.
pub fn build_module(typed_module: &TypedModule) -> Result<AcirModule, Error> {
    let mut builder = AcirBuilder::new();

    let mut prototypes = vec![];
    for decl in &typed_module.procs {
        let prototype = build_prototype(ProcName::User(decl.name.clone()), &decl.literal)?;
        builder.module.prototypes.push(prototype.clone());
        prototypes.push(prototype);
    }

    for constant in &typed_module.consts {
        let mut scratch = vec![];
        let value = lower_expr(&mut builder, &constant.value, &mut scratch)?;

        builder.module.consts.push(AcirConst {
            name: constant.name.clone(),
            c_type: c_type_of(&constant.ty, &constant.value.span.start)?,
            value,
        });
    }

    for (decl, prototype) in typed_module.procs.iter().zip(prototypes) {
        let proc = lower_proc(&mut builder, prototype, &decl.literal)?;
        builder.module.procs.push(proc);
    }

    if let Some(entry) = &typed_module.entry {
        let entry = lower_entry(&mut builder, entry)?;
        builder.module.entry = Some(entry);
    }

    Ok(builder.module)
}
