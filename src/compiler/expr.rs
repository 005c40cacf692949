use std::collections::HashMap;

use crate::{
    errors::errors::{Error, ErrorImpl},
    type_checker::{
        builtins::lookup_builtin,
        environment::EnvId,
        typed_ast::{
            BinaryOperator, TypedCallee, TypedExpr, TypedExprKind, TypedLetDeclaration,
            TypedProcLiteral, UnaryOperator, VariableOrigin,
        },
    },
};

use super::{
    acir::{Instruction, Local, ProcName, PushValue},
    compiler::{build_prototype, c_type_of, lower_proc, AcirBuilder},
};

/// Lowers an expression to a push-value.
///
/// Anything that must run before the value can be read (calls, branches,
/// let bindings) is appended to `block`.
pub fn lower_expr(
    builder: &mut AcirBuilder,
    expression: &TypedExpr,
    block: &mut Vec<Instruction>,
) -> Result<PushValue, Error> {
    match &expression.kind {
        TypedExprKind::Integer(value) => Ok(PushValue::Integer(*value)),
        TypedExprKind::Boolean(value) => Ok(PushValue::Boolean(*value)),
        TypedExprKind::Str { value, length } => Ok(PushValue::StringLiteral(
            builder.intern_string(value, *length),
        )),
        TypedExprKind::Unit => Ok(PushValue::unit()),
        TypedExprKind::Variable { name, origin, .. } => Ok(match origin {
            VariableOrigin::Local { env_id } => PushValue::LoadEnvVar {
                env_id: *env_id,
                name: name.clone(),
            },
            VariableOrigin::Global => PushValue::LoadGlobal(name.clone()),
            VariableOrigin::Builtin => PushValue::LoadBuiltin(name.clone()),
        }),
        TypedExprKind::Unary { operator, operand } => {
            let operand = Box::new(lower_expr(builder, operand, block)?);
            Ok(match operator {
                UnaryOperator::Negate => PushValue::Negate(operand),
                UnaryOperator::Not => PushValue::Not(operand),
            })
        }
        TypedExprKind::Binary {
            operator,
            left,
            right,
        } => lower_binary_expr(builder, expression, *operator, left, right, block),
        TypedExprKind::Call { callee, arguments } => {
            let call = lower_call(builder, callee, arguments, block)?;
            let temp = builder.fresh_temp();

            block.push(Instruction::DefineLocal {
                c_type: c_type_of(&expression.ty, &expression.span.start)?,
                local: temp.clone(),
                value: Some(call),
            });

            if let Some(slot) = expression.root_index {
                block.push(Instruction::RootRegister {
                    slot,
                    value: PushValue::load(&temp),
                });
            }

            Ok(PushValue::load(&temp))
        }
        TypedExprKind::If {
            condition,
            then_body,
            else_body,
        } => lower_if_expr(builder, expression, condition, then_body, else_body, block),
        TypedExprKind::Let {
            env_id,
            declarations,
            body,
        } => lower_let_expr(builder, expression, *env_id, declarations, body, block),
        TypedExprKind::Sequence(body) => {
            let Some((last, rest)) = body.split_last() else {
                return Ok(PushValue::unit());
            };

            for expression in rest {
                lower_discarded(builder, expression, block)?;
            }

            lower_expr(builder, last, block)
        }
    }
}

/// Lowers an expression whose value nobody reads.
fn lower_discarded(
    builder: &mut AcirBuilder,
    expression: &TypedExpr,
    block: &mut Vec<Instruction>,
) -> Result<(), Error> {
    if let TypedExprKind::Call { callee, arguments } = &expression.kind {
        let call = lower_call(builder, callee, arguments, block)?;
        block.push(Instruction::Push(call));
    } else {
        // Pure values have no effect once their statements are emitted
        lower_expr(builder, expression, block)?;
    }

    Ok(())
}

/// Lifts a procedure literal into its own C procedure.
pub fn lower_literal(
    builder: &mut AcirBuilder,
    literal: &TypedProcLiteral,
) -> Result<ProcName, Error> {
    let name = ProcName::Literal(literal.env_id);
    let prototype = build_prototype(name.clone(), literal)?;
    builder.module.prototypes.push(prototype.clone());

    let proc = lower_proc(builder, prototype, literal)?;
    builder.module.procs.push(proc);

    Ok(name)
}

fn lower_call(
    builder: &mut AcirBuilder,
    callee: &TypedCallee,
    arguments: &[TypedExpr],
    block: &mut Vec<Instruction>,
) -> Result<PushValue, Error> {
    let arguments = arguments
        .iter()
        .map(|argument| lower_expr(builder, argument, block))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(match callee {
        TypedCallee::Literal(literal) => PushValue::CallProc {
            name: lower_literal(builder, literal)?,
            arguments,
        },
        TypedCallee::Global(name) => PushValue::CallProc {
            name: ProcName::User(name.clone()),
            arguments,
        },
        TypedCallee::Builtin(name) => {
            let consumes_frame = lookup_builtin(name)
                .map(|builtin| builtin.consumes_frame)
                .unwrap_or(false);

            if consumes_frame {
                PushValue::CallBuiltinWithFrame {
                    name: name.clone(),
                    arguments,
                }
            } else {
                PushValue::CallBuiltin {
                    name: name.clone(),
                    arguments,
                }
            }
        }
    })
}

fn lower_binary_expr(
    builder: &mut AcirBuilder,
    expression: &TypedExpr,
    operator: BinaryOperator,
    left: &TypedExpr,
    right: &TypedExpr,
    block: &mut Vec<Instruction>,
) -> Result<PushValue, Error> {
    let left = lower_expr(builder, left, block)?;

    if !operator.is_short_circuit() {
        let right = lower_expr(builder, right, block)?;
        return Ok(PushValue::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        });
    }

    let mut right_block = vec![];
    let right = lower_expr(builder, right, &mut right_block)?;

    if right_block.is_empty() {
        return Ok(PushValue::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        });
    }

    // The right side only runs when the left side does not decide the result
    let temp = builder.fresh_temp();
    block.push(Instruction::DefineLocal {
        c_type: c_type_of(&expression.ty, &expression.span.start)?,
        local: temp.clone(),
        value: Some(left),
    });
    right_block.push(Instruction::StoreLocal {
        local: temp.clone(),
        value: right,
    });

    let (then_body, else_body) = match operator {
        BinaryOperator::And => (right_block, vec![]),
        _ => (vec![], right_block),
    };
    block.push(Instruction::Branch {
        condition: PushValue::load(&temp),
        then_body,
        else_body,
    });

    Ok(PushValue::load(&temp))
}

fn lower_if_expr(
    builder: &mut AcirBuilder,
    expression: &TypedExpr,
    condition: &TypedExpr,
    then_body: &TypedExpr,
    else_body: &TypedExpr,
    block: &mut Vec<Instruction>,
) -> Result<PushValue, Error> {
    let condition = lower_expr(builder, condition, block)?;

    let temp = builder.fresh_temp();
    block.push(Instruction::DefineLocal {
        c_type: c_type_of(&expression.ty, &expression.span.start)?,
        local: temp.clone(),
        value: None,
    });

    let mut then_block = vec![];
    let then_value = lower_expr(builder, then_body, &mut then_block)?;
    then_block.push(Instruction::StoreLocal {
        local: temp.clone(),
        value: then_value,
    });

    let mut else_block = vec![];
    let else_value = lower_expr(builder, else_body, &mut else_block)?;
    else_block.push(Instruction::StoreLocal {
        local: temp.clone(),
        value: else_value,
    });

    block.push(Instruction::Branch {
        condition,
        then_body: then_block,
        else_body: else_block,
    });

    Ok(PushValue::load(&temp))
}

fn lower_let_expr(
    builder: &mut AcirBuilder,
    expression: &TypedExpr,
    env_id: EnvId,
    declarations: &[TypedLetDeclaration],
    body: &TypedExpr,
    block: &mut Vec<Instruction>,
) -> Result<PushValue, Error> {
    let mut defined: HashMap<&str, &'static str> = HashMap::new();

    for declaration in declarations {
        let value = lower_expr(builder, &declaration.value, block)?;
        let c_type = c_type_of(&declaration.value.ty, &declaration.value.span.start)?;
        let local = Local::EnvVar {
            env_id,
            name: declaration.name.clone(),
        };

        // A name declared twice in one let shares its C local
        match defined.get(declaration.name.as_str()) {
            Some(previous) if *previous == c_type => {
                block.push(Instruction::StoreLocal { local, value });
            }
            Some(_) => {
                return Err(Error::new(
                    ErrorImpl::unsupported("redeclaring a let binding with a different type"),
                    declaration.value.span.start.clone(),
                ));
            }
            None => {
                defined.insert(declaration.name.as_str(), c_type);
                block.push(Instruction::DefineLocal {
                    c_type,
                    local,
                    value: Some(value),
                });
            }
        }
    }

    let mut value = lower_expr(builder, body, block)?;

    if let Some(slot) = expression.root_index {
        let temp = builder.fresh_temp();
        block.push(Instruction::DefineLocal {
            c_type: c_type_of(&expression.ty, &expression.span.start)?,
            local: temp.clone(),
            value: Some(value),
        });
        block.push(Instruction::RootRegister {
            slot,
            value: PushValue::load(&temp),
        });
        value = PushValue::load(&temp);
    }

    // The bindings are dead once the body has produced its value
    for declaration in declarations {
        if let Some(slot) = declaration.value.root_index {
            block.push(Instruction::RootUnregister { slot });
        }
    }

    Ok(value)
}
