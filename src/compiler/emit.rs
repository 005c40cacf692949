//! Renders an ACIR module as one C translation unit.
//!
//! The output depends only on the module, so emitting the same module twice
//! gives the same text.

use super::acir::{
    AcirConst, AcirEntry, AcirModule, AcirPrototype, AcirString, Instruction, Local, ProcName,
    PushValue,
};

const INDENT: &str = "    ";

pub fn proc_name(name: &ProcName) -> String {
    match name {
        ProcName::User(name) => format!("userdef_{}", name),
        ProcName::Literal(env_id) => format!("userdef_{}_literal", env_id),
    }
}

pub fn local_name(local: &Local) -> String {
    match local {
        Local::EnvVar { env_id, name } => format!("env{}_var_{}", env_id, name),
        Local::Temp { env_id, index } => format!("env{}_tmp{}", env_id, index),
    }
}

fn declare(c_type: &str, name: &str) -> String {
    if c_type.ends_with('*') {
        format!("{}{}", c_type, name)
    } else {
        format!("{} {}", c_type, name)
    }
}

fn render_arguments(prefix: Option<&str>, arguments: &[PushValue]) -> String {
    prefix
        .map(String::from)
        .into_iter()
        .chain(arguments.iter().map(render_value))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_value(value: &PushValue) -> String {
    match value {
        PushValue::LoadBuiltin(name) => format!("ajisai_{}", name),
        PushValue::LoadGlobal(name) => format!("userdef_{}", name),
        PushValue::LoadEnvVar { env_id, name } => local_name(&Local::EnvVar {
            env_id: *env_id,
            name: name.clone(),
        }),
        PushValue::LoadTemp { env_id, index } => local_name(&Local::Temp {
            env_id: *env_id,
            index: *index,
        }),
        PushValue::CallBuiltin { name, arguments } => {
            format!("ajisai_{}({})", name, render_arguments(None, arguments))
        }
        PushValue::CallBuiltinWithFrame { name, arguments } => format!(
            "ajisai_{}({})",
            name,
            render_arguments(Some("&frame"), arguments)
        ),
        PushValue::CallProc { name, arguments } => format!(
            "{}({})",
            proc_name(name),
            render_arguments(Some("&frame"), arguments)
        ),
        PushValue::Integer(value) => value.to_string(),
        PushValue::Boolean(value) => value.to_string(),
        PushValue::StringLiteral(index) => format!("((AjisaiString *)&strlit{})", index),
        PushValue::Negate(operand) => format!("(-{})", render_value(operand)),
        PushValue::Not(operand) => format!("(!{})", render_value(operand)),
        PushValue::Binary {
            operator,
            left,
            right,
        } => format!(
            "({} {} {})",
            render_value(left),
            operator.symbol(),
            render_value(right)
        ),
    }
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

pub fn render_instructions(out: &mut String, depth: usize, instructions: &[Instruction]) {
    for instruction in instructions {
        render_instruction(out, depth, instruction);
    }
}

fn render_instruction(out: &mut String, depth: usize, instruction: &Instruction) {
    match instruction {
        Instruction::RootTableInit { size } => push_line(
            out,
            depth,
            &format!("AjisaiObject *root_table[{}] = {{0}};", size),
        ),
        Instruction::RootRegister { slot, value } => push_line(
            out,
            depth,
            &format!(
                "root_table[{}] = (AjisaiObject *){};",
                slot,
                render_value(value)
            ),
        ),
        Instruction::RootUnregister { slot } => {
            push_line(out, depth, &format!("root_table[{}] = NULL;", slot))
        }
        Instruction::FrameInit { root_table_size } => {
            push_line(out, depth, "ProcFrame frame;");
            let line = if *root_table_size > 0 {
                format!(
                    "ajisai_frame_init(&frame, parent_frame, root_table, {});",
                    root_table_size
                )
            } else {
                String::from("ajisai_frame_init(&frame, parent_frame, NULL, 0);")
            };
            push_line(out, depth, &line);
        }
        Instruction::DefineLocal {
            c_type,
            local,
            value,
        } => {
            let declaration = declare(c_type, &local_name(local));
            let line = match value {
                Some(value) => format!("{} = {};", declaration, render_value(value)),
                None => format!("{};", declaration),
            };
            push_line(out, depth, &line);
        }
        Instruction::StoreLocal { local, value } => push_line(
            out,
            depth,
            &format!("{} = {};", local_name(local), render_value(value)),
        ),
        Instruction::Return(value) => {
            push_line(out, depth, &format!("return {};", render_value(value)))
        }
        Instruction::Branch {
            condition,
            then_body,
            else_body,
        } => {
            push_line(out, depth, &format!("if ({}) {{", render_value(condition)));
            render_instructions(out, depth + 1, then_body);
            push_line(out, depth, "} else {");
            render_instructions(out, depth + 1, else_body);
            push_line(out, depth, "}");
        }
        Instruction::Push(value) => push_line(out, depth, &format!("{};", render_value(value))),
    }
}

pub fn render_signature(prototype: &AcirPrototype) -> String {
    let parameters = std::iter::once(String::from("ProcFrame *parent_frame"))
        .chain(prototype.parameters.iter().map(|parameter| {
            declare(
                parameter.c_type,
                &local_name(&Local::EnvVar {
                    env_id: parameter.env_id,
                    name: parameter.name.clone(),
                }),
            )
        }))
        .collect::<Vec<_>>()
        .join(", ");

    declare(
        prototype.result_type,
        &format!("{}({})", proc_name(&prototype.name), parameters),
    )
}

fn render_string(index: usize, string: &AcirString) -> String {
    format!(
        "static AjisaiStaticString strlit{} = {{ {{ AJISAI_TAG_STRING, AJISAI_FLAG_STATIC }}, {}, \"{}\" }};",
        index, string.length, string.value
    )
}

fn render_const(constant: &AcirConst) -> String {
    format!(
        "static {} = {};",
        declare(constant.c_type, &format!("const userdef_{}", constant.name)),
        render_value(&constant.value)
    )
}

fn render_entry(out: &mut String, entry: Option<&AcirEntry>) {
    out.push_str("void ajisai_entry(void) {\n");
    push_line(out, 1, "ajisai_mm_init();");
    push_line(out, 1, "ProcFrame root_frame;");
    push_line(out, 1, "ajisai_frame_init(&root_frame, NULL, NULL, 0);");
    push_line(out, 1, "ProcFrame *parent_frame = &root_frame;");

    if let Some(entry) = entry {
        render_instructions(out, 1, &entry.body);
    }

    push_line(out, 1, "ajisai_mm_deinit();");
    out.push_str("}\n");
}

pub fn emit_module(module: &AcirModule) -> String {
    let mut out = String::from("#include \"ajisai_runtime.h\"\n");

    if !module.prototypes.is_empty() {
        out.push('\n');
        for prototype in &module.prototypes {
            push_line(&mut out, 0, &format!("{};", render_signature(prototype)));
        }
    }

    if !module.strings.is_empty() {
        out.push('\n');
        for (index, string) in module.strings.iter().enumerate() {
            push_line(&mut out, 0, &render_string(index, string));
        }
    }

    if !module.consts.is_empty() {
        out.push('\n');
        for constant in &module.consts {
            push_line(&mut out, 0, &render_const(constant));
        }
    }

    for proc in &module.procs {
        out.push('\n');
        push_line(
            &mut out,
            0,
            &format!("{} {{", render_signature(&proc.prototype)),
        );
        render_instructions(&mut out, 1, &proc.body);
        out.push_str("}\n");
    }

    out.push('\n');
    render_entry(&mut out, module.entry.as_ref());

    out.push('\n');
    out.push_str("int main(void) {\n");
    push_line(&mut out, 1, "ajisai_entry();");
    push_line(&mut out, 1, "return 0;");
    out.push_str("}\n");

    out
}
