//! Unit tests and shared helpers.

pub mod asm;
pub mod encode;
pub mod properties;
pub mod select;

use rvcgen_core::binding::Bindings;
use rvcgen_core::field::{Field, FieldKey};
use rvcgen_core::{Catalog, Command};

/// Builds the full RV32IC catalog.
pub fn catalog() -> Catalog {
    rvcgen_core::isa::catalog().expect("catalog builds")
}

/// Operand bindings for `command`: the immediate (when given) plus register
/// indices assigned to register fields in declaration order.
pub fn operand_bindings(command: &Command, imm: Option<i64>, regs: &[i64]) -> Bindings {
    let mut bindings = Bindings::new();
    if let Some(value) = imm {
        bindings.push(FieldKey::Imm, value);
    }
    let mut remaining = regs.iter();
    for placed in command.fields() {
        if let Field::Register(slot) = placed.field() {
            if let Some(value) = remaining.next() {
                bindings.push(FieldKey::Reg(slot.role), *value);
            }
        }
    }
    bindings
}

/// Little-endian bytes of the named compressed command under the given
/// operands.
pub fn encode_bytes(catalog: &Catalog, name: &str, imm: Option<i64>, regs: &[i64]) -> Vec<u8> {
    let command = catalog.compressed(name).expect("declared command");
    let bindings = operand_bindings(command, imm, regs);
    command.encode(&bindings).expect("encodable").to_le_bytes()
}

/// Little-endian bytes of the expansion of the named compressed command:
/// the base command encoded under the operands merged with the mapping's
/// forced values.
pub fn expansion_bytes(catalog: &Catalog, name: &str, imm: Option<i64>, regs: &[i64]) -> Vec<u8> {
    let command = catalog.compressed(name).expect("declared command");
    let base = catalog.target_of(command).expect("mapping resolves");
    let composed = operand_bindings(command, imm, regs)
        .union(command.mapping().expect("compressed").bindings());
    base.encode(&composed).expect("encodable").to_le_bytes()
}

/// Index of the named command in the catalog's compressed table.
pub fn index_of(catalog: &Catalog, name: &str) -> usize {
    catalog
        .compressed_commands()
        .iter()
        .position(|command| command.name() == name)
        .expect("declared command")
}
