//! Base (32-bit) command layouts.
//!
//! Only the commands that serve as expansion targets for the compressed set
//! are declared; this is a generator input table, not a full ISA model.

use crate::catalog::Catalog;
use crate::command::AsmStyle;
use crate::error::Error;
use crate::field::{bits, imm, rd, rs1, rs2, uimm};

/// Declares the base commands, in the order the manual lists them.
pub fn define(catalog: &mut Catalog) -> Result<(), Error> {
    catalog.declare_base(
        "LW",
        &[imm(11, 0), rs1(), bits("010"), rd(), bits("0000011")],
        AsmStyle::Offset,
    )?;
    catalog.declare_base(
        "SW",
        &[imm(11, 5), rs2(), rs1(), bits("010"), imm(4, 0), bits("0100011")],
        AsmStyle::Offset,
    )?;
    catalog.declare_base(
        "JAL",
        &[imm(20, 20), imm(10, 1), imm(11, 11), imm(19, 12), rd(), bits("1101111")],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "JALR",
        &[imm(11, 0), rs1(), bits("000"), rd(), bits("1100111")],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "BEQ",
        &[
            imm(12, 12),
            imm(10, 5),
            rs2(),
            rs1(),
            bits("000"),
            imm(4, 1),
            imm(11, 11),
            bits("1100011"),
        ],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "BNE",
        &[
            imm(12, 12),
            imm(10, 5),
            rs2(),
            rs1(),
            bits("001"),
            imm(4, 1),
            imm(11, 11),
            bits("1100011"),
        ],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "ADDI",
        &[imm(11, 0), rs1(), bits("000"), rd(), bits("0010011")],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "LUI",
        &[imm(31, 12), rd(), bits("0110111")],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "SLLI",
        &[bits("0000000"), uimm(4, 0), rs1(), bits("001"), rd(), bits("0010011")],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "SRLI",
        &[bits("0000000"), uimm(4, 0), rs1(), bits("101"), rd(), bits("0010011")],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "SRAI",
        &[bits("0100000"), uimm(4, 0), rs1(), bits("101"), rd(), bits("0010011")],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "ANDI",
        &[imm(11, 0), rs1(), bits("111"), rd(), bits("0010011")],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "ADD",
        &[bits("0000000"), rs2(), rs1(), bits("000"), rd(), bits("0110011")],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "SUB",
        &[bits("0100000"), rs2(), rs1(), bits("000"), rd(), bits("0110011")],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "XOR",
        &[bits("0000000"), rs2(), rs1(), bits("100"), rd(), bits("0110011")],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "OR",
        &[bits("0000000"), rs2(), rs1(), bits("110"), rd(), bits("0110011")],
        AsmStyle::Operand,
    )?;
    catalog.declare_base(
        "AND",
        &[bits("0000000"), rs2(), rs1(), bits("111"), rd(), bits("0110011")],
        AsmStyle::Operand,
    )?;
    Ok(())
}
