//! Compressed (16-bit) command layouts and expansion mappings.
//!
//! Each declaration names its 32-bit target and the operand values the
//! expansion forces. `C.EBREAK` is left out of the decoder on purpose, and
//! `C.NOP` needs no entry of its own: its encoding decodes through `C.ADDI`
//! as `ADDI x0, x0, 0`.

use crate::catalog::{Catalog, map_to};
use crate::command::AsmStyle;
use crate::error::Error;
use crate::field::{
    FieldKey, bits, imm, rd, rd_ne, rdp, rs1, rs1p, rs2, rs2_ne, rs2p, rsd, rsdp, uimm,
};

/// Declares the compressed commands, quadrant by quadrant.
pub fn define(catalog: &mut Catalog) -> Result<(), Error> {
    catalog.declare_compressed(
        "C.ADDI4SPN",
        map_to("ADDI").bind(FieldKey::rs1(), 2),
        &[bits("000"), uimm(5, 4), uimm(9, 6), uimm(2, 2), uimm(3, 3), rdp(), bits("00")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.LW",
        map_to("LW"),
        &[bits("010"), uimm(5, 3), rs1p(), uimm(2, 2), uimm(6, 6), rdp(), bits("00")],
        AsmStyle::Offset,
    )?;
    catalog.declare_compressed(
        "C.SW",
        map_to("SW"),
        &[bits("110"), uimm(5, 3), rs1p(), uimm(2, 2), uimm(6, 6), rs2p(), bits("00")],
        AsmStyle::Offset,
    )?;

    catalog.declare_compressed(
        "C.ADDI",
        map_to("ADDI"),
        &[bits("000"), imm(5, 5), rsd(), imm(4, 0), bits("01")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.JAL",
        map_to("JAL").bind(FieldKey::rd(), 1),
        &[
            bits("001"),
            imm(11, 11),
            imm(4, 4),
            imm(9, 8),
            imm(10, 10),
            imm(6, 6),
            imm(7, 7),
            imm(3, 1),
            imm(5, 5),
            bits("01"),
        ],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.LI",
        map_to("ADDI").bind(FieldKey::rs1(), 0),
        &[bits("010"), imm(5, 5), rd(), imm(4, 0), bits("01")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.ADDI16SP",
        map_to("ADDI").bind(FieldKey::rs1(), 2).bind(FieldKey::rd(), 2),
        &[
            bits("011"),
            imm(9, 9),
            bits("00010"),
            imm(4, 4),
            imm(6, 6),
            imm(8, 7),
            imm(5, 5),
            bits("01"),
        ],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.LUI",
        map_to("LUI"),
        &[bits("011"), imm(17, 17), rd_ne(2), imm(16, 12), bits("01")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.SRLI",
        map_to("SRLI"),
        &[bits("100"), bits("0"), bits("00"), rsdp(), uimm(4, 0), bits("01")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.SRAI",
        map_to("SRAI"),
        &[bits("100"), bits("0"), bits("01"), rsdp(), uimm(4, 0), bits("01")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.ANDI",
        map_to("ANDI"),
        &[bits("100"), imm(5, 5), bits("10"), rsdp(), imm(4, 0), bits("01")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.SUB",
        map_to("SUB"),
        &[bits("100"), bits("0"), bits("11"), rsdp(), bits("00"), rs2p(), bits("01")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.XOR",
        map_to("XOR"),
        &[bits("100"), bits("0"), bits("11"), rsdp(), bits("01"), rs2p(), bits("01")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.OR",
        map_to("OR"),
        &[bits("100"), bits("0"), bits("11"), rsdp(), bits("10"), rs2p(), bits("01")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.AND",
        map_to("AND"),
        &[bits("100"), bits("0"), bits("11"), rsdp(), bits("11"), rs2p(), bits("01")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.J",
        map_to("JAL").bind(FieldKey::rd(), 0),
        &[
            bits("101"),
            imm(11, 11),
            imm(4, 4),
            imm(9, 8),
            imm(10, 10),
            imm(6, 6),
            imm(7, 7),
            imm(3, 1),
            imm(5, 5),
            bits("01"),
        ],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.BEQZ",
        map_to("BEQ").bind(FieldKey::rs2(), 0),
        &[
            bits("110"),
            imm(8, 8),
            imm(4, 3),
            rs1p(),
            imm(7, 6),
            imm(2, 1),
            imm(5, 5),
            bits("01"),
        ],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.BNEZ",
        map_to("BNE").bind(FieldKey::rs2(), 0),
        &[
            bits("111"),
            imm(8, 8),
            imm(4, 3),
            rs1p(),
            imm(7, 6),
            imm(2, 1),
            imm(5, 5),
            bits("01"),
        ],
        AsmStyle::Operand,
    )?;

    catalog.declare_compressed(
        "C.SLLI",
        map_to("SLLI"),
        &[bits("000"), bits("0"), rsd(), uimm(4, 0), bits("10")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.LWSP",
        map_to("LW").bind(FieldKey::rs1(), 2),
        &[bits("010"), uimm(5, 5), rd(), uimm(4, 2), uimm(7, 6), bits("10")],
        AsmStyle::Offset,
    )?;
    catalog.declare_compressed(
        "C.JR",
        map_to("JALR").bind(FieldKey::rd(), 0).bind(FieldKey::imm(), 0),
        &[bits("100"), bits("0"), rs1(), bits("00000"), bits("10")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.MV",
        map_to("ADD").bind(FieldKey::rs1(), 0),
        &[bits("100"), bits("0"), rd(), rs2_ne(0), bits("10")],
        AsmStyle::Operand,
    )?;
    // C.EBREAK is skipped intentionally to save decoder resources.
    catalog.declare_compressed(
        "C.JALR",
        map_to("JALR").bind(FieldKey::rd(), 1).bind(FieldKey::imm(), 0),
        &[bits("100"), bits("1"), rs1(), bits("00000"), bits("10")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.ADD",
        map_to("ADD"),
        &[bits("100"), bits("1"), rsd(), rs2_ne(0), bits("10")],
        AsmStyle::Operand,
    )?;
    catalog.declare_compressed(
        "C.SWSP",
        map_to("SW").bind(FieldKey::rs1(), 2),
        &[bits("110"), uimm(5, 2), uimm(7, 6), rs2(), bits("10")],
        AsmStyle::Offset,
    )?;
    Ok(())
}
