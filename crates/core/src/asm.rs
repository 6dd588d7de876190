//! Assembly-text rendering.
//!
//! Renders a command plus operand bindings as assembler input, matching the
//! grammar the external toolchain accepts. A few rules are idiosyncratic to
//! that grammar rather than to the encodings:
//!
//! - `LUI`/`C.LUI` immediates are written scaled down by 2^12, and negative
//!   values are wrapped two's-complement into 20 bits.
//! - `C.ADDI4SPN` and `C.ADDI16SP` must name `x2` explicitly even though the
//!   stack pointer is implied by the encoding.
//! - Offset-style commands print `imm(xN)`, with `x2` implied for
//!   `C.LWSP`/`C.SWSP`.

use crate::binding::Bindings;
use crate::command::{AsmStyle, Command, Placed};
use crate::error::Error;
use crate::field::{Field, FieldKey, RegRole};

/// Renders `command` with `bindings` as one line of assembler input.
pub fn render(command: &Command, bindings: &Bindings) -> Result<String, Error> {
    let name = command.name();
    let mut text = name.to_string();

    let rd = command.find_field(FieldKey::rd());
    let rd_present = rd.is_some();
    if let Some(placed) = rd {
        let value = require(command, bindings, placed)?;
        text.push_str(&format!(" x{value}"));
    }

    let rs1 = command.find_field(FieldKey::rs1());
    let mut rs1_present = rs1.is_some();
    let rd_is_srcdst = rd.is_some_and(
        |placed| matches!(placed.field(), Field::Register(slot) if slot.role == RegRole::SrcDst),
    );
    if let Some(placed) = rs1 {
        if !rd_is_srcdst && command.asm_style() == AsmStyle::Operand {
            let value = require(command, bindings, placed)?;
            text.push_str(if rd_present { ", " } else { " " });
            text.push_str(&format!("x{value}"));
        }
    }

    // The toolchain insists on an explicit stack-pointer argument here.
    if matches!(name, "C.ADDI4SPN" | "C.ADDI16SP") {
        text.push_str(if rd_present { ", " } else { " " });
        text.push_str("x2");
        rs1_present = true;
    }

    let rs2 = command.find_field(FieldKey::rs2());
    let rs2_present = rs2.is_some();
    if let Some(placed) = rs2 {
        let value = require(command, bindings, placed)?;
        let separator = if !rd_present && command.asm_style() == AsmStyle::Offset {
            " "
        } else {
            ", "
        };
        text.push_str(separator);
        text.push_str(&format!("x{value}"));
    }

    if let Some(placed) = command.find_field(FieldKey::imm()) {
        let mut value = require(command, bindings, placed)?;
        if matches!(name, "LUI" | "C.LUI") {
            value >>= 12;
            if value < 0 {
                value += 0x10_0000;
            }
        }
        if command.asm_style() == AsmStyle::Offset {
            let base = if matches!(name, "C.LWSP" | "C.SWSP") {
                2
            } else {
                let placed_rs1 = rs1.ok_or_else(|| Error::MissingBinding {
                    name: name.to_string(),
                    key: FieldKey::rs1(),
                })?;
                require(command, bindings, placed_rs1)?
            };
            let separator = if rd_present || rs2_present { ", " } else { " " };
            text.push_str(&format!("{separator}{value}(x{base})"));
        } else {
            let separator = if rd_present || rs1_present { ", " } else { " " };
            text.push_str(&format!("{separator}{value}"));
        }
    }

    Ok(text)
}

fn require(command: &Command, bindings: &Bindings, placed: &Placed) -> Result<i64, Error> {
    let key = match placed.field() {
        Field::Register(slot) => FieldKey::Reg(slot.role),
        _ => FieldKey::Imm,
    };
    bindings
        .lookup(placed.field())?
        .ok_or_else(|| Error::MissingBinding {
            name: command.name().to_string(),
            key,
        })
}
