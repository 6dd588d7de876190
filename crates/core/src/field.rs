//! Opcode field primitives.
//!
//! A command opcode is an ordered list of fields, each one of:
//! 1. **Constant bits**: fixed opcode/funct bits.
//! 2. **Immediate chunk**: a contiguous run `[hi:lo]` of the logical
//!    immediate value, placed somewhere in the opcode.
//! 3. **Register slot**: a 3-bit (compressed, `x8..x15`) or 5-bit register
//!    index, optionally constrained to differ from a fixed value.
//!
//! Binding keys ([`FieldKey`]) are the width-less counterpart used to name a
//! slot when assigning operand values.

use std::fmt;

use crate::bits::BitString;

/// The operand role a register slot plays in a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegRole {
    /// First source register (`rs1`).
    Src1,
    /// Second source register (`rs2`).
    Src2,
    /// Destination register (`rd`).
    Dst,
    /// Combined source/destination register (`rd/rs1`).
    SrcDst,
}

impl RegRole {
    /// Role-collapsing match rule: a query for `Src1` or `Dst` also accepts
    /// a `SrcDst` slot. This is the single place the rule is stated; every
    /// field and binding lookup goes through it.
    pub fn matches(self, candidate: Self) -> bool {
        candidate == self
            || (matches!(self, Self::Src1 | Self::Dst) && candidate == Self::SrcDst)
    }
}

impl fmt::Display for RegRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Src1 => write!(f, "rs1"),
            Self::Src2 => write!(f, "rs2"),
            Self::Dst => write!(f, "rd"),
            Self::SrcDst => write!(f, "rd/rs1"),
        }
    }
}

/// A register field within an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegSlot {
    /// The operand role of the slot.
    pub role: RegRole,
    /// Compressed slots are 3 bits wide and encode `x8..x15`.
    pub compressed: bool,
    /// The encoded value must differ from this constant, if present.
    pub not_equal: Option<u32>,
}

impl RegSlot {
    /// Field width in bits.
    pub const fn width(&self) -> usize {
        if self.compressed { 3 } else { 5 }
    }
}

/// A contiguous chunk `[hi:lo]` of the logical immediate value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImmChunk {
    /// Most significant immediate bit held by the chunk.
    pub hi: usize,
    /// Least significant immediate bit held by the chunk.
    pub lo: usize,
    /// Signedness of the immediate the chunk belongs to.
    pub signed: bool,
}

impl ImmChunk {
    /// Field width in bits.
    pub const fn width(&self) -> usize {
        self.hi - self.lo + 1
    }
}

/// One field of a command opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// Fixed bits.
    Constant(BitString),
    /// A chunk of the immediate operand.
    Immediate(ImmChunk),
    /// A register slot.
    Register(RegSlot),
}

impl Field {
    /// Field width in bits.
    pub const fn width(&self) -> usize {
        match self {
            Self::Constant(bits) => bits.width(),
            Self::Immediate(chunk) => chunk.width(),
            Self::Register(slot) => slot.width(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(bits) => write!(f, "{bits}"),
            Self::Immediate(chunk) => {
                if !chunk.signed {
                    write!(f, "u")?;
                }
                write!(f, "imm[{}", chunk.hi)?;
                if chunk.lo != chunk.hi {
                    write!(f, ":{}", chunk.lo)?;
                }
                write!(f, "]")
            }
            Self::Register(slot) => {
                write!(f, "{}", slot.role)?;
                if slot.compressed {
                    write!(f, "'")?;
                }
                Ok(())
            }
        }
    }
}

/// Width-less key naming an operand slot, used for bindings and lookups.
///
/// Keeping the key distinct from the width-carrying [`Field`] avoids a
/// "field without a position" special case in the opcode model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKey {
    /// The immediate operand.
    Imm,
    /// A register operand with the given role.
    Reg(RegRole),
}

impl FieldKey {
    /// Key for the immediate operand.
    pub const fn imm() -> Self {
        Self::Imm
    }

    /// Key for the first source register.
    pub const fn rs1() -> Self {
        Self::Reg(RegRole::Src1)
    }

    /// Key for the second source register.
    pub const fn rs2() -> Self {
        Self::Reg(RegRole::Src2)
    }

    /// Key for the destination register.
    pub const fn rd() -> Self {
        Self::Reg(RegRole::Dst)
    }

    /// Whether `field` is a slot this key can name, under role collapsing.
    pub fn matches(self, field: &Field) -> bool {
        match (self, field) {
            (Self::Imm, Field::Immediate(_)) => true,
            (Self::Reg(role), Field::Register(slot)) => role.matches(slot.role),
            _ => false,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Imm => write!(f, "imm"),
            Self::Reg(role) => write!(f, "{role}"),
        }
    }
}

/// An unvalidated field as written in a command declaration.
///
/// Constants stay as their literal text until [`crate::command::Command`]
/// construction parses and checks them, so declaration tables stay free of
/// error plumbing.
#[derive(Clone, Copy, Debug)]
pub enum FieldSpec {
    /// Constant bits given as a binary literal.
    Bits(&'static str),
    /// An immediate chunk.
    Imm {
        /// Most significant immediate bit.
        hi: usize,
        /// Least significant immediate bit.
        lo: usize,
        /// Chunk signedness.
        signed: bool,
    },
    /// A register slot.
    Reg(RegSlot),
}

/// Constant bits from a binary literal.
pub const fn bits(literal: &'static str) -> FieldSpec {
    FieldSpec::Bits(literal)
}

/// A signed immediate chunk `[hi:lo]`.
pub const fn imm(hi: usize, lo: usize) -> FieldSpec {
    FieldSpec::Imm {
        hi,
        lo,
        signed: true,
    }
}

/// An unsigned immediate chunk `[hi:lo]`.
pub const fn uimm(hi: usize, lo: usize) -> FieldSpec {
    FieldSpec::Imm {
        hi,
        lo,
        signed: false,
    }
}

const fn reg(role: RegRole, compressed: bool, not_equal: Option<u32>) -> FieldSpec {
    FieldSpec::Reg(RegSlot {
        role,
        compressed,
        not_equal,
    })
}

/// 5-bit first-source register slot.
pub const fn rs1() -> FieldSpec {
    reg(RegRole::Src1, false, None)
}

/// 5-bit second-source register slot.
pub const fn rs2() -> FieldSpec {
    reg(RegRole::Src2, false, None)
}

/// 5-bit second-source register slot that must differ from `value`.
pub const fn rs2_ne(value: u32) -> FieldSpec {
    reg(RegRole::Src2, false, Some(value))
}

/// 5-bit destination register slot.
pub const fn rd() -> FieldSpec {
    reg(RegRole::Dst, false, None)
}

/// 5-bit destination register slot that must differ from `value`.
pub const fn rd_ne(value: u32) -> FieldSpec {
    reg(RegRole::Dst, false, Some(value))
}

/// 5-bit combined source/destination register slot.
pub const fn rsd() -> FieldSpec {
    reg(RegRole::SrcDst, false, None)
}

/// 3-bit compressed first-source register slot (`rs1'`).
pub const fn rs1p() -> FieldSpec {
    reg(RegRole::Src1, true, None)
}

/// 3-bit compressed second-source register slot (`rs2'`).
pub const fn rs2p() -> FieldSpec {
    reg(RegRole::Src2, true, None)
}

/// 3-bit compressed destination register slot (`rd'`).
pub const fn rdp() -> FieldSpec {
    reg(RegRole::Dst, true, None)
}

/// 3-bit compressed source/destination register slot (`rd'/rs1'`).
pub const fn rsdp() -> FieldSpec {
    reg(RegRole::SrcDst, true, None)
}
