//! Commands: named, ordered bit-field layouts.
//!
//! A [`Command`] is an ordered list of fields whose widths sum to exactly 16
//! (compressed) or 32 (base) bits. Construction computes each field's opcode
//! position and the derived immediate metadata; a command is immutable
//! afterwards, so transforms and selection trees are pure functions of the
//! command tables.

use std::fmt;

use crate::binding::Bindings;
use crate::bits::BitString;
use crate::error::Error;
use crate::field::{Field, FieldKey, FieldSpec, ImmChunk, RegSlot};

/// How the immediate is written in assembly text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsmStyle {
    /// Plain operand: `ADDI x10, x10, 4`.
    Operand,
    /// Load/store offset: `LW x10, 4(x11)`.
    Offset,
}

/// A field placed at a fixed position within a command.
///
/// `position` is the opcode bit index of the field's most significant bit,
/// numbered `size - 1` down to 0.
#[derive(Clone, Copy, Debug)]
pub struct Placed {
    field: Field,
    position: usize,
}

impl Placed {
    /// The field itself.
    pub const fn field(&self) -> &Field {
        &self.field
    }

    /// Opcode bit position of the field's most significant bit.
    pub const fn position(&self) -> usize {
        self.position
    }
}

/// A compressed command's link to its 32-bit expansion.
#[derive(Clone, Debug)]
pub struct Mapping {
    target: String,
    bindings: Bindings,
}

impl Mapping {
    pub(crate) fn new(target: String, bindings: Bindings) -> Self {
        Self { target, bindings }
    }

    /// Name of the base command this expands to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Operand values the expansion forces.
    pub const fn bindings(&self) -> &Bindings {
        &self.bindings
    }
}

/// A declared command: fields with positions plus derived immediate metadata.
#[derive(Clone, Debug)]
pub struct Command {
    name: String,
    size: usize,
    fields: Vec<Placed>,
    imm_signed: Option<bool>,
    imm_hi_bit: Option<usize>,
    imm_align: usize,
    asm_style: AsmStyle,
    mapping: Option<Mapping>,
}

impl Command {
    /// Validates the field list and builds the command.
    ///
    /// Fails when a constant literal is malformed, an immediate range is
    /// inverted, the widths do not sum to `size`, or signed and unsigned
    /// immediate chunks are mixed.
    pub(crate) fn new(
        name: &str,
        size: usize,
        specs: &[FieldSpec],
        mapping: Option<Mapping>,
        asm_style: AsmStyle,
    ) -> Result<Self, Error> {
        let mut fields = Vec::with_capacity(specs.len());
        let mut total = 0usize;
        for spec in specs {
            let field = match *spec {
                FieldSpec::Bits(literal) => Field::Constant(BitString::parse(literal)?),
                FieldSpec::Imm { hi, lo, signed } => {
                    if lo > hi {
                        return Err(Error::BadImmediateRange { hi, lo });
                    }
                    Field::Immediate(ImmChunk { hi, lo, signed })
                }
                FieldSpec::Reg(slot) => Field::Register(slot),
            };
            total += field.width();
            fields.push(field);
        }
        if total != size {
            return Err(Error::BadCommandSize {
                name: name.to_string(),
                size: total,
                expected: size,
            });
        }

        let mut placed = Vec::with_capacity(fields.len());
        let mut position = size;
        for field in fields {
            position -= field.width();
            placed.push(Placed {
                field,
                position: position + field.width() - 1,
            });
        }

        let mut imm_signed = None;
        let mut imm_hi_bit: Option<usize> = None;
        for entry in &placed {
            if let Field::Immediate(chunk) = entry.field {
                match imm_signed {
                    None => imm_signed = Some(chunk.signed),
                    Some(signed) if signed != chunk.signed => {
                        return Err(Error::MixedImmediateSignedness {
                            name: name.to_string(),
                        });
                    }
                    Some(_) => {}
                }
                if imm_hi_bit.is_none_or(|hi| hi < chunk.hi) {
                    imm_hi_bit = Some(chunk.hi);
                }
            }
        }

        let mut command = Self {
            name: name.to_string(),
            size,
            fields: placed,
            imm_signed,
            imm_hi_bit,
            imm_align: 0,
            asm_style,
            mapping,
        };
        if command.imm_signed.is_some() {
            command.imm_align = (0..32)
                .take_while(|bit| command.find_immediate_chunk(*bit).is_none())
                .count();
        }
        Ok(command)
    }

    /// Command name, e.g. `"C.ADDI"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared opcode width, 16 or 32.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The placed fields, most significant first.
    pub fn fields(&self) -> &[Placed] {
        &self.fields
    }

    /// Common signedness of the immediate chunks, if the command has any.
    pub const fn imm_signed(&self) -> Option<bool> {
        self.imm_signed
    }

    /// Highest logical immediate bit covered by any chunk.
    pub const fn imm_hi_bit(&self) -> Option<usize> {
        self.imm_hi_bit
    }

    /// Number of trailing immediate bits that are implicitly zero.
    ///
    /// Branch and jump offsets, and the scaled load/store offsets, leave
    /// their low bits undeclared; those bits are always zero.
    pub const fn imm_align(&self) -> usize {
        self.imm_align
    }

    /// How the immediate is rendered in assembly text.
    pub const fn asm_style(&self) -> AsmStyle {
        self.asm_style
    }

    /// The mapping to a base command, present on compressed commands only.
    pub const fn mapping(&self) -> Option<&Mapping> {
        self.mapping.as_ref()
    }

    /// First field matching `key` under role collapsing.
    pub fn find_field(&self, key: FieldKey) -> Option<&Placed> {
        self.fields.iter().find(|placed| key.matches(&placed.field))
    }

    /// The immediate chunk containing logical immediate bit `bit`, plus its
    /// opcode position.
    pub fn find_immediate_chunk(&self, bit: usize) -> Option<(&ImmChunk, usize)> {
        self.fields.iter().find_map(|placed| match &placed.field {
            Field::Immediate(chunk) if chunk.lo <= bit && bit <= chunk.hi => {
                Some((chunk, placed.position))
            }
            _ => None,
        })
    }

    /// The field containing opcode bit `position`, or `None` when the
    /// position is outside the command.
    pub fn field_covering(&self, position: usize) -> Option<&Placed> {
        self.fields.iter().find(|placed| {
            position <= placed.position && position + placed.field.width() > placed.position
        })
    }

    /// The value of the constant bit at opcode position `position`, or
    /// `None` when the bit belongs to a register or immediate field (or the
    /// position is outside the command).
    pub fn constant_bit_at(&self, position: usize) -> Option<bool> {
        let placed = self.field_covering(position)?;
        match &placed.field {
            Field::Constant(bits) => {
                Some(bits.bit(bits.width() - 1 - (placed.position - position)))
            }
            _ => None,
        }
    }

    /// Register fields carrying a `not_equal` constraint.
    pub fn constrained_registers(&self) -> impl Iterator<Item = &Placed> {
        self.fields.iter().filter(|placed| {
            matches!(
                placed.field,
                Field::Register(RegSlot {
                    not_equal: Some(_),
                    ..
                })
            )
        })
    }

    /// Encodes the command under `bindings` as a bit string of `size` bits.
    ///
    /// Fields are emitted most significant first. Register values are range
    /// checked (compressed slots accept `x8..x15` only), and a negative
    /// value bound to an unsigned immediate is rejected.
    pub fn encode(&self, bindings: &Bindings) -> Result<BitString, Error> {
        let mut encoded: Option<BitString> = None;
        for placed in &self.fields {
            let piece = match &placed.field {
                Field::Constant(bits) => *bits,
                Field::Register(slot) => {
                    let value = self.require(bindings, placed)?;
                    encode_register(slot, value)?
                }
                Field::Immediate(chunk) => {
                    let value = self.require(bindings, placed)?;
                    if value < 0 && !chunk.signed {
                        return Err(Error::NegativeUnsignedImmediate {
                            name: self.name.clone(),
                            value,
                        });
                    }
                    BitString::from_int(32, value)?.slice(chunk.hi, chunk.lo)?
                }
            };
            encoded = Some(match encoded {
                Some(acc) => acc.concat(&piece)?,
                None => piece,
            });
        }
        encoded.ok_or(Error::BadCommandSize {
            name: self.name.clone(),
            size: 0,
            expected: self.size,
        })
    }

    /// Canonical operand bindings for test-vector generation.
    ///
    /// The immediate is `10` when the command is unaligned and `3 << align`
    /// otherwise; registers are assigned `x10` upwards in field order. A
    /// second set with the negated immediate is produced for
    /// signed-immediate commands.
    pub fn test_bindings(&self) -> Vec<Bindings> {
        let generate = |positive: bool| {
            let mut bindings = Bindings::new();
            if self.imm_signed.is_some() {
                let magnitude: i64 = if self.imm_align == 0 {
                    10
                } else {
                    3 << self.imm_align
                };
                bindings.push(FieldKey::Imm, if positive { magnitude } else { -magnitude });
            }
            let mut index = 10;
            for placed in &self.fields {
                if let Field::Register(slot) = placed.field {
                    bindings.push(FieldKey::Reg(slot.role), index);
                    index += 1;
                }
            }
            bindings
        };

        let mut cases = vec![generate(true)];
        if self.imm_signed == Some(true) {
            cases.push(generate(false));
        }
        cases
    }

    fn require(&self, bindings: &Bindings, placed: &Placed) -> Result<i64, Error> {
        let key = match placed.field {
            Field::Immediate(_) => FieldKey::Imm,
            Field::Register(slot) => FieldKey::Reg(slot.role),
            Field::Constant(_) => FieldKey::Imm,
        };
        bindings
            .lookup(&placed.field)?
            .ok_or_else(|| Error::MissingBinding {
                name: self.name.clone(),
                key,
            })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn encode_register(slot: &RegSlot, value: i64) -> Result<BitString, Error> {
    if !(0..=15).contains(&value) {
        return Err(Error::IllegalRegisterIndex { value });
    }
    if slot.compressed {
        if !(8..=15).contains(&value) {
            return Err(Error::IllegalCompressedRegisterIndex { value });
        }
        BitString::from_int(3, value - 8)
    } else {
        BitString::from_int(5, value)
    }
}
