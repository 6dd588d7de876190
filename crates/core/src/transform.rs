//! Compressed-to-base opcode transforms.
//!
//! A [`Transform`] is the ordered list of producers whose MSB-first
//! concatenation turns a valid 16-bit encoding of a compressed command into
//! the 32-bit encoding of its base command. Three producer kinds exist:
//! constant bits, a copy of an input bit range, and an n-fold replication of
//! a single input bit (sign extension).
//!
//! Construction walks the base command's fields MSB to LSB, proving for
//! every output bit where it comes from: a mapping binding, a register or
//! immediate field of the compressed source, sign extension, or zero fill.
//! Two peephole passes then merge adjacent constants and adjacent
//! replications so the emitted expressions stay compact.

use std::fmt;

use tracing::debug;

use crate::bits::BitString;
use crate::command::Command;
use crate::error::Error;
use crate::field::{Field, FieldKey, ImmChunk};

/// One producer of output bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Producer {
    /// Literal bits.
    Constant(BitString),
    /// Copy of input bits `hi` down to `lo`.
    Copy {
        /// Most significant input bit copied.
        hi: usize,
        /// Least significant input bit copied.
        lo: usize,
    },
    /// `count` copies of one input bit.
    Replicate {
        /// The replicated input bit.
        bit: usize,
        /// Number of copies.
        count: usize,
    },
}

impl Producer {
    /// Number of output bits this producer contributes.
    pub fn width(&self) -> usize {
        match self {
            Self::Constant(bits) => bits.width(),
            Self::Copy { hi, lo } => hi - lo + 1,
            Self::Replicate { count, .. } => *count,
        }
    }
}

impl fmt::Display for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(bits) => write!(f, "{bits}"),
            Self::Copy { hi, lo } if hi == lo => write!(f, "[{hi}]"),
            Self::Copy { hi, lo } => write!(f, "[{hi}:{lo}]"),
            Self::Replicate { bit, count } => write!(f, "{count}x[{bit}]"),
        }
    }
}

/// The decompression recipe for one compressed command.
#[derive(Clone, Debug)]
pub struct Transform {
    source: String,
    producers: Vec<Producer>,
}

/// A contiguous run of output bits being collected by the immediate-chunk
/// walk: either all zero fill or a copy whose source positions descend with
/// the immediate bits.
struct Run {
    zero: bool,
    hi: usize,
    lo: usize,
    src_hi: usize,
}

impl Run {
    fn commit(&self, producers: &mut Vec<Producer>) -> Result<(), Error> {
        let width = self.hi - self.lo + 1;
        if self.zero {
            producers.push(Producer::Constant(BitString::from_int(width, 0)?));
        } else {
            producers.push(Producer::Copy {
                hi: self.src_hi,
                lo: self.src_hi - (width - 1),
            });
        }
        Ok(())
    }
}

impl Transform {
    /// Derives the transform for `compressed` onto its target `base`.
    pub fn build(compressed: &Command, base: &Command) -> Result<Self, Error> {
        let mapping = compressed
            .mapping()
            .ok_or_else(|| Error::MissingMapping {
                name: compressed.name().to_string(),
            })?;

        let mut producers = Vec::new();
        for placed in base.fields() {
            match placed.field() {
                Field::Constant(constant) => producers.push(Producer::Constant(*constant)),

                Field::Register(slot) => {
                    if let Some(value) = mapping.bindings().lookup(placed.field())? {
                        producers.push(Producer::Constant(BitString::from_int(5, value)?));
                        continue;
                    }
                    let key = FieldKey::Reg(slot.role);
                    let source = compressed.find_field(key).ok_or_else(|| {
                        Error::MissingSourceRegister {
                            name: compressed.name().to_string(),
                            key,
                        }
                    })?;
                    match source.field() {
                        Field::Register(src) if src.compressed => {
                            // Compressed slots hold x8..x15: the 5-bit target
                            // index is 01 followed by the 3 source bits.
                            producers.push(Producer::Constant(BitString::from_int(2, 1)?));
                            producers.push(Producer::Copy {
                                hi: source.position(),
                                lo: source.position() - 2,
                            });
                        }
                        Field::Register(_) => producers.push(Producer::Copy {
                            hi: source.position(),
                            lo: source.position() - 4,
                        }),
                        _ => {
                            return Err(Error::MissingSourceRegister {
                                name: compressed.name().to_string(),
                                key,
                            });
                        }
                    }
                }

                Field::Immediate(chunk) => {
                    if let Some(value) = mapping.bindings().lookup(placed.field())? {
                        let width = base.imm_hi_bit().unwrap_or(chunk.hi) + 1;
                        let bound = BitString::from_int(width, value)?;
                        producers.push(Producer::Constant(bound.slice(chunk.hi, chunk.lo)?));
                    } else {
                        immediate_chunk(&mut producers, compressed, chunk)?;
                    }
                }
            }
        }

        fold_constants(&mut producers)?;
        fold_single_bits(&mut producers);

        let width: usize = producers.iter().map(Producer::width).sum();
        if width != 32 {
            return Err(Error::BadTransformWidth {
                name: compressed.name().to_string(),
                width,
            });
        }
        let summary: Vec<String> = producers.iter().map(ToString::to_string).collect();
        debug!(
            command = compressed.name(),
            producers = %summary.join(" "),
            "transform built"
        );
        Ok(Self {
            source: compressed.name().to_string(),
            producers,
        })
    }

    /// Name of the compressed command this transform expands.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The producers, MSB first.
    pub fn producers(&self) -> &[Producer] {
        &self.producers
    }

    /// Applies the transform to a 16-bit encoding.
    pub fn apply(&self, insn16: u16) -> Result<u32, Error> {
        let input = u32::from(insn16);
        let mut value: u64 = 0;
        let mut width = 0usize;
        for producer in &self.producers {
            let (bits, w) = match *producer {
                Producer::Constant(constant) => (u64::from(constant.value()), constant.width()),
                Producer::Copy { hi, lo } => {
                    let w = hi - lo + 1;
                    (u64::from((input >> lo) & low_mask(w)), w)
                }
                Producer::Replicate { bit, count } => {
                    let set = (input >> bit) & 1 != 0;
                    (if set { u64::from(low_mask(count)) } else { 0 }, count)
                }
            };
            value = (value << w) | bits;
            width += w;
        }
        if width != 32 {
            return Err(Error::BadTransformWidth {
                name: self.source.clone(),
                width,
            });
        }
        Ok(value as u32)
    }
}

const fn low_mask(width: usize) -> u32 {
    if width >= 32 { u32::MAX } else { (1 << width) - 1 }
}

/// Emits producers for one unbound immediate chunk of the base command.
///
/// Output bits above the source's immediate span become sign replication
/// (signed source) or zero fill; bits within the span are copied from the
/// covering source chunk; holes below the span are zero. Runs break whenever
/// the presence of a source flips or the source positions stop descending
/// contiguously.
fn immediate_chunk(
    producers: &mut Vec<Producer>,
    compressed: &Command,
    chunk: &ImmChunk,
) -> Result<(), Error> {
    let span_hi = compressed
        .imm_hi_bit()
        .ok_or_else(|| Error::MissingSourceImmediate {
            name: compressed.name().to_string(),
        })?;

    let copy_from = if chunk.hi > span_hi {
        let lo_sign = chunk.lo.max(span_hi + 1);
        let count = chunk.hi - lo_sign + 1;
        if compressed.imm_signed() == Some(true) {
            let (_, sign_position) = compressed.find_immediate_chunk(span_hi).ok_or_else(|| {
                Error::MissingSourceImmediate {
                    name: compressed.name().to_string(),
                }
            })?;
            producers.push(Producer::Replicate {
                bit: sign_position,
                count,
            });
        } else {
            producers.push(Producer::Constant(BitString::from_int(count, 0)?));
        }
        if lo_sign == chunk.lo {
            return Ok(());
        }
        lo_sign - 1
    } else {
        chunk.hi
    };

    let mut run: Option<Run> = None;
    for bit in (chunk.lo..=copy_from).rev() {
        match compressed.find_immediate_chunk(bit) {
            None => {
                let extends_zero_run = matches!(&run, Some(current) if current.zero);
                if extends_zero_run {
                    if let Some(current) = run.as_mut() {
                        current.lo = bit;
                    }
                } else {
                    if let Some(current) = run.take() {
                        current.commit(producers)?;
                    }
                    run = Some(Run {
                        zero: true,
                        hi: bit,
                        lo: bit,
                        src_hi: 0,
                    });
                }
            }
            Some((source, position)) => {
                let src_bit = position - (source.hi - bit);
                let start_new = match run.as_ref() {
                    Some(current) if current.zero => true,
                    Some(current) => {
                        src_bit as i64 != current.src_hi as i64 - (current.hi - bit) as i64
                    }
                    None => true,
                };
                if start_new {
                    if let Some(current) = run.take() {
                        current.commit(producers)?;
                    }
                    run = Some(Run {
                        zero: false,
                        hi: bit,
                        lo: bit,
                        src_hi: src_bit,
                    });
                } else if let Some(current) = run.as_mut() {
                    current.lo = bit;
                }
            }
        }
    }
    if let Some(current) = run {
        current.commit(producers)?;
    }
    Ok(())
}

/// Merges adjacent constant producers into one.
fn fold_constants(producers: &mut Vec<Producer>) -> Result<(), Error> {
    let mut folded = Vec::with_capacity(producers.len());
    let mut pending: Option<BitString> = None;
    for producer in producers.drain(..) {
        match producer {
            Producer::Constant(constant) => {
                pending = Some(match pending {
                    Some(acc) => acc.concat(&constant)?,
                    None => constant,
                });
            }
            other => {
                if let Some(acc) = pending.take() {
                    folded.push(Producer::Constant(acc));
                }
                folded.push(other);
            }
        }
    }
    if let Some(acc) = pending {
        folded.push(Producer::Constant(acc));
    }
    *producers = folded;
    Ok(())
}

/// Merges adjacent single-bit copies and replications of the same source bit
/// into one replication.
fn fold_single_bits(producers: &mut Vec<Producer>) {
    fn flush(folded: &mut Vec<Producer>, pending: &mut Option<(usize, usize)>) {
        if let Some((bit, count)) = pending.take() {
            if count == 1 {
                folded.push(Producer::Copy { hi: bit, lo: bit });
            } else {
                folded.push(Producer::Replicate { bit, count });
            }
        }
    }

    let mut folded = Vec::with_capacity(producers.len());
    let mut pending: Option<(usize, usize)> = None;
    for producer in producers.drain(..) {
        let single = match producer {
            Producer::Copy { hi, lo } if hi == lo => Some((hi, 1)),
            Producer::Replicate { bit, count } => Some((bit, count)),
            _ => None,
        };
        match single {
            Some((bit, count)) => {
                let same_source = matches!(pending, Some((pending_bit, _)) if pending_bit == bit);
                if same_source {
                    if let Some((_, pending_count)) = pending.as_mut() {
                        *pending_count += count;
                    }
                } else {
                    flush(&mut folded, &mut pending);
                    pending = Some((bit, count));
                }
            }
            None => {
                flush(&mut folded, &mut pending);
                folded.push(producer);
            }
        }
    }
    flush(&mut folded, &mut pending);
    *producers = folded;
}
