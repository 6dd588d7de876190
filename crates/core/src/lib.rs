//! Generator for a RISC-V C-extension hardware decompressor.
//!
//! Starting from a declarative description of the 16-bit compressed opcodes
//! and their 32-bit base counterparts, this crate derives everything a
//! hardware decoder needs:
//!
//! 1. **Opcode algebra:** bit-field layouts, operand bindings, and the
//!    name-indexed command catalog (`field`, `binding`, `command`,
//!    `catalog`, `isa`).
//! 2. **Transforms:** per-command recipes rewriting a 16-bit encoding into
//!    its 32-bit expansion as constant / copy / sign-replicate producers
//!    (`transform`).
//! 3. **Selection tree:** a balanced decision tree classifying any valid
//!    16-bit encoding to exactly one command (`select`).
//! 4. **Emitters:** the Verilog decompressor block and the `TEST_CASE`
//!    vector file (`emit`), plus assembly text rendering (`asm`).
//! 5. **Self-test:** a byte-for-byte round trip through an external
//!    assembler and disassembler (`selftest`).

/// Assembly-text rendering.
pub mod asm;
/// Operand bindings.
pub mod binding;
/// Fixed-width bit strings.
pub mod bits;
/// The command catalog.
pub mod catalog;
/// Commands and their derived metadata.
pub mod command;
/// Output emitters (Verilog, test vectors).
pub mod emit;
/// Error definitions.
pub mod error;
/// Opcode field primitives.
pub mod field;
/// The RV32IC declaration tables.
pub mod isa;
/// The selection tree.
pub mod select;
/// External-assembler self-test.
pub mod selftest;
/// Compressed-to-base opcode transforms.
pub mod transform;

pub use crate::binding::Bindings;
pub use crate::bits::BitString;
pub use crate::catalog::Catalog;
pub use crate::command::Command;
pub use crate::error::Error;
pub use crate::select::SelectionTree;
pub use crate::transform::Transform;
