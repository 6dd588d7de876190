//! Error definitions for the decompressor generator.
//!
//! Every failure in this crate is either a declaration-time error (a malformed
//! command table) or a tooling-time error (encoding, emission, or the external
//! assembler round trip). There is no recovery path: callers report the error
//! and exit, and the fix is always a change to the declarations or the
//! toolchain invocation.

use crate::field::FieldKey;

/// Errors raised while declaring commands, deriving transforms and selection
/// trees, encoding opcodes, or running the assembler self-test.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A constant field literal contained something other than `0`/`1`, or
    /// had a width outside 1..=32.
    #[error("constant literal `{literal}` is not a binary string of 1..=32 bits")]
    BadConstantLiteral {
        /// The offending literal as written in the declaration.
        literal: String,
    },

    /// An integer does not fit the requested bit width.
    #[error("value {value} does not fit in {width} bits")]
    ValueOutOfRange {
        /// The value that was being encoded.
        value: i64,
        /// The width it had to fit into.
        width: usize,
    },

    /// A bit-range request fell outside the value it was applied to.
    #[error("bit range [{hi}:{lo}] is not valid for a {width}-bit value")]
    BadSlice {
        /// High bit of the requested range.
        hi: usize,
        /// Low bit of the requested range.
        lo: usize,
        /// Width of the value being sliced.
        width: usize,
    },

    /// A bit-string operation would exceed the 32-bit limit.
    #[error("bit string of {width} bits exceeds the 32-bit limit")]
    TooWide {
        /// The resulting width.
        width: usize,
    },

    /// An immediate chunk was declared with `lo > hi`.
    #[error("immediate chunk [{hi}:{lo}] has lo greater than hi")]
    BadImmediateRange {
        /// High bit of the chunk.
        hi: usize,
        /// Low bit of the chunk.
        lo: usize,
    },

    /// A command name was declared twice in the same table.
    #[error("command {name} is already declared")]
    DuplicateCommand {
        /// The duplicated name.
        name: String,
    },

    /// A command's field widths did not sum to its declared size.
    #[error("command {name} is {size} bits wide, expected {expected}")]
    BadCommandSize {
        /// The command being declared.
        name: String,
        /// The width its fields actually sum to.
        size: usize,
        /// The declared size (16 or 32).
        expected: usize,
    },

    /// A command mixed signed and unsigned immediate chunks.
    #[error("command {name} mixes signed and unsigned immediate chunks")]
    MixedImmediateSignedness {
        /// The command being declared.
        name: String,
    },

    /// A compressed command mapped to a base command that was never declared.
    #[error("mapping target {target} of {name} is not a declared base command")]
    UnknownMappingTarget {
        /// The compressed command being declared.
        name: String,
        /// The missing base-command name.
        target: String,
    },

    /// A compressed command carries no mapping to a base command.
    #[error("command {name} has no mapping to a base command")]
    MissingMapping {
        /// The compressed command.
        name: String,
    },

    /// A mapping binding named a slot the target command does not have.
    #[error("binding {key} does not match any slot of {name}")]
    UnmatchedBinding {
        /// The command the binding was checked against.
        name: String,
        /// The binding key that found no slot.
        key: FieldKey,
    },

    /// A constrained register slot was bound to exactly the value it must
    /// not hold.
    #[error("constrained register slot bound to its disallowed value {value}")]
    DisallowedRegisterValue {
        /// The disallowed value.
        value: i64,
    },

    /// Encoding or rendering needed a value for a slot no binding supplies.
    #[error("no binding supplies {key} for {name}")]
    MissingBinding {
        /// The command being encoded or rendered.
        name: String,
        /// The slot that went unbound.
        key: FieldKey,
    },

    /// A negative value was bound to an unsigned immediate.
    #[error("negative value {value} bound to an unsigned immediate of {name}")]
    NegativeUnsignedImmediate {
        /// The command being encoded.
        name: String,
        /// The negative value.
        value: i64,
    },

    /// A register index outside the encodable range was bound.
    #[error("register index {value} is outside 0..=15")]
    IllegalRegisterIndex {
        /// The out-of-range index.
        value: i64,
    },

    /// A register index outside `x8..x15` was bound to a compressed slot.
    #[error("register index {value} cannot be encoded in a compressed slot (needs 8..=15)")]
    IllegalCompressedRegisterIndex {
        /// The out-of-range index.
        value: i64,
    },

    /// A base-command register slot has neither a mapping binding nor a
    /// register field of the right role in the compressed source.
    #[error("{name}: target register slot {key} has no source in the compressed command")]
    MissingSourceRegister {
        /// The compressed command whose transform was being built.
        name: String,
        /// The role that could not be sourced.
        key: FieldKey,
    },

    /// A base-command immediate chunk needed bits the compressed source
    /// cannot supply.
    #[error("{name}: target immediate bits have no source chunk in the compressed command")]
    MissingSourceImmediate {
        /// The compressed command whose transform was being built.
        name: String,
    },

    /// A transform's producers do not sum to the 32-bit output width.
    #[error("transform for {name} produces {width} bits, expected 32")]
    BadTransformWidth {
        /// The compressed command whose transform failed.
        name: String,
        /// The width actually produced.
        width: usize,
    },

    /// A transform does not end in constant bits carrying the base opcode,
    /// so the implicit `11` tail cannot be elided.
    #[error("transform for {name} does not end in constant opcode bits")]
    NonConstantOpcodeTail {
        /// The compressed command whose transform was being emitted.
        name: String,
    },

    /// No single-bit or register-constraint test separates a set of
    /// compressed commands.
    #[error("no bit test separates commands: {commands}")]
    NoValidSplit {
        /// The commands that could not be split, comma separated.
        commands: String,
    },

    /// The finished selection tree does not reach every command exactly once.
    #[error("selection tree does not classify every command exactly once")]
    IncompleteSelection,

    /// An external tool could not be resolved on `PATH`.
    #[error("tool `{name}` not found")]
    ToolNotFound {
        /// The requested executable name or path.
        name: String,
        /// The resolution failure.
        #[source]
        source: which::Error,
    },

    /// An external tool could not be spawned or driven.
    #[error("failed to run {tool}")]
    ToolSpawn {
        /// The executable that failed.
        tool: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// An external tool exited unsuccessfully.
    #[error("{tool} exited with {status}")]
    ToolFailed {
        /// The executable that failed.
        tool: String,
        /// Its exit status.
        status: std::process::ExitStatus,
    },

    /// No encoded bytes could be recovered from the disassembler output.
    #[error("could not find encoded bytes in disassembly output")]
    DisassemblyParse,

    /// The external assembler produced different bytes than the catalog.
    #[error("self-test mismatch for `{asm}`: assembled {assembled:02x?}, computed {computed:02x?}")]
    SelfTestMismatch {
        /// The assembly text that was round-tripped.
        asm: String,
        /// Bytes produced by the external assembler.
        assembled: Vec<u8>,
        /// Bytes computed from the declarations.
        computed: Vec<u8>,
    },

    /// Applying a transform did not reproduce the expanded encoding.
    #[error("decompression mismatch for {command}: produced {produced:02x?}, expected {expected:02x?}")]
    DecompressionMismatch {
        /// The compressed command under test.
        command: String,
        /// Bytes produced by the transform.
        produced: Vec<u8>,
        /// The expected expanded encoding.
        expected: Vec<u8>,
    },

    /// A filesystem operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
