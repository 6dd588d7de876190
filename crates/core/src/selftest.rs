//! External-assembler round trip.
//!
//! Cross-checks the declared encodings and the derived transforms against a
//! real RISC-V toolchain. For every compressed command and every canonical
//! binding set:
//!
//! 1. The compressed form is assembled in RV32EC mode; the bytes must equal
//!    the catalog encoding.
//! 2. The base form (with the mapping's forced operands merged in) is
//!    assembled in RV32EC mode, where the assembler is expected to pick the
//!    compressed encoding again, and in RV32E mode, which must yield the
//!    expanded encoding.
//! 3. The transform is applied to the compressed bytes and must reproduce
//!    the expanded bytes.
//!
//! Any mismatch is fatal; the fix is a change to the declarations.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command as Process, Stdio};

use tempfile::TempDir;
use tracing::{debug, info};

use crate::asm;
use crate::catalog::Catalog;
use crate::error::Error;
use crate::transform::Transform;

/// Resolved locations of the external assembler and disassembler.
#[derive(Debug)]
pub struct Toolchain {
    compiler: PathBuf,
    objdump: PathBuf,
}

impl Toolchain {
    /// Resolves the tool names or paths against `PATH`.
    pub fn locate(compiler: &str, objdump: &str) -> Result<Self, Error> {
        let resolve = |name: &str| {
            which::which(name).map_err(|source| Error::ToolNotFound {
                name: name.to_string(),
                source,
            })
        };
        Ok(Self {
            compiler: resolve(compiler)?,
            objdump: resolve(objdump)?,
        })
    }

    /// Assembles one command and returns its encoded bytes in memory order.
    ///
    /// `compressed` selects `-march=rv32ec` (compressed encodings allowed)
    /// over `-march=rv32e`.
    fn assemble(&self, text: &str, scratch: &Path, compressed: bool) -> Result<Vec<u8>, Error> {
        let object = scratch.join("probe.o");
        let march = if compressed { "-march=rv32ec" } else { "-march=rv32e" };
        let spawn_err = |source| Error::ToolSpawn {
            tool: self.compiler.display().to_string(),
            source,
        };

        let mut child = Process::new(&self.compiler)
            .args([
                "-c",
                "--target=riscv32",
                march,
                "-mno-relax",
                "-mlittle-endian",
                "-x",
                "assembler",
                "-o",
            ])
            .arg(&object)
            .arg("-")
            .stdin(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(format!(".text\n{text}\n").as_bytes())
                .map_err(spawn_err)?;
        }
        let status = child.wait().map_err(spawn_err)?;
        if !status.success() {
            return Err(Error::ToolFailed {
                tool: self.compiler.display().to_string(),
                status,
            });
        }

        let listing = Process::new(&self.objdump)
            .arg("--disassemble")
            .arg(&object)
            .output()
            .map_err(|source| Error::ToolSpawn {
                tool: self.objdump.display().to_string(),
                source,
            })?;
        if !listing.status.success() {
            return Err(Error::ToolFailed {
                tool: self.objdump.display().to_string(),
                status: listing.status,
            });
        }
        parse_listing(&String::from_utf8_lossy(&listing.stdout))
    }
}

/// Extracts the first instruction's bytes from a disassembly listing.
fn parse_listing(listing: &str) -> Result<Vec<u8>, Error> {
    listing
        .lines()
        .find_map(parse_listing_line)
        .ok_or(Error::DisassemblyParse)
}

/// Parses one listing line of the shape `addr: b0 b1 …  mnemonic`, returning
/// the byte column when present.
fn parse_listing_line(line: &str) -> Option<Vec<u8>> {
    let (address, rest) = line.trim_start().split_once(':')?;
    if address.is_empty() || !address.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let mut bytes = Vec::new();
    for token in rest.split_whitespace() {
        if token.len() != 2 || !token.chars().all(|c| c.is_ascii_hexdigit()) {
            break;
        }
        bytes.push(u8::from_str_radix(token, 16).ok()?);
    }
    if bytes.is_empty() { None } else { Some(bytes) }
}

/// Runs the full round trip over every compressed command.
pub fn run(catalog: &Catalog, tools: &Toolchain) -> Result<(), Error> {
    let scratch = TempDir::new()?;
    for command in catalog.compressed_commands() {
        info!(command = command.name(), "self-testing");
        let base = catalog.target_of(command)?;
        let mapping = command.mapping().ok_or_else(|| Error::MissingMapping {
            name: command.name().to_string(),
        })?;

        for case in command.test_bindings() {
            let encoded16 = command.encode(&case)?;
            let computed16 = encoded16.to_le_bytes();

            let text16 = asm::render(command, &case)?;
            debug!(asm = %text16, bindings = %case, "compressed form");
            let assembled = tools.assemble(&text16, scratch.path(), true)?;
            if assembled != computed16 {
                return Err(Error::SelfTestMismatch {
                    asm: text16,
                    assembled,
                    computed: computed16,
                });
            }

            let composed = case.union(mapping.bindings());
            let text32 = asm::render(base, &composed)?;
            debug!(asm = %text32, bindings = %composed, "base form");

            // With compressed encodings enabled the assembler must fold the
            // base form back into the same 16-bit encoding.
            let assembled = tools.assemble(&text32, scratch.path(), true)?;
            if assembled != computed16 {
                return Err(Error::SelfTestMismatch {
                    asm: text32,
                    assembled,
                    computed: computed16,
                });
            }

            let computed32 = base.encode(&composed)?.to_le_bytes();
            let assembled = tools.assemble(&text32, scratch.path(), false)?;
            if assembled != computed32 {
                return Err(Error::SelfTestMismatch {
                    asm: text32,
                    assembled,
                    computed: computed32,
                });
            }

            let transform = Transform::build(command, base)?;
            let expanded = transform.apply(encoded16.value() as u16)?;
            let produced = expanded.to_le_bytes().to_vec();
            if produced != computed32 {
                return Err(Error::DecompressionMismatch {
                    command: command.name().to_string(),
                    produced,
                    expected: computed32,
                });
            }
        }
    }
    info!("self-test completed");
    Ok(())
}
