//! The command catalog.
//!
//! Two name-indexed tables, base (32-bit) and compressed (16-bit) commands,
//! populated by the declaration tables in [`crate::isa`] and immutable
//! afterwards. Declaration order is preserved: selection-tree construction
//! and file emission iterate the compressed table in the order commands were
//! declared, so generated output is deterministic.

use std::collections::HashMap;

use tracing::debug;

use crate::binding::Bindings;
use crate::command::{AsmStyle, Command, Mapping};
use crate::error::Error;
use crate::field::{Field, FieldKey, FieldSpec};

/// A mapping declaration: the target base command plus forced operand values.
#[derive(Clone, Debug)]
pub struct MappingSpec {
    target: &'static str,
    bindings: Vec<(FieldKey, i64)>,
}

/// Starts a mapping declaration onto the named base command.
pub const fn map_to(target: &'static str) -> MappingSpec {
    MappingSpec {
        target,
        bindings: Vec::new(),
    }
}

impl MappingSpec {
    /// Adds a forced operand value to the mapping.
    pub fn bind(mut self, key: FieldKey, value: i64) -> Self {
        self.bindings.push((key, value));
        self
    }
}

/// The immutable registry of declared commands.
#[derive(Debug, Default)]
pub struct Catalog {
    base: Vec<Command>,
    base_index: HashMap<String, usize>,
    compressed: Vec<Command>,
    compressed_index: HashMap<String, usize>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a 32-bit base command.
    ///
    /// Fails on a duplicate name, on field widths not summing to 32, or on
    /// mixed immediate signedness.
    pub fn declare_base(
        &mut self,
        name: &'static str,
        specs: &[FieldSpec],
        asm_style: AsmStyle,
    ) -> Result<(), Error> {
        if self.base_index.contains_key(name) {
            return Err(Error::DuplicateCommand {
                name: name.to_string(),
            });
        }
        let command = Command::new(name, 32, specs, None, asm_style)?;
        debug!(name, "registered base command");
        let _ = self.base_index.insert(name.to_string(), self.base.len());
        self.base.push(command);
        Ok(())
    }

    /// Registers a 16-bit compressed command and its mapping.
    ///
    /// Fails like [`Self::declare_base`] (with width 16), and additionally
    /// when the mapping target is unknown, a binding matches no slot of the
    /// target, or a binding holds a constrained slot's disallowed value.
    pub fn declare_compressed(
        &mut self,
        name: &'static str,
        mapping: MappingSpec,
        specs: &[FieldSpec],
        asm_style: AsmStyle,
    ) -> Result<(), Error> {
        if self.compressed_index.contains_key(name) {
            return Err(Error::DuplicateCommand {
                name: name.to_string(),
            });
        }
        let target = self
            .base(mapping.target)
            .ok_or_else(|| Error::UnknownMappingTarget {
                name: name.to_string(),
                target: mapping.target.to_string(),
            })?;

        let mut bindings = Bindings::new();
        for (key, value) in &mapping.bindings {
            let slot = target
                .find_field(*key)
                .ok_or_else(|| Error::UnmatchedBinding {
                    name: target.name().to_string(),
                    key: *key,
                })?;
            if let Field::Register(reg) = slot.field() {
                if let Some(disallowed) = reg.not_equal {
                    if *value == i64::from(disallowed) {
                        return Err(Error::DisallowedRegisterValue { value: *value });
                    }
                }
            }
            bindings.push(*key, *value);
        }

        debug!(name, target = mapping.target, "registered compressed command");
        let mapping = Mapping::new(mapping.target.to_string(), bindings);
        let command = Command::new(name, 16, specs, Some(mapping), asm_style)?;
        let _ = self
            .compressed_index
            .insert(name.to_string(), self.compressed.len());
        self.compressed.push(command);
        Ok(())
    }

    /// Looks up a base command by name.
    pub fn base(&self, name: &str) -> Option<&Command> {
        self.base_index.get(name).map(|&i| &self.base[i])
    }

    /// Looks up a compressed command by name.
    pub fn compressed(&self, name: &str) -> Option<&Command> {
        self.compressed_index.get(name).map(|&i| &self.compressed[i])
    }

    /// All base commands, in declaration order.
    pub fn base_commands(&self) -> &[Command] {
        &self.base
    }

    /// All compressed commands, in declaration order.
    pub fn compressed_commands(&self) -> &[Command] {
        &self.compressed
    }

    /// Resolves a compressed command's mapping target.
    pub fn target_of(&self, command: &Command) -> Result<&Command, Error> {
        let mapping = command.mapping().ok_or_else(|| Error::MissingMapping {
            name: command.name().to_string(),
        })?;
        self.base(mapping.target())
            .ok_or_else(|| Error::UnknownMappingTarget {
                name: command.name().to_string(),
                target: mapping.target().to_string(),
            })
    }
}
