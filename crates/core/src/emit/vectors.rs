//! Test-vector emission.
//!
//! For every compressed command and every canonical binding set, emits a
//! `TEST_CASE` record carrying the assembly text of both forms plus the
//! 16-bit and 32-bit encodings as little-endian byte lists. The hardware
//! test bench expands the macro into a decompression check.

use crate::asm;
use crate::catalog::Catalog;
use crate::error::Error;

use super::GENERATED_HEADER;

/// Renders the full `TEST_CASE` vector file.
pub fn test_cases(catalog: &Catalog) -> Result<String, Error> {
    let mut text = String::from(GENERATED_HEADER);
    for command in catalog.compressed_commands() {
        let base = catalog.target_of(command)?;
        let mapping = command.mapping().ok_or_else(|| Error::MissingMapping {
            name: command.name().to_string(),
        })?;
        for case in command.test_bindings() {
            let encoded16 = command.encode(&case)?;
            let composed = case.union(mapping.bindings());
            let encoded32 = base.encode(&composed)?;
            text.push_str(&format!(
                "TEST_CASE(\"{} => {}\",\n          ({}), ({}))\n\n",
                asm::render(command, &case)?,
                asm::render(base, &composed)?,
                byte_list(&encoded16.to_le_bytes()),
                byte_list(&encoded32.to_le_bytes()),
            ));
        }
    }
    Ok(text)
}

fn byte_list(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:#x}"))
        .collect::<Vec<_>>()
        .join(", ")
}
