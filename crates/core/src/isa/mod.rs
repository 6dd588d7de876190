//! Declarative command tables for the RV32IC subset.
//!
//! The tables transcribe the bit layouts of the RISC-V Instruction Set
//! Manual: base commands first, then the compressed commands whose mappings
//! resolve against them.
//!
//! # Structure
//!
//! - `rv32i`: the 32-bit base commands compressed instructions expand to.
//! - `rvc`: the 16-bit compressed commands and their expansion mappings.

use crate::catalog::Catalog;
use crate::error::Error;

/// Base (32-bit) command declarations.
pub mod rv32i;

/// Compressed (16-bit) command declarations.
pub mod rvc;

/// Builds the full RV32IC catalog.
pub fn catalog() -> Result<Catalog, Error> {
    let mut catalog = Catalog::new();
    rv32i::define(&mut catalog)?;
    rvc::define(&mut catalog)?;
    Ok(catalog)
}
