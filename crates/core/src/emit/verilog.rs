//! Verilog emission.
//!
//! Renders one transform as a bit-concatenation expression and the whole
//! selection tree as a nested conditional block assigning the upper 30 bits
//! of the expanded opcode (the low two bits of any uncompressed opcode are
//! `11` and are concatenated by the enclosing module).

use crate::catalog::Catalog;
use crate::error::Error;
use crate::select::{SelectionTree, TreeNode};
use crate::transform::{Producer, Transform};

use super::GENERATED_HEADER;

const INDENT: &str = "    ";

/// Renders `transform` as a concatenation expression over `input`.
///
/// The final producer must be constant bits (they carry the base opcode);
/// its two lowest bits are elided.
pub fn expression(transform: &Transform, input: &str) -> Result<String, Error> {
    let producers = transform.producers();
    let tail = match producers.last() {
        Some(Producer::Constant(constant)) => constant.slice(constant.width() - 1, 2)?,
        _ => {
            return Err(Error::NonConstantOpcodeTail {
                name: transform.source().to_string(),
            });
        }
    };

    let mut parts = Vec::with_capacity(producers.len());
    for (index, producer) in producers.iter().enumerate() {
        let trimmed;
        let producer = if index == producers.len() - 1 {
            trimmed = Producer::Constant(tail);
            &trimmed
        } else {
            producer
        };
        parts.push(match producer {
            Producer::Constant(constant) => format!("{}'b{constant}", constant.width()),
            Producer::Copy { hi, lo } if hi == lo => format!("{input}[{hi}]"),
            Producer::Copy { hi, lo } => format!("{input}[{hi}:{lo}]"),
            Producer::Replicate { bit, count } => format!("{{{count}{{{input}[{bit}]}}}}"),
        });
    }
    Ok(format!("{{{}}}", parts.join(", ")))
}

/// Renders the full decompressor block: the selection tree as nested
/// conditionals, each leaf assigning `output` from the leaf's transform.
pub fn decompressor(
    catalog: &Catalog,
    tree: &SelectionTree,
    input: &str,
    output: &str,
) -> Result<String, Error> {
    let mut text = String::from(GENERATED_HEADER);
    emit_node(catalog, tree.root(), input, output, 0, &mut text)?;
    Ok(text)
}

fn emit_node(
    catalog: &Catalog,
    node: &TreeNode,
    input: &str,
    output: &str,
    depth: usize,
    text: &mut String,
) -> Result<(), Error> {
    match node {
        TreeNode::Leaf(index) => emit_leaf(catalog, *index, input, output, depth, text),
        TreeNode::Branch(branch) => {
            let indent = INDENT.repeat(depth);
            let condition = if branch.hi == branch.lo {
                format!("{input}[{}]", branch.hi)
            } else {
                format!("{input}[{}:{}] != {}", branch.hi, branch.lo, branch.not_equal)
            };
            text.push_str(&format!("{indent}if ({condition}) begin\n"));
            emit_node(catalog, &branch.first, input, output, depth + 1, text)?;
            text.push_str(&format!("{indent}end else begin\n"));
            emit_node(catalog, &branch.second, input, output, depth + 1, text)?;
            text.push_str(&format!("{indent}end\n"));
            Ok(())
        }
    }
}

fn emit_leaf(
    catalog: &Catalog,
    index: usize,
    input: &str,
    output: &str,
    depth: usize,
    text: &mut String,
) -> Result<(), Error> {
    let command = &catalog.compressed_commands()[index];
    let base = catalog.target_of(command)?;
    let transform = Transform::build(command, base)?;
    let indent = INDENT.repeat(depth);
    text.push_str(&format!("{indent}// {command} -> {base}\n"));
    text.push_str(&format!(
        "{indent}{output} = {};\n",
        expression(&transform, input)?
    ));
    Ok(())
}
