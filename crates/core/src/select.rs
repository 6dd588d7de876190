//! The selection tree.
//!
//! Classifies a 16-bit input to exactly one declared compressed command by a
//! binary decision tree. Internal nodes test either a single input bit
//! ("bit set?") or, for commands carved apart by a register constraint such
//! as `rs2 != x0`, a small contiguous bit range against its disallowed
//! value. Construction picks, at every level, the candidate split with the
//! best balance between the two children.

use std::collections::HashSet;

use tracing::debug;

use crate::catalog::Catalog;
use crate::command::Command;
use crate::error::Error;
use crate::field::Field;

/// A node of the tree: either a decided command (by index into the
/// catalog's compressed table) or a further test.
#[derive(Debug)]
pub enum TreeNode {
    /// A single classified command.
    Leaf(usize),
    /// A bit test with two subtrees.
    Branch(Box<Branch>),
}

/// An internal decision node.
///
/// A single-bit node has `hi == lo` and takes `first` when the bit is set.
/// A range node takes `first` when input bits `hi..lo` differ from
/// `not_equal`.
#[derive(Debug)]
pub struct Branch {
    /// Most significant tested input bit.
    pub hi: usize,
    /// Least significant tested input bit.
    pub lo: usize,
    /// The value the range must differ from to take `first`.
    pub not_equal: u32,
    /// Subtree for "bit set" / "range differs".
    pub first: TreeNode,
    /// Subtree for "bit clear" / "range equals".
    pub second: TreeNode,
}

/// A candidate split while searching: the test plus the two command sets it
/// would produce.
struct Split {
    hi: usize,
    lo: usize,
    not_equal: u32,
    first: Vec<usize>,
    second: Vec<usize>,
}

impl Split {
    fn imbalance(&self) -> usize {
        self.first.len().abs_diff(self.second.len())
    }
}

/// The finished decision tree over a catalog's compressed commands.
#[derive(Debug)]
pub struct SelectionTree {
    root: TreeNode,
}

impl SelectionTree {
    /// Builds the tree over every compressed command of `catalog`.
    ///
    /// Fails when some subset of commands admits no valid split, and when
    /// the finished tree does not reach every command exactly once.
    pub fn build(catalog: &Catalog) -> Result<Self, Error> {
        let commands = catalog.compressed_commands();
        let all: Vec<usize> = (0..commands.len()).collect();
        if all.is_empty() {
            return Err(Error::NoValidSplit {
                commands: String::new(),
            });
        }
        let root = build_node(commands, &all)?;
        let tree = Self { root };
        tree.check_complete(commands.len())?;
        debug!(commands = commands.len(), "selection tree built");
        Ok(tree)
    }

    /// The root node.
    pub const fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Classifies a 16-bit input, returning the index of the decided
    /// command within the catalog's compressed table.
    pub fn classify(&self, insn16: u16) -> usize {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf(index) => return *index,
                TreeNode::Branch(branch) => {
                    let taken = if branch.hi == branch.lo {
                        (insn16 >> branch.hi) & 1 != 0
                    } else {
                        let width = branch.hi - branch.lo + 1;
                        let bits = (u32::from(insn16) >> branch.lo) & ((1 << width) - 1);
                        bits != branch.not_equal
                    };
                    node = if taken { &branch.first } else { &branch.second };
                }
            }
        }
    }

    /// Every command index must appear in exactly one leaf.
    fn check_complete(&self, count: usize) -> Result<(), Error> {
        let mut leaves = Vec::new();
        collect_leaves(&self.root, &mut leaves);
        leaves.sort_unstable();
        if leaves.len() != count || leaves.iter().enumerate().any(|(i, &leaf)| i != leaf) {
            return Err(Error::IncompleteSelection);
        }
        Ok(())
    }
}

fn collect_leaves(node: &TreeNode, leaves: &mut Vec<usize>) {
    match node {
        TreeNode::Leaf(index) => leaves.push(*index),
        TreeNode::Branch(branch) => {
            collect_leaves(&branch.first, leaves);
            collect_leaves(&branch.second, leaves);
        }
    }
}

fn build_node(commands: &[Command], set: &[usize]) -> Result<TreeNode, Error> {
    if let [only] = set {
        return Ok(TreeNode::Leaf(*only));
    }

    let mut best: Option<Split> = None;
    for position in 0..16 {
        if let Some(split) = try_single_bit(commands, set, position) {
            if best.as_ref().is_none_or(|b| split.imbalance() < b.imbalance()) {
                best = Some(split);
            }
            if best.as_ref().is_some_and(|b| b.imbalance() < 2) {
                break;
            }
        }
    }

    let mut tried = HashSet::new();
    'constrained: for &index in set {
        for placed in commands[index].constrained_registers() {
            if !tried.insert(placed.position()) {
                continue;
            }
            let lo = placed.position() + 1 - placed.field().width();
            if let Some(split) = try_range(commands, set, placed.position(), lo) {
                if best.as_ref().is_none_or(|b| split.imbalance() < b.imbalance()) {
                    best = Some(split);
                }
                if best.as_ref().is_some_and(|b| b.imbalance() < 2) {
                    break 'constrained;
                }
            }
        }
    }

    let Some(split) = best else {
        let names: Vec<&str> = set.iter().map(|&i| commands[i].name()).collect();
        return Err(Error::NoValidSplit {
            commands: names.join(", "),
        });
    };

    Ok(TreeNode::Branch(Box::new(Branch {
        hi: split.hi,
        lo: split.lo,
        not_equal: split.not_equal,
        first: build_node(commands, &split.first)?,
        second: build_node(commands, &split.second)?,
    })))
}

/// Partition on a single constant bit. Valid only when every command in the
/// set has a constant at `position`.
fn try_single_bit(commands: &[Command], set: &[usize], position: usize) -> Option<Split> {
    let mut first = Vec::new();
    let mut second = Vec::new();
    for &index in set {
        if commands[index].constant_bit_at(position)? {
            first.push(index);
        } else {
            second.push(index);
        }
    }
    if first.is_empty() || second.is_empty() {
        return None;
    }
    Some(Split {
        hi: position,
        lo: position,
        not_equal: 0,
        first,
        second,
    })
}

/// Partition on a register-constraint range.
///
/// Valid only when every command either holds a single agreed constant over
/// `hi..lo` (the "equals" side) or covers exactly that range with a register
/// slot whose `not_equal` value is that constant (the "differs" side).
fn try_range(commands: &[Command], set: &[usize], hi: usize, lo: usize) -> Option<Split> {
    let width = hi - lo + 1;
    let mut values: Vec<Option<bool>> = vec![None; width];
    let mut first = Vec::new();
    let mut second = Vec::new();

    for &index in set {
        let command = &commands[index];
        let mut all_constant: Option<bool> = None;
        for bit in lo..=hi {
            match command.constant_bit_at(bit) {
                None => match all_constant {
                    None => all_constant = Some(false),
                    Some(true) => return None,
                    Some(false) => {}
                },
                Some(value) => {
                    match all_constant {
                        None => all_constant = Some(true),
                        Some(false) => return None,
                        Some(true) => {}
                    }
                    match values[bit - lo] {
                        None => values[bit - lo] = Some(value),
                        Some(seen) if seen != value => return None,
                        Some(_) => {}
                    }
                }
            }
        }
        if all_constant == Some(true) {
            second.push(index);
        } else {
            first.push(index);
        }
    }

    let mut not_equal = 0u32;
    for (offset, value) in values.iter().enumerate() {
        match value {
            Some(true) => not_equal |= 1 << offset,
            Some(false) => {}
            None => return None,
        }
    }

    for &index in &first {
        let placed = commands[index].field_covering(hi)?;
        let Field::Register(slot) = placed.field() else {
            return None;
        };
        if placed.position() != hi || placed.position() + 1 - placed.field().width() != lo {
            return None;
        }
        if slot.not_equal != Some(not_equal) {
            return None;
        }
    }

    if first.is_empty() || second.is_empty() {
        return None;
    }
    Some(Split {
        hi,
        lo,
        not_equal,
        first,
        second,
    })
}
