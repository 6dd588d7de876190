//! Selection-tree construction and classification.

use pretty_assertions::assert_eq;

use rvcgen_core::SelectionTree;
use rvcgen_core::select::TreeNode;

use super::{catalog, index_of, operand_bindings};

fn leaf_count(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf(_) => 1,
        TreeNode::Branch(branch) => leaf_count(&branch.first) + leaf_count(&branch.second),
    }
}

fn check_branches(node: &TreeNode) {
    if let TreeNode::Branch(branch) = node {
        assert!(branch.hi >= branch.lo);
        assert!(branch.hi < 16);
        assert!(leaf_count(&branch.first) >= 1, "empty first side");
        assert!(leaf_count(&branch.second) >= 1, "empty second side");
        check_branches(&branch.first);
        check_branches(&branch.second);
    }
}

// ──────────────────────────────────────────────────────────
// Structure
// ──────────────────────────────────────────────────────────

#[test]
fn tree_covers_every_command_exactly_once() {
    let catalog = catalog();
    let tree = SelectionTree::build(&catalog).unwrap();
    assert_eq!(leaf_count(tree.root()), catalog.compressed_commands().len());
    check_branches(tree.root());
}

// ──────────────────────────────────────────────────────────
// Classification
// ──────────────────────────────────────────────────────────

#[test]
fn every_canonical_encoding_classifies_to_its_own_command() {
    let catalog = catalog();
    let tree = SelectionTree::build(&catalog).unwrap();
    for (index, command) in catalog.compressed_commands().iter().enumerate() {
        for case in command.test_bindings() {
            let encoded = command.encode(&case).unwrap();
            assert_eq!(
                tree.classify(encoded.value() as u16),
                index,
                "{} misclassified",
                command.name()
            );
        }
    }
}

#[test]
fn register_constraint_separates_c_mv_from_c_jr() {
    let catalog = catalog();
    let tree = SelectionTree::build(&catalog).unwrap();
    // Same funct bits; only the rs2 field decides: zero means C.JR.
    assert_eq!(tree.classify(0x8502), index_of(&catalog, "C.JR"));
    assert_eq!(tree.classify(0x852E), index_of(&catalog, "C.MV"));
    assert_eq!(tree.classify(0x9502), index_of(&catalog, "C.JALR"));
    assert_eq!(tree.classify(0x952E), index_of(&catalog, "C.ADD"));
}

#[test]
fn rd_constraint_separates_c_lui_from_c_addi16sp() {
    let catalog = catalog();
    let tree = SelectionTree::build(&catalog).unwrap();

    let lui = catalog.compressed("C.LUI").unwrap();
    let bindings = operand_bindings(lui, Some(3 << 12), &[10]);
    let encoded = lui.encode(&bindings).unwrap();
    assert_eq!(tree.classify(encoded.value() as u16), index_of(&catalog, "C.LUI"));

    let addi16sp = catalog.compressed("C.ADDI16SP").unwrap();
    let bindings = operand_bindings(addi16sp, Some(48), &[]);
    let encoded = addi16sp.encode(&bindings).unwrap();
    assert_eq!(
        tree.classify(encoded.value() as u16),
        index_of(&catalog, "C.ADDI16SP")
    );
}

#[test]
fn operand_bits_do_not_change_the_classification() {
    let catalog = catalog();
    let tree = SelectionTree::build(&catalog).unwrap();
    let command = catalog.compressed("C.ANDI").unwrap();
    let index = index_of(&catalog, "C.ANDI");
    for imm in [-32i64, -1, 0, 5, 31] {
        for reg in 8..=15 {
            let bindings = operand_bindings(command, Some(imm), &[reg]);
            let encoded = command.encode(&bindings).unwrap();
            assert_eq!(tree.classify(encoded.value() as u16), index);
        }
    }
}
