//! Opcode encoding: expansion scenarios, canonical bindings, failure modes.

use pretty_assertions::assert_eq;
use rstest::rstest;

use rvcgen_core::field::FieldKey;
use rvcgen_core::{Bindings, Error, SelectionTree, Transform};

use super::{catalog, encode_bytes, expansion_bytes, index_of, operand_bindings};

// ──────────────────────────────────────────────────────────
// Expansion scenarios (bytes little-endian)
// ──────────────────────────────────────────────────────────

#[rstest]
#[case::c_addi("C.ADDI", Some(1), vec![10], vec![0x05, 0x05], vec![0x13, 0x05, 0x15, 0x00])]
#[case::c_li("C.LI", Some(1), vec![10], vec![0x05, 0x45], vec![0x13, 0x05, 0x10, 0x00])]
#[case::c_sub("C.SUB", None, vec![8, 9], vec![0x05, 0x8C], vec![0x33, 0x04, 0x94, 0x40])]
#[case::c_jr("C.JR", None, vec![10], vec![0x02, 0x85], vec![0x67, 0x00, 0x05, 0x00])]
#[case::c_mv("C.MV", None, vec![10, 11], vec![0x2E, 0x85], vec![0x33, 0x05, 0xB0, 0x00])]
#[case::c_addi4spn("C.ADDI4SPN", Some(4), vec![8], vec![0x40, 0x00], vec![0x13, 0x04, 0x41, 0x00])]
fn expansion_scenarios(
    #[case] name: &str,
    #[case] imm: Option<i64>,
    #[case] regs: Vec<i64>,
    #[case] expected16: Vec<u8>,
    #[case] expected32: Vec<u8>,
) {
    let catalog = catalog();
    assert_eq!(encode_bytes(&catalog, name, imm, &regs), expected16);
    assert_eq!(expansion_bytes(&catalog, name, imm, &regs), expected32);

    // The derived transform must agree with expand-and-re-encode.
    let command = catalog.compressed(name).unwrap();
    let base = catalog.target_of(command).unwrap();
    let transform = Transform::build(command, base).unwrap();
    let insn16 = u16::from_le_bytes([expected16[0], expected16[1]]);
    let expanded = transform.apply(insn16).unwrap();
    assert_eq!(expanded.to_le_bytes().to_vec(), expected32);

    // And the selection tree must route the encoding to this command.
    let tree = SelectionTree::build(&catalog).unwrap();
    assert_eq!(tree.classify(insn16), index_of(&catalog, name));
}

// ──────────────────────────────────────────────────────────
// Canonical test bindings
// ──────────────────────────────────────────────────────────

#[test]
fn signed_commands_get_a_negated_second_case() {
    let catalog = catalog();
    let cases = catalog.compressed("C.ADDI").unwrap().test_bindings();
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0].items()[0], (FieldKey::Imm, 10));
    assert_eq!(cases[1].items()[0], (FieldKey::Imm, -10));
}

#[test]
fn aligned_commands_get_an_aligned_immediate() {
    let catalog = catalog();
    let cases = catalog.compressed("C.ADDI4SPN").unwrap().test_bindings();
    assert_eq!(cases.len(), 1, "unsigned immediates get no negated case");
    assert_eq!(cases[0].items()[0], (FieldKey::Imm, 12));

    let cases = catalog.compressed("C.LUI").unwrap().test_bindings();
    assert_eq!(cases[0].items()[0], (FieldKey::Imm, 3 << 12));
}

#[test]
fn registers_are_assigned_from_x10_in_field_order() {
    let catalog = catalog();
    let cases = catalog.compressed("C.SW").unwrap().test_bindings();
    let regs: Vec<i64> = cases[0]
        .items()
        .iter()
        .filter(|(key, _)| *key != FieldKey::Imm)
        .map(|(_, value)| *value)
        .collect();
    assert_eq!(regs, vec![10, 11]);
}

#[test]
fn canonical_bindings_encode_for_every_command() {
    let catalog = catalog();
    for command in catalog.compressed_commands() {
        for case in command.test_bindings() {
            let encoded = command.encode(&case).unwrap();
            assert_eq!(encoded.width(), 16, "{}", command.name());
            assert_eq!(encoded.to_le_bytes().len(), 2, "{}", command.name());
        }
    }
}

#[test]
fn c_addi_canonical_bytes() {
    let catalog = catalog();
    assert_eq!(
        encode_bytes(&catalog, "C.ADDI", Some(10), &[10]),
        vec![0x29, 0x05]
    );
    assert_eq!(
        encode_bytes(&catalog, "C.ADDI", Some(-10), &[10]),
        vec![0x59, 0x15]
    );
    assert_eq!(
        expansion_bytes(&catalog, "C.ADDI", Some(-10), &[10]),
        vec![0x13, 0x05, 0x65, 0xFF]
    );
}

#[test]
fn c_lw_canonical_bytes() {
    let catalog = catalog();
    assert_eq!(
        encode_bytes(&catalog, "C.LW", Some(12), &[10, 11]),
        vec![0x4C, 0x45]
    );
    assert_eq!(
        expansion_bytes(&catalog, "C.LW", Some(12), &[10, 11]),
        vec![0x83, 0x25, 0xC5, 0x00]
    );
}

// ──────────────────────────────────────────────────────────
// Failure modes
// ──────────────────────────────────────────────────────────

#[test]
fn negative_value_for_unsigned_immediate_fails() {
    let catalog = catalog();
    let command = catalog.compressed("C.LW").unwrap();
    let bindings = operand_bindings(command, Some(-4), &[10, 11]);
    assert!(matches!(
        command.encode(&bindings),
        Err(Error::NegativeUnsignedImmediate { .. })
    ));
}

#[test]
fn compressed_slots_reject_registers_below_x8() {
    let catalog = catalog();
    let command = catalog.compressed("C.LW").unwrap();
    let bindings = operand_bindings(command, Some(4), &[3, 11]);
    assert!(matches!(
        command.encode(&bindings),
        Err(Error::IllegalCompressedRegisterIndex { value: 3 })
    ));
}

#[test]
fn register_indices_above_x15_are_rejected() {
    let catalog = catalog();
    let command = catalog.compressed("C.MV").unwrap();
    let bindings = operand_bindings(command, None, &[16, 11]);
    assert!(matches!(
        command.encode(&bindings),
        Err(Error::IllegalRegisterIndex { value: 16 })
    ));
}

#[test]
fn constrained_slot_rejects_its_disallowed_value_at_use() {
    let catalog = catalog();
    let command = catalog.compressed("C.MV").unwrap();
    // rs2 = x0 is C.JR's encoding space, not C.MV's.
    let bindings = operand_bindings(command, None, &[10, 0]);
    assert!(matches!(
        command.encode(&bindings),
        Err(Error::DisallowedRegisterValue { value: 0 })
    ));
}

#[test]
fn missing_bindings_fail_loudly() {
    let catalog = catalog();
    let command = catalog.compressed("C.ADDI").unwrap();
    assert!(matches!(
        command.encode(&Bindings::new()),
        Err(Error::MissingBinding { .. })
    ));
}

#[test]
fn immediates_out_of_field_range_fail() {
    let catalog = catalog();
    let base = catalog.base("ADDI").unwrap();
    let mut bindings = Bindings::new();
    bindings.push(FieldKey::Imm, i64::from(u32::MAX) + 1);
    bindings.push(FieldKey::rs1(), 1);
    bindings.push(FieldKey::rd(), 1);
    assert!(matches!(
        base.encode(&bindings),
        Err(Error::ValueOutOfRange { .. })
    ));
}
