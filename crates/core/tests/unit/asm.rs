//! Assembly-text rendering rules.

use pretty_assertions::assert_eq;

use rvcgen_core::asm;

use super::{catalog, operand_bindings};

fn render(name: &str, imm: Option<i64>, regs: &[i64]) -> String {
    let catalog = catalog();
    let command = catalog
        .compressed(name)
        .or_else(|| catalog.base(name))
        .expect("declared command");
    let bindings = operand_bindings(command, imm, regs);
    asm::render(command, &bindings).expect("renderable")
}

// ──────────────────────────────────────────────────────────
// Operand order and separators
// ──────────────────────────────────────────────────────────

#[test]
fn src_dst_commands_print_the_register_once() {
    assert_eq!(render("C.ADDI", Some(10), &[10]), "C.ADDI x10, 10");
}

#[test]
fn base_commands_print_all_register_operands() {
    assert_eq!(render("ADDI", Some(10), &[10, 10]), "ADDI x10, x10, 10");
    assert_eq!(render("SUB", None, &[9, 8, 8]), "SUB x8, x8, x9");
    assert_eq!(render("BEQ", Some(6), &[0, 10]), "BEQ x10, x0, 6");
}

#[test]
fn register_only_commands_skip_the_immediate() {
    assert_eq!(render("C.JR", None, &[10]), "C.JR x10");
    assert_eq!(render("C.MV", None, &[10, 11]), "C.MV x10, x11");
}

#[test]
fn branches_name_the_source_then_the_offset() {
    assert_eq!(render("C.BEQZ", Some(6), &[10]), "C.BEQZ x10, 6");
    assert_eq!(render("C.J", Some(6), &[]), "C.J 6");
}

// ──────────────────────────────────────────────────────────
// Offset-style immediates
// ──────────────────────────────────────────────────────────

#[test]
fn loads_and_stores_print_offset_base_pairs() {
    assert_eq!(render("C.LW", Some(12), &[10, 11]), "C.LW x11, 12(x10)");
    assert_eq!(render("C.SW", Some(12), &[10, 11]), "C.SW x11, 12(x10)");
    assert_eq!(render("LW", Some(12), &[10, 11]), "LW x11, 12(x10)");
}

#[test]
fn stack_pointer_forms_imply_x2_as_the_base() {
    assert_eq!(render("C.LWSP", Some(12), &[10]), "C.LWSP x10, 12(x2)");
    assert_eq!(render("C.SWSP", Some(12), &[10]), "C.SWSP x10, 12(x2)");
}

// ──────────────────────────────────────────────────────────
// Toolchain idiosyncrasies
// ──────────────────────────────────────────────────────────

#[test]
fn addi4spn_and_addi16sp_name_the_stack_pointer() {
    assert_eq!(render("C.ADDI4SPN", Some(12), &[10]), "C.ADDI4SPN x10, x2, 12");
    assert_eq!(render("C.ADDI16SP", Some(48), &[]), "C.ADDI16SP x2, 48");
}

#[test]
fn lui_immediates_are_printed_page_scaled() {
    assert_eq!(render("C.LUI", Some(3 << 12), &[10]), "C.LUI x10, 3");
    assert_eq!(render("LUI", Some(3 << 12), &[10]), "LUI x10, 3");
}

#[test]
fn negative_lui_immediates_wrap_to_20_bits() {
    assert_eq!(render("C.LUI", Some(-(3 << 12)), &[10]), "C.LUI x10, 1048573");
}
