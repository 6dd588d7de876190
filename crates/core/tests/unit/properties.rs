//! Property tests sampling the operand-binding space.
//!
//! For every sampled binding set: the compressed encoding is 2 bytes and the
//! expanded encoding 4; applying the transform to the compressed encoding
//! equals expanding and re-encoding; the selection tree routes the encoding
//! back to its command; and the immediate survives an encode/decode round
//! trip (with sign extension above the declared span).

use std::sync::LazyLock;

use proptest::prelude::*;

use rvcgen_core::field::Field;
use rvcgen_core::{Catalog, Command, SelectionTree, Transform};

use super::{index_of, operand_bindings};

static CATALOG: LazyLock<Catalog> =
    LazyLock::new(|| rvcgen_core::isa::catalog().expect("catalog builds"));
static TREE: LazyLock<SelectionTree> =
    LazyLock::new(|| SelectionTree::build(&CATALOG).expect("tree builds"));

/// Reads the immediate back out of an encoded opcode by walking the
/// command's immediate chunks, then sign-extends from the declared span.
fn decode_immediate(command: &Command, encoded: u32) -> i64 {
    let mut value: i64 = 0;
    for placed in command.fields() {
        if let Field::Immediate(chunk) = placed.field() {
            let width = chunk.width();
            let low = placed.position() + 1 - width;
            let bits = i64::from((encoded >> low) & ((1 << width) - 1));
            value |= bits << chunk.lo;
        }
    }
    let hi = command.imm_hi_bit().expect("has an immediate");
    if command.imm_signed() == Some(true) && (value >> hi) & 1 == 1 {
        value - (1i64 << (hi + 1))
    } else {
        value
    }
}

/// Runs the shared property chain for one command and binding set.
fn check(name: &str, imm: Option<i64>, regs: &[i64]) {
    let command = CATALOG.compressed(name).expect("declared command");
    let base = CATALOG.target_of(command).expect("mapping resolves");
    let bindings = operand_bindings(command, imm, regs);

    let encoded16 = command.encode(&bindings).expect("compressed encodes");
    assert_eq!(encoded16.to_le_bytes().len(), 2);

    let composed = bindings.union(command.mapping().expect("compressed").bindings());
    let encoded32 = base.encode(&composed).expect("base encodes");
    assert_eq!(encoded32.to_le_bytes().len(), 4);

    let transform = Transform::build(command, base).expect("transform builds");
    assert_eq!(
        transform.apply(encoded16.value() as u16).expect("applies"),
        encoded32.value(),
        "{name}: transform disagrees with expand-and-re-encode"
    );

    assert_eq!(
        TREE.classify(encoded16.value() as u16),
        index_of(&CATALOG, name),
        "{name}: misclassified"
    );

    if let Some(expected) = imm {
        assert_eq!(
            decode_immediate(command, encoded16.value()),
            expected,
            "{name}: immediate round trip"
        );
    }
}

proptest! {
    #[test]
    fn c_addi_binding_space(reg in 0i64..=15, imm in -32i64..=31) {
        check("C.ADDI", Some(imm), &[reg]);
    }

    #[test]
    fn c_li_binding_space(reg in 0i64..=15, imm in -32i64..=31) {
        check("C.LI", Some(imm), &[reg]);
    }

    #[test]
    fn c_lw_binding_space(rs1 in 8i64..=15, rd in 8i64..=15, word in 0i64..=31) {
        check("C.LW", Some(word << 2), &[rs1, rd]);
    }

    #[test]
    fn c_swsp_binding_space(rs2 in 0i64..=15, word in 0i64..=63) {
        check("C.SWSP", Some(word << 2), &[rs2]);
    }

    #[test]
    fn c_beqz_binding_space(rs1 in 8i64..=15, half in -128i64..=127) {
        check("C.BEQZ", Some(half << 1), &[rs1]);
    }

    #[test]
    fn c_j_binding_space(half in -1024i64..=1023) {
        check("C.J", Some(half << 1), &[]);
    }

    #[test]
    fn c_lui_binding_space(rd in (0i64..=15).prop_filter("x2 is C.ADDI16SP", |rd| *rd != 2),
                           page in -32i64..=31) {
        check("C.LUI", Some(page << 12), &[rd]);
    }

    #[test]
    fn c_mv_binding_space(rd in 0i64..=15, rs2 in 1i64..=15) {
        check("C.MV", None, &[rd, rs2]);
    }

    #[test]
    fn c_and_binding_space(rsd in 8i64..=15, rs2 in 8i64..=15) {
        check("C.AND", None, &[rsd, rs2]);
    }

    #[test]
    fn c_slli_binding_space(reg in 0i64..=15, shamt in 0i64..=31) {
        check("C.SLLI", Some(shamt), &[reg]);
    }
}
