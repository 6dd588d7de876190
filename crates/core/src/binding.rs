//! Operand bindings.
//!
//! A [`Bindings`] value assigns concrete operand values (register indices,
//! the immediate) to named slots. Bindings are used in two places: canonical
//! test cases bind every operand of a command, and a compressed command's
//! mapping binds the operands its expansion forces (for example `rs1 = x2`
//! for the stack-pointer forms).

use std::fmt;

use crate::error::Error;
use crate::field::{Field, FieldKey};

/// An ordered list of `(slot key, value)` assignments.
///
/// Lookup returns the first match, so earlier entries shadow later ones when
/// binding sets are composed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
    items: Vec<(FieldKey, i64)>,
}

impl Bindings {
    /// Creates an empty binding set.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends one assignment.
    pub fn push(&mut self, key: FieldKey, value: i64) {
        self.items.push((key, value));
    }

    /// Appends every assignment of `other`.
    pub fn extend(&mut self, other: &Self) {
        self.items.extend_from_slice(&other.items);
    }

    /// Returns this set followed by `other`; entries of `self` win on
    /// overlapping keys.
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.extend(other);
        merged
    }

    /// The raw assignments, in insertion order.
    pub fn items(&self) -> &[(FieldKey, i64)] {
        &self.items
    }

    /// Looks up the value bound for `slot`, applying the role-collapsing
    /// rule of [`crate::field::RegRole::matches`].
    ///
    /// Enforces the slot's `not_equal` constraint at use time: a match that
    /// resolves to the disallowed value is an error, not a silent skip.
    pub fn lookup(&self, slot: &Field) -> Result<Option<i64>, Error> {
        let found = match slot {
            Field::Constant(_) => None,
            Field::Immediate(_) => self
                .items
                .iter()
                .find(|(key, _)| matches!(key, FieldKey::Imm)),
            Field::Register(reg) => self
                .items
                .iter()
                .find(|(key, _)| matches!(key, FieldKey::Reg(role) if reg.role.matches(*role))),
        };
        let Some((_, value)) = found else {
            return Ok(None);
        };
        if let Field::Register(reg) = slot {
            if let Some(disallowed) = reg.not_equal {
                if *value == i64::from(disallowed) {
                    return Err(Error::DisallowedRegisterValue { value: *value });
                }
            }
        }
        Ok(Some(*value))
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        Ok(())
    }
}
