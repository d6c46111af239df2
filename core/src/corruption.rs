//! Data-quality corruption: the rule pipeline.
//!
//! A rule is (probability, field, operator, optional guard). Rules are
//! applied in declaration order and are independent: a record may be hit
//! by none, one or many of them.
//!
//! RULES:
//!   - Every rule draws exactly one roll, in order, whether or not it
//!     fires. RNG consumption never depends on earlier outcomes, so a
//!     seeded run replays identically.
//!   - When two rules target the same field, the later one wins.
//!   - A guard is checked only after its roll succeeds.
//!   - Corruption never fails. An operator that does not fit the field's
//!     kind is a no-op.

use crate::{
    context::GenContext,
    entity::{Entity, FieldKind, FieldMut},
    error::{GenError, GenResult},
};
use std::collections::BTreeMap;

/// Years ahead a future-shifted timestamp may land.
pub const FUTURE_WINDOW_YEARS: f64 = 1.0;

/// What a fired rule does to its field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Corruption {
    SetNull,
    /// Replace text with a fixed out-of-domain value.
    Sentinel(&'static str),
    /// Force a number negative (`-abs(v)`). Null stays null.
    NegateSign,
    InvalidFormat(FormatDefect),
    /// Move a timestamp into (now, now + FUTURE_WINDOW_YEARS].
    ShiftToFuture,
    /// Replace an integer with a uniform draw from [lo, hi]. Overwrites null.
    OutOfRange { lo: i64, hi: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatDefect {
    /// `<word>@invalid`, an address with no usable domain.
    BareWordEmail,
}

impl Corruption {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetNull => "set_null",
            Self::Sentinel(_) => "sentinel",
            Self::NegateSign => "negate_sign",
            Self::InvalidFormat(_) => "invalid_format",
            Self::ShiftToFuture => "shift_to_future",
            Self::OutOfRange { .. } => "out_of_range",
        }
    }

    /// Whether this operator can act on a field of `kind`.
    pub fn applies_to(&self, kind: FieldKind) -> bool {
        match self {
            Self::SetNull => true,
            Self::Sentinel(_) | Self::InvalidFormat(_) => kind == FieldKind::Text,
            Self::NegateSign => matches!(kind, FieldKind::Int | FieldKind::Decimal),
            Self::ShiftToFuture => kind == FieldKind::Timestamp,
            Self::OutOfRange { .. } => kind == FieldKind::Int,
        }
    }
}

pub struct CorruptionRule<E: Entity> {
    pub field: E::Field,
    pub probability: f64,
    pub op: Corruption,
    pub guard: Option<fn(&E) -> bool>,
}

impl<E: Entity> Clone for CorruptionRule<E> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            probability: self.probability,
            op: self.op,
            guard: self.guard,
        }
    }
}

impl<E: Entity> std::fmt::Debug for CorruptionRule<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorruptionRule")
            .field("label", &self.label())
            .field("probability", &self.probability)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

impl<E: Entity> CorruptionRule<E> {
    pub fn new(field: E::Field, probability: f64, op: Corruption) -> Self {
        Self {
            field,
            probability,
            op,
            guard: None,
        }
    }

    /// Only fire when `guard` holds for the record at the time of the roll.
    pub fn guarded(mut self, guard: fn(&E) -> bool) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Stable name, `<column>.<operator>`.
    pub fn label(&self) -> String {
        format!("{}.{}", E::field_name(self.field), self.op.name())
    }
}

/// Replace rule probabilities by label. Unknown labels and probabilities
/// outside [0, 1] are configuration errors.
pub fn apply_overrides<E: Entity>(
    rules: &mut [CorruptionRule<E>],
    overrides: &BTreeMap<String, f64>,
) -> GenResult<()> {
    for (label, &probability) in overrides {
        if !(0.0..=1.0).contains(&probability) {
            return Err(GenError::InvalidProbability {
                rule: label.clone(),
                value: probability,
            });
        }
        let rule = rules
            .iter_mut()
            .find(|r| &r.label() == label)
            .ok_or_else(|| GenError::UnknownRule {
                table: E::TABLE.to_string(),
                label: label.clone(),
            })?;
        rule.probability = probability;
    }
    Ok(())
}

/// Fired-rule counts keyed by rule label.
pub type CorruptionTally = BTreeMap<String, usize>;

/// Applies rule lists to records and tallies what fired.
#[derive(Debug, Default)]
pub struct Corruptor {
    tally: CorruptionTally,
}

impl Corruptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `rules` over `record` in order, then refresh derived fields.
    pub fn corrupt<E: Entity>(
        &mut self,
        mut record: E,
        rules: &[CorruptionRule<E>],
        ctx: &mut GenContext<'_>,
    ) -> E {
        for rule in rules {
            if !ctx.rng.chance(rule.probability) {
                continue;
            }
            if let Some(guard) = rule.guard {
                if !guard(&record) {
                    continue;
                }
            }
            if apply(record.field_mut(rule.field), rule.op, ctx) {
                *self.tally.entry(rule.label()).or_insert(0) += 1;
            }
        }
        record.finalize();
        record
    }

    pub fn into_tally(self) -> CorruptionTally {
        self.tally
    }
}

/// Returns true when the field was changed.
fn apply(field: FieldMut<'_>, op: Corruption, ctx: &mut GenContext<'_>) -> bool {
    match (op, field) {
        (Corruption::SetNull, FieldMut::Text(v)) => v.take().is_some(),
        (Corruption::SetNull, FieldMut::Int(v)) => v.take().is_some(),
        (Corruption::SetNull, FieldMut::Decimal(v)) => v.take().is_some(),
        (Corruption::SetNull, FieldMut::Timestamp(v)) => v.take().is_some(),

        (Corruption::Sentinel(s), FieldMut::Text(v)) => {
            *v = Some(s.to_string());
            true
        }

        (Corruption::NegateSign, FieldMut::Decimal(v)) => match v {
            Some(x) => {
                *x = -x.abs();
                true
            }
            None => false,
        },
        (Corruption::NegateSign, FieldMut::Int(v)) => match v {
            Some(x) => {
                *x = -x.abs();
                true
            }
            None => false,
        },

        (Corruption::InvalidFormat(FormatDefect::BareWordEmail), FieldMut::Text(v)) => {
            let word = ctx.faker.word(&mut ctx.rng);
            *v = Some(format!("{word}@invalid"));
            true
        }

        (Corruption::ShiftToFuture, FieldMut::Timestamp(v)) => {
            *v = Some(ctx.clock.future_within_years(&mut ctx.rng, FUTURE_WINDOW_YEARS));
            true
        }

        (Corruption::OutOfRange { lo, hi }, FieldMut::Int(v)) => {
            *v = Some(ctx.rng.int_inclusive(lo, hi));
            true
        }

        (op, field) => {
            log::debug!("corruption {} does not apply to {:?} field", op.name(), field.kind());
            false
        }
    }
}
