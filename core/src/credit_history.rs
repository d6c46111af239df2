//! Credit-score history entries, several per customer.

use crate::{
    context::GenContext,
    corruption::{Corruption, CorruptionRule},
    customer::{INVALID_SCORE_RANGE, SCORE_RANGE},
    entity::{Entity, FieldMut, Value},
    types::EntityId,
};
use chrono::NaiveDateTime;

pub const CREDIT_BUREAUS: &[&str] = &["Equifax", "Experian", "TransUnion"];
pub const SCORE_WINDOW_YEARS: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CreditHistoryEntry {
    pub credit_history_id: EntityId,
    pub customer_id: EntityId,
    pub credit_score: Option<i64>,
    pub credit_bureau: Option<String>,
    pub score_date: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditHistoryField {
    CreditScore,
    CreditBureau,
}

impl CreditHistoryEntry {
    pub fn synthesize(ctx: &mut GenContext<'_>, customer_id: EntityId) -> Self {
        let credit_history_id = ctx.next_id();
        let rng = &mut ctx.rng;
        let score_date = ctx.clock.past_within_years(rng, SCORE_WINDOW_YEARS);
        let credit_score = rng.int_inclusive(SCORE_RANGE.0, SCORE_RANGE.1);
        let credit_bureau = rng.pick(CREDIT_BUREAUS).to_string();
        Self {
            credit_history_id,
            customer_id,
            credit_score: Some(credit_score),
            credit_bureau: Some(credit_bureau),
            score_date,
        }
    }
}

impl Entity for CreditHistoryEntry {
    const TABLE: &'static str = "credit_history";
    const COLUMNS: &'static [&'static str] = &[
        "credit_history_id",
        "customer_id",
        "credit_score",
        "credit_bureau",
        "score_date",
    ];
    type Field = CreditHistoryField;

    fn id(&self) -> &str {
        &self.credit_history_id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(&self.customer_id)
    }

    fn field_name(field: CreditHistoryField) -> &'static str {
        match field {
            CreditHistoryField::CreditScore => "credit_score",
            CreditHistoryField::CreditBureau => "credit_bureau",
        }
    }

    fn field_mut(&mut self, field: CreditHistoryField) -> FieldMut<'_> {
        match field {
            CreditHistoryField::CreditScore => FieldMut::Int(&mut self.credit_score),
            CreditHistoryField::CreditBureau => FieldMut::Text(&mut self.credit_bureau),
        }
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::Text(self.credit_history_id.clone()),
            Value::Text(self.customer_id.clone()),
            Value::from(self.credit_score),
            Value::from(&self.credit_bureau),
            Value::Timestamp(self.score_date),
        ]
    }

    /// The out-of-range rule follows the null rule on the same field and
    /// does not check for null: a nulled score can come back invalid.
    fn default_rules() -> Vec<CorruptionRule<Self>> {
        vec![
            CorruptionRule::new(CreditHistoryField::CreditScore, 0.03, Corruption::SetNull),
            CorruptionRule::new(
                CreditHistoryField::CreditScore,
                0.02,
                Corruption::OutOfRange {
                    lo: INVALID_SCORE_RANGE.0,
                    hi: INVALID_SCORE_RANGE.1,
                },
            ),
            CorruptionRule::new(CreditHistoryField::CreditBureau, 0.04, Corruption::SetNull),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ReferenceClock,
        faker::CuratedFaker,
        rng::{RngBank, TableSlot},
    };
    use chrono::NaiveDate;

    #[test]
    fn nominal_entry_is_in_range_and_in_the_past() {
        let now = NaiveDate::from_ymd_opt(2025, 6, 30)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        let faker = CuratedFaker::default();
        let rng = RngBank::new(11).for_table(TableSlot::CreditHistory);
        let mut ctx = GenContext::new(rng, CreditHistoryEntry::TABLE, &faker, ReferenceClock::new(now));

        for _ in 0..200 {
            let e = CreditHistoryEntry::synthesize(&mut ctx, "c-1".into());
            assert_eq!(e.customer_id, "c-1");
            let score = e.credit_score.unwrap();
            assert!((SCORE_RANGE.0..=SCORE_RANGE.1).contains(&score));
            assert!(CREDIT_BUREAUS.contains(&e.credit_bureau.as_deref().unwrap()));
            assert!(e.score_date <= now);
        }
        assert_eq!(ctx.ids.issued(), 200);
    }

    #[test]
    fn score_rules_null_then_out_of_range() {
        let labels: Vec<String> = CreditHistoryEntry::default_rules()
            .iter()
            .map(|r| r.label())
            .collect();
        assert_eq!(
            labels,
            vec!["credit_score.set_null", "credit_score.out_of_range", "credit_bureau.set_null"]
        );
    }
}
