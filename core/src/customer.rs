//! Customer records: synthesis, schema and the customer rule table.

use crate::{
    context::GenContext,
    corruption::{Corruption, CorruptionRule, FormatDefect},
    entity::{Entity, FieldMut, Value},
    types::EntityId,
};
use chrono::{NaiveDate, NaiveDateTime};

pub const EMPLOYMENT_STATUSES: &[&str] =
    &["Employed", "Self-employed", "Unemployed", "Retired", "Student"];

pub const INCOME_RANGE: (f64, f64) = (25_000.0, 200_000.0);
pub const SCORE_RANGE: (i64, i64) = (300, 850);
/// Band a corrupted credit score is drawn from.
pub const INVALID_SCORE_RANGE: (i64, i64) = (0, 299);
pub const INVALID_SSN: &str = "000-00-0000";
pub const CREATED_WINDOW_YEARS: f64 = 5.0;

/// Credit tier derived from a raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditTier {
    Poor,
    Fair,
    Good,
    VeryGood,
    Excellent,
    Unknown,
}

/// Inclusive score bands, non-overlapping, covering 300–850.
const TIER_BANDS: [(i64, i64, CreditTier); 5] = [
    (300, 579, CreditTier::Poor),
    (580, 669, CreditTier::Fair),
    (670, 739, CreditTier::Good),
    (740, 799, CreditTier::VeryGood),
    (800, 850, CreditTier::Excellent),
];

impl CreditTier {
    /// Null and out-of-band scores are Unknown.
    pub fn from_score(score: Option<i64>) -> Self {
        score
            .and_then(|s| {
                TIER_BANDS
                    .iter()
                    .find(|(lo, hi, _)| (*lo..=*hi).contains(&s))
                    .map(|(_, _, tier)| *tier)
            })
            .unwrap_or(CreditTier::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::VeryGood => "Very Good",
            Self::Excellent => "Excellent",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub customer_id: EntityId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub ssn: Option<String>,
    pub date_of_birth: NaiveDate,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: String,
    pub annual_income: Option<f64>,
    pub employment_status: String,
    pub credit_score: Option<i64>,
    pub credit_range: CreditTier,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    FirstName,
    LastName,
    Email,
    Phone,
    Ssn,
    Address,
    City,
    State,
    ZipCode,
    AnnualIncome,
    CreditScore,
}

impl Customer {
    /// Build one nominal customer.
    pub fn synthesize(ctx: &mut GenContext<'_>) -> Self {
        let customer_id = ctx.next_id();
        let faker = ctx.faker;
        let rng = &mut ctx.rng;

        let first_name = faker.first_name(rng);
        let last_name = faker.last_name(rng);
        let email = faker.email(rng);
        let phone = faker.phone_number(rng);
        let ssn = faker.ssn(rng);
        let date_of_birth = ctx.clock.date_of_birth(rng, 18, 80);
        let address = faker.street_address(rng);
        let city = faker.city(rng);
        let state = faker.state(rng);
        let zip_code = faker.postcode(rng);
        let country = faker.country(rng);

        let annual_income = rng.uniform_cents(INCOME_RANGE.0, INCOME_RANGE.1);
        let employment_status = rng.pick(EMPLOYMENT_STATUSES).to_string();
        let credit_score = rng.int_inclusive(SCORE_RANGE.0, SCORE_RANGE.1);
        let created_date = ctx.clock.past_within_years(rng, CREATED_WINDOW_YEARS);

        Self {
            customer_id,
            first_name: Some(first_name),
            last_name: Some(last_name),
            email: Some(email),
            phone: Some(phone),
            ssn: Some(ssn),
            date_of_birth,
            address: Some(address),
            city: Some(city),
            state: Some(state),
            zip_code: Some(zip_code),
            country,
            annual_income: Some(annual_income),
            employment_status,
            credit_score: Some(credit_score),
            credit_range: CreditTier::from_score(Some(credit_score)),
            created_date,
        }
    }
}

impl Entity for Customer {
    const TABLE: &'static str = "customers";
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "first_name",
        "last_name",
        "email",
        "phone",
        "ssn",
        "date_of_birth",
        "address",
        "city",
        "state",
        "zip_code",
        "country",
        "annual_income",
        "employment_status",
        "credit_score",
        "credit_range",
        "created_date",
    ];
    type Field = CustomerField;

    fn id(&self) -> &str {
        &self.customer_id
    }

    fn field_name(field: CustomerField) -> &'static str {
        match field {
            CustomerField::FirstName => "first_name",
            CustomerField::LastName => "last_name",
            CustomerField::Email => "email",
            CustomerField::Phone => "phone",
            CustomerField::Ssn => "ssn",
            CustomerField::Address => "address",
            CustomerField::City => "city",
            CustomerField::State => "state",
            CustomerField::ZipCode => "zip_code",
            CustomerField::AnnualIncome => "annual_income",
            CustomerField::CreditScore => "credit_score",
        }
    }

    fn field_mut(&mut self, field: CustomerField) -> FieldMut<'_> {
        match field {
            CustomerField::FirstName => FieldMut::Text(&mut self.first_name),
            CustomerField::LastName => FieldMut::Text(&mut self.last_name),
            CustomerField::Email => FieldMut::Text(&mut self.email),
            CustomerField::Phone => FieldMut::Text(&mut self.phone),
            CustomerField::Ssn => FieldMut::Text(&mut self.ssn),
            CustomerField::Address => FieldMut::Text(&mut self.address),
            CustomerField::City => FieldMut::Text(&mut self.city),
            CustomerField::State => FieldMut::Text(&mut self.state),
            CustomerField::ZipCode => FieldMut::Text(&mut self.zip_code),
            CustomerField::AnnualIncome => FieldMut::Decimal(&mut self.annual_income),
            CustomerField::CreditScore => FieldMut::Int(&mut self.credit_score),
        }
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::Text(self.customer_id.clone()),
            Value::from(&self.first_name),
            Value::from(&self.last_name),
            Value::from(&self.email),
            Value::from(&self.phone),
            Value::from(&self.ssn),
            Value::Date(self.date_of_birth),
            Value::from(&self.address),
            Value::from(&self.city),
            Value::from(&self.state),
            Value::from(&self.zip_code),
            Value::Text(self.country.clone()),
            Value::from(self.annual_income),
            Value::Text(self.employment_status.clone()),
            Value::from(self.credit_score),
            Value::Text(self.credit_range.label().to_string()),
            Value::Timestamp(self.created_date),
        ]
    }

    fn default_rules() -> Vec<CorruptionRule<Self>> {
        use Corruption::*;
        use CustomerField::*;
        vec![
            CorruptionRule::new(FirstName, 0.05, SetNull),
            CorruptionRule::new(LastName, 0.03, SetNull),
            CorruptionRule::new(Email, 0.04, InvalidFormat(FormatDefect::BareWordEmail)),
            CorruptionRule::new(Phone, 0.06, SetNull),
            CorruptionRule::new(Ssn, 0.02, Sentinel(INVALID_SSN)),
            CorruptionRule::new(Address, 0.03, SetNull),
            CorruptionRule::new(City, 0.04, SetNull),
            CorruptionRule::new(State, 0.02, SetNull),
            CorruptionRule::new(ZipCode, 0.05, SetNull),
            CorruptionRule::new(AnnualIncome, 0.03, NegateSign),
            CorruptionRule::new(
                CreditScore,
                0.02,
                OutOfRange {
                    lo: INVALID_SCORE_RANGE.0,
                    hi: INVALID_SCORE_RANGE.1,
                },
            ),
        ]
    }

    fn finalize(&mut self) {
        self.credit_range = CreditTier::from_score(self.credit_score);
    }
}
