//! Transaction records. Every transaction references a sampled account;
//! there is no orphan injection for this table.

use crate::{
    context::GenContext,
    corruption::{Corruption, CorruptionRule},
    entity::{Entity, FieldMut, Value},
    types::EntityId,
};
use chrono::NaiveDateTime;

pub const TRANSACTION_STATUSES: &[&str] = &["Completed", "Pending", "Failed", "Cancelled"];
pub const MERCHANT_CATEGORIES: &[&str] = &[
    "Retail",
    "Restaurant",
    "Gas Station",
    "Online",
    "Healthcare",
    "Entertainment",
    "Travel",
    "Utilities",
];
pub const AMOUNT_RANGE: (f64, f64) = (1.0, 10_000.0);
pub const DESCRIPTION_WORDS: usize = 6;
pub const TRANSACTION_WINDOW_YEARS: f64 = 2.0;
pub const REFERENCE_PATTERN: &str = "REF-####-????";
pub const AUTHORIZATION_PATTERN: &str = "AUTH-######";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    Payment,
    Interest,
    Fee,
    Purchase,
}

impl TransactionType {
    pub const ALL: [TransactionType; 7] = [
        TransactionType::Deposit,
        TransactionType::Withdrawal,
        TransactionType::Transfer,
        TransactionType::Payment,
        TransactionType::Interest,
        TransactionType::Fee,
        TransactionType::Purchase,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Withdrawal => "Withdrawal",
            Self::Transfer => "Transfer",
            Self::Payment => "Payment",
            Self::Interest => "Interest",
            Self::Fee => "Fee",
            Self::Purchase => "Purchase",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Types that carry merchant details and an authorization code.
    pub fn is_merchant_facing(&self) -> bool {
        matches!(self, Self::Purchase | Self::Payment)
    }

    /// Types whose amount is already an outflow; the sign-flip defect skips them.
    pub fn is_outflow(&self) -> bool {
        matches!(self, Self::Withdrawal | Self::Payment | Self::Fee)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: EntityId,
    pub account_id: EntityId,
    pub transaction_type: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub merchant_name: Option<String>,
    pub merchant_category: Option<String>,
    pub transaction_date: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub reference_number: String,
    pub authorization_code: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    TransactionType,
    Amount,
    Description,
    MerchantName,
    MerchantCategory,
    TransactionDate,
    Status,
    AuthorizationCode,
    Location,
}

impl Transaction {
    /// Build one nominal transaction against `account_id`.
    pub fn synthesize(ctx: &mut GenContext<'_>, account_id: EntityId) -> Self {
        let transaction_id = ctx.next_id();
        let faker = ctx.faker;
        let rng = &mut ctx.rng;

        let kind = *rng.pick(&TransactionType::ALL);
        let amount = rng.uniform_cents(AMOUNT_RANGE.0, AMOUNT_RANGE.1);
        let description = faker.sentence(rng, DESCRIPTION_WORDS);
        let merchant_name = kind.is_merchant_facing().then(|| faker.company(rng));
        let merchant_category = merchant_name
            .is_some()
            .then(|| rng.pick(MERCHANT_CATEGORIES).to_string());
        let transaction_date = ctx.clock.past_within_years(rng, TRANSACTION_WINDOW_YEARS);
        let status = rng.pick(TRANSACTION_STATUSES).to_string();

        let reference_number = faker.bothify(rng, REFERENCE_PATTERN);
        let authorization_code = kind
            .is_merchant_facing()
            .then(|| faker.bothify(rng, AUTHORIZATION_PATTERN));

        let location = format!("{}, {}", faker.city(rng), faker.state(rng));

        Self {
            transaction_id,
            account_id,
            transaction_type: Some(kind.label().to_string()),
            amount: Some(amount),
            description: Some(description),
            merchant_name,
            merchant_category,
            transaction_date: Some(transaction_date),
            status: Some(status),
            reference_number,
            authorization_code,
            location: Some(location),
        }
    }

    pub fn known_type(&self) -> Option<TransactionType> {
        self.transaction_type.as_deref().and_then(TransactionType::from_label)
    }
}

/// Guard for the sign-flip rule: outflow types are exempt. Evaluated
/// before transaction_type can be nulled, so it sees the nominal type.
fn sign_flip_allowed(t: &Transaction) -> bool {
    !t.known_type().is_some_and(|k| k.is_outflow())
}

impl Entity for Transaction {
    const TABLE: &'static str = "transactions";
    const COLUMNS: &'static [&'static str] = &[
        "transaction_id",
        "account_id",
        "transaction_type",
        "amount",
        "description",
        "merchant_name",
        "merchant_category",
        "transaction_date",
        "status",
        "reference_number",
        "authorization_code",
        "location",
    ];
    type Field = TransactionField;

    fn id(&self) -> &str {
        &self.transaction_id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(&self.account_id)
    }

    fn field_name(field: TransactionField) -> &'static str {
        match field {
            TransactionField::TransactionType => "transaction_type",
            TransactionField::Amount => "amount",
            TransactionField::Description => "description",
            TransactionField::MerchantName => "merchant_name",
            TransactionField::MerchantCategory => "merchant_category",
            TransactionField::TransactionDate => "transaction_date",
            TransactionField::Status => "status",
            TransactionField::AuthorizationCode => "authorization_code",
            TransactionField::Location => "location",
        }
    }

    fn field_mut(&mut self, field: TransactionField) -> FieldMut<'_> {
        match field {
            TransactionField::TransactionType => FieldMut::Text(&mut self.transaction_type),
            TransactionField::Amount => FieldMut::Decimal(&mut self.amount),
            TransactionField::Description => FieldMut::Text(&mut self.description),
            TransactionField::MerchantName => FieldMut::Text(&mut self.merchant_name),
            TransactionField::MerchantCategory => FieldMut::Text(&mut self.merchant_category),
            TransactionField::TransactionDate => FieldMut::Timestamp(&mut self.transaction_date),
            TransactionField::Status => FieldMut::Text(&mut self.status),
            TransactionField::AuthorizationCode => FieldMut::Text(&mut self.authorization_code),
            TransactionField::Location => FieldMut::Text(&mut self.location),
        }
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::Text(self.transaction_id.clone()),
            Value::Text(self.account_id.clone()),
            Value::from(&self.transaction_type),
            Value::from(self.amount),
            Value::from(&self.description),
            Value::from(&self.merchant_name),
            Value::from(&self.merchant_category),
            Value::from(self.transaction_date),
            Value::from(&self.status),
            Value::Text(self.reference_number.clone()),
            Value::from(&self.authorization_code),
            Value::from(&self.location),
        ]
    }

    /// Amount is targeted twice: null first, then the guarded sign flip.
    /// The flip never touches a nulled amount.
    fn default_rules() -> Vec<CorruptionRule<Self>> {
        vec![
            CorruptionRule::new(TransactionField::Amount, 0.06, Corruption::SetNull),
            CorruptionRule::new(TransactionField::Amount, 0.04, Corruption::NegateSign)
                .guarded(sign_flip_allowed),
            CorruptionRule::new(TransactionField::Description, 0.05, Corruption::SetNull),
            CorruptionRule::new(TransactionField::TransactionType, 0.03, Corruption::SetNull),
            CorruptionRule::new(TransactionField::Status, 0.04, Corruption::SetNull),
            CorruptionRule::new(TransactionField::TransactionDate, 0.02, Corruption::ShiftToFuture),
            CorruptionRule::new(TransactionField::Location, 0.03, Corruption::SetNull),
        ]
    }
}
