//! Account records. Each account points at a customer; orphan accounts
//! point at the sentinel instead.

use crate::{
    context::GenContext,
    corruption::{Corruption, CorruptionRule},
    entity::{Entity, FieldMut, Value},
    types::EntityId,
};
use chrono::NaiveDateTime;

pub const INVALID_ACCOUNT_TYPE: &str = "Invalid_Type";
pub const ACCOUNT_STATUSES: &[&str] = &["Active", "Inactive", "Suspended", "Closed"];
pub const BALANCE_RANGE: (f64, f64) = (-50_000.0, 100_000.0);
pub const CREDIT_LIMIT_RANGE: (f64, f64) = (1_000.0, 50_000.0);
pub const INTEREST_RATE_RANGE: (f64, f64) = (0.5, 25.0);
pub const OPENED_WINDOW_YEARS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Checking,
    Savings,
    CreditCard,
    Investment,
    Loan,
    Mortgage,
}

impl AccountType {
    pub const ALL: [AccountType; 6] = [
        AccountType::Checking,
        AccountType::Savings,
        AccountType::CreditCard,
        AccountType::Investment,
        AccountType::Loan,
        AccountType::Mortgage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Checking => "Checking",
            Self::Savings => "Savings",
            Self::CreditCard => "Credit Card",
            Self::Investment => "Investment",
            Self::Loan => "Loan",
            Self::Mortgage => "Mortgage",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    pub fn has_credit_limit(&self) -> bool {
        matches!(self, Self::CreditCard)
    }

    pub fn bears_interest(&self) -> bool {
        matches!(self, Self::Savings | Self::CreditCard | Self::Loan | Self::Mortgage)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub account_id: EntityId,
    pub customer_id: EntityId,
    pub account_type: Option<String>,
    pub account_number: Option<String>,
    pub routing_number: Option<String>,
    pub balance: Option<f64>,
    pub credit_limit: Option<f64>,
    pub interest_rate: Option<f64>,
    pub status: Option<String>,
    pub opened_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    AccountType,
    AccountNumber,
    RoutingNumber,
    Balance,
    CreditLimit,
    InterestRate,
    Status,
    OpenedDate,
}

impl Account {
    /// Build one nominal account owned by `customer_id`.
    pub fn synthesize(ctx: &mut GenContext<'_>, customer_id: EntityId) -> Self {
        let account_id = ctx.next_id();
        let faker = ctx.faker;
        let rng = &mut ctx.rng;

        let account_type = *rng.pick(&AccountType::ALL);
        let account_number = faker.credit_card_number(rng);
        let routing_number = faker.routing_number(rng);
        let balance = rng.uniform_cents(BALANCE_RANGE.0, BALANCE_RANGE.1);
        let credit_limit = account_type
            .has_credit_limit()
            .then(|| rng.uniform_cents(CREDIT_LIMIT_RANGE.0, CREDIT_LIMIT_RANGE.1));
        let interest_rate = account_type
            .bears_interest()
            .then(|| rng.uniform_cents(INTEREST_RATE_RANGE.0, INTEREST_RATE_RANGE.1));
        let status = rng.pick(ACCOUNT_STATUSES).to_string();
        let opened_date = ctx.clock.past_within_years(rng, OPENED_WINDOW_YEARS);

        Self {
            account_id,
            customer_id,
            account_type: Some(account_type.label().to_string()),
            account_number: Some(account_number),
            routing_number: Some(routing_number),
            balance: Some(balance),
            credit_limit,
            interest_rate,
            status: Some(status),
            opened_date: Some(opened_date),
        }
    }

    /// The account type when it is still a member of the domain.
    pub fn known_type(&self) -> Option<AccountType> {
        self.account_type.as_deref().and_then(AccountType::from_label)
    }
}

impl Entity for Account {
    const TABLE: &'static str = "accounts";
    const COLUMNS: &'static [&'static str] = &[
        "account_id",
        "customer_id",
        "account_type",
        "account_number",
        "routing_number",
        "balance",
        "credit_limit",
        "interest_rate",
        "status",
        "opened_date",
    ];
    type Field = AccountField;

    fn id(&self) -> &str {
        &self.account_id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(&self.customer_id)
    }

    fn field_name(field: AccountField) -> &'static str {
        match field {
            AccountField::AccountType => "account_type",
            AccountField::AccountNumber => "account_number",
            AccountField::RoutingNumber => "routing_number",
            AccountField::Balance => "balance",
            AccountField::CreditLimit => "credit_limit",
            AccountField::InterestRate => "interest_rate",
            AccountField::Status => "status",
            AccountField::OpenedDate => "opened_date",
        }
    }

    fn field_mut(&mut self, field: AccountField) -> FieldMut<'_> {
        match field {
            AccountField::AccountType => FieldMut::Text(&mut self.account_type),
            AccountField::AccountNumber => FieldMut::Text(&mut self.account_number),
            AccountField::RoutingNumber => FieldMut::Text(&mut self.routing_number),
            AccountField::Balance => FieldMut::Decimal(&mut self.balance),
            AccountField::CreditLimit => FieldMut::Decimal(&mut self.credit_limit),
            AccountField::InterestRate => FieldMut::Decimal(&mut self.interest_rate),
            AccountField::Status => FieldMut::Text(&mut self.status),
            AccountField::OpenedDate => FieldMut::Timestamp(&mut self.opened_date),
        }
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::Text(self.account_id.clone()),
            Value::Text(self.customer_id.clone()),
            Value::from(&self.account_type),
            Value::from(&self.account_number),
            Value::from(&self.routing_number),
            Value::from(self.balance),
            Value::from(self.credit_limit),
            Value::from(self.interest_rate),
            Value::from(&self.status),
            Value::from(self.opened_date),
        ]
    }

    fn default_rules() -> Vec<CorruptionRule<Self>> {
        vec![
            CorruptionRule::new(AccountField::AccountNumber, 0.04, Corruption::SetNull),
            CorruptionRule::new(AccountField::RoutingNumber, 0.03, Corruption::SetNull),
            CorruptionRule::new(AccountField::Balance, 0.05, Corruption::SetNull),
            CorruptionRule::new(
                AccountField::AccountType,
                0.02,
                Corruption::Sentinel(INVALID_ACCOUNT_TYPE),
            ),
            CorruptionRule::new(AccountField::Status, 0.03, Corruption::SetNull),
            CorruptionRule::new(AccountField::OpenedDate, 0.04, Corruption::ShiftToFuture),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditional_field_governors() {
        let limited: Vec<_> = AccountType::ALL.iter().filter(|t| t.has_credit_limit()).collect();
        assert_eq!(limited, vec![&AccountType::CreditCard]);
        let interest: Vec<_> = AccountType::ALL
            .iter()
            .filter(|t| t.bears_interest())
            .map(|t| t.label())
            .collect();
        assert_eq!(interest, vec!["Savings", "Credit Card", "Loan", "Mortgage"]);
    }

    #[test]
    fn sentinel_type_is_outside_domain() {
        assert_eq!(AccountType::from_label(INVALID_ACCOUNT_TYPE), None);
        assert_eq!(AccountType::from_label("Credit Card"), Some(AccountType::CreditCard));
    }

    #[test]
    fn rule_fields_are_columns() {
        for rule in Account::default_rules() {
            let name = Account::field_name(rule.field);
            assert!(Account::COLUMNS.contains(&name), "{name} not a column");
        }
    }
}
