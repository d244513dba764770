//! Expense and income records of a single period.

use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, money::parse_whole_amount};

/// Backend-assigned identifier of an expense.
///
/// The engine never interprets it; it only compares identifiers for equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payment state of an expense.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Paid,
}

impl ExpenseStatus {
    /// Wire and sort label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    /// The state a status toggle moves to.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Paid,
            Self::Paid => Self::Pending,
        }
    }
}

/// A single expense of a period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    /// Opaque category key; membership in the configured list is not checked.
    pub category: String,
    /// Non-negative magnitude in `currency`.
    pub amount: f64,
    pub currency: Currency,
    pub status: ExpenseStatus,
}

/// Monthly income of a period. A period without income behaves as amount 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub amount: f64,
    pub currency: Currency,
}

/// Validated fields for creating or replacing an expense.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseFields {
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub currency: Currency,
}

/// Partial update of an expense, as sent to the backend.
///
/// `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpensePatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<Currency>,
    pub status: Option<ExpenseStatus>,
}

impl ExpensePatch {
    /// Patch that only flips the status.
    #[must_use]
    pub fn status(status: ExpenseStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Full edit. Edited expenses go back to `pending`.
    #[must_use]
    pub fn edit(fields: ExpenseFields) -> Self {
        Self {
            name: Some(fields.name),
            category: Some(fields.category),
            amount: Some(fields.amount),
            currency: Some(fields.currency),
            status: Some(ExpenseStatus::Pending),
        }
    }

    /// Applies the patch in place.
    pub fn apply(&self, expense: &mut Expense) {
        if let Some(name) = &self.name {
            expense.name.clone_from(name);
        }
        if let Some(category) = &self.category {
            expense.category.clone_from(category);
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(currency) = self.currency {
            expense.currency = currency;
        }
        if let Some(status) = self.status {
            expense.status = status;
        }
    }
}

/// Raw, user-typed expense form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseDraft {
    pub name: String,
    pub category: String,
    pub amount: String,
    pub currency: Option<Currency>,
}

impl ExpenseDraft {
    /// Pre-fills a draft from an existing expense, amount rounded to whole units.
    #[must_use]
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            name: expense.name.clone(),
            category: expense.category.clone(),
            amount: crate::money::round_half_up(expense.amount).max(0).to_string(),
            currency: Some(expense.currency),
        }
    }

    /// Checks the draft and returns typed fields.
    ///
    /// Name, category and currency are required; the amount must be a whole
    /// number greater than zero.
    pub fn validate(&self) -> Result<ExpenseFields, EngineError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(EngineError::MissingField("name".to_string()));
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(EngineError::MissingField("category".to_string()));
        }
        let currency = self
            .currency
            .ok_or_else(|| EngineError::MissingField("currency".to_string()))?;
        let amount = parse_whole_amount(&self.amount)?;
        if amount <= 0.0 {
            return Err(EngineError::InvalidAmount(
                "amount must be greater than 0".to_string(),
            ));
        }

        Ok(ExpenseFields {
            name: name.to_string(),
            category: category.to_string(),
            amount,
            currency,
        })
    }
}

/// Raw, user-typed income form. Zero is a valid income.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IncomeDraft {
    pub amount: String,
    pub currency: Option<Currency>,
}

impl IncomeDraft {
    /// Pre-fills the form: empty when there is no income yet.
    #[must_use]
    pub fn from_income(income: Option<&Income>) -> Self {
        match income {
            Some(income) if income.amount > 0.0 => Self {
                amount: crate::money::round_half_up(income.amount).to_string(),
                currency: Some(income.currency),
            },
            Some(income) => Self {
                amount: String::new(),
                currency: Some(income.currency),
            },
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<Income, EngineError> {
        let currency = self
            .currency
            .ok_or_else(|| EngineError::MissingField("currency".to_string()))?;
        let amount = parse_whole_amount(&self.amount)?;
        Ok(Income { amount, currency })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Expense {
        Expense {
            id: ExpenseId::new("7"),
            name: "Pane".to_string(),
            category: "Alimentazione".to_string(),
            amount: 12.6,
            currency: Currency::Eur,
            status: ExpenseStatus::Paid,
        }
    }

    #[test]
    fn status_toggle_round_trips() {
        assert_eq!(ExpenseStatus::Pending.toggled(), ExpenseStatus::Paid);
        assert_eq!(ExpenseStatus::Pending.toggled().toggled(), ExpenseStatus::Pending);
    }

    #[test]
    fn draft_requires_every_field() {
        let mut draft = ExpenseDraft {
            name: "Affitto".to_string(),
            category: "Affitto".to_string(),
            amount: "800".to_string(),
            currency: Some(Currency::Eur),
        };
        assert_eq!(draft.validate().unwrap().amount, 800.0);

        draft.name = "  ".to_string();
        assert_eq!(
            draft.validate(),
            Err(EngineError::MissingField("name".to_string()))
        );

        draft.name = "Affitto".to_string();
        draft.currency = None;
        assert_eq!(
            draft.validate(),
            Err(EngineError::MissingField("currency".to_string()))
        );
    }

    #[test]
    fn draft_rejects_zero_and_decimals() {
        let mut draft = ExpenseDraft {
            name: "x".to_string(),
            category: "Altro".to_string(),
            amount: "0".to_string(),
            currency: Some(Currency::Mxn),
        };
        assert!(matches!(draft.validate(), Err(EngineError::InvalidAmount(_))));
        draft.amount = "3.5".to_string();
        assert!(matches!(draft.validate(), Err(EngineError::InvalidAmount(_))));
    }

    #[test]
    fn edit_patch_resets_status_to_pending() {
        let mut expense = sample();
        ExpensePatch::edit(ExpenseFields {
            name: "Pane e latte".to_string(),
            category: "Alimentazione".to_string(),
            amount: 15.0,
            currency: Currency::Eur,
        })
        .apply(&mut expense);
        assert_eq!(expense.status, ExpenseStatus::Pending);
        assert_eq!(expense.amount, 15.0);
        assert_eq!(expense.id, ExpenseId::new("7"));
    }

    #[test]
    fn prefill_rounds_amount() {
        let draft = ExpenseDraft::from_expense(&sample());
        assert_eq!(draft.amount, "13");
        assert_eq!(draft.currency, Some(Currency::Eur));
    }

    #[test]
    fn income_draft_allows_zero_but_not_blank() {
        let draft = IncomeDraft {
            amount: "0".to_string(),
            currency: Some(Currency::Eur),
        };
        assert_eq!(draft.validate().unwrap().amount, 0.0);
        assert!(IncomeDraft::from_income(None).validate().is_err());
        assert_eq!(
            IncomeDraft::from_income(Some(&Income {
                amount: 1999.6,
                currency: Currency::Mxn
            }))
            .amount,
            "2000"
        );
    }
}
