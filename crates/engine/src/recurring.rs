//! Recurring expense templates.
//!
//! The backend copies active templates into each new period; the engine
//! only validates forms and builds the list view.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{
    Currency, EngineError, ExpenseId, collate,
    money::parse_whole_amount,
    view::SortConfig,
};

/// Day of the month templates are due on when the form does not say.
pub const DEFAULT_DUE_DAY: u8 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecurringExpense {
    pub id: ExpenseId,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub currency: Currency,
    pub due_day: u8,
    pub active: bool,
}

/// Validated template fields.
#[derive(Clone, Debug, PartialEq)]
pub struct RecurringFields {
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub currency: Currency,
    pub due_day: u8,
    pub active: bool,
}

/// Raw template form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecurringDraft {
    pub title: String,
    pub amount: String,
    pub category: String,
    pub currency: Option<Currency>,
}

impl RecurringDraft {
    #[must_use]
    pub fn from_template(template: &RecurringExpense) -> Self {
        Self {
            title: template.title.clone(),
            amount: crate::money::round_half_up(template.amount).max(0).to_string(),
            category: template.category.clone(),
            currency: Some(template.currency),
        }
    }

    /// Checks every field and reports all problems at once.
    pub fn validate(&self) -> Result<RecurringFields, EngineError> {
        let mut issues = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            issues.push("title is required".to_string());
        }
        let amount = match parse_whole_amount(&self.amount) {
            Ok(amount) if amount > 0.0 => Some(amount),
            _ => {
                issues.push("amount must be greater than 0".to_string());
                None
            }
        };
        let category = self.category.trim();
        if category.is_empty() {
            issues.push("category is required".to_string());
        }
        if self.currency.is_none() {
            issues.push("currency is required".to_string());
        }

        match (amount, self.currency) {
            (Some(amount), Some(currency)) if issues.is_empty() => Ok(RecurringFields {
                title: title.to_string(),
                amount,
                category: category.to_string(),
                currency,
                due_day: DEFAULT_DUE_DAY,
                active: true,
            }),
            _ => Err(EngineError::Invalid(issues)),
        }
    }
}

/// Sortable template columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecurringSortKey {
    Title,
    Amount,
    Category,
    Currency,
}

impl RecurringSortKey {
    #[must_use]
    pub fn compare(self, a: &RecurringExpense, b: &RecurringExpense) -> Ordering {
        match self {
            Self::Title => collate::compare(&a.title, &b.title),
            Self::Amount => a.amount.total_cmp(&b.amount),
            Self::Category => collate::compare(&a.category, &b.category),
            Self::Currency => a.currency.code().cmp(b.currency.code()),
        }
    }
}

/// Templates whose title or category contains `needle` (case-insensitive),
/// sorted by `sort`.
#[must_use]
pub fn project_templates<'a>(
    templates: &'a [RecurringExpense],
    needle: &str,
    sort: &SortConfig<RecurringSortKey>,
) -> Vec<&'a RecurringExpense> {
    let needle = needle.trim().to_lowercase();
    let mut rows: Vec<&RecurringExpense> = templates
        .iter()
        .filter(|t| {
            needle.is_empty()
                || t.title.to_lowercase().contains(&needle)
                || t.category.to_lowercase().contains(&needle)
        })
        .collect();
    if let Some(key) = sort.key {
        rows.sort_by(|a, b| sort.direction.apply(key.compare(a, b)));
    }
    rows
}
