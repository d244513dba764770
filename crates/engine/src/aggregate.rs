//! Grouping of expenses by (category, currency) and period totals.

use std::collections::HashMap;

use crate::{Currency, Expense, ExchangeRates, Income, money::format_amount};

/// Composite key of a category group.
///
/// Two expenses of the same category but different currencies land in
/// different groups so the original-currency subtotal stays meaningful.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub category: String,
    pub currency: Currency,
}

impl GroupKey {
    pub fn new(category: impl Into<String>, currency: Currency) -> Self {
        Self {
            category: category.into(),
            currency,
        }
    }

    /// Key of the group `expense` belongs to.
    #[must_use]
    pub fn of(expense: &Expense) -> Self {
        Self::new(expense.category.clone(), expense.currency)
    }
}

/// Rendered as `category_CODE`, e.g. `Affitto_MXN`.
impl core::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}_{}", self.category, self.currency.code())
    }
}

/// Accumulated values of one group.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupTotal {
    pub key: GroupKey,
    /// Sum in the reporting currency, full precision.
    pub normalized: f64,
    /// Sum of the unconverted amounts, in `key.currency`.
    pub original: f64,
    pub count: usize,
}

impl GroupTotal {
    /// Tooltip text: normalized total, plus the original subtotal when the
    /// group is not already in the reporting currency.
    #[must_use]
    pub fn describe(&self, reporting: Currency) -> String {
        let normalized = format_amount(self.normalized, reporting);
        if self.key.currency == reporting {
            format!("{}: {normalized}", self.key.category)
        } else {
            format!(
                "{}: {normalized} ({})",
                self.key.category,
                format_amount(self.original, self.key.currency)
            )
        }
    }
}

/// Result of [`aggregate`].
///
/// Groups keep the order in which their first expense appeared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aggregation {
    pub groups: Vec<GroupTotal>,
    pub grand_total: f64,
}

impl Aggregation {
    #[must_use]
    pub fn get(&self, key: &GroupKey) -> Option<&GroupTotal> {
        self.groups.iter().find(|group| &group.key == key)
    }

    /// Normalized total of a group, 0 when absent.
    #[must_use]
    pub fn total_of(&self, key: &GroupKey) -> f64 {
        self.get(key).map_or(0.0, |group| group.normalized)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.iter().map(|group| &group.key)
    }
}

/// Groups `records` by (category, currency) and sums normalized amounts.
///
/// Each record is visited once; its normalized value is added both to its
/// group and to the grand total, so the two always agree up to floating
/// point summation order.
#[must_use]
pub fn aggregate(records: &[Expense], rates: &ExchangeRates) -> Aggregation {
    let mut out = Aggregation::default();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for record in records {
        let normalized = rates.normalize(record.amount, record.currency);
        let key = GroupKey::of(record);
        let slot = match index.get(&key) {
            Some(slot) => *slot,
            None => {
                out.groups.push(GroupTotal {
                    key: key.clone(),
                    normalized: 0.0,
                    original: 0.0,
                    count: 0,
                });
                index.insert(key, out.groups.len() - 1);
                out.groups.len() - 1
            }
        };

        let group = &mut out.groups[slot];
        group.normalized += normalized;
        group.original += record.amount;
        group.count += 1;
        out.grand_total += normalized;
    }

    out
}

/// Income in the reporting currency; a missing income counts as 0.
#[must_use]
pub fn normalized_income(income: Option<&Income>, rates: &ExchangeRates) -> f64 {
    income.map_or(0.0, |income| rates.normalize(income.amount, income.currency))
}

/// Income left after `spent`. Negative means over budget.
#[must_use]
pub fn remaining(income: Option<&Income>, spent: f64, rates: &ExchangeRates) -> f64 {
    normalized_income(income, rates) - spent
}

/// Period figures in the reporting currency, unrounded.
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodTotals {
    pub reporting: Currency,
    pub income: f64,
    pub spent: f64,
    pub remaining: f64,
}

impl PeriodTotals {
    #[must_use]
    pub fn new(income: Option<&Income>, spent: f64, rates: &ExchangeRates) -> Self {
        let income = normalized_income(income, rates);
        Self {
            reporting: rates.reporting(),
            income,
            spent,
            remaining: income - spent,
        }
    }

    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.remaining < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExpenseId, ExpenseStatus};

    fn expense(id: &str, category: &str, amount: f64, currency: Currency) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            name: format!("expense {id}"),
            category: category.to_string(),
            amount,
            currency,
            status: ExpenseStatus::Pending,
        }
    }

    #[test]
    fn empty_input_has_no_groups() {
        let result = aggregate(&[], &ExchangeRates::default());
        assert!(result.is_empty());
        assert_eq!(result.grand_total, 0.0);
    }

    #[test]
    fn same_category_different_currency_is_not_merged() {
        let rates = ExchangeRates::new(Currency::Eur).with_factor(Currency::Mxn, 0.05);
        let records = [
            expense("1", "Affitto", 600.0, Currency::Eur),
            expense("2", "Affitto", 2000.0, Currency::Mxn),
            expense("3", "Affitto", 100.0, Currency::Eur),
        ];
        let result = aggregate(&records, &rates);

        assert_eq!(result.groups.len(), 2);
        let eur = result.get(&GroupKey::new("Affitto", Currency::Eur)).unwrap();
        assert_eq!(eur.normalized, 700.0);
        assert_eq!(eur.count, 2);
        let mxn = result.get(&GroupKey::new("Affitto", Currency::Mxn)).unwrap();
        assert!((mxn.normalized - 100.0).abs() < 1e-9);
        assert_eq!(mxn.original, 2000.0);
        assert!((result.grand_total - 800.0).abs() < 1e-9);
    }

    #[test]
    fn groups_follow_first_appearance() {
        let records = [
            expense("1", "Salute", 1.0, Currency::Eur),
            expense("2", "Altro", 1.0, Currency::Eur),
            expense("3", "Salute", 1.0, Currency::Eur),
        ];
        let result = aggregate(&records, &ExchangeRates::default());
        let labels: Vec<String> = result.keys().map(ToString::to_string).collect();
        assert_eq!(labels, ["Salute_EUR", "Altro_EUR"]);
    }

    #[test]
    fn remaining_uses_normalized_income_and_full_precision() {
        let rates = ExchangeRates::new(Currency::Eur).with_factor(Currency::Mxn, 0.05);
        let income = Income {
            amount: 10_010.0,
            currency: Currency::Mxn,
        };
        let totals = PeriodTotals::new(Some(&income), 500.2, &rates);
        assert!((totals.income - 500.5).abs() < 1e-9);
        assert!((totals.remaining - 0.3).abs() < 1e-9);
        assert!(!totals.is_over_budget());
        assert_eq!(remaining(None, 20.0, &rates), -20.0);
    }

    #[test]
    fn describe_mentions_original_currency_only_when_foreign() {
        let rates = ExchangeRates::new(Currency::Eur).with_factor(Currency::Mxn, 0.05);
        let records = [
            expense("1", "Trasporto", 30000.0, Currency::Mxn),
            expense("2", "Salute", 40.0, Currency::Eur),
        ];
        let result = aggregate(&records, &rates);
        assert_eq!(
            result.groups[0].describe(Currency::Eur),
            "Trasporto: 1500 € (30.000 MX$)"
        );
        assert_eq!(result.groups[1].describe(Currency::Eur), "Salute: 40 €");
    }
}
