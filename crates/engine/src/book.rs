//! In-memory snapshot of one period, patched locally after confirmed writes.

use crate::{
    Aggregation, ExchangeRates, Expense, ExpenseId, ExpensePatch, Income, PeriodTotals, Period,
    aggregate::aggregate,
};

/// Income and expenses of a single period as last confirmed by the backend.
///
/// The book is replaced wholesale after a period read and patched with the
/// known delta after each successful write, which spares a re-read per
/// mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodBook {
    period: Period,
    income: Option<Income>,
    expenses: Vec<Expense>,
}

/// Aggregation plus the period figures derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub aggregation: Aggregation,
    pub totals: PeriodTotals,
}

impl PeriodBook {
    #[must_use]
    pub fn new(period: Period, income: Option<Income>, expenses: Vec<Expense>) -> Self {
        Self {
            period,
            income,
            expenses,
        }
    }

    /// A period without data.
    #[must_use]
    pub fn empty(period: Period) -> Self {
        Self::new(period, None, Vec::new())
    }

    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    #[must_use]
    pub fn income(&self) -> Option<&Income> {
        self.income.as_ref()
    }

    #[must_use]
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    #[must_use]
    pub fn find(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| &e.id == id)
    }

    /// Appends a newly created expense. An expense with the same id is
    /// replaced instead, so a replayed create never duplicates rows.
    pub fn insert(&mut self, expense: Expense) {
        match self.expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => *existing = expense,
            None => self.expenses.push(expense),
        }
    }

    /// Applies `patch` to the expense `id`. Returns `false` if it is unknown.
    pub fn patch(&mut self, id: &ExpenseId, patch: &ExpensePatch) -> bool {
        match self.expenses.iter_mut().find(|e| &e.id == id) {
            Some(expense) => {
                patch.apply(expense);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &ExpenseId) -> Option<Expense> {
        let idx = self.expenses.iter().position(|e| &e.id == id)?;
        Some(self.expenses.remove(idx))
    }

    pub fn set_income(&mut self, income: Income) {
        self.income = Some(income);
    }

    pub fn clear_income(&mut self) {
        self.income = None;
    }

    /// Aggregates every expense of the period against its income.
    #[must_use]
    pub fn summarize(&self, rates: &ExchangeRates) -> Summary {
        let aggregation = aggregate(&self.expenses, rates);
        let totals = PeriodTotals::new(self.income.as_ref(), aggregation.grand_total, rates);
        Summary {
            aggregation,
            totals,
        }
    }
}
