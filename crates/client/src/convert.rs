//! Mapping between wire shapes and engine types.

use api_types::{
    finance::{
        self, ExpenseNew, ExpenseUpdate, ExpenseView, IncomeUpdate, IncomeView, PeriodFinance,
    },
    recurring::{RecurringExpenseUpsert, RecurringExpenseView},
};
use engine::{
    Currency, Expense, ExpenseFields, ExpenseId, ExpensePatch, ExpenseStatus, Income, Period,
    PeriodBook, RecurringExpense, RecurringFields,
};

pub(crate) fn currency_from_wire(currency: api_types::Currency) -> Currency {
    match currency {
        api_types::Currency::Eur => Currency::Eur,
        api_types::Currency::Usd => Currency::Usd,
        api_types::Currency::Mxn => Currency::Mxn,
    }
}

pub(crate) fn currency_to_wire(currency: Currency) -> api_types::Currency {
    match currency {
        Currency::Eur => api_types::Currency::Eur,
        Currency::Usd => api_types::Currency::Usd,
        Currency::Mxn => api_types::Currency::Mxn,
    }
}

fn status_from_wire(status: finance::ExpenseStatus) -> ExpenseStatus {
    match status {
        finance::ExpenseStatus::Pending => ExpenseStatus::Pending,
        finance::ExpenseStatus::Paid => ExpenseStatus::Paid,
    }
}

fn status_to_wire(status: ExpenseStatus) -> finance::ExpenseStatus {
    match status {
        ExpenseStatus::Pending => finance::ExpenseStatus::Pending,
        ExpenseStatus::Paid => finance::ExpenseStatus::Paid,
    }
}

pub(crate) fn expense_from_wire(view: ExpenseView) -> Expense {
    Expense {
        id: ExpenseId::new(view.id),
        name: view.name,
        category: view.category,
        amount: view.amount,
        currency: currency_from_wire(view.currency),
        status: status_from_wire(view.status),
    }
}

fn income_from_wire(view: IncomeView) -> Income {
    Income {
        amount: view.amount,
        currency: currency_from_wire(view.currency),
    }
}

pub(crate) fn book_from_wire(period: Period, body: PeriodFinance) -> PeriodBook {
    PeriodBook::new(
        period,
        body.income.map(income_from_wire),
        body.expenses.into_iter().map(expense_from_wire).collect(),
    )
}

pub(crate) fn expense_new(fields: &ExpenseFields) -> ExpenseNew {
    ExpenseNew {
        name: fields.name.clone(),
        category: fields.category.clone(),
        amount: fields.amount,
        currency: currency_to_wire(fields.currency),
        status: finance::ExpenseStatus::Pending,
    }
}

pub(crate) fn expense_update(patch: &ExpensePatch) -> ExpenseUpdate {
    ExpenseUpdate {
        name: patch.name.clone(),
        category: patch.category.clone(),
        amount: patch.amount,
        currency: patch.currency.map(currency_to_wire),
        status: patch.status.map(status_to_wire),
    }
}

pub(crate) fn income_update(income: &Income) -> IncomeUpdate {
    IncomeUpdate {
        amount: income.amount,
        currency: currency_to_wire(income.currency),
    }
}

pub(crate) fn recurring_from_wire(view: RecurringExpenseView) -> RecurringExpense {
    RecurringExpense {
        id: ExpenseId::new(view.id),
        title: view.title,
        amount: view.amount,
        category: view.category,
        currency: currency_from_wire(view.currency),
        due_day: view.due_day,
        active: view.active,
    }
}

pub(crate) fn recurring_upsert(fields: &RecurringFields) -> RecurringExpenseUpsert {
    RecurringExpenseUpsert {
        title: fields.title.clone(),
        amount: fields.amount,
        category: fields.category.clone(),
        currency: currency_to_wire(fields.currency),
        due_day: fields.due_day,
        active: fields.active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currencies_map_both_ways() {
        for currency in Currency::ALL {
            assert_eq!(currency_from_wire(currency_to_wire(currency)), currency);
        }
    }

    #[test]
    fn book_keeps_wire_order_and_income() {
        let body = PeriodFinance {
            income: Some(IncomeView {
                amount: 900.0,
                currency: api_types::Currency::Usd,
            }),
            expenses: vec![
                ExpenseView {
                    id: "b".to_string(),
                    name: "Bus".to_string(),
                    category: "Trasporto".to_string(),
                    amount: 2.0,
                    currency: api_types::Currency::Eur,
                    status: finance::ExpenseStatus::Paid,
                },
                ExpenseView {
                    id: "a".to_string(),
                    name: "Pane".to_string(),
                    category: "Alimentazione".to_string(),
                    amount: 3.0,
                    currency: api_types::Currency::Mxn,
                    status: finance::ExpenseStatus::Pending,
                },
            ],
        };
        let period = Period::new(2, 2025).unwrap();
        let book = book_from_wire(period, body);

        assert_eq!(book.period(), period);
        assert_eq!(book.income().unwrap().currency, Currency::Usd);
        let ids: Vec<&str> = book.expenses().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(book.expenses()[0].status, ExpenseStatus::Paid);
    }

    #[test]
    fn toggle_update_carries_only_status() {
        let update = expense_update(&ExpensePatch::status(ExpenseStatus::Paid));
        assert_eq!(update.status, Some(finance::ExpenseStatus::Paid));
        assert!(update.name.is_none() && update.amount.is_none());
    }
}
