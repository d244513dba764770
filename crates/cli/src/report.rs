//! Plain-text and CSV renderings of engine results.

use std::{fmt::Write as _, io};

use engine::{
    Currency, ExchangeRates, Expense, HiddenGroups, Language, PeriodBook, RecurringExpense,
    apply_visibility, format_amount,
};
use serde::Serialize;

/// Monthly summary: income, one line per visible group, totals.
pub fn render_report(
    book: &PeriodBook,
    rates: &ExchangeRates,
    hidden: &HiddenGroups,
    language: Language,
) -> String {
    let summary = book.summarize(rates);
    let reporting = summary.totals.reporting;
    let visible = apply_visibility(&summary.aggregation, hidden);
    let remaining = visible.remaining(summary.totals.income);

    let mut out = String::new();
    let _ = writeln!(out, "{}", book.period().label(language));
    match book.income() {
        Some(income) if income.currency != reporting => {
            let _ = writeln!(
                out,
                "Income     {} ({})",
                format_amount(summary.totals.income, reporting),
                format_amount(income.amount, income.currency)
            );
        }
        Some(_) => {
            let _ = writeln!(
                out,
                "Income     {}",
                format_amount(summary.totals.income, reporting)
            );
        }
        None => out.push_str("Income     not set\n"),
    }

    if summary.aggregation.is_empty() {
        out.push_str("\nNo expenses.\n");
    } else {
        out.push('\n');
        for group in &visible.groups {
            let share = if visible.total > 0.0 && group.normalized > 0.0 {
                format!("{:>3.0}%", group.normalized / visible.total * 100.0)
            } else {
                "   -".to_string()
            };
            let _ = writeln!(
                out,
                "  {:<24} {share}  {:>3}x  {}",
                group.key.to_string(),
                group.count,
                group.describe(reporting)
            );
        }
        if !hidden.is_empty() {
            let hidden_count = summary.aggregation.groups.len() - visible.groups.len();
            let _ = writeln!(out, "  ({hidden_count} hidden)");
        }
    }

    let _ = writeln!(out, "\nSpent      {}", format_amount(visible.total, reporting));
    let _ = writeln!(out, "Remaining  {}", format_amount(remaining, reporting));
    if remaining < 0.0 {
        out.push_str("Over budget!\n");
    }
    out
}

pub fn render_expenses(rows: &[&Expense]) -> String {
    if rows.is_empty() {
        return "No expenses.\n".to_string();
    }
    let mut out = format!(
        "{:<8} {:<28} {:<20} {:>14} {}\n",
        "id", "name", "category", "amount", "status"
    );
    for expense in rows {
        let _ = writeln!(
            out,
            "{:<8} {:<28} {:<20} {:>14} {}",
            expense.id.as_str(),
            expense.name,
            expense.category,
            format_amount(expense.amount, expense.currency),
            expense.status.as_str()
        );
    }
    out
}

#[derive(Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    amount: f64,
    currency: &'a str,
    status: &'a str,
}

const CSV_HEADER: [&str; 6] = ["id", "name", "category", "amount", "currency", "status"];

/// Writes `rows` as CSV. The header line is written even when `rows` is empty.
pub fn write_csv<W: io::Write>(rows: &[&Expense], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(CSV_HEADER)?;
    for expense in rows {
        writer.serialize(ExportRow {
            id: expense.id.as_str(),
            name: &expense.name,
            category: &expense.category,
            amount: expense.amount,
            currency: expense.currency.code(),
            status: expense.status.as_str(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Conversion factors into the reporting currency. Unknown currencies
/// convert at 1.
pub fn render_rates(rates: &ExchangeRates) -> String {
    let reporting = rates.reporting();
    let mut out = format!("Reporting currency: {}\n", reporting.code());
    for currency in Currency::ALL {
        if currency == reporting {
            continue;
        }
        let note = if rates.knows(currency) { "" } else { "  (no quote)" };
        let _ = writeln!(
            out,
            "  1 {} = {:.4} {}{note}",
            currency.code(),
            rates.factor(currency),
            reporting.code()
        );
    }
    out
}

pub fn render_templates(rows: &[&RecurringExpense]) -> String {
    if rows.is_empty() {
        return "No recurring expenses.\n".to_string();
    }
    let mut out = format!(
        "{:<8} {:<28} {:>14} {:<20} {:<8} {}\n",
        "id", "title", "amount", "category", "currency", "day"
    );
    for template in rows {
        let paused = if template.active { "" } else { " (paused)" };
        let _ = writeln!(
            out,
            "{:<8} {:<28} {:>14} {:<20} {:<8} {}{paused}",
            template.id.as_str(),
            template.title,
            format_amount(template.amount, template.currency),
            template.category,
            template.currency.code(),
            template.due_day
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{ExpenseId, ExpenseStatus, GroupKey, Income, Period};

    fn expense(id: &str, name: &str, category: &str, amount: f64, currency: Currency) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            name: name.to_string(),
            category: category.to_string(),
            amount,
            currency,
            status: ExpenseStatus::Pending,
        }
    }

    fn book() -> PeriodBook {
        PeriodBook::new(
            Period::new(3, 2025).unwrap(),
            Some(Income {
                amount: 300.0,
                currency: Currency::Eur,
            }),
            vec![
                expense("1", "Affitto", "Casa", 250.0, Currency::Eur),
                expense("2", "Taxi", "Trasporto", 2000.0, Currency::Mxn),
            ],
        )
    }

    #[test]
    fn report_shows_groups_and_overspending() {
        let rates = ExchangeRates::new(Currency::Eur).with_factor(Currency::Mxn, 0.05);
        let text = render_report(&book(), &rates, &HiddenGroups::new(), Language::It);

        assert!(text.starts_with("Marzo 2025\n"));
        assert!(text.contains("Casa_EUR"));
        assert!(text.contains("Trasporto: 100 € (2000 MX$)"));
        assert!(text.contains("Spent      350 €"));
        assert!(text.contains("Remaining  -50 €"));
        assert!(text.contains("Over budget!"));
    }

    #[test]
    fn hidden_groups_leave_the_totals() {
        let rates = ExchangeRates::new(Currency::Eur).with_factor(Currency::Mxn, 0.05);
        let hidden: HiddenGroups = [GroupKey::new("Trasporto", Currency::Mxn)]
            .into_iter()
            .collect();
        let text = render_report(&book(), &rates, &hidden, Language::En);

        assert!(!text.contains("Trasporto_MXN"));
        assert!(text.contains("(1 hidden)"));
        assert!(text.contains("Remaining  50 €"));
        assert!(!text.contains("Over budget"));
    }

    #[test]
    fn csv_has_header_and_rows() {
        let book = book();
        let rows: Vec<&Expense> = book.expenses().iter().collect();
        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,name,category,amount,currency,status"));
        assert_eq!(lines.next(), Some("1,Affitto,Casa,250.0,EUR,pending"));
        assert_eq!(lines.next(), Some("2,Taxi,Trasporto,2000.0,MXN,pending"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_csv_still_has_header() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "id,name,category,amount,currency,status\n"
        );
    }

    #[test]
    fn rates_list_missing_quotes() {
        let rates = ExchangeRates::new(Currency::Usd).with_factor(Currency::Eur, 1.1);
        let text = render_rates(&rates);
        assert!(text.contains("1 EUR = 1.1000 USD\n"));
        assert!(text.contains("1 MXN = 1.0000 USD  (no quote)"));
    }
}
