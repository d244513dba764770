use engine::{Currency, PeriodTotals, format_amount};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Rounded amount in its currency, in the plain text color.
#[must_use]
pub fn amount(value: f64, currency: Currency, theme: &Theme) -> Span<'static> {
    Span::styled(format_amount(value, currency), Style::default().fg(theme.text))
}

/// Remaining income, red and bold once spending exceeds it.
#[must_use]
pub fn remaining(value: f64, currency: Currency, theme: &Theme) -> Span<'static> {
    let text = format_amount(value, currency);
    if value < 0.0 {
        Span::styled(
            text,
            Style::default()
                .fg(theme.negative)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(text, Style::default().fg(theme.positive))
    }
}

/// Share of income already spent, e.g. `62% of income`.
#[must_use]
pub fn spent_ratio(totals: &PeriodTotals) -> Option<String> {
    if totals.income <= 0.0 {
        return None;
    }
    let percent = (totals.spent / totals.income * 100.0).round();
    Some(format!("{percent:.0}% of income"))
}
