use engine::{Currency, ExpenseStatus, SortKey, apply_visibility, format_amount};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::{AppState, ExpenseField, Focus, IncomeField, TrackerMode},
    ui::{
        components::{
            card::{Card, StatCard},
            charts, money,
            popup::{self, FormRow},
        },
        screens::header_label,
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let tracker = &state.tracker;

    if tracker.current_book().is_none() {
        let message = match (&tracker.error, tracker.loading) {
            (Some(err), _) => format!("Could not load {}: {err}", tracker.period),
            (None, true) => format!("Loading {}…", tracker.period),
            (None, false) => "Press r to load this month.".to_string(),
        };
        Card::new("Expenses", theme).render_with(
            frame,
            area,
            Paragraph::new(Line::styled(message, Style::default().fg(theme.text_muted))),
        );
        return;
    }

    let [cards, body] = Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);
    let [groups, table] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);

    render_summary(frame, cards, state, theme);
    render_groups(frame, groups, state, theme);
    render_table(frame, table, state, theme);
    render_overlay(frame, area, state, theme);
}

fn render_summary(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let tracker = &state.tracker;
    let Some(summary) = tracker.summary() else {
        return;
    };
    let reporting = summary.totals.reporting;
    let visible = apply_visibility(&summary.aggregation, &tracker.hidden);
    let remaining = visible.remaining(summary.totals.income);

    let [income, spent, left] = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(area);

    let income_card = StatCard::new(
        "Income",
        money::amount(summary.totals.income, reporting, theme),
        theme,
    );
    match tracker.current_book().and_then(|book| book.income()) {
        Some(raw) if raw.currency != reporting => income_card
            .subtitle(format_amount(raw.amount, raw.currency))
            .render(frame, income),
        Some(_) => income_card.render(frame, income),
        None => income_card.subtitle("not set").render(frame, income),
    }

    let mut spent_card = StatCard::new(
        "Spent",
        money::amount(visible.total, reporting, theme),
        theme,
    );
    if tracker.hidden.is_empty() {
        if let Some(ratio) = money::spent_ratio(&summary.totals) {
            spent_card = spent_card.subtitle(ratio);
        }
    } else {
        spent_card = spent_card.subtitle(format!(
            "{} hidden · {} overall",
            tracker.hidden.len(),
            format_amount(summary.aggregation.grand_total, reporting)
        ));
    }
    spent_card.render(frame, spent);

    let mut left_card = StatCard::new(
        "Remaining",
        money::remaining(remaining, reporting, theme),
        theme,
    );
    if remaining < 0.0 {
        left_card = left_card.subtitle("over budget");
    }
    left_card.render(frame, left);
}

fn render_groups(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let tracker = &state.tracker;
    let Some(summary) = tracker.summary() else {
        return;
    };
    let focused = tracker.focus == Focus::Groups;
    let visible = apply_visibility(&summary.aggregation, &tracker.hidden);
    let reporting = summary.totals.reporting;

    let mut lines = if summary.aggregation.is_empty() {
        vec![Line::styled(
            "No expenses this month.",
            Style::default().fg(theme.text_muted),
        )]
    } else {
        charts::share_lines(
            &summary.aggregation.groups,
            &tracker.hidden,
            visible.total,
            reporting,
            focused.then_some(tracker.group_selected),
            theme,
        )
    };

    if focused && let Some(group) = summary.aggregation.groups.get(tracker.group_selected) {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            group.describe(reporting),
            Style::default().fg(theme.text_muted),
        ));
    }

    let title = format!("Groups · {} charted", visible.slices().count());
    Card::new(&title, theme)
        .focused(focused)
        .render_with(frame, area, Paragraph::new(lines));
}

fn render_table(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let tracker = &state.tracker;
    let rows: Vec<Row<'_>> = tracker
        .rows()
        .into_iter()
        .map(|expense| {
            let status_style = match expense.status {
                ExpenseStatus::Paid => Style::default().fg(theme.positive),
                ExpenseStatus::Pending => Style::default().fg(theme.warning),
            };
            Row::new(vec![
                Cell::from(expense.name.clone()),
                Cell::from(expense.category.clone()),
                Cell::from(format_amount(expense.amount, expense.currency)),
                Cell::from(Span::styled(expense.status.as_str(), status_style)),
            ])
        })
        .collect();

    let header = Row::new(
        SortKey::ALL
            .iter()
            .map(|key| Cell::from(header_label(key.label(), tracker.sort.direction_of(*key))))
            .collect::<Vec<_>>(),
    )
    .style(
        Style::default()
            .fg(theme.text_muted)
            .add_modifier(Modifier::BOLD),
    );

    let focused = tracker.focus == Focus::Table;
    let title = format!("Expenses · {}", tracker.filter.label());
    let card = Card::new(&title, theme).focused(focused);

    let mut table_state = TableState::default();
    if !rows.is_empty() {
        table_state.select(Some(tracker.selected));
    }

    let table = Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(14),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(card.block())
    .row_highlight_style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("» ");

    frame.render_stateful_widget(table, area, &mut table_state);
}

fn render_overlay(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    match &state.tracker.mode {
        TrackerMode::List => {}
        TrackerMode::Expense(form) => {
            let rows: Vec<FormRow> = ExpenseField::ALL
                .iter()
                .map(|field| FormRow {
                    label: field.label(),
                    value: match field {
                        ExpenseField::Name => form.draft.name.clone(),
                        ExpenseField::Category => form.draft.category.clone(),
                        ExpenseField::Amount => form.draft.amount.clone(),
                        ExpenseField::Currency => currency_label(form.draft.currency),
                    },
                    active: *field == form.field,
                    choice: matches!(field, ExpenseField::Category | ExpenseField::Currency),
                })
                .collect();
            let title = if form.editing.is_some() {
                "Edit expense"
            } else {
                "New expense"
            };
            let issues: Vec<String> = form.error.iter().cloned().collect();
            popup::render_form(frame, area, title, &rows, &issues, theme);
        }
        TrackerMode::Income(form) => {
            let rows = [
                FormRow {
                    label: "Amount",
                    value: form.draft.amount.clone(),
                    active: form.field == IncomeField::Amount,
                    choice: false,
                },
                FormRow {
                    label: "Currency",
                    value: currency_label(form.draft.currency),
                    active: form.field == IncomeField::Currency,
                    choice: true,
                },
            ];
            let issues: Vec<String> = form.error.iter().cloned().collect();
            popup::render_form(frame, area, "Monthly income", &rows, &issues, theme);
        }
        TrackerMode::Confirm(confirm) => {
            popup::render_confirm(frame, area, &confirm.prompt(), theme);
        }
    }
}

pub(crate) fn currency_label(currency: Option<Currency>) -> String {
    currency.map_or_else(|| "-".to_string(), |c| c.code().to_string())
}
