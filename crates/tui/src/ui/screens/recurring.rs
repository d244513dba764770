use engine::{RecurringSortKey, format_amount};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::{AppState, RecurringField, RecurringMode},
    ui::{
        components::{
            card::Card,
            popup::{self, FormRow},
        },
        screens::{expenses::currency_label, header_label},
        theme::Theme,
    },
};

const COLUMNS: [(RecurringSortKey, &str); 4] = [
    (RecurringSortKey::Title, "title"),
    (RecurringSortKey::Amount, "amount"),
    (RecurringSortKey::Category, "category"),
    (RecurringSortKey::Currency, "currency"),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let [search, table] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
    render_search(frame, search, state, theme);
    render_table(frame, table, state, theme);
    render_overlay(frame, area, state, theme);
}

fn render_search(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let recurring = &state.recurring;
    let searching = recurring.mode == RecurringMode::Search;
    let line = if recurring.needle.is_empty() && !searching {
        Line::styled("Press / to search by title or category", Style::default().fg(theme.dim))
    } else {
        let cursor = if searching { "▏" } else { "" };
        Line::from(vec![
            Span::styled("/ ", Style::default().fg(theme.accent)),
            Span::styled(
                format!("{}{cursor}", recurring.needle),
                Style::default().fg(theme.text),
            ),
        ])
    };
    Card::new("Search", theme)
        .focused(searching)
        .render_with(frame, area, Paragraph::new(line));
}

fn render_table(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let recurring = &state.recurring;
    let card = Card::new("Recurring expenses", theme).focused(!recurring.is_editing());

    if !recurring.loaded {
        let message = match (&recurring.error, recurring.loading) {
            (Some(err), _) => format!("Could not load templates: {err}"),
            (None, true) => "Loading…".to_string(),
            (None, false) => "Press r to load templates.".to_string(),
        };
        card.render_with(
            frame,
            area,
            Paragraph::new(Line::styled(message, Style::default().fg(theme.text_muted))),
        );
        return;
    }

    let rows: Vec<Row<'_>> = recurring
        .rows()
        .into_iter()
        .map(|template| {
            let style = if template.active {
                Style::default().fg(theme.text)
            } else {
                Style::default().fg(theme.dim)
            };
            Row::new(vec![
                Cell::from(template.title.clone()),
                Cell::from(format_amount(template.amount, template.currency)),
                Cell::from(template.category.clone()),
                Cell::from(template.currency.code()),
            ])
            .style(style)
        })
        .collect();

    if rows.is_empty() {
        let message = if recurring.needle.is_empty() {
            "No recurring expenses yet. Press a to add one."
        } else {
            "Nothing matches the search."
        };
        card.render_with(
            frame,
            area,
            Paragraph::new(Line::styled(message, Style::default().fg(theme.text_muted))),
        );
        return;
    }

    let header = Row::new(
        COLUMNS
            .iter()
            .map(|(key, label)| Cell::from(header_label(label, recurring.sort.direction_of(*key))))
            .collect::<Vec<_>>(),
    )
    .style(
        Style::default()
            .fg(theme.text_muted)
            .add_modifier(Modifier::BOLD),
    );

    let mut table_state = TableState::default();
    table_state.select(Some(recurring.selected));

    let table = Table::new(
        rows,
        [
            Constraint::Fill(3),
            Constraint::Length(14),
            Constraint::Fill(2),
            Constraint::Length(9),
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
    match &state.recurring.mode {
        RecurringMode::List | RecurringMode::Search => {}
        RecurringMode::Form(form) => {
            let rows: Vec<FormRow> = RecurringField::ALL
                .iter()
                .map(|field| FormRow {
                    label: field.label(),
                    value: match field {
                        RecurringField::Title => form.draft.title.clone(),
                        RecurringField::Amount => form.draft.amount.clone(),
                        RecurringField::Category => form.draft.category.clone(),
                        RecurringField::Currency => currency_label(form.draft.currency),
                    },
                    active: *field == form.field,
                    choice: matches!(field, RecurringField::Category | RecurringField::Currency),
                })
                .collect();
            let title = if form.editing.is_some() {
                "Edit recurring expense"
            } else {
                "New recurring expense"
            };
            popup::render_form(frame, area, title, &rows, &form.issues, theme);
        }
        RecurringMode::ConfirmDelete { title, .. } => popup::render_confirm(
            frame,
            area,
            &format!("Delete recurring expense \"{title}\"?"),
            theme,
        ),
    }
}
