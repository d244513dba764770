pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, RecurringMode, Section, Session, TrackerMode};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = state.context.theme();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    let [info, tabs, content, bottom] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_info_bar(frame, info, state, &theme);
    components::tabs::render_tabs(frame, tabs, state.section, &theme);

    match state.section {
        Section::Expenses => screens::expenses::render(frame, content, state, &theme),
        Section::Recurring => screens::recurring::render(frame, content, state, &theme),
    }

    render_bottom_bar(frame, bottom, state, &theme);
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let period = state.tracker.period.label(state.context.language());
    let (session, session_style) = match state.context.session() {
        Session::Authenticated => ("RW", Style::default().fg(theme.positive)),
        Session::ReadOnly => ("READ-ONLY", Style::default().fg(theme.warning)),
    };

    let mut spans = vec![
        Span::styled("Month", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {period}  ")),
        Span::styled("Currency", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.reporting.code())),
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled(session, session_style),
    ];
    if state.tracker.loading || state.recurring.loading {
        spans.push(Span::styled("  loading…", Style::default().fg(theme.dim)));
    }
    if state.rates_error.is_some() {
        spans.push(Span::styled("  rates offline", Style::default().fg(theme.error)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().fg(theme.text)),
        area,
    );
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let hints = context_hints(state);
    let mut parts = Vec::with_capacity(hints.len() * 2 + 4);
    for (idx, (key, label)) in hints.iter().enumerate() {
        if idx > 0 {
            parts.push(Span::raw("  "));
        }
        parts.push(Span::styled(*key, Style::default().fg(theme.accent)));
        parts.push(Span::styled(
            format!(" {label}"),
            Style::default().fg(theme.text_muted),
        ));
    }
    if !state.is_editing() {
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        parts.push(Span::styled("1/2", Style::default().fg(theme.accent)));
        parts.push(Span::styled(" tabs  ", Style::default().fg(theme.text_muted)));
        parts.push(Span::styled("q", Style::default().fg(theme.accent)));
        parts.push(Span::styled(" quit", Style::default().fg(theme.text_muted)));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Key hints for the current section and mode.
fn context_hints(state: &AppState) -> Vec<(&'static str, &'static str)> {
    match state.section {
        Section::Expenses => match &state.tracker.mode {
            TrackerMode::List => vec![
                ("[/]", "month"),
                ("a", "add"),
                ("e", "edit"),
                ("t", "paid"),
                ("d", "delete"),
                ("i", "income"),
                ("f", "filter"),
                ("N/C/A/S", "sort"),
                ("Tab", "groups"),
                ("h", "show all"),
                ("l", "lang"),
                ("m", "theme"),
            ],
            TrackerMode::Confirm(_) => vec![("y", "confirm"), ("n", "cancel")],
            TrackerMode::Expense(_) | TrackerMode::Income(_) => {
                vec![("Tab", "next"), ("←/→", "choose"), ("Enter", "save"), ("Esc", "cancel")]
            }
        },
        Section::Recurring => match &state.recurring.mode {
            RecurringMode::List => vec![
                ("/", "search"),
                ("x", "clear"),
                ("a", "add"),
                ("e", "edit"),
                ("d", "delete"),
                ("T/A/C/K", "sort"),
                ("r", "reload"),
            ],
            RecurringMode::Search => vec![("Enter", "done"), ("Esc", "clear")],
            RecurringMode::ConfirmDelete { .. } => vec![("y", "confirm"), ("n", "cancel")],
            RecurringMode::Form(_) => {
                vec![("Tab", "next"), ("←/→", "choose"), ("Enter", "save"), ("Esc", "cancel")]
            }
        },
    }
}
