use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use crate::ui::{components::card::Card, theme::Theme};

/// A form row: label, value and whether the cursor sits on it.
pub struct FormRow {
    pub label: &'static str,
    pub value: String,
    pub active: bool,
    /// Cycled with Left/Right instead of typed.
    pub choice: bool,
}

/// Rect of `width` x `height` centered in `area`, clamped to it.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

pub fn render_form(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    rows: &[FormRow],
    issues: &[String],
    theme: &Theme,
) {
    let mut lines: Vec<Line<'_>> = rows
        .iter()
        .map(|row| {
            let label_style = if row.active {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_muted)
            };
            let value = match (row.choice, row.active) {
                (true, true) => format!("◀ {} ▶", row.value),
                (false, true) => format!("{}▏", row.value),
                _ => row.value.clone(),
            };
            Line::from(vec![
                Span::styled(format!("{:<10}", row.label), label_style),
                Span::styled(value, Style::default().fg(theme.text)),
            ])
        })
        .collect();

    if !issues.is_empty() {
        lines.push(Line::raw(""));
        let error = Style::default().fg(theme.error);
        lines.extend(
            issues
                .iter()
                .map(|issue| Line::styled(format!("• {issue}"), error)),
        );
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Tab next · ←/→ choose · Enter save · Esc cancel",
        Style::default().fg(theme.dim),
    ));

    let height = lines.len() as u16 + 2;
    let rect = centered(area, 56, height);
    frame.render_widget(Clear, rect);
    Card::new(title, theme)
        .focused(true)
        .render_with(frame, rect, Paragraph::new(lines).wrap(Wrap { trim: false }));
}

pub fn render_confirm(frame: &mut Frame<'_>, area: Rect, prompt: &str, theme: &Theme) {
    let lines = vec![
        Line::styled(prompt.to_string(), Style::default().fg(theme.text)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.accent)),
            Span::raw(" confirm  "),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(" cancel"),
        ]),
    ];
    let width = (prompt.chars().count() as u16 + 4).max(30);
    let rect = centered(area, width, 5);
    frame.render_widget(Clear, rect);
    Card::new("Confirm", theme)
        .focused(true)
        .render_with(frame, rect, Paragraph::new(lines).wrap(Wrap { trim: true }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_fits_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered(area, 50, 10);
        assert_eq!(rect, Rect::new(25, 15, 50, 10));

        let small = Rect::new(0, 0, 20, 5);
        let rect = centered(small, 50, 10);
        assert_eq!((rect.width, rect.height), (20, 5));
    }
}
