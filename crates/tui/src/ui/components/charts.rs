use engine::{Currency, GroupTotal, HiddenGroups, format_amount};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::ui::theme::Theme;

const BAR_WIDTH: usize = 16;

/// Text bar such as `██████░░░░` filled in proportion to `value / total`.
#[must_use]
pub fn ascii_bar(value: f64, total: f64, width: usize) -> String {
    if total <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }
    let ratio = (value / total).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// One line per group: color swatch, key, share of the visible total and
/// the normalized amount. Hidden groups stay listed, dimmed and struck out,
/// so they can be toggled back.
pub fn share_lines(
    groups: &[GroupTotal],
    hidden: &HiddenGroups,
    visible_total: f64,
    reporting: Currency,
    selected: Option<usize>,
    theme: &Theme,
) -> Vec<Line<'static>> {
    groups
        .iter()
        .enumerate()
        .map(|(idx, group)| {
            let is_hidden = hidden.is_hidden(&group.key);
            let marker = if selected == Some(idx) { "▶ " } else { "  " };
            let swatch_style = if is_hidden {
                Style::default().fg(theme.dim)
            } else {
                Style::default().fg(theme.group_color(idx))
            };
            let (bar, share) = if is_hidden || group.normalized <= 0.0 {
                ("░".repeat(BAR_WIDTH), "   -".to_string())
            } else {
                let percent = group.normalized / visible_total * 100.0;
                (
                    ascii_bar(group.normalized, visible_total, BAR_WIDTH),
                    format!("{percent:>3.0}%"),
                )
            };
            let label_style = if is_hidden {
                Style::default()
                    .fg(theme.dim)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(theme.text)
            };

            Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.accent)),
                Span::styled("■ ", swatch_style),
                Span::styled(format!("{:<24}", group.key.to_string()), label_style),
                Span::styled(bar, swatch_style),
                Span::styled(format!(" {share}  "), Style::default().fg(theme.text_muted)),
                Span::styled(
                    format_amount(group.normalized, reporting),
                    Style::default().fg(theme.text),
                ),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::GroupKey;

    #[test]
    fn bar_fills_by_ratio() {
        assert_eq!(ascii_bar(50.0, 100.0, 10), "█████░░░░░");
        assert_eq!(ascii_bar(5.0, 0.0, 4), "░░░░");
        assert_eq!(ascii_bar(200.0, 100.0, 4), "████");
    }

    #[test]
    fn hidden_groups_have_no_share() {
        let groups = vec![
            GroupTotal {
                key: GroupKey::new("Affitto", Currency::Eur),
                normalized: 300.0,
                original: 300.0,
                count: 1,
            },
            GroupTotal {
                key: GroupKey::new("Svago", Currency::Usd),
                normalized: 100.0,
                original: 125.0,
                count: 2,
            },
        ];
        let hidden: HiddenGroups = [GroupKey::new("Svago", Currency::Usd)].into_iter().collect();
        let lines = share_lines(&groups, &hidden, 300.0, Currency::Eur, Some(1), &Theme::dark());

        let text = |line: &Line<'_>| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        };
        assert!(text(&lines[0]).contains("100%"));
        assert!(text(&lines[1]).starts_with("▶ "));
        assert!(text(&lines[1]).contains("   -"));
    }
}
