//! Completer popup drawn under the query line.

use crate::editor::completer::{proposal_parts, Completer, PartStyle};
use crate::editor::mode::CompleterMode;
use crate::theme::colors::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const POPUP_WIDTH: u16 = 48;
const MAX_ROWS: usize = 8;

/// Builds the popup lines for the completer's current page.
pub fn popup_lines<'a>(completer: &'a Completer, colors: &ThemeColors) -> Vec<Line<'a>> {
    let selected = completer.selected_index();
    let row_style = |index: usize| {
        if index == selected {
            Style::default()
                .bg(colors.popup_selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };

    match completer.mode() {
        CompleterMode::Proposals => completer
            .proposals()
            .iter()
            .enumerate()
            .map(|(index, proposal)| {
                let base = row_style(index);
                let mut spans = Vec::new();
                for (i, (text, style)) in proposal_parts(proposal).into_iter().enumerate() {
                    if i > 0 {
                        spans.push(Span::styled(" ", base));
                    }
                    let part = match style {
                        PartStyle::Matched => base.fg(colors.matched),
                        PartStyle::Pending => base.fg(colors.foreground),
                        PartStyle::Placeholder => {
                            base.fg(colors.placeholder).add_modifier(Modifier::ITALIC)
                        }
                    };
                    spans.push(Span::styled(text, part));
                }
                if !proposal.description.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", proposal.description),
                        base.fg(colors.placeholder),
                    ));
                }
                Line::from(spans)
            })
            .collect(),
        CompleterMode::Strings => completer
            .strings()
            .iter()
            .enumerate()
            .map(|(index, value)| {
                Line::from(Span::styled(
                    value.as_str(),
                    row_style(index).fg(colors.foreground),
                ))
            })
            .collect(),
        CompleterMode::DateTime => vec![
            Line::from(Span::styled(
                completer.formatted_date(),
                Style::default()
                    .fg(colors.matched)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "←/→: day  ↑/↓: week  Enter: insert",
                Style::default()
                    .fg(colors.info)
                    .add_modifier(Modifier::ITALIC),
            )),
        ],
    }
}

/// Area of the popup for `rows` lines, anchored under the caret column.
pub fn popup_area(anchor: Rect, caret_column: u16, rows: usize, frame: Rect) -> Rect {
    let height = (rows.min(MAX_ROWS) as u16 + 2).min(frame.height.saturating_sub(anchor.y + 1));
    let width = POPUP_WIDTH.min(frame.width);
    let x = (anchor.x + caret_column).min(frame.width.saturating_sub(width));
    Rect::new(x, anchor.y + 1, width, height)
}

/// Renders the completer popup below `anchor`, if it is visible.
pub fn render_completer_popup(
    f: &mut Frame,
    anchor: Rect,
    caret_column: u16,
    completer: &Completer,
    colors: &ThemeColors,
) {
    if !completer.is_visible() {
        return;
    }

    let mut lines = popup_lines(completer, colors);
    // Keep the selection in view
    let skip = (completer.selected_index() + 1).saturating_sub(MAX_ROWS);
    if completer.mode() != CompleterMode::DateTime {
        lines = lines.into_iter().skip(skip).collect();
    }

    let area = popup_area(anchor, caret_column, lines.len(), f.area());
    if area.height < 3 {
        return;
    }

    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", completer.mode()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.popup_border))
        .style(Style::default().bg(colors.popup_bg));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
