//! Status line widget for displaying query builder state information.
//!
//! The status line shows:
//! - Completer page (PROPOSALS, STRINGS, DATE) while the popup is open
//! - Number of blocks and whether auto-completion is on
//! - Caret position (column/length)
//!
//! Example status line: `PROPOSALS | 2 blocks | auto                    9/25`

use crate::editor::state::QueryBuilder;
use crate::query::QueryParser;
use crate::theme::colors::ThemeColors;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Left-hand text of the status line.
pub fn status_text<P: QueryParser>(builder: &QueryBuilder<P>) -> String {
    let completer = builder.completer();
    let page = if completer.is_visible() {
        completer.mode().to_string()
    } else {
        "QUERY".to_string()
    };

    let count = builder.tree().blocks().len();
    let blocks = match count {
        1 => "1 block".to_string(),
        n => format!("{} blocks", n),
    };

    let auto = if builder.auto_complete() { " | auto" } else { "" };
    let errors = match builder.errors().len() {
        0 => String::new(),
        n => format!(" | {} error(s)", n),
    };

    format!("{} | {}{}{}", page, blocks, auto, errors)
}

/// Renders the status line.
pub fn render_status_line<P: QueryParser>(
    f: &mut Frame,
    area: Rect,
    builder: &QueryBuilder<P>,
    colors: &ThemeColors,
) {
    let left = status_text(builder);
    let position = format!("{}/{}", builder.cursor_position(), builder.tree().len());

    // Calculate padding to position right-aligned text
    let total_width = area.width as usize;
    let left_len = left.chars().count();
    let padding = if left_len + position.len() + 1 < total_width {
        total_width - left_len - position.len()
    } else {
        1
    };

    let style = Style::default()
        .fg(colors.status_line_fg)
        .bg(colors.status_line_bg);

    let line = Line::from(vec![
        Span::styled(left, style),
        Span::styled(" ".repeat(padding), style),
        Span::styled(position, style),
    ]);

    f.render_widget(Paragraph::new(line), area);
}
