//! Message area rendering for parser diagnostics and notices.

use crate::editor::state::{Message, MessageLevel};
use crate::theme::colors::ThemeColors;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Renders the message area at the bottom of the screen.
///
/// Empty when there is no message.
pub fn render_message_area(
    f: &mut Frame,
    area: Rect,
    message: Option<&Message>,
    colors: &ThemeColors,
) {
    let content = match message {
        Some(message) => {
            let color = match message.level {
                MessageLevel::Error => colors.error,
                MessageLevel::Warning => colors.warning,
                MessageLevel::Info => colors.info,
            };
            Line::from(vec![Span::styled(
                message.text.as_str(),
                Style::default().fg(color),
            )])
        }
        None => Line::from(""),
    };

    let paragraph =
        Paragraph::new(content).style(Style::default().bg(colors.background).fg(colors.foreground));

    f.render_widget(paragraph, area);
}
