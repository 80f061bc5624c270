//! The query line: the buffer text with block tints, syntax colors and caret.

use crate::document::BlockInfo;
use crate::query::CharStyle;
use crate::theme::colors::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Percentage used to turn a block color into a background tint.
const TINT_FACTOR: u32 = 180;

const PROMPT: &str = "> ";

/// Background tint of every character, innermost block winning.
pub fn block_backgrounds(len: usize, blocks: &[BlockInfo]) -> Vec<Option<Color>> {
    let mut backgrounds = vec![None; len];
    // Blocks come in document order, so children overwrite their parents.
    for block in blocks {
        let Some(color) = block.color else { continue };
        let tint = Color::from(color.lighter(TINT_FACTOR));
        for background in backgrounds.iter_mut().take(block.end + 1).skip(block.start) {
            *background = Some(tint);
        }
    }
    backgrounds
}

fn char_style(
    style: CharStyle,
    background: Option<Color>,
    colors: &ThemeColors,
) -> Style {
    let mut result = Style::default()
        .fg(style.color.map(Color::from).unwrap_or(colors.foreground))
        .bg(background.unwrap_or(colors.background));
    if style.italic {
        result = result.add_modifier(Modifier::ITALIC);
    }
    if style.underline {
        result = result.add_modifier(Modifier::UNDERLINED);
    }
    result
}

/// Renders the query text into `area`.
///
/// Every character gets its own span; the caret cell (the character after
/// the caret, or a trailing space) is drawn with the cursor color.
pub fn render_query_line(
    f: &mut Frame,
    area: Rect,
    text: &str,
    styles: &[CharStyle],
    blocks: &[BlockInfo],
    caret: usize,
    colors: &ThemeColors,
) {
    let chars: Vec<char> = text.chars().collect();
    let backgrounds = block_backgrounds(chars.len(), blocks);

    let mut spans = vec![Span::styled(
        PROMPT,
        Style::default()
            .fg(colors.info)
            .bg(colors.background)
            .add_modifier(Modifier::BOLD),
    )];

    for (index, c) in chars.iter().enumerate() {
        let style = if index == caret {
            Style::default().fg(colors.background).bg(colors.cursor)
        } else {
            char_style(
                styles.get(index).copied().unwrap_or_default(),
                backgrounds[index],
                colors,
            )
        };
        spans.push(Span::styled(c.to_string(), style));
    }

    if caret >= chars.len() {
        spans.push(Span::styled(
            " ",
            Style::default().fg(colors.background).bg(colors.cursor),
        ));
    }

    let line = Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.background));
    f.render_widget(line, area);
}
