//! Per-character styling of a query from its term tree.
//!
//! Comparisons take the next palette color (shared with block tints) and are
//! shown in italics; their values inherit the color upright. Nested boolean
//! values are underlined.

use super::ast::{Term, TermKind};
use crate::theme::palette::{palette_color, Rgb};

/// Style of one character of the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharStyle {
    /// `None` keeps the default foreground.
    pub color: Option<Rgb>,
    pub italic: bool,
    pub underline: bool,
}

struct Highlighter {
    styles: Vec<CharStyle>,
    color: usize,
}

impl Highlighter {
    fn style_at(&self, position: usize) -> CharStyle {
        self.styles.get(position).copied().unwrap_or_default()
    }

    fn apply(&mut self, position: usize, length: usize, style: CharStyle) {
        let end = (position + length).min(self.styles.len());
        for slot in self.styles.iter_mut().take(end).skip(position) {
            *slot = style;
        }
    }

    fn term(&mut self, term: &Term) {
        let mut style = self.style_at(term.position);

        match &term.kind {
            TermKind::Comparison { sub_term, .. } => {
                style.color = Some(palette_color(self.color));
                style.underline |= sub_term.is_boolean();
                style.italic = true;
                self.apply(term.position, term.length, style);

                self.color = (self.color + 1) & 7;
                self.term(sub_term);
            }
            TermKind::ResourceType(_) => {
                style.italic = true;
                self.apply(term.position, term.length, style);
            }
            TermKind::Literal(_) | TermKind::Resource(_) => {
                style.italic = false;
                self.apply(term.position, term.length, style);
            }
            TermKind::Negation(inner) => self.term(inner),
            TermKind::And(terms) | TermKind::Or(terms) => {
                for term in terms {
                    self.term(term);
                }
            }
        }
    }
}

/// Computes the style of every character of `text` from its parsed `term`.
///
/// Double quotes always keep the default style: quoted values exclude them,
/// so coloring them would leave stray uncolored quotes.
pub fn highlight(text: &str, term: Option<&Term>) -> Vec<CharStyle> {
    let mut highlighter = Highlighter {
        styles: vec![CharStyle::default(); text.chars().count()],
        color: 0,
    };

    if let Some(term) = term {
        highlighter.term(term);
    }

    for (style, ch) in highlighter.styles.iter_mut().zip(text.chars()) {
        if ch == '"' {
            *style = CharStyle::default();
        }
    }

    highlighter.styles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{KeywordParser, ParseMode, QueryParser};
    use crate::theme::palette::PALETTE;

    fn styles(text: &str) -> Vec<CharStyle> {
        let query = KeywordParser::new().parse(text, ParseMode::Normal, None);
        highlight(text, query.term.as_ref())
    }

    #[test]
    fn test_comparisons_cycle_palette() {
        let styles = styles("a:x b:y");

        assert_eq!(styles[0].color, Some(PALETTE[0]));
        assert!(styles[0].italic);
        // Value inherits the color but is upright
        assert_eq!(styles[2].color, Some(PALETTE[0]));
        assert!(!styles[2].italic);
        assert_eq!(styles[3], CharStyle::default());
        assert_eq!(styles[4].color, Some(PALETTE[1]));
    }

    #[test]
    fn test_nested_boolean_value_is_underlined() {
        let styles = styles("tag:(a OR b)");
        assert!(styles.iter().all(|style| style.underline));
        assert!(styles[0].italic);
    }

    #[test]
    fn test_quotes_keep_default_style() {
        let styles = styles("from:\"Jo\"");
        assert_eq!(styles[5], CharStyle::default());
        assert_eq!(styles[8], CharStyle::default());
        assert_eq!(styles[6].color, Some(PALETTE[0]));
    }

    #[test]
    fn test_plain_literal_unstyled() {
        assert!(styles("hello").iter().all(|s| *s == CharStyle::default()));
        assert!(highlight("abc", None).iter().all(|s| *s == CharStyle::default()));
    }
}
