//! UI module for the querybuilder terminal interface.
//!
//! This module provides the main UI structure for rendering the terminal interface,
//! including layout management and widget composition.

pub mod completer_popup;
pub mod message_area;
pub mod query_line;
pub mod status_line;

use anyhow::Result;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;

use crate::editor::state::QueryBuilder;
use crate::query::QueryParser;
use crate::theme::Theme;

/// Width of the prompt drawn in front of the query text.
const PROMPT_WIDTH: u16 = 2;

/// Main UI structure that manages the terminal interface rendering.
///
/// The UI is composed of three rows plus an overlay:
/// - Query line (top): the grouped, highlighted query with the caret
/// - Completer popup: drawn over the free area under the query line
/// - Status line (second to last): completer page, blocks and caret
/// - Message area (bottom): parser errors and notices
///
/// # Example
///
/// ```
/// use querybuilder::ui::UI;
/// use querybuilder::theme::get_builtin_theme;
///
/// let theme = get_builtin_theme("default-dark").unwrap();
/// let ui = UI::new(theme);
/// assert_eq!(ui.theme_name(), "default-dark");
/// ```
pub struct UI {
    theme: Theme,
}

impl UI {
    /// Creates a new UI instance with the specified theme.
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Returns the current theme name.
    pub fn theme_name(&self) -> &str {
        &self.theme.name
    }

    /// Renders the UI to the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal drawing fails.
    pub fn render<B: Backend, P: QueryParser>(
        &self,
        terminal: &mut Terminal<B>,
        builder: &QueryBuilder<P>,
    ) -> Result<()> {
        let text = builder.text();
        let styles = builder.styles();
        let blocks = builder.tree().blocks();
        let caret = builder.cursor_position();
        let colors = &self.theme.colors;

        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Query line
                    Constraint::Min(0),    // Popup space
                    Constraint::Length(1), // Status line
                    Constraint::Length(1), // Message area
                ])
                .split(f.area());

            query_line::render_query_line(f, chunks[0], &text, &styles, &blocks, caret, colors);

            status_line::render_status_line(f, chunks[2], builder, colors);
            message_area::render_message_area(f, chunks[3], builder.message(), colors);

            // Completer popup (rendered on top if visible)
            let column = PROMPT_WIDTH.saturating_add(u16::try_from(caret).unwrap_or(u16::MAX));
            completer_popup::render_completer_popup(
                f,
                chunks[0],
                column,
                builder.completer(),
                colors,
            );
        })?;

        Ok(())
    }
}
