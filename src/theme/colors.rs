//! Color definitions for querybuilder themes.
//!
//! This module defines the [`ThemeColors`] struct which contains the interface
//! colors of the terminal front end. Block colors are not themed: they always
//! come from the fixed [`palette`](super::palette).

use ratatui::style::Color;

/// Defines all interface colors used in a querybuilder theme.
///
/// Colors are organized into three groups:
/// - **Query line**: background, plain text and caret
/// - **Chrome**: status line and completer popup
/// - **Semantic colors**: messages (errors, info) and completion emphasis
///
/// # Examples
///
/// ```
/// use querybuilder::theme::colors::ThemeColors;
/// use ratatui::style::Color;
///
/// let dark = ThemeColors::default_dark();
/// assert_eq!(dark.background, Color::Reset);
/// ```
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Query line
    /// Background of the query line and of the message area.
    pub background: Color,
    /// Plain (unhighlighted) query text.
    pub foreground: Color,
    /// Caret cell background.
    pub cursor: Color,

    // Chrome
    /// Background color for the status line.
    pub status_line_bg: Color,
    /// Foreground/text color for the status line.
    pub status_line_fg: Color,
    /// Background of the completer popup.
    pub popup_bg: Color,
    /// Border and title of the completer popup.
    pub popup_border: Color,
    /// Background of the selected completer row.
    pub popup_selected_bg: Color,

    // Semantic colors
    /// Parser diagnostics.
    pub error: Color,
    /// Recoverable problems, such as a close request with nothing to close.
    pub warning: Color,
    /// Navigation and completion notices.
    pub info: Color,
    /// Placeholder text inside a proposal.
    pub placeholder: Color,
    /// Pattern parts the user already typed.
    pub matched: Color,
}

impl ThemeColors {
    /// Returns the default dark color scheme.
    ///
    /// Uses ANSI colors so the terminal's own palette decides the final look.
    pub fn default_dark() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::Gray,
            cursor: Color::LightBlue,

            status_line_bg: Color::White,
            status_line_fg: Color::Black,
            popup_bg: Color::Black,
            popup_border: Color::LightBlue,
            popup_selected_bg: Color::DarkGray,

            error: Color::Red,
            warning: Color::Yellow,
            info: Color::LightBlue,
            placeholder: Color::DarkGray,
            matched: Color::Yellow,
        }
    }

    /// Returns the default light color scheme.
    ///
    /// # Examples
    ///
    /// ```
    /// use querybuilder::theme::colors::ThemeColors;
    /// use ratatui::style::Color;
    ///
    /// let colors = ThemeColors::default_light();
    /// assert_eq!(colors.background, Color::Rgb(250, 250, 250));
    /// ```
    pub fn default_light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 250),
            foreground: Color::Rgb(56, 58, 66),
            cursor: Color::Rgb(82, 139, 255),

            status_line_bg: Color::Rgb(238, 238, 238),
            status_line_fg: Color::Rgb(56, 58, 66),
            popup_bg: Color::Rgb(240, 240, 240),
            popup_border: Color::Rgb(1, 132, 188),
            popup_selected_bg: Color::Rgb(220, 220, 220),

            error: Color::Rgb(202, 18, 67),
            warning: Color::Rgb(193, 132, 1),
            info: Color::Rgb(1, 132, 188),
            placeholder: Color::Rgb(160, 161, 167),
            matched: Color::Rgb(152, 104, 1),
        }
    }

    /// Returns the Gruvbox Dark color scheme.
    ///
    /// A retro groove color scheme with warm, earthy tones.
    pub fn gruvbox_dark() -> Self {
        Self {
            background: Color::Rgb(40, 40, 40),    // dark bg
            foreground: Color::Rgb(235, 219, 178), // light fg
            cursor: Color::Rgb(251, 184, 108),     // orange

            status_line_bg: Color::Rgb(60, 56, 54),
            status_line_fg: Color::Rgb(235, 219, 178),
            popup_bg: Color::Rgb(50, 48, 47),
            popup_border: Color::Rgb(131, 165, 152), // aqua
            popup_selected_bg: Color::Rgb(80, 73, 69),

            error: Color::Rgb(251, 73, 52),
            warning: Color::Rgb(250, 189, 47),
            info: Color::Rgb(131, 165, 152),
            placeholder: Color::Rgb(146, 131, 116),
            matched: Color::Rgb(250, 189, 47),
        }
    }

    /// Returns the Nord color scheme.
    ///
    /// An arctic, north-bluish color palette.
    pub fn nord() -> Self {
        Self {
            background: Color::Rgb(46, 52, 64),
            foreground: Color::Rgb(216, 222, 233),
            cursor: Color::Rgb(136, 192, 208), // frost cyan

            status_line_bg: Color::Rgb(59, 66, 82),
            status_line_fg: Color::Rgb(216, 222, 233),
            popup_bg: Color::Rgb(59, 66, 82),
            popup_border: Color::Rgb(129, 161, 193),
            popup_selected_bg: Color::Rgb(76, 86, 106),

            error: Color::Rgb(191, 97, 106),
            warning: Color::Rgb(235, 203, 139),
            info: Color::Rgb(129, 161, 193),
            placeholder: Color::Rgb(76, 86, 106),
            matched: Color::Rgb(235, 203, 139),
        }
    }
}
