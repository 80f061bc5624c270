//! Keyboard event mapping and input event types.

use crate::editor::mode::CompleterMode;
use termion::event::{Event, Key};

/// High-level input events abstracted from raw keyboard input.
///
/// These events represent user intentions rather than specific key presses,
/// so the same key can mean different things while the completer is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// User wants to quit
    Quit,
    /// Type a character at the caret
    InsertCharacter(char),
    /// Delete the character before the caret
    Backspace,
    /// Delete the character after the caret
    Delete,
    MoveLeft,
    MoveRight,
    MoveHome,
    MoveEnd,
    /// Highlight the next completer entry (or next week)
    SelectNext,
    /// Highlight the previous completer entry (or previous week)
    SelectPrevious,
    /// Date picker: one day earlier
    PreviousDay,
    /// Date picker: one day later
    NextDay,
    /// Apply the completer selection
    Accept,
    /// Close the completer
    HideCompleter,
    /// Open the completer at the caret (Ctrl-Space)
    RequestCompletion,
    /// Close the block under the caret (Ctrl-x)
    CloseBlock,
    /// List all tags (Ctrl-t)
    OpenTagList,
    /// Unknown or unmapped key
    Unknown,
}

/// Maps a termion Event to an InputEvent.
///
/// `completer` is the mode of the completer popup when it is visible, `None`
/// when it is hidden.
///
/// # Example
///
/// ```
/// use termion::event::{Event, Key};
/// use querybuilder::editor::mode::CompleterMode;
/// use querybuilder::input::keys::{map_key_event, InputEvent};
///
/// let event = Event::Key(Key::Down);
/// assert_eq!(map_key_event(event.clone(), None), InputEvent::Unknown);
/// assert_eq!(
///     map_key_event(event, Some(CompleterMode::Proposals)),
///     InputEvent::SelectNext
/// );
/// ```
pub fn map_key_event(event: Event, completer: Option<CompleterMode>) -> InputEvent {
    // We only care about key events
    let key = match event {
        Event::Key(k) => k,
        _ => return InputEvent::Unknown,
    };

    let open = completer.is_some();
    let picking_date = completer == Some(CompleterMode::DateTime);

    match key {
        // Ctrl-modified keys
        Key::Ctrl('c') | Key::Ctrl('q') => InputEvent::Quit,
        Key::Ctrl('x') => InputEvent::CloseBlock,
        Key::Ctrl('t') => InputEvent::OpenTagList,
        Key::Ctrl(' ') | Key::Null => InputEvent::RequestCompletion,
        Key::Ctrl('a') => InputEvent::MoveHome,
        Key::Ctrl('e') => InputEvent::MoveEnd,
        // Completer navigation
        Key::Up if open => InputEvent::SelectPrevious,
        Key::Down if open => InputEvent::SelectNext,
        Key::Left if picking_date => InputEvent::PreviousDay,
        Key::Right if picking_date => InputEvent::NextDay,
        Key::Char('\t') | Key::Char('\n') if open => InputEvent::Accept,
        Key::Char('\t') => InputEvent::RequestCompletion,
        Key::Esc if open => InputEvent::HideCompleter,
        // Line editing
        Key::Left => InputEvent::MoveLeft,
        Key::Right => InputEvent::MoveRight,
        Key::Home => InputEvent::MoveHome,
        Key::End => InputEvent::MoveEnd,
        Key::Backspace => InputEvent::Backspace,
        Key::Delete => InputEvent::Delete,
        Key::Char('\n') => InputEvent::Unknown,
        Key::Char(c) if !c.is_control() => InputEvent::InsertCharacter(c),
        _ => InputEvent::Unknown,
    }
}
