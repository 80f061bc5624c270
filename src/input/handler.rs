//! Input event handler for polling and processing keyboard events.

use super::keys::{map_key_event, InputEvent};
use crate::editor::state::QueryBuilder;
use crate::query::QueryParser;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Stdin};
use termion::event::Event;
use termion::input::{Events, TermRead};

/// Event source for reading terminal events.
///
/// This enum wraps the events iterator to maintain its state across
/// multiple calls, preventing character loss during rapid input (paste).
enum EventSource {
    /// Reading from stdin
    Stdin(Events<Stdin>),
    /// Reading from /dev/tty (when stdin was piped)
    Tty(Events<File>),
}

/// Handles terminal input events and updates the query builder.
pub struct InputHandler {
    /// Event source iterator (maintains position in input buffer)
    events: EventSource,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new InputHandler that reads from stdin.
    pub fn new() -> Self {
        Self {
            events: EventSource::Stdin(io::stdin().events()),
        }
    }

    /// Creates a new InputHandler that reads from /dev/tty.
    /// Use this when stdin has been consumed for piped data.
    pub fn new_with_tty() -> Result<Self> {
        let tty_file = File::options()
            .read(true)
            .write(true)
            .open("/dev/tty")
            .context("Failed to open /dev/tty for keyboard input")?;

        Ok(Self {
            events: EventSource::Tty(tty_file.events()),
        })
    }

    /// Polls for a terminal event.
    ///
    /// Returns Some(Event) if an event occurred, None if the input ended.
    pub fn poll_event(&mut self) -> Result<Option<Event>> {
        // Use the stored events iterator to maintain position in the input buffer.
        let next = match &mut self.events {
            EventSource::Stdin(events) => events.next(),
            EventSource::Tty(events) => events.next(),
        };

        match next {
            Some(event) => Ok(Some(event.context("Failed to read terminal event")?)),
            None => Ok(None),
        }
    }

    /// Handles a terminal event and updates the query builder.
    ///
    /// Returns `Ok(true)` if the application should quit.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use querybuilder::editor::state::QueryBuilder;
    /// use querybuilder::input::InputHandler;
    /// use querybuilder::query::KeywordParser;
    /// use termion::event::{Event, Key};
    ///
    /// let mut handler = InputHandler::new();
    /// let mut builder = QueryBuilder::new(KeywordParser::new());
    /// let should_quit = handler.handle_event(Event::Key(Key::Ctrl('q')), &mut builder).unwrap();
    /// assert!(should_quit);
    /// ```
    pub fn handle_event<P: QueryParser>(
        &mut self,
        event: Event,
        builder: &mut QueryBuilder<P>,
    ) -> Result<bool> {
        Ok(apply_input(map_event(&event, builder), builder))
    }
}

/// Maps `event` in the context of the builder's completer.
pub fn map_event<P: QueryParser>(event: &Event, builder: &QueryBuilder<P>) -> InputEvent {
    let completer = builder.completer();
    let mode = completer.is_visible().then(|| completer.mode());
    map_key_event(event.clone(), mode)
}

/// Performs `input` on `builder`. Returns `true` if the application should quit.
pub fn apply_input<P: QueryParser>(input: InputEvent, builder: &mut QueryBuilder<P>) -> bool {
    match input {
        InputEvent::Quit => return true,
        InputEvent::InsertCharacter(c) => {
            let mut buffer = [0; 4];
            builder.insert_text(c.encode_utf8(&mut buffer));
        }
        InputEvent::Backspace => {
            builder.delete_backward();
        }
        InputEvent::Delete => {
            builder.delete_forward();
        }
        InputEvent::MoveLeft => builder.move_left(),
        InputEvent::MoveRight => builder.move_right(),
        InputEvent::MoveHome => builder.move_home(),
        InputEvent::MoveEnd => builder.move_end(),
        InputEvent::SelectNext => builder.completer_mut().select_next(),
        InputEvent::SelectPrevious => builder.completer_mut().select_previous(),
        InputEvent::PreviousDay => builder.completer_mut().shift_date(-1),
        InputEvent::NextDay => builder.completer_mut().shift_date(1),
        InputEvent::Accept => {
            builder.accept_selection();
        }
        InputEvent::HideCompleter => builder.completer_mut().hide(),
        InputEvent::RequestCompletion => builder.request_completion(),
        InputEvent::CloseBlock => {
            if !builder.close_block_at_cursor() {
                use crate::editor::state::MessageLevel;
                builder.set_message("No block under the cursor".to_string(), MessageLevel::Warning);
            }
        }
        InputEvent::OpenTagList => builder.open_tag_list(),
        InputEvent::Unknown => {}
    }
    false
}
