//! Query builder state management.
//!
//! This module provides [`QueryBuilder`], the central state container that
//! ties the grouped buffer, the term parser and the completion picker
//! together.
//!
//! Every operation follows the same cycle: mutate the [`BlockTree`], drain its
//! events, and when the text changed reparse. Reparsing flattens the buffer,
//! boxes each comparison of the parsed term tree as a colored block, restores
//! the caret and repopulates the completer from the parser's proposals.
//!
//! # Example
//!
//! ```
//! use querybuilder::editor::state::QueryBuilder;
//! use querybuilder::query::KeywordParser;
//!
//! let mut builder = QueryBuilder::new(KeywordParser::new());
//! builder.insert_text("tag:vacation AND size:>1MB");
//!
//! let blocks: Vec<_> = builder.tree().blocks().iter().map(|b| (b.start, b.end)).collect();
//! assert_eq!(blocks, vec![(0, 11), (17, 25)]);
//! ```

use super::completer::{Completer, Selection};
use super::completion::{proposal_edit, typed_value, value_edit, Edit};
use super::mode::CompleterMode;
use crate::config::Config;
use crate::document::tree::{BlockTree, TreeEvent};
use crate::query::{
    highlight, CharStyle, ParseMode, Proposal, ProposalKind, QueryError, QueryParser, Term,
    TermKind,
};
use std::slice;
use tracing::debug;

/// A message displayed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub level: MessageLevel,
}

/// Message severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

type TextObserver = Box<dyn FnMut(&str)>;
type CursorObserver = Box<dyn FnMut(usize)>;

/// The query line: grouped buffer, parser and completer.
pub struct QueryBuilder<P: QueryParser> {
    tree: BlockTree,
    parser: P,
    completer: Completer,
    auto_complete: bool,
    term: Option<Term>,
    errors: Vec<QueryError>,
    message: Option<Message>,
    events: Vec<TreeEvent>,
    text_observers: Vec<TextObserver>,
    cursor_observers: Vec<CursorObserver>,
}

impl<P: QueryParser> QueryBuilder<P> {
    /// Creates an empty query builder with auto-completion enabled.
    pub fn new(parser: P) -> Self {
        Self {
            tree: BlockTree::new(),
            parser,
            completer: Completer::default(),
            auto_complete: true,
            term: None,
            errors: Vec::new(),
            message: None,
            events: Vec::new(),
            text_observers: Vec::new(),
            cursor_observers: Vec::new(),
        }
    }

    /// Creates a query builder honoring the completion settings of `config`.
    pub fn with_config(parser: P, config: &Config) -> Self {
        let mut builder = Self::new(parser);
        builder.auto_complete = config.auto_complete;
        builder.completer = Completer::new(config.date_format.clone());
        builder
    }

    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn completer(&self) -> &Completer {
        &self.completer
    }

    pub fn completer_mut(&mut self) -> &mut Completer {
        &mut self.completer
    }

    pub fn auto_complete(&self) -> bool {
        self.auto_complete
    }

    pub fn set_auto_complete(&mut self, enabled: bool) {
        self.auto_complete = enabled;
    }

    /// The term tree of the last reparse.
    pub fn term(&self) -> Option<&Term> {
        self.term.as_ref()
    }

    /// Diagnostics of the last reparse.
    pub fn errors(&self) -> &[QueryError] {
        &self.errors
    }

    /// Per-character styles of the current text.
    pub fn styles(&self) -> Vec<CharStyle> {
        highlight(&self.tree.text(), self.term.as_ref())
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn set_message(&mut self, text: String, level: MessageLevel) {
        self.message = Some(Message { text, level });
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn text(&self) -> String {
        self.tree.text()
    }

    /// Replaces the whole query and reparses it.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.tree.set_text(text);
        self.reparse();
        self.dispatch(vec![TreeEvent::TextChanged]);
        self.process();
    }

    pub fn cursor_position(&self) -> usize {
        self.tree.cursor_position()
    }

    pub fn set_cursor_position(&mut self, position: usize) {
        self.tree.set_cursor_position(position);
        self.process();
    }

    /// Boxes `[start, end]` by hand. The next reparse replaces it.
    pub fn add_block(&mut self, start: usize, end: usize) -> bool {
        let added = self.tree.add_block(start, end);
        self.process();
        added
    }

    pub fn remove_all_blocks(&mut self) {
        self.tree.remove_all_blocks();
        self.process();
    }

    pub fn insert_text(&mut self, text: &str) {
        self.tree.insert_text(text);
        self.process();
    }

    pub fn delete_backward(&mut self) -> bool {
        let deleted = self.tree.delete_backward();
        self.process();
        deleted
    }

    pub fn delete_forward(&mut self) -> bool {
        let deleted = self.tree.delete_forward();
        self.process();
        deleted
    }

    pub fn move_left(&mut self) {
        self.tree.move_left();
        self.process();
    }

    pub fn move_right(&mut self) {
        self.tree.move_right();
        self.process();
    }

    pub fn move_home(&mut self) {
        self.tree.move_home();
        self.process();
    }

    pub fn move_end(&mut self) {
        self.tree.move_end();
        self.process();
    }

    /// Closes the innermost block around the caret, keeping its text.
    pub fn close_block_at_cursor(&mut self) -> bool {
        let closed = self.tree.close_block_at_cursor();
        self.process();
        closed
    }

    /// Parses the text again and rebuilds the blocks from the term tree.
    pub fn reparse(&mut self) {
        let position = self.tree.cursor_position();
        let text = self.tree.text();
        let query = self
            .parser
            .parse(&text, ParseMode::DetectFilenamePattern, Some(position));

        self.tree.remove_all_blocks();

        if let Some(term) = &query.term {
            match term.kind {
                TermKind::And(_) | TermKind::Or(_) | TermKind::Negation(_) => {
                    handle_term(&mut self.tree, term)
                }
                // A single term: box it whole
                _ if term.length > 0 => {
                    self.tree.add_block(term.position, term.end() - 1);
                }
                _ => {}
            }
        }

        self.tree.set_cursor_position(position);
        debug!(
            blocks = self.tree.blocks().len(),
            errors = query.errors.len(),
            "reparsed query"
        );

        self.term = query.term;
        self.errors = query.errors;
        self.message = self.errors.first().map(|error| Message {
            text: error.to_string(),
            level: MessageLevel::Error,
        });

        self.update_completer();
    }

    /// Repopulates the completer from the proposals of the last parse.
    fn update_completer(&mut self) {
        let proposals = self.parser.completion_proposals();

        match proposals.as_slice() {
            [] => {
                self.completer.set_mode(CompleterMode::Proposals);
                self.completer.hide();
                return;
            }
            [single] => self.show_single_proposal(single.clone()),
            _ => {
                self.completer.set_mode(CompleterMode::Proposals);
                for proposal in proposals {
                    self.completer.add_proposal(proposal);
                }
            }
        }

        if self.auto_complete {
            self.completer.open();
        } else {
            self.completer.hide();
        }
    }

    fn show_single_proposal(&mut self, proposal: Proposal) {
        let values = match proposal.kind {
            ProposalKind::Tag => self.parser.all_tags(),
            ProposalKind::Contact => self.parser.all_contacts(),
            ProposalKind::DateTime => {
                self.completer.set_mode(CompleterMode::DateTime);
                self.completer.add_proposal(proposal);
                return;
            }
            ProposalKind::None => Default::default(),
        };

        if values.is_empty() {
            self.completer.set_mode(CompleterMode::Proposals);
            self.completer.add_proposal(proposal);
            return;
        }

        let prefix = typed_value(&self.tree.text(), self.tree.cursor_position());
        self.completer.set_mode(CompleterMode::Strings);
        self.completer.add_proposal(proposal);
        self.completer.set_strings(values, &prefix);
    }

    /// Reparses at the current caret and opens the completer, even when
    /// auto-completion is disabled.
    pub fn request_completion(&mut self) {
        self.reparse();
        self.completer.open();
        self.process();
    }

    /// Opens the list of all known tags for the word under the caret.
    pub fn open_tag_list(&mut self) {
        let prefix = typed_value(&self.tree.text(), self.tree.cursor_position());
        self.completer.set_mode(CompleterMode::Strings);
        self.completer.set_strings(self.parser.all_tags(), &prefix);
        self.completer.open();
    }

    /// Applies the completer's selection. Returns `false` when the completer
    /// is hidden or has nothing selected.
    pub fn accept_selection(&mut self) -> bool {
        if !self.completer.is_visible() {
            return false;
        }
        let Some(selection) = self.completer.current_selection() else {
            return false;
        };

        self.completer.hide();
        match selection {
            Selection::Proposal { proposal, value } => self.apply_proposal(&proposal, value.as_deref()),
            Selection::Value(value) => self.apply_value(&value),
        }
        true
    }

    /// Splices `proposal` (and the placeholder `value`) into the query.
    pub fn apply_proposal(&mut self, proposal: &Proposal, value: Option<&str>) {
        debug!(description = %proposal.description, ?value, "applying proposal");
        self.apply_edit(proposal_edit(proposal, value));
    }

    /// Replaces the word ending at the caret with `value`.
    pub fn apply_value(&mut self, value: &str) {
        debug!(value, "applying value");
        let edit = value_edit(&self.tree.text(), self.tree.cursor_position(), value);
        self.apply_edit(edit);
    }

    fn apply_edit(&mut self, edit: Edit) {
        self.tree.splice(edit.start, edit.end, &edit.replacement);
        self.tree.set_cursor_position(edit.cursor);
        self.process();
        // The completed word would offer itself again
        self.completer.hide();
    }

    /// Registers a callback invoked with the new text after each edit.
    pub fn on_text_changed(&mut self, observer: impl FnMut(&str) + 'static) {
        self.text_observers.push(Box::new(observer));
    }

    /// Registers a callback invoked with the new caret offset after it moves.
    pub fn on_cursor_changed(&mut self, observer: impl FnMut(usize) + 'static) {
        self.cursor_observers.push(Box::new(observer));
    }

    /// Drains the events of the operations since the last call.
    pub fn take_events(&mut self) -> Vec<TreeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drains the tree's events, reparsing when the text changed.
    fn process(&mut self) {
        let mut events = self.tree.take_events();
        if events.contains(&TreeEvent::TextChanged) {
            self.reparse();
            events.extend(
                self.tree
                    .take_events()
                    .into_iter()
                    .filter(|event| *event != TreeEvent::TextChanged),
            );
        }
        self.dispatch(events);
    }

    fn dispatch(&mut self, events: Vec<TreeEvent>) {
        for event in &events {
            match *event {
                TreeEvent::TextChanged => {
                    let text = self.tree.text();
                    for observer in &mut self.text_observers {
                        observer(&text);
                    }
                }
                TreeEvent::CursorChanged(position) => {
                    for observer in &mut self.cursor_observers {
                        observer(position);
                    }
                }
                TreeEvent::CursorBeforeStart => {
                    self.set_message("Start of query".to_string(), MessageLevel::Info)
                }
                TreeEvent::CursorAfterEnd => {
                    self.set_message("End of query".to_string(), MessageLevel::Info)
                }
                TreeEvent::BlockClosed => {}
            }
        }
        self.events.extend(events);
    }
}

/// Boxes the comparisons found under a boolean term, recursively.
fn handle_term(tree: &mut BlockTree, term: &Term) {
    let (sub_terms, block_for_each): (&[Term], bool) = match &term.kind {
        TermKind::Comparison { sub_term, .. } => (slice::from_ref(sub_term.as_ref()), false),
        TermKind::Negation(inner) => (slice::from_ref(inner.as_ref()), false),
        TermKind::And(terms) | TermKind::Or(terms) => (terms, true),
        _ => (&[], false),
    };

    for sub_term in sub_terms {
        if block_for_each
            && (sub_term.is_comparison() || sub_term.is_resource_type())
            && sub_term.length > 0
        {
            tree.add_block(sub_term.position, sub_term.end() - 1);
        }
        handle_term(tree, sub_term);
    }
}
