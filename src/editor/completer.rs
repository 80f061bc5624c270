//! The completion picker.
//!
//! [`Completer`] holds what the popup below the query line offers: the
//! parser's proposals, a sorted list of plain values or a date. It only
//! tracks the selection; applying it to the buffer is the query builder's
//! job (see [`crate::editor::completion`]).

use super::mode::CompleterMode;
use crate::config::is_valid_date_format;
use crate::query::{PatternPart, Proposal, ProposalKind};
use chrono::{Duration, Local, NaiveDate};
use tracing::warn;

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// What the user picked in the completer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A proposal, with the value chosen for its placeholder, if any.
    Proposal {
        proposal: Proposal,
        value: Option<String>,
    },
    /// A plain value that replaces the word under the cursor.
    Value(String),
}

/// How a proposal pattern part is rendered in the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartStyle {
    /// Already typed by the user.
    Matched,
    /// Still to be typed.
    Pending,
    /// The value the user has to supply.
    Placeholder,
}

/// Popup label for a placeholder of the given kind.
pub fn placeholder_label(kind: ProposalKind) -> &'static str {
    match kind {
        ProposalKind::None => "...",
        ProposalKind::DateTime => "[date and time]",
        ProposalKind::Tag => "[tag name]",
        ProposalKind::Contact => "[contact]",
    }
}

/// Splits a proposal into labelled parts for display.
pub fn proposal_parts(proposal: &Proposal) -> Vec<(String, PartStyle)> {
    proposal
        .pattern
        .iter()
        .enumerate()
        .map(|(index, part)| match part {
            PatternPart::Placeholder => (
                placeholder_label(proposal.kind).to_string(),
                PartStyle::Placeholder,
            ),
            PatternPart::Literal(text) if index <= proposal.last_matched_part => {
                (text.clone(), PartStyle::Matched)
            }
            PatternPart::Literal(text) => (text.clone(), PartStyle::Pending),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Completer {
    mode: CompleterMode,
    proposals: Vec<Proposal>,
    proposal_index: usize,
    strings: Vec<String>,
    string_index: usize,
    date: NaiveDate,
    date_format: String,
    visible: bool,
}

impl Default for Completer {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl Completer {
    /// Creates a hidden completer; picked dates are formatted with `date_format`.
    ///
    /// An invalid format falls back to `%Y-%m-%d`.
    pub fn new(date_format: impl Into<String>) -> Self {
        let mut date_format = date_format.into();
        if !is_valid_date_format(&date_format) {
            warn!(format = %date_format, "invalid date format, using %Y-%m-%d");
            date_format = DEFAULT_DATE_FORMAT.to_string();
        }

        Self {
            mode: CompleterMode::Proposals,
            proposals: Vec::new(),
            proposal_index: 0,
            strings: Vec::new(),
            string_index: 0,
            date: Local::now().date_naive(),
            date_format,
            visible: false,
        }
    }

    pub fn mode(&self) -> CompleterMode {
        self.mode
    }

    /// Switches page. Pending proposals are dropped; so are the strings when
    /// switching to the strings page.
    pub fn set_mode(&mut self, mode: CompleterMode) {
        self.proposals.clear();
        self.proposal_index = 0;

        if mode == CompleterMode::Strings {
            self.strings.clear();
            self.string_index = 0;
        }
        self.mode = mode;
    }

    pub fn add_proposal(&mut self, proposal: Proposal) {
        self.proposals.push(proposal);
        self.proposal_index = 0;
    }

    /// Adds `strings` to the sorted value list and preselects the first entry
    /// that sorts after `prefix`, ignoring case.
    pub fn set_strings<I>(&mut self, strings: I, prefix: &str)
    where
        I: IntoIterator<Item = String>,
    {
        self.strings.extend(strings);
        self.strings.sort();

        let prefix = prefix.to_lowercase();
        self.string_index = self
            .strings
            .iter()
            .position(|candidate| candidate.to_lowercase() > prefix)
            .unwrap_or(0);
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Index of the highlighted row of the current list page.
    pub fn selected_index(&self) -> usize {
        match self.mode {
            CompleterMode::Strings => self.string_index,
            _ => self.proposal_index,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// The selected date in the configured format.
    pub fn formatted_date(&self) -> String {
        self.date.format(&self.date_format).to_string()
    }

    /// Moves the selected date by `days` (negative moves back).
    pub fn shift_date(&mut self, days: i64) {
        if let Some(date) = self.date.checked_add_signed(Duration::days(days)) {
            self.date = date;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows the popup, unless the current page has nothing to offer.
    pub fn open(&mut self) {
        let empty = match self.mode {
            CompleterMode::Proposals => self.proposals.is_empty(),
            CompleterMode::Strings => self.strings.is_empty(),
            CompleterMode::DateTime => false,
        };
        if !empty {
            self.visible = true;
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Selects the next row, or the date one week later.
    pub fn select_next(&mut self) {
        match self.mode {
            CompleterMode::Proposals => {
                if self.proposal_index + 1 < self.proposals.len() {
                    self.proposal_index += 1;
                }
            }
            CompleterMode::Strings => {
                if self.string_index + 1 < self.strings.len() {
                    self.string_index += 1;
                }
            }
            CompleterMode::DateTime => self.shift_date(7),
        }
    }

    /// Selects the previous row, or the date one week earlier.
    pub fn select_previous(&mut self) {
        match self.mode {
            CompleterMode::Proposals => self.proposal_index = self.proposal_index.saturating_sub(1),
            CompleterMode::Strings => self.string_index = self.string_index.saturating_sub(1),
            CompleterMode::DateTime => self.shift_date(-7),
        }
    }

    /// The current selection, paired with the proposal it completes.
    ///
    /// On the strings and date pages the first pending proposal, if any,
    /// receives the chosen value; without one the value stands alone.
    pub fn current_selection(&self) -> Option<Selection> {
        let value = match self.mode {
            CompleterMode::Proposals => {
                return self
                    .proposals
                    .get(self.proposal_index)
                    .map(|proposal| Selection::Proposal {
                        proposal: proposal.clone(),
                        value: None,
                    });
            }
            CompleterMode::Strings => self.strings.get(self.string_index)?.clone(),
            CompleterMode::DateTime => self.formatted_date(),
        };

        Some(match self.proposals.first() {
            Some(proposal) => Selection::Proposal {
                proposal: proposal.clone(),
                value: Some(value),
            },
            None => Selection::Value(value),
        })
    }
}
