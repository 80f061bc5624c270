//! Query parsing: the term tree, completion proposals and highlighting.
//!
//! The query builder talks to its parser through the [`QueryParser`] trait.
//! [`KeywordParser`] is the bundled implementation.
//!
//! # Supported Syntax
//!
//! - `word`, `"quoted words"` - Free text
//! - `property:value` - Comparison (also `:>`, `:<`, `:=`, `=`, `>`, `<`, `>=`, `<=`)
//! - `property:(sub query)` - Comparison with a nested query
//! - `type:image` / `kind:image` - Resource type restriction
//! - `<uri>` - Resource reference
//! - `a AND b`, `a b`, `a && b` - Conjunction
//! - `a OR b`, `a || b` - Disjunction
//! - `NOT a`, `-a`, `!a` - Negation
//! - `*.rs` - Filename pattern (in [`ParseMode::DetectFilenamePattern`])

pub mod ast;
pub mod error;
pub mod highlight;
pub mod parser;
pub mod proposal;

pub use ast::{Comparator, Query, Term, TermKind};
pub use error::QueryError;
pub use highlight::{highlight, CharStyle};
pub use parser::KeywordParser;
pub use proposal::{PatternPart, Proposal, ProposalKind};

use std::collections::BTreeSet;

/// How the parser treats bare words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    #[default]
    Normal,
    /// Words containing `*` or `?` become `filename` comparisons.
    DetectFilenamePattern,
}

/// A term parser the query builder can drive.
pub trait QueryParser {
    /// Parses `text`. When `cursor` is given, completion proposals for the
    /// words ending there are computed as well.
    fn parse(&mut self, text: &str, mode: ParseMode, cursor: Option<usize>) -> Query;

    /// Proposals computed by the last call to [`QueryParser::parse`].
    fn completion_proposals(&self) -> Vec<Proposal>;

    fn all_tags(&self) -> BTreeSet<String>;

    fn all_contacts(&self) -> BTreeSet<String>;
}
