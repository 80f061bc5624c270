//! Term tree produced by a query parser.

use super::error::QueryError;

/// Comparison operator between a property and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// `:` (contains)
    Contains,
    /// `=` or `:=`
    Equal,
    /// `>` or `:>`
    Greater,
    /// `<` or `:<`
    Smaller,
    /// `>=`
    GreaterOrEqual,
    /// `<=`
    SmallerOrEqual,
}

impl Comparator {
    /// Operator spellings, longest first so prefixes never shadow them.
    pub(crate) const SPELLINGS: [(&'static str, Comparator); 9] = [
        (":>", Comparator::Greater),
        (":<", Comparator::Smaller),
        (":=", Comparator::Equal),
        (">=", Comparator::GreaterOrEqual),
        ("<=", Comparator::SmallerOrEqual),
        (":", Comparator::Contains),
        ("=", Comparator::Equal),
        (">", Comparator::Greater),
        ("<", Comparator::Smaller),
    ];
}

/// The shape of a [`Term`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermKind {
    /// `property comparator value`, e.g. `size:>1MB`.
    Comparison {
        property: String,
        comparator: Comparator,
        sub_term: Box<Term>,
    },
    Negation(Box<Term>),
    And(Vec<Term>),
    Or(Vec<Term>),
    /// Free text, or the value of a comparison.
    Literal(String),
    /// A `<uri>` reference.
    Resource(String),
    /// `type:` / `kind:` restriction.
    ResourceType(String),
}

/// A node of the term tree, annotated with its character range in the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub kind: TermKind,
    pub position: usize,
    pub length: usize,
}

impl Term {
    pub fn new(kind: TermKind, position: usize, length: usize) -> Self {
        Self {
            kind,
            position,
            length,
        }
    }

    /// Offset just past the last character of this term.
    pub fn end(&self) -> usize {
        self.position + self.length
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self.kind, TermKind::Comparison { .. })
    }

    pub fn is_resource_type(&self) -> bool {
        matches!(self.kind, TermKind::ResourceType(_))
    }

    /// Returns `true` for `And` and `Or` terms.
    pub fn is_boolean(&self) -> bool {
        matches!(self.kind, TermKind::And(_) | TermKind::Or(_))
    }
}

/// Result of parsing a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// `None` for a blank query.
    pub term: Option<Term>,
    /// Problems found while parsing; never fatal.
    pub errors: Vec<QueryError>,
}
