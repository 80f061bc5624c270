//! Completion proposals offered by a query parser.

/// One element of a proposal pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternPart {
    /// Fixed text. Alternatives are separated by `|`.
    Literal(String),
    /// The value the user still has to provide.
    Placeholder,
}

impl PatternPart {
    /// Builds a part from the compact notation: `%` is the placeholder.
    pub fn parse(part: &str) -> Self {
        if part.starts_with('%') {
            PatternPart::Placeholder
        } else {
            PatternPart::Literal(part.to_string())
        }
    }

    /// Alternatives of a literal part; empty for the placeholder.
    pub fn alternatives(&self) -> Vec<&str> {
        match self {
            PatternPart::Literal(text) => text.split('|').collect(),
            PatternPart::Placeholder => Vec::new(),
        }
    }

    /// The first alternative, used when the part is written into the query.
    pub fn first_alternative(&self) -> Option<&str> {
        match self {
            PatternPart::Literal(text) => text.split('|').next(),
            PatternPart::Placeholder => None,
        }
    }
}

/// Returns `true` for a literal that binds directly to the next part, like
/// `tag:` or `size:>`.
pub fn is_glued(literal: &str) -> bool {
    literal.ends_with([':', '>', '<', '='])
}

/// What kind of value a proposal's placeholder expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProposalKind {
    #[default]
    None,
    DateTime,
    Tag,
    Contact,
}

/// A completion offer: replace `[position, position + length)` with the
/// rendered `pattern`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub position: usize,
    pub length: usize,
    pub pattern: Vec<PatternPart>,
    /// Index of the last pattern part already typed by the user.
    pub last_matched_part: usize,
    pub kind: ProposalKind,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_part_notation() {
        assert_eq!(PatternPart::parse("%"), PatternPart::Placeholder);
        let part = PatternPart::parse("after|since");
        assert_eq!(part.alternatives(), vec!["after", "since"]);
        assert_eq!(part.first_alternative(), Some("after"));
        assert_eq!(PatternPart::Placeholder.first_alternative(), None);
        assert!(is_glued("size:>"));
        assert!(!is_glued("after"));
    }
}
