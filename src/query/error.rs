//! Diagnostics reported by the query parser.

use std::fmt;

/// Problems found while parsing a query.
///
/// The parser always recovers, so these are collected in
/// [`Query::errors`](super::ast::Query) rather than returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A `(` without its `)`.
    UnclosedParenthesis { position: usize },
    /// A `)` without a matching `(`.
    UnexpectedParenthesis { position: usize },
    /// A `"` without its closing quote.
    UnterminatedQuote { position: usize },
    /// A boolean or negation operator with nothing to apply to.
    MissingOperand { position: usize, operator: String },
}

impl QueryError {
    /// Character offset the diagnostic points at.
    pub fn position(&self) -> usize {
        match self {
            QueryError::UnclosedParenthesis { position }
            | QueryError::UnexpectedParenthesis { position }
            | QueryError::UnterminatedQuote { position }
            | QueryError::MissingOperand { position, .. } => *position,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::UnclosedParenthesis { position } => {
                write!(f, "Unclosed parenthesis at position {}", position)
            }
            QueryError::UnexpectedParenthesis { position } => {
                write!(f, "Unexpected ')' at position {}", position)
            }
            QueryError::UnterminatedQuote { position } => {
                write!(f, "Unterminated quote at position {}", position)
            }
            QueryError::MissingOperand { position, operator } => write!(
                f,
                "Operator '{}' at position {} has no operand",
                operator, position
            ),
        }
    }
}

impl std::error::Error for QueryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_position() {
        let error = QueryError::MissingOperand {
            position: 4,
            operator: "AND".to_string(),
        };
        assert_eq!(error.to_string(), "Operator 'AND' at position 4 has no operand");
        assert_eq!(error.position(), 4);
        assert_eq!(
            QueryError::UnterminatedQuote { position: 2 }.to_string(),
            "Unterminated quote at position 2"
        );
    }
}
