//! Keyword-based query parser.
//!
//! Grammar (lenient; problems are collected, never returned as `Err`):
//!
//! ```text
//! or      := and (("OR" | "or" | "||") and)*
//! and     := unary (("AND" | "and" | "&&")? unary)*
//! unary   := ("NOT" | "not" | "-" | "!") unary | primary
//! primary := "(" or ")" | comparison | word | "quoted" | <uri>
//! ```
//!
//! A comparison is written inside a single word (`tag:work`, `size:>1MB`);
//! its value may also be a quoted string or a parenthesized sub-query glued
//! to the operator (`from:"Jane Doe"`, `tag:(a OR b)`).
//!
//! # Example
//!
//! ```
//! use querybuilder::query::{KeywordParser, ParseMode, QueryParser, TermKind};
//!
//! let mut parser = KeywordParser::new();
//! let query = parser.parse("tag:vacation AND size:>1MB", ParseMode::Normal, None);
//!
//! let term = query.term.unwrap();
//! let TermKind::And(terms) = &term.kind else { panic!("expected AND") };
//! assert_eq!((terms[0].position, terms[0].length), (0, 12));
//! assert_eq!((terms[1].position, terms[1].length), (17, 9));
//! ```

use super::ast::{Comparator, Query, Term, TermKind};
use super::error::QueryError;
use super::proposal::{is_glued, PatternPart, Proposal, ProposalKind};
use super::{ParseMode, QueryParser};
use crate::config::Config;
use std::collections::BTreeSet;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    LParen,
    RParen,
    Quoted(String),
    Uri(String),
    Word(String),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    start: usize,
    len: usize,
}

impl Token {
    fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    And,
    Or,
    Not,
}

fn keyword(token: &Token) -> Option<Keyword> {
    let TokenKind::Word(word) = &token.kind else {
        return None;
    };
    match word.as_str() {
        "AND" | "and" | "&&" => Some(Keyword::And),
        "OR" | "or" | "||" => Some(Keyword::Or),
        "NOT" | "not" | "-" | "!" => Some(Keyword::Not),
        _ => None,
    }
}

fn is_word_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, '(' | ')' | '"')
}

fn tokenize(chars: &[char], errors: &mut Vec<QueryError>) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let start = i;
        let kind = match chars[i] {
            ch if ch.is_whitespace() => {
                i += 1;
                continue;
            }
            '(' => {
                i += 1;
                TokenKind::LParen
            }
            ')' => {
                i += 1;
                TokenKind::RParen
            }
            '"' => {
                let mut end = i + 1;
                while end < chars.len() && chars[end] != '"' {
                    end += 1;
                }
                let text = chars[i + 1..end].iter().collect();
                if end < chars.len() {
                    i = end + 1;
                } else {
                    errors.push(QueryError::UnterminatedQuote { position: start });
                    i = end;
                }
                TokenKind::Quoted(text)
            }
            '<' if uri_end(chars, i).is_some() => {
                let end = uri_end(chars, i).unwrap_or(i);
                i = end + 1;
                TokenKind::Uri(chars[start + 1..end].iter().collect())
            }
            _ => {
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                TokenKind::Word(chars[start..i].iter().collect())
            }
        };

        tokens.push(Token {
            kind,
            start,
            len: i - start,
        });
    }

    tokens
}

/// Index of the `>` closing a `<uri>` that starts at `start`.
fn uri_end(chars: &[char], start: usize) -> Option<usize> {
    chars[start + 1..]
        .iter()
        .take_while(|ch| !ch.is_whitespace())
        .position(|&ch| ch == '>')
        .filter(|&offset| offset > 0)
        .map(|offset| start + 1 + offset)
}

/// Splits `tag:work` into `("tag", Contains, operator length)`.
fn split_comparison(word: &str) -> Option<(String, Comparator, usize)> {
    let property: String = word
        .chars()
        .take_while(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.'))
        .collect();
    if property.is_empty() {
        return None;
    }

    let rest = &word[property.len()..];
    Comparator::SPELLINGS
        .iter()
        .find(|(spelling, _)| rest.starts_with(spelling))
        .map(|(spelling, comparator)| (property, *comparator, spelling.len()))
}

fn combine(mut terms: Vec<Term>, make: fn(Vec<Term>) -> TermKind) -> Option<Term> {
    match terms.len() {
        0 => None,
        1 => terms.pop(),
        _ => {
            let position = terms[0].position;
            let end = terms.iter().map(Term::end).max().unwrap_or(position);
            Some(Term::new(make(terms), position, end - position))
        }
    }
}

struct TermParser<'a> {
    tokens: &'a [Token],
    index: usize,
    mode: ParseMode,
    last_end: usize,
    errors: Vec<QueryError>,
}

impl<'a> TermParser<'a> {
    fn new(tokens: &'a [Token], mode: ParseMode) -> Self {
        Self {
            tokens,
            index: 0,
            mode,
            last_end: 0,
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    fn peek_keyword(&self) -> Option<Keyword> {
        self.peek().and_then(keyword)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.index)?;
        self.index += 1;
        self.last_end = token.end();
        Some(token)
    }

    fn missing_operand(&mut self, token: &Token) {
        let operator = match &token.kind {
            TokenKind::Word(word) => word.clone(),
            _ => String::new(),
        };
        self.errors.push(QueryError::MissingOperand {
            position: token.start,
            operator,
        });
    }

    fn parse_query(&mut self) -> Option<Term> {
        let mut terms = Vec::new();

        loop {
            if let Some(term) = self.parse_or() {
                terms.push(term);
            }
            let Some(token) = self.advance() else {
                break;
            };
            // parse_or only stops on end of input or an unmatched ')'
            self.errors.push(QueryError::UnexpectedParenthesis {
                position: token.start,
            });
        }

        combine(terms, TermKind::And)
    }

    fn parse_or(&mut self) -> Option<Term> {
        let mut terms = Vec::new();
        if let Some(term) = self.parse_and() {
            terms.push(term);
        }

        while self.peek_keyword() == Some(Keyword::Or) {
            let Some(operator) = self.advance() else {
                break;
            };
            let right = self.parse_and();
            if terms.is_empty() || right.is_none() {
                self.missing_operand(operator);
            }
            terms.extend(right);
        }

        combine(terms, TermKind::Or)
    }

    fn parse_and(&mut self) -> Option<Term> {
        let mut terms = Vec::new();

        loop {
            let Some(token) = self.peek() else {
                break;
            };
            match (&token.kind, keyword(token)) {
                (TokenKind::RParen, _) | (_, Some(Keyword::Or)) => break,
                (_, Some(Keyword::And)) => {
                    self.advance();
                    let dangling = matches!(
                        self.peek().map(|next| (&next.kind, keyword(next))),
                        None | Some((TokenKind::RParen, _))
                            | Some((_, Some(Keyword::And | Keyword::Or)))
                    );
                    if terms.is_empty() || dangling {
                        self.missing_operand(token);
                    }
                }
                _ => terms.extend(self.parse_unary()),
            }
        }

        combine(terms, TermKind::And)
    }

    fn parse_unary(&mut self) -> Option<Term> {
        let token = self.peek()?;

        if keyword(token) == Some(Keyword::Not) {
            self.advance();
            let Some(operand) = self.parse_unary() else {
                self.missing_operand(token);
                return None;
            };
            let length = operand.end() - token.start;
            return Some(Term::new(
                TermKind::Negation(Box::new(operand)),
                token.start,
                length,
            ));
        }

        if let TokenKind::Word(word) = &token.kind {
            if let Some(rest) = word.strip_prefix(['-', '!']) {
                self.advance();
                let operand = self.word_term(rest, token.start + 1);
                let length = self.last_end - token.start;
                return Some(Term::new(
                    TermKind::Negation(Box::new(operand)),
                    token.start,
                    length,
                ));
            }
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Option<Term> {
        let token = self.peek()?;

        match &token.kind {
            TokenKind::RParen => None,
            TokenKind::Word(_) if matches!(keyword(token), Some(Keyword::And | Keyword::Or)) => None,
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_or();
                if matches!(self.peek().map(|next| &next.kind), Some(TokenKind::RParen)) {
                    self.advance();
                } else {
                    self.errors.push(QueryError::UnclosedParenthesis {
                        position: token.start,
                    });
                }
                inner
            }
            TokenKind::Quoted(text) => {
                self.advance();
                Some(Term::new(
                    TermKind::Literal(text.clone()),
                    token.start + 1,
                    text.chars().count(),
                ))
            }
            TokenKind::Uri(uri) => {
                self.advance();
                Some(Term::new(
                    TermKind::Resource(uri.clone()),
                    token.start,
                    token.len,
                ))
            }
            TokenKind::Word(word) => {
                self.advance();
                Some(self.word_term(word, token.start))
            }
        }
    }

    /// Builds the term for a word that was just consumed.
    fn word_term(&mut self, word: &str, start: usize) -> Term {
        let word_len = word.chars().count();
        let word_end = start + word_len;

        let Some((property, comparator, operator_len)) = split_comparison(word) else {
            let literal = Term::new(TermKind::Literal(word.to_string()), start, word_len);
            let pattern = word.contains(['*', '?']);
            return if pattern && self.mode == ParseMode::DetectFilenamePattern {
                Term::new(
                    TermKind::Comparison {
                        property: "filename".to_string(),
                        comparator: Comparator::Contains,
                        sub_term: Box::new(literal),
                    },
                    start,
                    word_len,
                )
            } else {
                literal
            };
        };

        let value_start = start + property.chars().count() + operator_len;
        let value: String = word.chars().skip(value_start - start).collect();

        if !value.is_empty()
            && matches!(property.to_lowercase().as_str(), "type" | "kind")
            && matches!(comparator, Comparator::Contains | Comparator::Equal)
        {
            return Term::new(TermKind::ResourceType(value), start, word_len);
        }

        let glued_value = self.peek().filter(|next| {
            next.start == word_end && matches!(next.kind, TokenKind::LParen | TokenKind::Quoted(_))
        });

        let sub_term = if !value.is_empty() {
            Term::new(TermKind::Literal(value.clone()), value_start, value.chars().count())
        } else if glued_value.is_some() {
            self.parse_primary()
                .unwrap_or_else(|| Term::new(TermKind::Literal(String::new()), value_start, 0))
        } else {
            Term::new(TermKind::Literal(String::new()), value_start, 0)
        };

        let end = self.last_end.max(word_end);
        Term::new(
            TermKind::Comparison {
                property,
                comparator,
                sub_term: Box::new(sub_term),
            },
            start,
            end - start,
        )
    }
}

struct Rule {
    pattern: &'static [&'static str],
    kind: ProposalKind,
    description: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        pattern: &["tag:", "%"],
        kind: ProposalKind::Tag,
        description: "Tagged with",
    },
    Rule {
        pattern: &["from:", "%"],
        kind: ProposalKind::Contact,
        description: "Sent by a contact",
    },
    Rule {
        pattern: &["sent", "by", "%"],
        kind: ProposalKind::Contact,
        description: "Sent by a contact",
    },
    Rule {
        pattern: &["modified", "after|since", "%"],
        kind: ProposalKind::DateTime,
        description: "Modified after a date",
    },
    Rule {
        pattern: &["modified", "before|until", "%"],
        kind: ProposalKind::DateTime,
        description: "Modified before a date",
    },
    Rule {
        pattern: &["size:>", "%"],
        kind: ProposalKind::None,
        description: "Larger than",
    },
    Rule {
        pattern: &["size:<", "%"],
        kind: ProposalKind::None,
        description: "Smaller than",
    },
    Rule {
        pattern: &["type:", "image|document|music|video"],
        kind: ProposalKind::None,
        description: "Of type",
    },
];

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Matches `words` (the last one being typed) against the start of `pattern`.
///
/// Returns the index of the last pattern part the words cover.
fn match_rule(pattern: &[PatternPart], words: &[(usize, String)]) -> Option<usize> {
    let ((_, typed), earlier) = words.split_last()?;
    if earlier.len() >= pattern.len() {
        return None;
    }

    for ((_, word), part) in earlier.iter().zip(pattern) {
        let matched = match part {
            PatternPart::Placeholder => !word.is_empty(),
            PatternPart::Literal(_) => part
                .alternatives()
                .iter()
                .any(|alternative| alternative.eq_ignore_ascii_case(word)),
        };
        if !matched {
            return None;
        }
    }

    let index = earlier.len();
    match &pattern[index] {
        PatternPart::Placeholder => (index > 0).then_some(index),
        PatternPart::Literal(_) if typed.is_empty() => None,
        part => {
            for alternative in part.alternatives() {
                if starts_with_ignore_case(alternative, typed) {
                    return Some(index);
                }

                let glued_len = alternative.chars().count();
                if is_glued(alternative)
                    && typed.chars().count() > glued_len
                    && starts_with_ignore_case(typed, alternative)
                {
                    let rest: String = typed.chars().skip(glued_len).collect();
                    let next_matches = match pattern.get(index + 1) {
                        Some(PatternPart::Placeholder) => true,
                        Some(next) => next
                            .alternatives()
                            .iter()
                            .any(|candidate| starts_with_ignore_case(candidate, &rest)),
                        None => false,
                    };
                    if next_matches {
                        return Some(index + 1);
                    }
                }
            }
            None
        }
    }
}

/// Collects the proposals applicable to the words ending at `cursor`.
fn proposals_at(chars: &[char], cursor: usize) -> Vec<Proposal> {
    let cursor = cursor.min(chars.len());
    let mut words = Vec::new();
    let mut i = 0;

    while i < cursor {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        while i < cursor && !chars[i].is_whitespace() {
            i += 1;
        }
        words.push((start, chars[start..i].iter().collect::<String>()));
    }

    if cursor == 0 || chars[cursor - 1].is_whitespace() {
        words.push((cursor, String::new()));
    }

    let mut proposals = Vec::new();
    for rule in RULES {
        let pattern: Vec<PatternPart> = rule.pattern.iter().map(|part| PatternPart::parse(part)).collect();

        for count in 1..=pattern.len().min(words.len()) {
            let tail = &words[words.len() - count..];
            if let Some(last_matched_part) = match_rule(&pattern, tail) {
                let position = tail[0].0;
                proposals.push(Proposal {
                    position,
                    length: cursor - position,
                    pattern: pattern.clone(),
                    last_matched_part,
                    kind: rule.kind,
                    description: rule.description.to_string(),
                });
                break;
            }
        }
    }

    proposals
}

/// The bundled [`QueryParser`].
#[derive(Debug, Clone, Default)]
pub struct KeywordParser {
    tags: BTreeSet<String>,
    contacts: BTreeSet<String>,
    proposals: Vec<Proposal>,
}

impl KeywordParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tag names offered for `tag:` completion.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the contacts offered for `from:` and `sent by` completion.
    pub fn with_contacts<I, S>(mut self, contacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contacts = contacts.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_tags(config.tags.iter().cloned())
            .with_contacts(config.contacts.iter().cloned())
    }
}

impl QueryParser for KeywordParser {
    fn parse(&mut self, text: &str, mode: ParseMode, cursor: Option<usize>) -> Query {
        let chars: Vec<char> = text.chars().collect();
        let mut errors = Vec::new();
        let tokens = tokenize(&chars, &mut errors);

        let mut parser = TermParser::new(&tokens, mode);
        let term = parser.parse_query();
        errors.append(&mut parser.errors);

        self.proposals = cursor.map_or_else(Vec::new, |cursor| proposals_at(&chars, cursor));
        trace!(
            tokens = tokens.len(),
            errors = errors.len(),
            proposals = self.proposals.len(),
            "parsed query"
        );

        Query { term, errors }
    }

    fn completion_proposals(&self) -> Vec<Proposal> {
        self.proposals.clone()
    }

    fn all_tags(&self) -> BTreeSet<String> {
        self.tags.clone()
    }

    fn all_contacts(&self) -> BTreeSet<String> {
        self.contacts.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Query {
        KeywordParser::new().parse(text, ParseMode::Normal, None)
    }

    fn spans(terms: &[Term]) -> Vec<(usize, usize)> {
        terms.iter().map(|t| (t.position, t.length)).collect()
    }

    #[test]
    fn test_tokenize_words_parens_quotes() {
        let chars: Vec<char> = "a (b) \"c d\" <x:y>".chars().collect();
        let mut errors = Vec::new();
        let tokens = tokenize(&chars, &mut errors);

        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word("a".into()),
                TokenKind::LParen,
                TokenKind::Word("b".into()),
                TokenKind::RParen,
                TokenKind::Quoted("c d".into()),
                TokenKind::Uri("x:y".into()),
            ]
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_split_comparison_prefers_longest_operator() {
        assert_eq!(
            split_comparison("size:>1MB"),
            Some(("size".to_string(), Comparator::Greater, 2))
        );
        assert_eq!(
            split_comparison("rating>=3"),
            Some(("rating".to_string(), Comparator::GreaterOrEqual, 2))
        );
        assert_eq!(split_comparison("plain"), None);
        assert_eq!(split_comparison(":x"), None);
    }

    #[test]
    fn test_implicit_and() {
        let term = parse("foo bar").term.unwrap();
        let TermKind::And(terms) = &term.kind else {
            panic!("expected AND, got {:?}", term.kind);
        };
        assert_eq!(spans(terms), vec![(0, 3), (4, 3)]);
        assert_eq!((term.position, term.length), (0, 7));
    }

    #[test]
    fn test_or_binds_looser_than_and() {
        let term = parse("a b OR c").term.unwrap();
        let TermKind::Or(terms) = &term.kind else {
            panic!("expected OR");
        };
        assert!(matches!(terms[0].kind, TermKind::And(_)));
        assert_eq!(terms[1].kind, TermKind::Literal("c".into()));
    }

    #[test]
    fn test_negation_forms() {
        let term = parse("NOT tag:x").term.unwrap();
        assert!(matches!(&term.kind, TermKind::Negation(inner) if inner.is_comparison()));
        assert_eq!((term.position, term.length), (0, 9));

        let term = parse("-foo").term.unwrap();
        let TermKind::Negation(inner) = &term.kind else {
            panic!("expected negation");
        };
        assert_eq!((inner.position, inner.length), (1, 3));
        assert_eq!((term.position, term.length), (0, 4));
    }

    #[test]
    fn test_comparison_with_glued_subquery() {
        let term = parse("tag:(a OR b) x").term.unwrap();
        let TermKind::And(terms) = &term.kind else {
            panic!("expected AND");
        };
        let TermKind::Comparison { sub_term, .. } = &terms[0].kind else {
            panic!("expected comparison");
        };
        assert!(matches!(sub_term.kind, TermKind::Or(_)));
        assert_eq!((terms[0].position, terms[0].length), (0, 12));
    }

    #[test]
    fn test_comparison_with_quoted_value() {
        let term = parse("from:\"Jane Doe\"").term.unwrap();
        assert_eq!((term.position, term.length), (0, 15));
        let TermKind::Comparison { sub_term, .. } = &term.kind else {
            panic!("expected comparison");
        };
        assert_eq!(sub_term.kind, TermKind::Literal("Jane Doe".into()));
        assert_eq!(sub_term.position, 6);
    }

    #[test]
    fn test_resource_type_and_resource() {
        assert_eq!(
            parse("type:image").term.unwrap().kind,
            TermKind::ResourceType("image".into())
        );
        assert_eq!(
            parse("<file:/tmp/a>").term.unwrap().kind,
            TermKind::Resource("file:/tmp/a".into())
        );
    }

    #[test]
    fn test_filename_pattern_only_in_detect_mode() {
        let mut parser = KeywordParser::new();
        let term = parser
            .parse("*.rs", ParseMode::DetectFilenamePattern, None)
            .term
            .unwrap();
        assert!(matches!(
            &term.kind,
            TermKind::Comparison { property, .. } if property == "filename"
        ));

        let term = parser.parse("*.rs", ParseMode::Normal, None).term.unwrap();
        assert_eq!(term.kind, TermKind::Literal("*.rs".into()));
    }

    #[test]
    fn test_recovers_from_errors() {
        let query = parse("(a OR");
        assert_eq!(query.term.unwrap().kind, TermKind::Literal("a".into()));
        assert_eq!(
            query.errors,
            vec![
                QueryError::MissingOperand {
                    position: 3,
                    operator: "OR".into()
                },
                QueryError::UnclosedParenthesis { position: 0 },
            ]
        );

        let query = parse("a ) b");
        assert!(matches!(query.term.unwrap().kind, TermKind::And(_)));
        assert_eq!(query.errors, vec![QueryError::UnexpectedParenthesis { position: 2 }]);

        let query = parse("\"open");
        assert_eq!(query.term.unwrap().kind, TermKind::Literal("open".into()));
        assert_eq!(query.errors, vec![QueryError::UnterminatedQuote { position: 0 }]);
    }

    #[test]
    fn test_blank_query_has_no_term() {
        let query = parse("   ");
        assert!(query.term.is_none());
        assert!(query.errors.is_empty());
    }

    #[test]
    fn test_match_rule_prefix_and_glued() {
        let pattern: Vec<_> = ["tag:", "%"].iter().map(|p| PatternPart::parse(p)).collect();
        assert_eq!(match_rule(&pattern, &[(0, "ta".into())]), Some(0));
        assert_eq!(match_rule(&pattern, &[(0, "tag:wo".into())]), Some(1));
        assert_eq!(match_rule(&pattern, &[(0, "".into())]), None);
        assert_eq!(match_rule(&pattern, &[(0, "xyz".into())]), None);
    }

    #[test]
    fn test_proposals_for_multi_word_pattern() {
        let chars: Vec<char> = "sent by Jo".chars().collect();
        let proposals = proposals_at(&chars, 10);

        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].kind, ProposalKind::Contact);
        assert_eq!((proposals[0].position, proposals[0].length), (0, 10));
        assert_eq!(proposals[0].last_matched_part, 2);
    }

    #[test]
    fn test_proposals_after_whitespace() {
        let chars: Vec<char> = "modified since ".chars().collect();
        let proposals = proposals_at(&chars, 15);
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].kind, ProposalKind::DateTime);

        let chars: Vec<char> = "tag:work ".chars().collect();
        assert!(proposals_at(&chars, 9).is_empty());
    }
}
