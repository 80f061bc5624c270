use querybuilder::query::{
    highlight, Comparator, KeywordParser, ParseMode, ProposalKind, QueryError, QueryParser,
    TermKind,
};

fn parse(text: &str) -> querybuilder::query::Query {
    KeywordParser::new().parse(text, ParseMode::Normal, None)
}

#[test]
fn test_comparison_operators() {
    let cases = [
        ("size:>1MB", Comparator::Greater),
        ("size:<1MB", Comparator::Smaller),
        ("rating>=3", Comparator::GreaterOrEqual),
        ("rating<=3", Comparator::SmallerOrEqual),
        ("tag:work", Comparator::Contains),
        ("name=foo", Comparator::Equal),
    ];

    for (text, expected) in cases {
        let term = parse(text).term.unwrap();
        let TermKind::Comparison { comparator, .. } = term.kind else {
            panic!("{} did not parse as a comparison", text);
        };
        assert_eq!(comparator, expected, "{}", text);
    }
}

#[test]
fn test_symbolic_boolean_operators() {
    let term = parse("a && b || c").term.unwrap();
    let TermKind::Or(terms) = &term.kind else {
        panic!("expected OR");
    };
    assert_eq!(terms.len(), 2);
    assert!(matches!(terms[0].kind, TermKind::And(_)));
}

#[test]
fn test_term_spans_cover_source() {
    let term = parse("tag:vacation AND size:>1MB").term.unwrap();
    let TermKind::And(terms) = &term.kind else {
        panic!("expected AND");
    };
    let spans: Vec<_> = terms.iter().map(|t| (t.position, t.length)).collect();
    assert_eq!(spans, vec![(0, 12), (17, 9)]);
}

#[test]
fn test_unclosed_parenthesis_is_reported() {
    let query = parse("(tag:a OR tag:b");
    assert!(query.term.is_some());
    assert_eq!(query.errors, vec![QueryError::UnclosedParenthesis { position: 0 }]);
}

#[test]
fn test_proposals_only_with_cursor() {
    let mut parser = KeywordParser::new();
    parser.parse("tag:", ParseMode::Normal, None);
    assert!(parser.completion_proposals().is_empty());

    parser.parse("tag:", ParseMode::Normal, Some(4));
    let proposals = parser.completion_proposals();
    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0].kind, ProposalKind::Tag);
    assert_eq!((proposals[0].position, proposals[0].length), (0, 4));
}

#[test]
fn test_type_values_are_proposed() {
    let mut parser = KeywordParser::new();
    parser.parse("type:", ParseMode::Normal, Some(5));
    let proposals = parser.completion_proposals();
    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0].description, "Of type");
}

#[test]
fn test_tags_and_contacts_are_sorted_sets() {
    let parser = KeywordParser::new()
        .with_tags(["work", "home", "work"])
        .with_contacts(["Bob", "Alice"]);

    let tags: Vec<_> = parser.all_tags().into_iter().collect();
    assert_eq!(tags, vec!["home", "work"]);
    let contacts: Vec<_> = parser.all_contacts().into_iter().collect();
    assert_eq!(contacts, vec!["Alice", "Bob"]);
}

#[test]
fn test_highlight_colors_comparisons_only() {
    let query = parse("foo tag:x");
    let styles = highlight("foo tag:x", query.term.as_ref());

    assert_eq!(styles.len(), 9);
    assert!(styles[0].color.is_none());
    assert!(styles[4].color.is_some());
    assert!(styles[4].italic);
}
