use querybuilder::editor::mode::CompleterMode;
use querybuilder::editor::state::QueryBuilder;
use querybuilder::query::{KeywordParser, PatternPart, Proposal, ProposalKind};

fn builder() -> QueryBuilder<KeywordParser> {
    QueryBuilder::new(
        KeywordParser::new()
            .with_tags(["home", "travel", "work"])
            .with_contacts(["Alice", "Bob"]),
    )
}

fn tag_proposal(position: usize, length: usize) -> Proposal {
    Proposal {
        position,
        length,
        pattern: vec![PatternPart::Literal("tag:".into()), PatternPart::Placeholder],
        last_matched_part: 0,
        kind: ProposalKind::Tag,
        description: "Tagged with".into(),
    }
}

#[test]
fn test_apply_proposal_with_value() {
    let mut builder = builder();
    builder.insert_text("ta");

    builder.apply_proposal(&tag_proposal(0, 2), Some("work"));

    assert_eq!(builder.text(), "tag:work");
    assert_eq!(builder.cursor_position(), 8);
    assert!(!builder.completer().is_visible());
}

#[test]
fn test_apply_proposal_without_value_leaves_caret_on_placeholder() {
    let mut builder = builder();
    builder.insert_text("foo ta");

    builder.apply_proposal(&tag_proposal(4, 2), None);

    assert_eq!(builder.text(), "foo tag:");
    assert_eq!(builder.cursor_position(), 8);
}

#[test]
fn test_typed_prefix_preselects_tag() {
    let mut builder = builder();
    builder.insert_text("tag:wo");

    let completer = builder.completer();
    assert_eq!(completer.mode(), CompleterMode::Strings);
    assert_eq!(completer.strings()[completer.selected_index()], "work");

    assert!(builder.accept_selection());
    assert_eq!(builder.text(), "tag:work");
    assert_eq!(builder.cursor_position(), 8);
}

#[test]
fn test_contact_list_after_sent_by() {
    let mut builder = builder();
    builder.insert_text("sent by ");

    let completer = builder.completer();
    assert!(completer.is_visible());
    assert_eq!(completer.mode(), CompleterMode::Strings);
    assert_eq!(completer.strings(), &["Alice", "Bob"]);

    builder.completer_mut().select_next();
    assert!(builder.accept_selection());
    assert_eq!(builder.text(), "sent by Bob");
    assert_eq!(builder.cursor_position(), 11);
}

#[test]
fn test_date_picker_inserts_formatted_date() {
    let mut builder = builder();
    builder.insert_text("modified since ");
    assert_eq!(builder.completer().mode(), CompleterMode::DateTime);

    let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    builder.completer_mut().set_date(date);
    builder.completer_mut().shift_date(-1);
    builder.completer_mut().select_next();

    // Literals are rendered with their first spelling
    assert!(builder.accept_selection());
    assert_eq!(builder.text(), "modified after 2024-03-07");
}

#[test]
fn test_several_proposals_show_proposal_page() {
    let mut builder = builder();
    builder.insert_text("modified");

    let completer = builder.completer();
    assert!(completer.is_visible());
    assert_eq!(completer.mode(), CompleterMode::Proposals);
    assert_eq!(completer.proposals().len(), 2);
}

#[test]
fn test_accepting_a_proposal_keeps_the_caret_on_its_value() {
    let mut builder = builder();
    builder.insert_text("modified");
    builder.completer_mut().select_next();

    assert!(builder.accept_selection());
    assert_eq!(builder.text(), "modified before ");
    assert_eq!(builder.cursor_position(), 16);
}

#[test]
fn test_accept_does_nothing_when_hidden() {
    let mut builder = builder();
    builder.set_auto_complete(false);
    builder.insert_text("tag:");
    assert!(!builder.accept_selection());
    assert_eq!(builder.text(), "tag:");
}

#[test]
fn test_open_tag_list_without_proposal_replaces_word() {
    let mut builder = builder();
    builder.insert_text("foo tr");
    builder.open_tag_list();

    let completer = builder.completer();
    assert!(completer.is_visible());
    assert_eq!(completer.strings()[completer.selected_index()], "travel");

    assert!(builder.accept_selection());
    assert_eq!(builder.text(), "foo travel");
}
