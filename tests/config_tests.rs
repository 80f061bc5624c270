use querybuilder::config::Config;
use querybuilder::editor::state::QueryBuilder;
use querybuilder::query::{KeywordParser, QueryParser};
use tempfile::tempdir;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.theme, "default-dark");
    assert!(config.auto_complete);
    assert_eq!(config.date_format, "%Y-%m-%d");
    assert!(config.tags.is_empty());
    assert!(config.contacts.is_empty());
}

#[test]
fn test_load_full_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"theme = "nord"
auto_complete = false
date_format = "%d.%m.%Y"
tags = ["work", "travel"]
contacts = ["Alice"]
"#,
    )
    .unwrap();

    let config = Config {
        theme: "nord".to_string(),
        auto_complete: false,
        date_format: "%d.%m.%Y".to_string(),
        tags: vec!["work".to_string(), "travel".to_string()],
        contacts: vec!["Alice".to_string()],
    };
    assert_eq!(Config::load_from(&path), config);
}

#[test]
fn test_invalid_date_format_in_file_gives_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "date_format = \"%Q\"\ntheme = \"nord\"\n").unwrap();

    let config = Config::load_from(&path);
    assert_eq!(config.date_format, "%Y-%m-%d");
    assert_eq!(config.theme, "nord");
}

#[test]
fn test_invalid_date_format_does_not_break_date_completion() {
    let config = Config {
        date_format: "%Q".to_string(),
        ..Config::default()
    };
    let mut builder = QueryBuilder::with_config(KeywordParser::new(), &config);
    builder.insert_text("modified since ");
    builder
        .completer_mut()
        .set_date(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

    assert!(builder.accept_selection());
    assert_eq!(builder.text(), "modified after 2024-03-01");
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "tags = [\"home\"]\n").unwrap();

    let config = Config::load_from(&path);
    assert_eq!(config.tags, vec!["home".to_string()]);
    assert_eq!(config.theme, "default-dark");
    assert!(config.auto_complete);
}

#[test]
fn test_invalid_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "theme = [not toml").unwrap();

    assert_eq!(Config::load_from(&path), Config::default());
}

#[test]
fn test_config_drives_parser_and_builder() {
    let config = Config {
        auto_complete: false,
        date_format: "%d/%m/%Y".to_string(),
        tags: vec!["urgent".to_string()],
        ..Config::default()
    };

    let parser = KeywordParser::from_config(&config);
    assert!(parser.all_tags().contains("urgent"));

    let mut builder = QueryBuilder::with_config(parser, &config);
    assert!(!builder.auto_complete());

    let date = chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    builder.completer_mut().set_date(date);
    assert_eq!(builder.completer().formatted_date(), "31/12/2024");
}
