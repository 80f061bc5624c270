//! querybuilder - an interactive query line that shows the parsed query as
//! nested, colored blocks and offers completions while typing.
//!
//! # Example
//!
//! ```
//! use querybuilder::editor::state::QueryBuilder;
//! use querybuilder::query::KeywordParser;
//!
//! let mut builder = QueryBuilder::new(KeywordParser::new());
//! builder.set_text("tag:vacation AND size:>1MB");
//!
//! let blocks = builder.tree().blocks();
//! assert_eq!(blocks.len(), 2);
//! assert_eq!(builder.text(), "tag:vacation AND size:>1MB");
//! ```

pub mod config;
pub mod document;
pub mod editor;
pub mod input;
pub mod query;
pub mod theme;
pub mod ui;
