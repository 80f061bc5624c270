//! Turning a completer selection into a buffer edit.
//!
//! Both functions are pure: they compute an [`Edit`] and leave applying it
//! (and reparsing) to the query builder.

use crate::document::node::char_len;
use crate::query::proposal::is_glued;
use crate::query::{PatternPart, Proposal};

/// Replace the characters `[start, end)` with `replacement`, then put the
/// caret at `cursor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
    pub cursor: usize,
}

/// Renders `proposal` over its source range.
///
/// Literal parts use their first alternative. The first placeholder receives
/// `value`; without a value the caret is left where the placeholder goes.
///
/// ```
/// use querybuilder::editor::completion::proposal_edit;
/// use querybuilder::query::{PatternPart, Proposal, ProposalKind};
///
/// let proposal = Proposal {
///     position: 0,
///     length: 3,
///     pattern: vec![PatternPart::Literal("tag:".into()), PatternPart::Placeholder],
///     last_matched_part: 0,
///     kind: ProposalKind::Tag,
///     description: String::new(),
/// };
///
/// let edit = proposal_edit(&proposal, Some("work"));
/// assert_eq!(edit.replacement, "tag:work");
/// assert_eq!(edit.cursor, 8);
/// ```
pub fn proposal_edit(proposal: &Proposal, value: Option<&str>) -> Edit {
    let mut replacement = String::new();
    let mut placeholder_offset = None;
    let mut glued = true;

    for part in &proposal.pattern {
        if !glued {
            replacement.push(' ');
        }

        match part {
            PatternPart::Literal(_) => {
                let text = part.first_alternative().unwrap_or_default();
                replacement.push_str(text);
                glued = is_glued(text);
            }
            PatternPart::Placeholder => {
                if placeholder_offset.is_none() {
                    placeholder_offset = Some(char_len(&replacement));
                    replacement.push_str(value.unwrap_or_default());
                }
                glued = false;
            }
        }
    }

    let cursor = match (value, placeholder_offset) {
        (None, Some(offset)) => proposal.position + offset,
        _ => proposal.position + char_len(&replacement),
    };

    Edit {
        start: proposal.position,
        end: proposal.position + proposal.length,
        replacement,
        cursor,
    }
}

/// Start of the whitespace-delimited word ending at `cursor`.
fn word_start(chars: &[char], cursor: usize) -> usize {
    chars[..cursor]
        .iter()
        .rposition(|ch| ch.is_whitespace())
        .map_or(0, |index| index + 1)
}

/// Replaces the word ending at `cursor` in `text` with `value`.
pub fn value_edit(text: &str, cursor: usize, value: &str) -> Edit {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());
    let start = word_start(&chars, cursor);

    Edit {
        start,
        end: cursor,
        replacement: value.to_string(),
        cursor: start + char_len(value),
    }
}

/// What has been typed for a value so far: the word ending at `cursor`,
/// without any `property:` prefix glued to it.
pub fn typed_value(text: &str, cursor: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());
    let word = &chars[word_start(&chars, cursor)..cursor];

    let value_start = word
        .iter()
        .rposition(|ch| matches!(ch, ':' | '>' | '<' | '='))
        .map_or(0, |index| index + 1);
    word[value_start..].iter().collect()
}
