//! Parsing choice lines.
//!
//! A choice line starts with `*` (or `+` for sticky choices), optionally
//! wraps its display text in `[...]` brackets and may end with an inline
//! divert: `* [Send selfie] -> selfie_sent`.

use crate::{
    consts::{CHOICE_MARKER, STICKY_CHOICE_MARKER},
    line::divert::{read_divert_target, split_at_divert_marker},
};

/// Parsed fields of a choice line.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoiceFields {
    /// Display text of the choice.
    pub text: String,
    /// Whether the choice uses the sticky marker.
    pub is_sticky: bool,
    /// Inline divert target, if present.
    pub divert: Option<String>,
}

/// Parse the fields of a choice from a line, if the line represents one.
///
/// Returns `None` both for lines which are not choices and for lines which
/// start like a choice but are malformed, for example with unmatched
/// brackets. The caller preserves the latter as raw content.
pub fn parse_choice_fields(content: &str) -> Option<ChoiceFields> {
    let (is_sticky, after_marker) = split_choice_marker(content)?;

    let (before_divert, divert_part) = split_at_divert_marker(after_marker);

    let divert = if divert_part.is_empty() {
        None
    } else {
        // A malformed target after the marker makes the whole line raw.
        Some(read_divert_target(divert_part)?)
    };

    let text = read_display_text(before_divert.trim())?;

    Some(ChoiceFields {
        text,
        is_sticky,
        divert,
    })
}

/// Split the choice marker from a line and determine whether it is sticky.
///
/// Lines mixing sticky and non-sticky markers are malformed and yield `None`.
fn split_choice_marker(content: &str) -> Option<(bool, &str)> {
    let trimmed = content.trim_start();

    let marker = trimmed.chars().next()?;

    let is_sticky = match marker {
        CHOICE_MARKER => false,
        STICKY_CHOICE_MARKER => true,
        _ => return None,
    };

    let after_marker = trimmed.trim_start_matches(marker);

    let next_content = after_marker.trim_start().chars().next();
    if next_content == Some(CHOICE_MARKER) || next_content == Some(STICKY_CHOICE_MARKER) {
        return None;
    }

    Some((is_sticky, after_marker))
}

/// Read the display text of a choice, resolving optional `[...]` brackets.
///
/// Text wrapped in brackets is the display text; without brackets the whole
/// remainder is used. Unmatched or repeated brackets yield `None`.
fn read_display_text(content: &str) -> Option<String> {
    match (content.find('['), content.find(']')) {
        (Some(i), Some(j)) if i < j => {
            if content.rfind('[').unwrap() != i || content.rfind(']').unwrap() != j {
                return None;
            }

            Some(content.get(i + 1..j).unwrap().trim().to_string())
        }
        (None, None) => Some(content.trim().to_string()),
        _ => None,
    }
}
