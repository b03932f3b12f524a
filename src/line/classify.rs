//! Classification of physical script lines.
//!
//! Every line gets exactly one classification, decided on the trimmed line
//! with first match winning: knot header, stitch header, comment, choice,
//! standalone divert, directive, conditional branch, media tag, and finally
//! plain text. Lines which start like a structural pattern but are
//! malformed classify as `Raw` and are preserved verbatim: round-trip
//! fidelity takes priority over strict validation.

use crate::{
    consts::{
        BRANCH_MARKER, CHOICE_MARKER, DIRECTIVE_MARKER, DIVERT_MARKER, LAYOUT_COMMENT_MARKER,
        LINE_COMMENT_MARKER, STICKY_CHOICE_MARKER, STITCH_MARKER,
    },
    content::BranchCondition,
    line::{
        choice::{parse_choice_fields, ChoiceFields},
        directive::{parse_directive, Directive},
        divert::{read_divert_target, split_at_divert_marker},
        media::{parse_media_tag, MediaFields},
        name::{read_knot_name, read_stitch_name},
    },
};

#[derive(Clone, Debug, PartialEq)]
/// Classification of one physical line.
pub enum LineKind {
    /// `=== name ===` with two or more equals signs.
    KnotHeader {
        /// Validated knot name.
        name: String,
    },
    /// `= name` with exactly one equals sign.
    StitchHeader {
        /// Validated stitch name.
        name: String,
    },
    /// `// ...`, preserved verbatim and never interpreted.
    Comment {
        /// Whether this is a layout comment carrying UI metadata,
        /// hidden from display but kept for serialization.
        layout: bool,
    },
    /// Choice line with marker, display text and optional inline divert.
    Choice(ChoiceFields),
    /// Standalone `-> target` line.
    Divert {
        /// Divert target.
        target: String,
    },
    /// `~` directive line.
    Directive(Directive),
    /// `- condition:` or `- else:` branch introducer.
    Branch {
        /// Condition of the introduced branch.
        condition: BranchCondition,
    },
    /// `<...>` media tag line.
    Media(MediaFields),
    /// Plain dialogue text with an optional inline divert split off.
    Text {
        /// The dialogue text, trimmed.
        text: String,
        /// Inline divert following the text, if present.
        divert: Option<String>,
    },
    /// Line with no content.
    Blank,
    /// Recognizable but malformed structural syntax, preserved verbatim.
    Raw,
}

/// Classify a single physical line.
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    if trimmed.starts_with(LINE_COMMENT_MARKER) {
        return LineKind::Comment {
            layout: trimmed.starts_with(LAYOUT_COMMENT_MARKER),
        };
    }

    if trimmed.starts_with(STITCH_MARKER) {
        return classify_header(trimmed);
    }

    let first = trimmed.chars().next().unwrap();

    if first == CHOICE_MARKER || first == STICKY_CHOICE_MARKER {
        return match parse_choice_fields(trimmed) {
            Some(fields) => LineKind::Choice(fields),
            None => LineKind::Raw,
        };
    }

    if trimmed.starts_with(DIVERT_MARKER) {
        return match read_divert_target(trimmed) {
            Some(target) => LineKind::Divert { target },
            None => LineKind::Raw,
        };
    }

    if first == DIRECTIVE_MARKER {
        return match parse_directive(trimmed) {
            Some(directive) => LineKind::Directive(directive),
            None => LineKind::Raw,
        };
    }

    if first == BRANCH_MARKER {
        if let Some(kind) = classify_branch(trimmed) {
            return kind;
        }
    }

    if first == '<' && trimmed.ends_with('>') {
        return match parse_media_tag(trimmed) {
            Some(fields) => LineKind::Media(fields),
            None => LineKind::Raw,
        };
    }

    classify_text(trimmed)
}

/// Classify a line starting with at least one equals sign.
fn classify_header(trimmed: &str) -> LineKind {
    let header = if trimmed.get(STITCH_MARKER.len()..).map_or(false, |rest| {
        rest.starts_with(STITCH_MARKER)
    }) {
        read_knot_name(trimmed).map(|name| LineKind::KnotHeader { name })
    } else {
        read_stitch_name(trimmed).map(|name| LineKind::StitchHeader { name })
    };

    header.unwrap_or(LineKind::Raw)
}

/// Classify a `- condition:` branch introducer.
///
/// Lines starting with `-` but missing the trailing colon are not branch
/// introducers at all and fall through to plain text.
fn classify_branch(trimmed: &str) -> Option<LineKind> {
    let body = trimmed
        .get(BRANCH_MARKER.len_utf8()..)
        .map(str::trim)
        .unwrap_or("");

    if !body.ends_with(':') {
        return None;
    }

    let condition_name = body.get(..body.len() - 1).unwrap().trim();

    let condition = if condition_name.eq_ignore_ascii_case("else") {
        BranchCondition::Else
    } else if !condition_name.is_empty()
        && condition_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        BranchCondition::Flag(condition_name.to_string())
    } else {
        return Some(LineKind::Raw);
    };

    Some(LineKind::Branch { condition })
}

/// Classify a plain text line, splitting off an inline divert if present.
fn classify_text(trimmed: &str) -> LineKind {
    let (text, divert_part) = split_at_divert_marker(trimmed);

    if !divert_part.is_empty() {
        if let Some(target) = read_divert_target(divert_part) {
            return LineKind::Text {
                text: text.trim().to_string(),
                divert: Some(target),
            };
        }
    }

    LineKind::Text {
        text: trimmed.to_string(),
        divert: None,
    }
}
