//! Serialization of the document model back into script text.
//!
//! Serialization always emits the canonical spelling of every construct:
//! `=== name ===` knot headers, bracketed choice text, `<kind: name>` media
//! tags and durations without a trailing `.0`. Text which parsed from a
//! shorthand spelling therefore normalizes on its first round trip and is
//! byte-stable afterwards. Raw items are emitted verbatim, which is what
//! keeps unrecognized lines intact.

use crate::{
    consts::{
        BRANCH_MARKER, CHOICE_MARKER, DIRECTIVE_MARKER, DIVERT_MARKER, FAKE_TYPE_DIRECTIVE,
        IMAGE_TAG, KNOT_MARKER, NESTED_INDENT, PLAYER_IMAGE_TAG, PLAYER_VIDEO_TAG,
        REMOVE_FLAG_DIRECTIVE, SET_FLAG_DIRECTIVE, SIDE_STORY_DIRECTIVE, STICKY_CHOICE_MARKER,
        STITCH_MARKER, TRANSITION_DIRECTIVE, VIDEO_TAG, WAIT_DIRECTIVE,
    },
    content::{Branch, BranchCondition, ChoiceData, ContentItem, ContentKind, MediaKind},
    document::{Knot, ParsedInk},
};

/// Serialize a whole document into script text.
pub fn serialize_document(document: &ParsedInk) -> String {
    let mut blocks = Vec::new();

    if let Some(target) = &document.initial_divert {
        blocks.push(format!("{} {}\n", DIVERT_MARKER, target));
    }

    for knot in &document.knots {
        blocks.push(serialize_knot(knot));
    }

    blocks.join("\n")
}

/// Serialize a single knot, header line included.
pub fn serialize_knot(knot: &Knot) -> String {
    let header_marker = format!("{}=", KNOT_MARKER);
    let mut lines = vec![format!(
        "{marker} {name} {marker}",
        marker = header_marker,
        name = knot.name
    )];

    serialize_items(&knot.items, 0, &mut lines);

    let mut text = lines.join("\n");
    text.push('\n');

    text
}

fn serialize_items(items: &[ContentItem], depth: usize, lines: &mut Vec<String>) {
    for item in items {
        serialize_item(item, depth, lines);
    }
}

fn serialize_item(item: &ContentItem, depth: usize, lines: &mut Vec<String>) {
    let pad = indent(depth);

    match &item.kind {
        ContentKind::Text { text } => lines.push(format!("{}{}", pad, text)),
        ContentKind::Media { kind, name } => {
            lines.push(format!("{}<{}: {}>", pad, media_tag(*kind), name))
        }
        ContentKind::FakeType { seconds } => lines.push(format!(
            "{}{} {}({})",
            pad,
            DIRECTIVE_MARKER,
            FAKE_TYPE_DIRECTIVE,
            format_seconds(*seconds)
        )),
        ContentKind::Wait { seconds } => lines.push(format!(
            "{}{} {}({})",
            pad,
            DIRECTIVE_MARKER,
            WAIT_DIRECTIVE,
            format_seconds(*seconds)
        )),
        ContentKind::Choice(choice) => serialize_choice(choice, depth, lines),
        ContentKind::Stitch { name } => lines.push(format!("{} {}", STITCH_MARKER, name)),
        ContentKind::Divert { target } => {
            lines.push(format!("{}{} {}", pad, DIVERT_MARKER, target))
        }
        ContentKind::Conditional { branches } => {
            for branch in branches {
                serialize_branch(branch, depth, lines);
            }
        }
        ContentKind::FlagOp { name, operation } => {
            let directive = match operation {
                crate::content::FlagOperation::Remove => REMOVE_FLAG_DIRECTIVE,
                _ => SET_FLAG_DIRECTIVE,
            };

            lines.push(format!(
                "{}{} {}(\"{}\")",
                pad, DIRECTIVE_MARKER, directive, name
            ));
        }
        ContentKind::SideStory { name } => lines.push(format!(
            "{}{} {}(\"{}\")",
            pad, DIRECTIVE_MARKER, SIDE_STORY_DIRECTIVE, name
        )),
        ContentKind::Transition { title, subtitle } => {
            let line = match subtitle {
                Some(subtitle) => format!(
                    "{}{} {}(\"{}\", \"{}\")",
                    pad, DIRECTIVE_MARKER, TRANSITION_DIRECTIVE, title, subtitle
                ),
                None => format!(
                    "{}{} {}(\"{}\")",
                    pad, DIRECTIVE_MARKER, TRANSITION_DIRECTIVE, title
                ),
            };

            lines.push(line);
        }
        ContentKind::Raw { text } => lines.push(format!("{}{}", pad, text)),
    }
}

fn serialize_choice(choice: &ChoiceData, depth: usize, lines: &mut Vec<String>) {
    let marker = if choice.is_sticky {
        STICKY_CHOICE_MARKER
    } else {
        CHOICE_MARKER
    };

    let mut line = format!("{}{} [{}]", indent(depth), marker, choice.text);

    if let Some(target) = &choice.divert {
        line.push_str(&format!(" {} {}", DIVERT_MARKER, target));
    }

    lines.push(line);

    serialize_items(&choice.nested, depth + 1, lines);
}

fn serialize_branch(branch: &Branch, depth: usize, lines: &mut Vec<String>) {
    let condition = match &branch.condition {
        BranchCondition::Flag(name) => name.as_str(),
        BranchCondition::Else => "else",
    };

    lines.push(format!("{}{} {}:", indent(depth), BRANCH_MARKER, condition));

    serialize_items(&branch.content, depth + 1, lines);

    if let Some(target) = &branch.divert {
        lines.push(format!("{}{} {}", indent(depth + 1), DIVERT_MARKER, target));
    }
}

fn media_tag(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => IMAGE_TAG,
        MediaKind::PlayerImage => PLAYER_IMAGE_TAG,
        MediaKind::Video => VIDEO_TAG,
        MediaKind::PlayerVideo => PLAYER_VIDEO_TAG,
    }
}

/// Format a duration without a trailing `.0`.
fn format_seconds(seconds: f32) -> String {
    if seconds.fract() == 0.0 {
        format!("{}", seconds as i64)
    } else {
        format!("{}", seconds)
    }
}

fn indent(depth: usize) -> String {
    " ".repeat(depth * NESTED_INDENT)
}
