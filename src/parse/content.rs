//! Parsing of knot body content into the ordered item tree.
//!
//! The parser walks the classified lines of one knot body in order and
//! keeps a single current insertion point: the root list, or the nested
//! list of the most recent choice without an inline divert. Eagerness
//! toward nesting is the rule: once a choice opens, every following line
//! which is not itself a choice, stitch header or knot header belongs to
//! that choice, and a stitch header is the only explicit way to break out.
//!
//! Nothing in here fails. Malformed lines become raw items and a warning;
//! dangling choices are left for downstream analysis.

use crate::{
    content::{
        Branch, BranchCondition, ChoiceData, ContentItem, ContentKind, FlagOperation, MediaKind,
    },
    error::MetaData,
    line::{classify_line, Directive, LineKind},
    log::{Logger, Warning},
    parse::IdGen,
};

/// One classified line of a knot body.
pub(crate) struct BodyLine<'a> {
    pub kind: LineKind,
    pub text: &'a str,
    pub meta_data: MetaData,
}

/// Classify all lines of a knot body.
pub(crate) fn classify_body<'a>(lines: &[(&'a str, MetaData)]) -> Vec<BodyLine<'a>> {
    lines
        .iter()
        .map(|(text, meta_data)| BodyLine {
            kind: classify_line(text),
            text,
            meta_data: meta_data.clone(),
        })
        .collect()
}

/// Parse the classified lines of one knot body into its content tree.
pub(crate) fn parse_body(
    lines: &[BodyLine],
    ids: &mut IdGen,
    log: &mut Logger,
) -> Vec<ContentItem> {
    let mut items = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let line = &lines[index];

        match &line.kind {
            // Knot headers never appear inside a body; guard anyway.
            LineKind::KnotHeader { .. } => break,
            LineKind::StitchHeader { name } => {
                items.push(make_item(
                    ids,
                    line,
                    ContentKind::Stitch { name: name.clone() },
                ));
                index += 1;
            }
            LineKind::Choice(fields) => {
                let nested = if fields.divert.is_none() {
                    index += 1;
                    parse_choice_body(lines, &mut index, ids, log)
                } else {
                    // The choice has already diverted; following lines
                    // return to the root level.
                    index += 1;
                    Vec::new()
                };

                items.push(make_item(
                    ids,
                    line,
                    ContentKind::Choice(ChoiceData {
                        text: fields.text.clone(),
                        is_sticky: fields.is_sticky,
                        divert: fields.divert.clone(),
                        nested,
                    }),
                ));
            }
            LineKind::Branch { .. } => {
                let conditional = parse_conditional(lines, &mut index, ids, log);
                items.push(conditional);
            }
            _ => {
                if let Some(parsed) = parse_plain_line(line, ids, log) {
                    for item in parsed {
                        items.push(item);
                    }
                }
                index += 1;
            }
        }
    }

    items
}

/// Capture the nested content of a choice without an inline divert.
///
/// Capture ends at the next choice, stitch header or knot header, or right
/// after a standalone divert since flow has then left the choice.
fn parse_choice_body(
    lines: &[BodyLine],
    index: &mut usize,
    ids: &mut IdGen,
    log: &mut Logger,
) -> Vec<ContentItem> {
    let mut nested = Vec::new();

    while *index < lines.len() {
        let line = &lines[*index];

        match &line.kind {
            LineKind::KnotHeader { .. }
            | LineKind::StitchHeader { .. }
            | LineKind::Choice(..) => break,
            LineKind::Branch { .. } => {
                let conditional = parse_conditional(lines, index, ids, log);
                nested.push(conditional);
            }
            LineKind::Divert { target } => {
                nested.push(make_item(
                    ids,
                    line,
                    ContentKind::Divert {
                        target: target.clone(),
                    },
                ));
                *index += 1;
                break;
            }
            _ => {
                if let Some(parsed) = parse_plain_line(line, ids, log) {
                    let ends_in_divert = parsed
                        .last()
                        .map(|item| match item.kind {
                            ContentKind::Divert { .. } => true,
                            _ => false,
                        })
                        .unwrap_or(false);

                    for item in parsed {
                        nested.push(item);
                    }

                    if ends_in_divert {
                        *index += 1;
                        break;
                    }
                }
                *index += 1;
            }
        }
    }

    nested
}

/// Parse a conditional block starting at a branch introducer line.
///
/// Each branch collects its own content with the same rules as choices.
/// A standalone or inline divert sets the branch divert and closes the
/// branch; the block closes at the first line which is neither a branch
/// introducer nor branch body content.
fn parse_conditional(
    lines: &[BodyLine],
    index: &mut usize,
    ids: &mut IdGen,
    log: &mut Logger,
) -> ContentItem {
    let opening = &lines[*index];
    let mut branches = Vec::new();

    while *index < lines.len() {
        let condition = match &lines[*index].kind {
            LineKind::Branch { condition } => condition.clone(),
            _ => break,
        };

        let branch_meta = lines[*index].meta_data.clone();
        *index += 1;

        let (content, divert) = parse_branch_body(lines, index, ids, log);

        branches.push(Branch {
            condition,
            content,
            divert,
            meta_data: branch_meta,
        });
    }

    make_item(ids, opening, ContentKind::Conditional { branches })
}

/// Collect the content of one conditional branch.
fn parse_branch_body(
    lines: &[BodyLine],
    index: &mut usize,
    ids: &mut IdGen,
    log: &mut Logger,
) -> (Vec<ContentItem>, Option<String>) {
    let mut content = Vec::new();
    let mut divert = None;

    while *index < lines.len() {
        let line = &lines[*index];

        match &line.kind {
            LineKind::KnotHeader { .. }
            | LineKind::StitchHeader { .. }
            | LineKind::Choice(..)
            | LineKind::Branch { .. } => break,
            LineKind::Divert { target } => {
                divert = Some(target.clone());
                *index += 1;
                break;
            }
            LineKind::Text {
                text,
                divert: Some(target),
            } => {
                content.push(make_item(
                    ids,
                    line,
                    ContentKind::Text { text: text.clone() },
                ));
                divert = Some(target.clone());
                *index += 1;
                break;
            }
            _ => {
                if let Some(parsed) = parse_plain_line(line, ids, log) {
                    for item in parsed {
                        content.push(item);
                    }
                }
                *index += 1;
            }
        }
    }

    (content, divert)
}

/// Parse a line which does not affect the insertion point.
///
/// Returns up to two items since text with an inline divert splits into a
/// text item followed by a divert item. Blank lines yield nothing.
fn parse_plain_line(
    line: &BodyLine,
    ids: &mut IdGen,
    log: &mut Logger,
) -> Option<Vec<ContentItem>> {
    let kind = match &line.kind {
        LineKind::Blank => return None,
        LineKind::Comment { .. } => ContentKind::Raw {
            text: line.text.trim().to_string(),
        },
        LineKind::Raw => {
            log.add_warning(
                Warning::UnrecognizedSyntax {
                    line: line.text.trim().to_string(),
                },
                &line.meta_data,
            );

            ContentKind::Raw {
                text: line.text.trim().to_string(),
            }
        }
        LineKind::Divert { target } => ContentKind::Divert {
            target: target.clone(),
        },
        LineKind::Media(fields) => media_kind(fields.kind, &fields.name),
        LineKind::Directive(directive) => directive_kind(directive),
        LineKind::Text { text, divert } => {
            let mut items = vec![make_item(
                ids,
                line,
                ContentKind::Text { text: text.clone() },
            )];

            if let Some(target) = divert {
                items.push(make_item(
                    ids,
                    line,
                    ContentKind::Divert {
                        target: target.clone(),
                    },
                ));
            }

            return Some(items);
        }
        // Remaining structural kinds are handled by the callers.
        LineKind::KnotHeader { .. }
        | LineKind::StitchHeader { .. }
        | LineKind::Choice(..)
        | LineKind::Branch { .. } => return None,
    };

    Some(vec![make_item(ids, line, kind)])
}

fn media_kind(kind: MediaKind, name: &str) -> ContentKind {
    ContentKind::Media {
        kind,
        name: name.to_string(),
    }
}

fn directive_kind(directive: &Directive) -> ContentKind {
    match directive {
        Directive::SetFlag(name) => ContentKind::FlagOp {
            name: name.clone(),
            operation: FlagOperation::Set,
        },
        Directive::RemoveFlag(name) => ContentKind::FlagOp {
            name: name.clone(),
            operation: FlagOperation::Remove,
        },
        Directive::FakeType(seconds) => ContentKind::FakeType { seconds: *seconds },
        Directive::Wait(seconds) => ContentKind::Wait { seconds: *seconds },
        Directive::SideStory(name) => ContentKind::SideStory { name: name.clone() },
        Directive::Transition { title, subtitle } => ContentKind::Transition {
            title: title.clone(),
            subtitle: subtitle.clone(),
        },
    }
}

fn make_item(ids: &mut IdGen, line: &BodyLine, kind: ContentKind) -> ContentItem {
    ContentItem {
        id: ids.next(),
        meta_data: line.meta_data.clone(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<ContentItem> {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (line, MetaData::from(i)))
            .collect::<Vec<_>>();

        let classified = classify_body(&lines);

        let mut ids = IdGen::default();
        let mut log = Logger::default();

        parse_body(&classified, &mut ids, &mut log)
    }

    fn kinds(items: &[ContentItem]) -> Vec<&ContentKind> {
        items.iter().map(|item| &item.kind).collect()
    }

    #[test]
    fn plain_lines_parse_to_text_items_in_order() {
        let items = parse("One\nTwo");

        match kinds(&items)[..] {
            [ContentKind::Text { text: one }, ContentKind::Text { text: two }] => {
                assert_eq!(one, "One");
                assert_eq!(two, "Two");
            }
            _ => panic!("unexpected items: {:?}", items),
        }
    }

    #[test]
    fn choice_with_inline_divert_captures_no_nested_content() {
        let items = parse("* [Hi] -> start\n-> END");

        assert_eq!(items.len(), 2);

        match &items[0].kind {
            ContentKind::Choice(choice) => {
                assert_eq!(choice.divert.as_deref(), Some("start"));
                assert!(choice.nested.is_empty());
            }
            other => panic!("expected a choice but got {:?}", other),
        }

        match &items[1].kind {
            ContentKind::Divert { target } => assert_eq!(target, "END"),
            other => panic!("expected a divert but got {:?}", other),
        }
    }

    #[test]
    fn choice_without_divert_captures_following_lines_as_nested_content() {
        let items = parse("* [Send selfie]\n    <player-selfie.png>\nStill nested");

        assert_eq!(items.len(), 1);

        match &items[0].kind {
            ContentKind::Choice(choice) => {
                assert_eq!(choice.nested.len(), 2);
                match &choice.nested[0].kind {
                    ContentKind::Media { kind, name } => {
                        assert_eq!(*kind, MediaKind::PlayerImage);
                        assert_eq!(name, "selfie");
                    }
                    other => panic!("expected nested media but got {:?}", other),
                }
            }
            other => panic!("expected a choice but got {:?}", other),
        }
    }

    #[test]
    fn stitch_header_ends_nested_capture_and_returns_to_root() {
        let items = parse("* [Send selfie]\n    <player-selfie.png>\n= after_selfie\n* [Done] -> goodbye");

        assert_eq!(items.len(), 3);

        match &items[0].kind {
            ContentKind::Choice(choice) => assert_eq!(choice.nested.len(), 1),
            other => panic!("expected a choice but got {:?}", other),
        }

        match &items[1].kind {
            ContentKind::Stitch { name } => assert_eq!(name, "after_selfie"),
            other => panic!("expected a stitch but got {:?}", other),
        }

        match &items[2].kind {
            ContentKind::Choice(choice) => assert_eq!(choice.divert.as_deref(), Some("goodbye")),
            other => panic!("expected a choice but got {:?}", other),
        }
    }

    #[test]
    fn nested_divert_closes_the_choice_capture() {
        let items = parse("* [Hi]\n    A line\n    -> elsewhere\nBack at root");

        assert_eq!(items.len(), 2);

        match &items[0].kind {
            ContentKind::Choice(choice) => {
                assert_eq!(choice.nested.len(), 2);
                match &choice.nested[1].kind {
                    ContentKind::Divert { target } => assert_eq!(target, "elsewhere"),
                    other => panic!("expected a nested divert but got {:?}", other),
                }
            }
            other => panic!("expected a choice but got {:?}", other),
        }
    }

    #[test]
    fn inline_divert_in_nested_text_also_closes_the_capture() {
        let items = parse("* [Hi]\n    See you -> beach\nBack at root");

        assert_eq!(items.len(), 2);

        match &items[0].kind {
            ContentKind::Choice(choice) => assert_eq!(choice.nested.len(), 2),
            other => panic!("expected a choice but got {:?}", other),
        }
    }

    #[test]
    fn consecutive_choices_stay_at_the_same_level() {
        let items = parse("* [One]\n* [Two]\n* [Three]");

        assert_eq!(items.len(), 3);
    }

    #[test]
    fn conditional_blocks_group_consecutive_branches() {
        let items =
            parse("- met_sam:\n    Welcome back!\n- else:\n    Who are you?\n    -> END\nAfter");

        assert_eq!(items.len(), 2);

        match &items[0].kind {
            ContentKind::Conditional { branches } => {
                assert_eq!(branches.len(), 2);
                assert_eq!(
                    branches[0].condition,
                    BranchCondition::Flag("met_sam".to_string())
                );
                assert_eq!(branches[1].condition, BranchCondition::Else);
                assert_eq!(branches[0].content.len(), 1);
                assert_eq!(branches[1].divert.as_deref(), Some("END"));
            }
            other => panic!("expected a conditional but got {:?}", other),
        }

        match &items[1].kind {
            ContentKind::Text { text } => assert_eq!(text, "After"),
            other => panic!("expected root text after the block but got {:?}", other),
        }
    }

    #[test]
    fn branches_capture_plain_lines_until_a_divert_or_structural_line() {
        let items = parse("- met_sam:\n    Welcome back!\nStill in the branch");

        assert_eq!(items.len(), 1);

        match &items[0].kind {
            ContentKind::Conditional { branches } => {
                assert_eq!(branches.len(), 1);
                assert_eq!(branches[0].content.len(), 2);
            }
            other => panic!("expected a conditional but got {:?}", other),
        }
    }

    #[test]
    fn a_branch_line_inside_a_branch_body_starts_a_sibling_branch() {
        let items = parse("- a:\n    One\n- b:\n    Two\n- c:\n    Three");

        assert_eq!(items.len(), 1);

        match &items[0].kind {
            ContentKind::Conditional { branches } => {
                assert_eq!(branches.len(), 3);
                for branch in branches {
                    assert_eq!(branch.content.len(), 1);
                }
            }
            other => panic!("expected a conditional but got {:?}", other),
        }
    }

    #[test]
    fn branch_diverts_close_their_branch() {
        let items = parse("- met_sam:\n    -> reunion\n- else:\n    -> introduction");

        match &items[0].kind {
            ContentKind::Conditional { branches } => {
                assert_eq!(branches[0].divert.as_deref(), Some("reunion"));
                assert_eq!(branches[1].divert.as_deref(), Some("introduction"));
            }
            other => panic!("expected a conditional but got {:?}", other),
        }
    }

    #[test]
    fn conditionals_nest_inside_choice_bodies() {
        let items = parse("* [Ask]\n    - met_sam:\n        You again!\n    - else:\n        Hello?");

        assert_eq!(items.len(), 1);

        match &items[0].kind {
            ContentKind::Choice(choice) => {
                assert_eq!(choice.nested.len(), 1);
                match &choice.nested[0].kind {
                    ContentKind::Conditional { branches } => assert_eq!(branches.len(), 2),
                    other => panic!("expected a nested conditional but got {:?}", other),
                }
            }
            other => panic!("expected a choice but got {:?}", other),
        }
    }

    #[test]
    fn a_choice_line_closes_an_open_conditional_block() {
        let items = parse("- met_sam:\n    Hey\n* [Reply]");

        assert_eq!(items.len(), 2);
    }

    #[test]
    fn unrecognized_lines_are_preserved_as_raw_items_with_a_warning() {
        let lines = [("-> two words", MetaData::from(0))];
        let classified = classify_body(&lines);

        let mut ids = IdGen::default();
        let mut log = Logger::default();

        let items = parse_body(&classified, &mut ids, &mut log);

        match &items[0].kind {
            ContentKind::Raw { text } => assert_eq!(text, "-> two words"),
            other => panic!("expected a raw item but got {:?}", other),
        }

        assert_eq!(log.warnings.len(), 1);
    }

    #[test]
    fn comments_are_preserved_as_raw_items_without_warnings() {
        let lines = [("// a note", MetaData::from(0))];
        let classified = classify_body(&lines);

        let mut ids = IdGen::default();
        let mut log = Logger::default();

        let items = parse_body(&classified, &mut ids, &mut log);

        assert_eq!(items.len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn text_with_inline_divert_splits_into_two_items() {
        let items = parse("See you there -> beach");

        assert_eq!(items.len(), 2);

        match (&items[0].kind, &items[1].kind) {
            (ContentKind::Text { text }, ContentKind::Divert { target }) => {
                assert_eq!(text, "See you there");
                assert_eq!(target, "beach");
            }
            other => panic!("unexpected items: {:?}", other),
        }
    }

    #[test]
    fn every_item_gets_a_unique_id() {
        let items = parse("One\nTwo\n* [Hi]\n    Nested");

        let mut ids = Vec::new();

        fn collect(items: &[ContentItem], ids: &mut Vec<u64>) {
            for item in items {
                ids.push(item.id.0);
                if let ContentKind::Choice(choice) = &item.kind {
                    collect(&choice.nested, ids);
                }
            }
        }

        collect(&items, &mut ids);

        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();

        assert_eq!(ids.len(), deduped.len());
    }
}
