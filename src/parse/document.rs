//! Parsing of whole documents.
//!
//! This module splits the raw text into the prelude and one group of lines
//! per knot header, then hands each knot body to the
//! [content parser][crate::parse::content]. Parsing is a pure function of
//! the input text and never fails: anything the grammar does not cover is
//! preserved as raw content and flagged in the document log.

use crate::{
    content::ContentKind,
    document::{Knot, ParsedInk},
    error::MetaData,
    line::{classify_line, LineKind},
    log::{Logger, Warning},
    parse::{
        content::{classify_body, parse_body},
        IdGen,
    },
};

/// Parse a script text into a document model.
pub fn parse_document(content: &str) -> ParsedInk {
    let all_lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (line, MetaData::from(i)))
        .collect::<Vec<_>>();

    let (prelude, knot_groups) = split_lines_at_knot_headers(&all_lines);

    let mut log = Logger::default();
    let mut ids = IdGen::default();

    let initial_divert = parse_prelude(&prelude, &mut log);

    let mut knots: Vec<Knot> = Vec::new();

    for group in knot_groups {
        let knot = parse_knot_group(&group, &mut ids, &mut log);

        if knots.iter().any(|existing| existing.name == knot.name) {
            log.add_warning(
                Warning::DuplicateKnotName {
                    name: knot.name.clone(),
                },
                &MetaData {
                    line_index: knot.line_start - 1,
                },
            );
        }

        knots.push(knot);
    }

    ParsedInk {
        knots,
        initial_divert,
        log,
        next_id: ids.allocated(),
    }
}

/// Split lines into the prelude and one group per knot header line.
fn split_lines_at_knot_headers<'a>(
    lines: &[(&'a str, MetaData)],
) -> (Vec<(&'a str, MetaData)>, Vec<Vec<(&'a str, MetaData)>>) {
    let mut prelude = Vec::new();
    let mut groups: Vec<Vec<(&'a str, MetaData)>> = Vec::new();

    for (line, meta_data) in lines {
        let is_header = match classify_line(line) {
            LineKind::KnotHeader { .. } => true,
            _ => false,
        };

        if is_header {
            groups.push(vec![(*line, meta_data.clone())]);
        } else if let Some(group) = groups.last_mut() {
            group.push((*line, meta_data.clone()));
        } else {
            prelude.push((*line, meta_data.clone()));
        }
    }

    (prelude, groups)
}

/// Read the initial divert from the prelude.
///
/// The first standalone divert before any knot header marks the start
/// knot. Comments and blank lines are ignored; anything else in the
/// prelude has no knot to belong to and is flagged.
fn parse_prelude(lines: &[(&str, MetaData)], log: &mut Logger) -> Option<String> {
    let mut initial_divert = None;

    for (line, meta_data) in lines {
        match classify_line(line) {
            LineKind::Blank | LineKind::Comment { .. } => (),
            LineKind::Divert { target } if initial_divert.is_none() => {
                initial_divert = Some(target);
            }
            _ => {
                log.add_warning(
                    Warning::UnrecognizedSyntax {
                        line: line.trim().to_string(),
                    },
                    meta_data,
                );
            }
        }
    }

    initial_divert
}

/// Parse one knot group: the header line followed by the body.
fn parse_knot_group(lines: &[(&str, MetaData)], ids: &mut IdGen, log: &mut Logger) -> Knot {
    let (header, body) = lines.split_first().expect("knot group is never empty");

    let name = match classify_line(header.0) {
        LineKind::KnotHeader { name } => name,
        _ => unreachable!("knot groups start at a line classified as a knot header"),
    };

    let classified = classify_body(body);
    let items = parse_body(&classified, ids, log);

    let line_start = header.1.line();
    let line_end = lines.last().map(|(_, meta)| meta.line()).unwrap_or(line_start);

    let mut knot = Knot {
        name,
        line_start,
        line_end,
        items,
        diverts: Vec::new(),
        flags: Vec::new(),
    };

    knot.derive_summaries();
    warn_duplicate_stitches(&knot, log);

    knot
}

/// Flag stitch names which appear more than once within a knot.
fn warn_duplicate_stitches(knot: &Knot, log: &mut Logger) {
    let mut seen: Vec<&str> = Vec::new();

    for item in &knot.items {
        if let ContentKind::Stitch { name } = &item.kind {
            if seen.contains(&name.as_str()) {
                log.add_warning(
                    Warning::DuplicateStitchName {
                        knot_name: knot.name.clone(),
                        name: name.clone(),
                    },
                    &item.meta_data,
                );
            } else {
                seen.push(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_split_into_knots_at_header_lines() {
        let content = "\
=== first ===
One

=== second ===
Two
";
        let document = parse_document(content);

        assert_eq!(document.knots.len(), 2);
        assert_eq!(&document.knots[0].name, "first");
        assert_eq!(&document.knots[1].name, "second");
    }

    #[test]
    fn initial_divert_is_read_from_the_prelude() {
        let content = "\
// A story
-> start

=== start ===
Hello
";
        let document = parse_document(content);

        assert_eq!(document.initial_divert.as_deref(), Some("start"));
        assert!(document.log.is_empty());
    }

    #[test]
    fn documents_without_a_prelude_divert_have_no_initial_divert() {
        let document = parse_document("=== start ===\nHello\n");

        assert!(document.initial_divert.is_none());
    }

    #[test]
    fn knot_line_spans_are_one_indexed_and_inclusive() {
        let content = "\
-> start

=== start ===
Hello
There

=== second ===
Hi
";
        let document = parse_document(content);

        let start = document.find_knot("start").unwrap();
        assert_eq!(start.line_start, 3);
        assert_eq!(start.line_end, 6);

        let second = document.find_knot("second").unwrap();
        assert_eq!(second.line_start, 7);
        assert_eq!(second.line_end, 8);
    }

    #[test]
    fn duplicate_knot_names_are_kept_but_flagged() {
        let content = "\
=== start ===
First version

=== start ===
Second version
";
        let document = parse_document(content);

        assert_eq!(document.knots.len(), 2);
        assert_eq!(document.log.warnings.len(), 1);

        // Lookup by name finds the first occurrence.
        match &document.find_knot("start").unwrap().items[0].kind {
            ContentKind::Text { text } => assert_eq!(text, "First version"),
            other => panic!("expected text but got {:?}", other),
        }
    }

    #[test]
    fn duplicate_stitch_names_within_a_knot_are_flagged() {
        let content = "\
=== start ===
= here
One
= here
Two
";
        let document = parse_document(content);

        assert_eq!(document.log.warnings.len(), 1);
    }

    #[test]
    fn unexpected_prelude_content_is_flagged() {
        let content = "\
Loose line before any knot
-> start

=== start ===
Hello
";
        let document = parse_document(content);

        assert_eq!(document.initial_divert.as_deref(), Some("start"));
        assert_eq!(document.log.warnings.len(), 1);
    }

    #[test]
    fn empty_knots_are_legal() {
        let document = parse_document("=== empty ===\n");

        let knot = document.find_knot("empty").unwrap();
        assert!(knot.items.is_empty());
        assert!(knot.diverts.is_empty());
    }

    #[test]
    fn parsing_assigns_a_fresh_id_counter_to_the_document() {
        let document = parse_document("=== start ===\nOne\nTwo\n");

        assert_eq!(document.next_id, 2);
    }

    #[test]
    fn flag_usages_record_their_owning_knot() {
        let content = "\
=== intro ===
~ SetStoryFlag(\"met_sam\")
";
        let document = parse_document(content);
        let knot = document.find_knot("intro").unwrap();

        assert_eq!(knot.flags.len(), 1);
        assert_eq!(&knot.flags[0].knot, "intro");
        assert_eq!(&knot.flags[0].name, "met_sam");
    }
}
