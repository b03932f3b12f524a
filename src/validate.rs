//! Analysis of a parsed document for authoring problems.
//!
//! Validation is a read-only pass over the document. Nothing it finds
//! blocks parsing, editing or saving: every problem is reported as a
//! warning with the line it points at, so a UI can render inline hints.

use crate::{
    content::{ContentItem, ContentKind},
    consts::DONE_KNOT,
    document::ParsedInk,
    error::MetaData,
    log::{Logger, Warning},
};

/// Check a document for dangling choices and unknown divert targets.
///
/// The returned log is fresh: warnings collected while parsing stay on
/// the document itself.
pub fn validate_document(document: &ParsedInk) -> Logger {
    let mut log = Logger::default();

    let addresses = collect_addresses(document);

    if let Some(target) = &document.initial_divert {
        if !addresses.iter().any(|address| address == target) {
            log.add_warning(
                Warning::UnknownDivertTarget {
                    target: target.clone(),
                },
                &MetaData { line_index: 0 },
            );
        }
    }

    for knot in &document.knots {
        validate_items(&knot.items, &addresses, &mut log);
    }

    log
}

/// All warnings for a document: those collected while parsing plus a
/// fresh analysis pass.
pub fn full_report(document: &ParsedInk) -> Logger {
    let mut log = document.log.clone();
    log.extend(validate_document(document));

    log
}

/// All addresses a divert may legally point at: `END`, every knot name
/// and every `knot.stitch` pair.
fn collect_addresses(document: &ParsedInk) -> Vec<String> {
    let mut addresses = vec![DONE_KNOT.to_string()];

    for knot in &document.knots {
        addresses.push(knot.name.clone());

        for stitch in knot.stitch_names() {
            addresses.push(format!("{}.{}", knot.name, stitch));
        }
    }

    addresses
}

fn validate_items(items: &[ContentItem], addresses: &[String], log: &mut Logger) {
    for item in items {
        match &item.kind {
            ContentKind::Divert { target } => {
                check_target(target, addresses, item, log);
            }
            ContentKind::Choice(choice) => {
                if let Some(target) = &choice.divert {
                    check_target(target, addresses, item, log);
                }

                if choice.is_dangling() {
                    log.add_warning(
                        Warning::DanglingChoice {
                            text: choice.text.clone(),
                        },
                        &item.meta_data,
                    );
                }

                validate_items(&choice.nested, addresses, log);
            }
            ContentKind::Conditional { branches } => {
                for branch in branches {
                    if let Some(target) = &branch.divert {
                        if !addresses.iter().any(|address| address == target) {
                            log.add_warning(
                                Warning::UnknownDivertTarget {
                                    target: target.clone(),
                                },
                                &branch.meta_data,
                            );
                        }
                    }

                    validate_items(&branch.content, addresses, log);
                }
            }
            _ => (),
        }
    }
}

fn check_target(target: &str, addresses: &[String], item: &ContentItem, log: &mut Logger) {
    if !addresses.iter().any(|address| address == target) {
        log.add_warning(
            Warning::UnknownDivertTarget {
                target: target.to_string(),
            },
            &item.meta_data,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_document;

    #[test]
    fn documents_with_resolved_diverts_validate_cleanly() {
        let content = "\
-> start

=== start ===
Hello
* [Go] -> beach
-> END

=== beach ===
Sand.
-> END
";
        let document = parse_document(content);

        assert!(validate_document(&document).is_empty());
    }

    #[test]
    fn diverts_to_missing_knots_are_flagged() {
        let document = parse_document("=== a ===\n-> nowhere\n");
        let log = validate_document(&document);

        assert_eq!(log.warnings.len(), 1);

        match &log.warnings[0].warning {
            Warning::UnknownDivertTarget { target } => assert_eq!(target, "nowhere"),
            other => panic!("expected an unknown target warning but got {:?}", other),
        }
    }

    #[test]
    fn stitch_addresses_resolve_against_declared_stitches() {
        let content = "\
=== a ===
-> b.second
-> b.missing

=== b ===
Hi
= second
There
-> END
";
        let document = parse_document(content);
        let log = validate_document(&document);

        assert_eq!(log.warnings.len(), 1);
    }

    #[test]
    fn choices_leading_nowhere_are_flagged_as_dangling() {
        let document = parse_document("=== a ===\n* [Shrug]\n* [Go] -> a\n");
        let log = validate_document(&document);

        let dangling: Vec<_> = log
            .warnings
            .iter()
            .filter(|message| match &message.warning {
                Warning::DanglingChoice { .. } => true,
                _ => false,
            })
            .collect();

        assert_eq!(dangling.len(), 1);
    }

    #[test]
    fn an_unresolved_initial_divert_is_flagged() {
        let document = parse_document("-> ghost\n\n=== a ===\nHi\n-> END\n");
        let log = validate_document(&document);

        assert_eq!(log.warnings.len(), 1);
    }

    #[test]
    fn full_reports_combine_parse_and_analysis_warnings() {
        let content = "\
=== a ===
~ Broken(
-> nowhere
";
        let document = parse_document(content);
        let report = full_report(&document);

        // One unrecognized line from parsing, one unknown target from
        // analysis.
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn branch_diverts_are_checked_too() {
        let content = "\
=== a ===
- met_sam:
    -> missing
- else:
    -> END
";
        let document = parse_document(content);
        let log = validate_document(&document);

        assert_eq!(log.warnings.len(), 1);
    }
}
