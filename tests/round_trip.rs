//! Round-trip properties of the parse and serialize pair.

use inkedit::parse_document;

/// Fixture touching every content variant at least once.
const FULL_FIXTURE: &str = "\
-> intro

=== intro ===
// Sam's first day
~ Transition(\"Day One\", \"Morning\")
Hello there!
~ FakeType(1.5)
~ Wait(2)
<image: sunrise>
<player-image: selfie>
<video: intro_clip>
<player-video: reply_clip>
~ SetStoryFlag(\"met_sam\")
* [Wave back]
    They wave back.
    -> beach
+ [Stay quiet] -> intro
= after_wave
- met_sam:
    Good to see you again!
    -> beach
- else:
    Who are you?
~ RemoveStoryFlag(\"met_sam\")
~ SideStory(\"sam_backstory\")
-> END

=== beach ===
Sand everywhere.
-> END
";

#[test]
fn parsing_serialized_text_gives_a_structurally_equal_document() {
    let original = parse_document(FULL_FIXTURE);
    let round_tripped = parse_document(&original.to_text());

    assert!(original.structural_eq(&round_tripped));
}

#[test]
fn serialization_is_stable_after_the_first_pass() {
    let once = parse_document(FULL_FIXTURE).to_text();
    let twice = parse_document(&once).to_text();
    let thrice = parse_document(&twice).to_text();

    assert_eq!(once, twice);
    assert_eq!(twice, thrice);
}

#[test]
fn nested_choices_and_stitches_survive_the_round_trip() {
    let content = "\
=== start ===
* [Send selfie]
    <player-selfie.png>
= after_selfie
* [Done] -> goodbye

=== goodbye ===
Bye!
-> END
";
    let original = parse_document(content);
    let round_tripped = parse_document(&original.to_text());

    assert!(original.structural_eq(&round_tripped));
}

#[test]
fn shorthand_media_normalizes_once_then_stays_stable() {
    let content = "=== a ===\n<player-selfie.png>\n";

    let once = parse_document(content).to_text();
    assert!(once.contains("<player-image: selfie>"));

    let twice = parse_document(&once).to_text();
    assert_eq!(once, twice);
}

#[test]
fn unrecognized_lines_survive_the_round_trip_verbatim() {
    let content = "=== a ===\n-> two words\n* [unmatched bracket\n";

    let original = parse_document(content);
    let text = original.to_text();

    assert!(text.contains("-> two words"));
    assert!(text.contains("* [unmatched bracket"));
    assert!(original.structural_eq(&parse_document(&text)));
}

#[test]
fn comments_survive_the_round_trip() {
    let content = "=== a ===\n// keep this note\n//@ x=120 y=40\nHello\n";

    let text = parse_document(content).to_text();

    assert!(text.contains("// keep this note"));
    assert!(text.contains("//@ x=120 y=40"));
}

#[test]
fn warnings_do_not_affect_structural_equality() {
    // Duplicate knots parse with warnings but round trip cleanly.
    let content = "=== a ===\nOne\n\n=== a ===\nTwo\n";

    let original = parse_document(content);
    assert!(!original.log.is_empty());

    let round_tripped = parse_document(&original.to_text());
    assert!(original.structural_eq(&round_tripped));
}
