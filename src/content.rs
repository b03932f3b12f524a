//! Structures representing the ordered content of knots.
//!
//! Every piece of script content inside a knot body is a `ContentItem`: a
//! stable identifier, the line it originated from and a kind. The kind is
//! an explicit sum type so that the serializer and any renderer can be
//! exhaustiveness-checked over all variants.
//!
//! Items form a shallow tree: choices carry nested content for lines which
//! continue the choice before the flow returns to the knot body, and
//! conditional branches carry their own content lists. All cross-references
//! into this tree go through [`ItemId`], never through positions, so that
//! selections survive edits which shift items around.

use crate::error::MetaData;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Stable, opaque identifier of a content item.
///
/// Identifiers are unique within a document and are never reused. Edits
/// preserve the identifiers of untouched items.
pub struct ItemId(pub(crate) u64);

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// A single node in the ordered content tree of a knot.
pub struct ContentItem {
    /// Stable identifier used for selection and editing.
    pub id: ItemId,
    /// Information about the origin of this item in the script text.
    pub meta_data: MetaData,
    /// The actual content.
    pub kind: ContentKind,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Content of a single item.
pub enum ContentKind {
    /// Dialogue line.
    Text {
        /// The spoken or narrated text.
        text: String,
    },
    /// Media reference by bare filename, without extension.
    Media {
        /// Which of the four media variants this is.
        kind: MediaKind,
        /// Bare filename, resolved against asset folders on validation.
        name: String,
    },
    /// Typing indicator shown for a duration before the next message.
    FakeType {
        /// Duration in seconds.
        seconds: f32,
    },
    /// Pause before the next message.
    Wait {
        /// Duration in seconds.
        seconds: f32,
    },
    /// Player-selectable option.
    Choice(ChoiceData),
    /// Marker for a named sub-section; content after it belongs to the
    /// stitch until the next stitch or knot header.
    Stitch {
        /// Name, unique within the parent knot.
        name: String,
    },
    /// Standalone divert to a knot, `knot.stitch` or `END`.
    Divert {
        /// Divert target.
        target: String,
    },
    /// Conditional block with one branch per condition.
    Conditional {
        /// Branches in written order. An `else` branch is always last in
        /// well-formed scripts but this is not enforced.
        branches: Vec<Branch>,
    },
    /// Set or remove a named story flag.
    FlagOp {
        /// Name of the flag.
        name: String,
        /// Whether the flag is set or removed.
        operation: FlagOperation,
    },
    /// Trigger reference to another story file.
    SideStory {
        /// Name of the referenced story.
        name: String,
    },
    /// Scene or chapter marker.
    Transition {
        /// Title shown to the player.
        title: String,
        /// Optional subtitle.
        subtitle: Option<String>,
    },
    /// Unrecognized line preserved verbatim for round-trip fidelity.
    Raw {
        /// The original line, trimmed of trailing whitespace only.
        text: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// The four media variants of the script format.
pub enum MediaKind {
    /// Image sent by an NPC.
    Image,
    /// Image sent by the player.
    PlayerImage,
    /// Video sent by an NPC.
    Video,
    /// Video sent by the player.
    PlayerVideo,
}

impl MediaKind {
    /// Whether this kind resolves against video assets.
    pub fn is_video(self) -> bool {
        match self {
            MediaKind::Video | MediaKind::PlayerVideo => true,
            MediaKind::Image | MediaKind::PlayerImage => false,
        }
    }

    /// Whether this is content sent by the player rather than an NPC.
    pub fn is_player(self) -> bool {
        match self {
            MediaKind::PlayerImage | MediaKind::PlayerVideo => true,
            MediaKind::Image | MediaKind::Video => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Data of a single choice.
pub struct ChoiceData {
    /// Display text of the choice.
    pub text: String,
    /// Whether the choice remains available after being selected once.
    pub is_sticky: bool,
    /// Divert target on the choice line itself, if any.
    pub divert: Option<String>,
    /// Content which continues the choice before flow returns to the
    /// knot body. Only populated for choices without an inline divert.
    pub nested: Vec<ContentItem>,
}

impl ChoiceData {
    /// Whether this choice leads nowhere: no divert and no nested content
    /// which ends in one. A likely authoring error, reported as a warning.
    pub fn is_dangling(&self) -> bool {
        self.divert.is_none() && !items_end_in_divert(&self.nested)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// One branch of a conditional block.
pub struct Branch {
    /// Condition under which the branch runs.
    pub condition: BranchCondition,
    /// Content of the branch.
    pub content: Vec<ContentItem>,
    /// Divert taken at the end of the branch, if any.
    pub divert: Option<String>,
    /// Information about the origin of the branch line.
    pub meta_data: MetaData,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Condition of a single conditional branch.
pub enum BranchCondition {
    /// Branch runs if the named story flag is set.
    Flag(String),
    /// Branch runs if no other branch did.
    Else,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// A recorded usage of a story flag.
///
/// Usages are kept per occurrence, without deduplication: how often and
/// where a flag appears matters for presenting it.
pub struct StoryFlag {
    /// Name of the flag.
    pub name: String,
    /// What the usage does with the flag.
    pub operation: FlagOperation,
    /// Information about the origin of the usage.
    pub meta_data: MetaData,
    /// Name of the knot the usage appears in.
    pub knot: String,
    /// Divert taken by the branch which checks the flag, if any.
    pub divert: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Operation performed on a story flag.
pub enum FlagOperation {
    /// The flag is set.
    Set,
    /// The flag is removed.
    Remove,
    /// The flag is checked by a conditional branch.
    Check,
}

impl ContentItem {
    /// Compare content while ignoring identifiers and line numbers.
    ///
    /// This is the equivalence which the round-trip law is stated in:
    /// re-parsing serialized text assigns fresh identifiers and new line
    /// numbers, but kinds, order, targets and nesting must survive.
    pub fn structural_eq(&self, other: &ContentItem) -> bool {
        use ContentKind::*;

        match (&self.kind, &other.kind) {
            (Choice(ours), Choice(theirs)) => {
                ours.text == theirs.text
                    && ours.is_sticky == theirs.is_sticky
                    && ours.divert == theirs.divert
                    && items_structural_eq(&ours.nested, &theirs.nested)
            }
            (Conditional { branches: ours }, Conditional { branches: theirs }) => {
                ours.len() == theirs.len()
                    && ours.iter().zip(theirs.iter()).all(|(a, b)| {
                        a.condition == b.condition
                            && a.divert == b.divert
                            && items_structural_eq(&a.content, &b.content)
                    })
            }
            (ours, theirs) => ours == theirs,
        }
    }
}

/// Compare two content lists while ignoring identifiers and line numbers.
pub fn items_structural_eq(ours: &[ContentItem], theirs: &[ContentItem]) -> bool {
    ours.len() == theirs.len()
        && ours
            .iter()
            .zip(theirs.iter())
            .all(|(a, b)| a.structural_eq(b))
}

/// Whether the last effective item of a content list is a divert.
fn items_end_in_divert(items: &[ContentItem]) -> bool {
    items
        .iter()
        .rev()
        .find(|item| match &item.kind {
            ContentKind::Raw { .. } => false,
            _ => true,
        })
        .map(|item| match &item.kind {
            ContentKind::Divert { .. } => true,
            ContentKind::Choice(choice) => !choice.is_dangling(),
            ContentKind::Conditional { branches } => branches
                .iter()
                .all(|branch| branch.divert.is_some() || items_end_in_divert(&branch.content)),
            _ => false,
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn item(kind: ContentKind) -> ContentItem {
        ContentItem {
            id: ItemId(0),
            meta_data: ().into(),
            kind,
        }
    }

    fn text_item(text: &str) -> ContentItem {
        item(ContentKind::Text {
            text: text.to_string(),
        })
    }

    fn divert_item(target: &str) -> ContentItem {
        item(ContentKind::Divert {
            target: target.to_string(),
        })
    }

    #[test]
    fn choice_with_divert_is_not_dangling() {
        let choice = ChoiceData {
            text: "Hi".to_string(),
            is_sticky: false,
            divert: Some("greeting".to_string()),
            nested: Vec::new(),
        };

        assert!(!choice.is_dangling());
    }

    #[test]
    fn choice_with_no_divert_and_no_content_is_dangling() {
        let choice = ChoiceData {
            text: "Hi".to_string(),
            is_sticky: false,
            divert: None,
            nested: Vec::new(),
        };

        assert!(choice.is_dangling());
    }

    #[test]
    fn choice_whose_nested_content_ends_in_a_divert_is_not_dangling() {
        let choice = ChoiceData {
            text: "Hi".to_string(),
            is_sticky: false,
            divert: None,
            nested: vec![text_item("A line"), divert_item("elsewhere")],
        };

        assert!(!choice.is_dangling());
    }

    #[test]
    fn trailing_raw_lines_do_not_hide_a_final_divert() {
        let choice = ChoiceData {
            text: "Hi".to_string(),
            is_sticky: false,
            divert: None,
            nested: vec![
                divert_item("elsewhere"),
                item(ContentKind::Raw {
                    text: "???".to_string(),
                }),
            ],
        };

        assert!(!choice.is_dangling());
    }

    #[test]
    fn structural_equality_ignores_ids_and_line_numbers() {
        let mut ours = text_item("Same text");
        let mut theirs = text_item("Same text");

        ours.id = ItemId(1);
        theirs.id = ItemId(99);
        ours.meta_data = MetaData { line_index: 0 };
        theirs.meta_data = MetaData { line_index: 42 };

        assert!(ours.structural_eq(&theirs));
    }

    #[test]
    fn structural_equality_compares_nested_choice_content() {
        let make = |nested_text: &str| {
            item(ContentKind::Choice(ChoiceData {
                text: "Hi".to_string(),
                is_sticky: false,
                divert: None,
                nested: vec![text_item(nested_text)],
            }))
        };

        assert!(make("one").structural_eq(&make("one")));
        assert!(!make("one").structural_eq(&make("two")));
    }
}
