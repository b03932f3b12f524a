//! The in-memory document model.
//!
//! A parsed script is a [`ParsedInk`]: an ordered list of knots plus the
//! optional initial divert found before the first knot header. The model is
//! treated as an immutable snapshot: readers always observe a complete
//! document, and every edit operation produces a new snapshot.
//!
//! The queries in this module are invoked by an editor on every selection
//! change, so they are all single passes over the document.

use crate::{
    content::{
        items_structural_eq, ContentItem, ContentKind, FlagOperation, ItemId, StoryFlag,
    },
    consts::{DONE_KNOT, START_SOURCE},
    log::Logger,
    serialize::serialize_document,
};

use std::collections::HashMap;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// A named story node with its ordered content.
pub struct Knot {
    /// Name, unique within the document.
    pub name: String,
    /// One-indexed first line of the knot in the script text, inclusive.
    /// This is the header line.
    pub line_start: u32,
    /// One-indexed last line of the knot in the script text, inclusive.
    pub line_end: u32,
    /// Ordered content of the knot body.
    pub items: Vec<ContentItem>,
    /// Deduplicated divert targets of the knot, in order of appearance,
    /// excluding `END`. Derived from `items`, never edited directly.
    pub diverts: Vec<String>,
    /// Story flag usages in the knot, one record per occurrence.
    /// Derived from `items`, never edited directly.
    pub flags: Vec<StoryFlag>,
}

impl Knot {
    /// Recompute the derived divert and flag summaries from the content.
    ///
    /// Called after parsing and after every edit which touches the knot.
    pub(crate) fn derive_summaries(&mut self) {
        let mut diverts = Vec::new();
        let mut flags = Vec::new();

        collect_summaries(&self.items, &self.name, &mut diverts, &mut flags);

        self.diverts = diverts;
        self.flags = flags;
    }

    /// Find an item anywhere in the content tree by its identifier.
    pub fn find_item(&self, id: ItemId) -> Option<&ContentItem> {
        find_in_items(&self.items, id)
    }

    /// Names of the stitches declared in this knot, in order.
    pub fn stitch_names(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match &item.kind {
                ContentKind::Stitch { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// A fully parsed script document.
pub struct ParsedInk {
    /// Knots in the order they appear in the script.
    pub knots: Vec<Knot>,
    /// Target of a standalone divert appearing before the first knot
    /// header, marking where the story starts.
    pub initial_divert: Option<String>,
    /// Warnings collected while parsing.
    pub log: Logger,
    /// Source of fresh item identifiers. Monotonic for the lifetime of
    /// the document, across all edit snapshots derived from it.
    pub(crate) next_id: u64,
}

/// Summary of all usages of one story flag across the document.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
pub struct FlagSummary {
    /// Name of the flag.
    pub name: String,
    /// How many usages set the flag.
    pub set_count: usize,
    /// How many usages remove the flag.
    pub remove_count: usize,
    /// How many usages check the flag in a conditional branch.
    pub check_count: usize,
    /// Every usage, in document order.
    pub usages: Vec<StoryFlag>,
}

impl ParsedInk {
    /// Find a knot by name.
    pub fn find_knot(&self, name: &str) -> Option<&Knot> {
        self.knots.iter().find(|knot| knot.name == name)
    }

    pub(crate) fn find_knot_mut(&mut self, name: &str) -> Option<&mut Knot> {
        self.knots.iter_mut().find(|knot| knot.name == name)
    }

    pub(crate) fn next_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;

        id
    }

    /// Compute the reverse-divert map of the document.
    ///
    /// Keys are knot names, values the ordered list of unique sources
    /// which divert there. A divert at a `knot.stitch` address counts as
    /// pointing at the knot. The initial divert contributes the synthetic
    /// `START` source.
    pub fn reverse_divert_map(&self) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();

        if let Some(target) = &self.initial_divert {
            map.entry(base_knot_name(target).to_string())
                .or_default()
                .push(START_SOURCE.to_string());
        }

        for knot in &self.knots {
            for target in &knot.diverts {
                let sources = map.entry(base_knot_name(target).to_string()).or_default();

                if !sources.contains(&knot.name) {
                    sources.push(knot.name.clone());
                }
            }
        }

        map
    }

    /// Knots (or `START`) which divert to the given knot.
    pub fn divert_sources(&self, name: &str) -> Vec<String> {
        self.reverse_divert_map().remove(name).unwrap_or_default()
    }

    /// Story flag usages grouped by name, ordered by first appearance.
    pub fn flag_summary(&self) -> Vec<FlagSummary> {
        let mut summaries: Vec<FlagSummary> = Vec::new();

        for usage in self.knots.iter().flat_map(|knot| knot.flags.iter()) {
            let summary = match summaries.iter_mut().find(|s| s.name == usage.name) {
                Some(summary) => summary,
                None => {
                    summaries.push(FlagSummary {
                        name: usage.name.clone(),
                        set_count: 0,
                        remove_count: 0,
                        check_count: 0,
                        usages: Vec::new(),
                    });
                    summaries.last_mut().unwrap()
                }
            };

            match usage.operation {
                FlagOperation::Set => summary.set_count += 1,
                FlagOperation::Remove => summary.remove_count += 1,
                FlagOperation::Check => summary.check_count += 1,
            }

            summary.usages.push(usage.clone());
        }

        summaries
    }

    /// Compare two documents while ignoring item identifiers, line numbers
    /// and warnings. This is the equivalence of the round-trip law.
    pub fn structural_eq(&self, other: &ParsedInk) -> bool {
        self.initial_divert == other.initial_divert
            && self.knots.len() == other.knots.len()
            && self
                .knots
                .iter()
                .zip(other.knots.iter())
                .all(|(ours, theirs)| {
                    ours.name == theirs.name && items_structural_eq(&ours.items, &theirs.items)
                })
    }

    /// Serialize the whole document back into script text.
    pub fn to_text(&self) -> String {
        serialize_document(self)
    }
}

/// Strip the stitch part from a divert target.
fn base_knot_name(target: &str) -> &str {
    target.split('.').next().unwrap_or(target)
}

/// Walk a content list and collect divert targets and flag usages.
fn collect_summaries(
    items: &[ContentItem],
    knot_name: &str,
    diverts: &mut Vec<String>,
    flags: &mut Vec<StoryFlag>,
) {
    for item in items {
        match &item.kind {
            ContentKind::Divert { target } => {
                push_divert(diverts, target);
            }
            ContentKind::Choice(choice) => {
                if let Some(target) = &choice.divert {
                    push_divert(diverts, target);
                }

                collect_summaries(&choice.nested, knot_name, diverts, flags);
            }
            ContentKind::Conditional { branches } => {
                for branch in branches {
                    if let crate::content::BranchCondition::Flag(name) = &branch.condition {
                        flags.push(StoryFlag {
                            name: name.clone(),
                            operation: FlagOperation::Check,
                            meta_data: branch.meta_data.clone(),
                            knot: knot_name.to_string(),
                            divert: branch.divert.clone(),
                        });
                    }

                    if let Some(target) = &branch.divert {
                        push_divert(diverts, target);
                    }

                    collect_summaries(&branch.content, knot_name, diverts, flags);
                }
            }
            ContentKind::FlagOp { name, operation } => {
                flags.push(StoryFlag {
                    name: name.clone(),
                    operation: *operation,
                    meta_data: item.meta_data.clone(),
                    knot: knot_name.to_string(),
                    divert: None,
                });
            }
            _ => (),
        }
    }
}

fn push_divert(diverts: &mut Vec<String>, target: &str) {
    if target != DONE_KNOT && !diverts.iter().any(|t| t == target) {
        diverts.push(target.to_string());
    }
}

/// Find an item in a content tree by its identifier.
fn find_in_items(items: &[ContentItem], id: ItemId) -> Option<&ContentItem> {
    for item in items {
        if item.id == id {
            return Some(item);
        }

        match &item.kind {
            ContentKind::Choice(choice) => {
                if let Some(found) = find_in_items(&choice.nested, id) {
                    return Some(found);
                }
            }
            ContentKind::Conditional { branches } => {
                for branch in branches {
                    if let Some(found) = find_in_items(&branch.content, id) {
                        return Some(found);
                    }
                }
            }
            _ => (),
        }
    }

    None
}
