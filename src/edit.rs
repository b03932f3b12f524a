//! Edit operations against a parsed document.
//!
//! Every operation takes the document by reference and returns a new
//! snapshot, so readers holding the old document never observe a partially
//! applied edit. A failed operation returns an [`EditError`] and the old
//! snapshot stays the only one.
//!
//! Items are addressed by their stable [`ItemId`], never by position, so
//! that a UI selection survives edits which shift items around. Untouched
//! items keep their identifiers across edits; replacing an item swaps its
//! content but keeps its identity.

use crate::{
    content::{ContentItem, ContentKind, ItemId},
    document::{Knot, ParsedInk},
    error::{EditError, MetaData},
    line::{validate_name, validate_stitch_name},
};

/// Insertion point for new or moved content.
///
/// With no parent the address points into the root content list of the
/// knot; with a parent it points into the nested list of the choice with
/// that identifier. `after` is the index of the item the new content goes
/// after, or `None` to insert at the front of the list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditAddress {
    /// Choice item whose nested list is addressed, or `None` for the
    /// root content list of the knot.
    pub parent: Option<ItemId>,
    /// Index to insert after, or `None` for the front of the list.
    pub after: Option<usize>,
}

impl EditAddress {
    /// Address the root content list of a knot.
    pub fn root(after: Option<usize>) -> Self {
        EditAddress {
            parent: None,
            after,
        }
    }

    /// Address the nested content list of a choice.
    pub fn nested(parent: ItemId, after: Option<usize>) -> Self {
        EditAddress {
            parent: Some(parent),
            after,
        }
    }
}

impl ParsedInk {
    /// Insert a new content item into a knot.
    ///
    /// The item gets a fresh identifier, which is returned along with the
    /// new document snapshot. Stitch markers must carry a valid name not
    /// taken by another stitch in the knot, and may only go into the root
    /// content list.
    pub fn insert_item(
        &self,
        knot_name: &str,
        address: &EditAddress,
        kind: ContentKind,
    ) -> Result<(ParsedInk, ItemId), EditError> {
        let mut document = self.clone();

        let id = document.next_item_id();
        let item = ContentItem {
            id,
            // Line numbers refresh on the next parse of the serialized text.
            meta_data: MetaData { line_index: 0 },
            kind,
        };

        let knot = require_knot_mut(&mut document, knot_name)?;

        if let ContentKind::Stitch { name } = &item.kind {
            validate_stitch_name(name)?;

            if address.parent.is_some() {
                return Err(EditError::NestedStitch);
            }

            if knot.stitch_names().contains(&name.as_str()) {
                return Err(EditError::DuplicateName { name: name.clone() });
            }
        }

        insert_at(&mut knot.items, address, item)?;
        knot.derive_summaries();

        Ok((document, id))
    }

    /// Replace the content of an item, keeping its identifier.
    ///
    /// Replacing an item with a stitch marker follows the same name and
    /// placement rules as inserting one.
    pub fn replace_item(
        &self,
        knot_name: &str,
        id: ItemId,
        kind: ContentKind,
    ) -> Result<ParsedInk, EditError> {
        let mut document = self.clone();
        let knot = require_knot_mut(&mut document, knot_name)?;

        if knot.find_item(id).is_none() {
            return Err(EditError::UnknownItem { id });
        }

        if let ContentKind::Stitch { name } = &kind {
            validate_stitch_name(name)?;

            if !knot.items.iter().any(|item| item.id == id) {
                return Err(EditError::NestedStitch);
            }

            let taken = knot.items.iter().any(|item| match &item.kind {
                ContentKind::Stitch { name: existing } => item.id != id && existing == name,
                _ => false,
            });

            if taken {
                return Err(EditError::DuplicateName { name: name.clone() });
            }
        }

        match find_item_mut(&mut knot.items, id) {
            Some(item) => item.kind = kind,
            None => return Err(EditError::UnknownItem { id }),
        }

        knot.derive_summaries();

        Ok(document)
    }

    /// Delete an item and its nested subtree from a knot.
    pub fn delete_item(&self, knot_name: &str, id: ItemId) -> Result<ParsedInk, EditError> {
        let mut document = self.clone();
        let knot = require_knot_mut(&mut document, knot_name)?;

        if remove_item(&mut knot.items, id).is_none() {
            return Err(EditError::UnknownItem { id });
        }

        knot.derive_summaries();

        Ok(document)
    }

    /// Move an item within a knot to a new address, keeping its identifier.
    ///
    /// Moving an item into its own nested subtree is impossible: once the
    /// item is cut, the address no longer resolves and the edit fails.
    pub fn move_item(
        &self,
        knot_name: &str,
        id: ItemId,
        address: &EditAddress,
    ) -> Result<ParsedInk, EditError> {
        let mut document = self.clone();
        let knot = require_knot_mut(&mut document, knot_name)?;

        let item = remove_item(&mut knot.items, id).ok_or(EditError::UnknownItem { id })?;

        if address.parent.is_some() {
            if let ContentKind::Stitch { .. } = &item.kind {
                return Err(EditError::NestedStitch);
            }
        }

        insert_at(&mut knot.items, address, item)?;
        knot.derive_summaries();

        Ok(document)
    }

    /// Add a new, empty knot at the end of the document.
    pub fn add_knot(&self, name: &str) -> Result<ParsedInk, EditError> {
        validate_name(name)?;

        if self.find_knot(name).is_some() {
            return Err(EditError::DuplicateName {
                name: name.to_string(),
            });
        }

        let mut document = self.clone();

        document.knots.push(Knot {
            name: name.to_string(),
            line_start: 0,
            line_end: 0,
            items: Vec::new(),
            diverts: Vec::new(),
            flags: Vec::new(),
        });

        Ok(document)
    }

    /// Replace the whole content of a knot.
    pub fn replace_knot(
        &self,
        name: &str,
        items: Vec<ContentItem>,
    ) -> Result<ParsedInk, EditError> {
        let mut document = self.clone();
        let knot = require_knot_mut(&mut document, name)?;

        knot.items = items;
        knot.derive_summaries();

        Ok(document)
    }

    /// Remove a knot from the document.
    ///
    /// Diverts pointing at the removed knot are left in place; they show
    /// up as unknown targets in the next validation pass.
    pub fn remove_knot(&self, name: &str) -> Result<ParsedInk, EditError> {
        if self.find_knot(name).is_none() {
            return Err(EditError::UnknownKnot {
                name: name.to_string(),
            });
        }

        let mut document = self.clone();
        document.knots.retain(|knot| knot.name != name);

        Ok(document)
    }
}

fn require_knot_mut<'a>(
    document: &'a mut ParsedInk,
    name: &str,
) -> Result<&'a mut Knot, EditError> {
    match document.find_knot_mut(name) {
        Some(knot) => Ok(knot),
        None => Err(EditError::UnknownKnot {
            name: name.to_string(),
        }),
    }
}

/// Insert an item at an address within a knot's content tree.
fn insert_at(
    items: &mut Vec<ContentItem>,
    address: &EditAddress,
    item: ContentItem,
) -> Result<(), EditError> {
    let list = match address.parent {
        None => items,
        Some(parent) => nested_list_mut(items, parent)?,
    };

    let position = match address.after {
        None => 0,
        Some(index) if index < list.len() => index + 1,
        Some(index) => {
            return Err(EditError::IndexOutOfBounds {
                index,
                len: list.len(),
            })
        }
    };

    list.insert(position, item);

    Ok(())
}

/// Resolve the nested content list of the choice with the given identifier.
fn nested_list_mut(
    items: &mut Vec<ContentItem>,
    parent: ItemId,
) -> Result<&mut Vec<ContentItem>, EditError> {
    match find_item_mut(items, parent) {
        Some(item) => match &mut item.kind {
            ContentKind::Choice(choice) => Ok(&mut choice.nested),
            _ => Err(EditError::InvalidParent { id: parent }),
        },
        None => Err(EditError::InvalidParent { id: parent }),
    }
}

fn find_item_mut(items: &mut [ContentItem], id: ItemId) -> Option<&mut ContentItem> {
    for item in items {
        if item.id == id {
            return Some(item);
        }

        match &mut item.kind {
            ContentKind::Choice(choice) => {
                if let Some(found) = find_item_mut(&mut choice.nested, id) {
                    return Some(found);
                }
            }
            ContentKind::Conditional { branches } => {
                for branch in branches {
                    if let Some(found) = find_item_mut(&mut branch.content, id) {
                        return Some(found);
                    }
                }
            }
            _ => (),
        }
    }

    None
}

/// Cut an item out of a content tree, returning it with its subtree.
fn remove_item(items: &mut Vec<ContentItem>, id: ItemId) -> Option<ContentItem> {
    if let Some(position) = items.iter().position(|item| item.id == id) {
        return Some(items.remove(position));
    }

    for item in items {
        match &mut item.kind {
            ContentKind::Choice(choice) => {
                if let Some(removed) = remove_item(&mut choice.nested, id) {
                    return Some(removed);
                }
            }
            ContentKind::Conditional { branches } => {
                for branch in branches {
                    if let Some(removed) = remove_item(&mut branch.content, id) {
                        return Some(removed);
                    }
                }
            }
            _ => (),
        }
    }

    None
}
