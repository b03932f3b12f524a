//! Errors from applying edit operations to a document.
//!
//! Malformed script *content* never produces these errors: unrecognized
//! lines are preserved as raw items and reported as warnings. Edit errors
//! come from callers addressing the document incorrectly, for example by
//! inserting a knot whose name is already taken. A failed edit leaves the
//! document unchanged.

use std::{error::Error, fmt};

use crate::{content::ItemId, error::name::InvalidNameError};

#[derive(Clone, Debug, PartialEq)]
/// Error from an edit operation against a document.
pub enum EditError {
    /// A knot or stitch with this name already exists at the target scope.
    DuplicateName {
        /// The offending name.
        name: String,
    },
    /// The given name cannot be used for a knot or stitch.
    InvalidName(InvalidNameError),
    /// An address pointed at an index past the end of a content list.
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of items in the addressed list.
        len: usize,
    },
    /// An address used an item as parent which cannot hold nested content.
    InvalidParent {
        /// Identifier of the addressed item.
        id: ItemId,
    },
    /// A stitch marker was addressed into a nested content list.
    NestedStitch,
    /// No item with the given identifier exists in the knot.
    UnknownItem {
        /// Identifier which could not be found.
        id: ItemId,
    },
    /// No knot with the given name exists in the document.
    UnknownKnot {
        /// Name which could not be found.
        name: String,
    },
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EditError::InvalidName(err) => Some(err),
            _ => None,
        }
    }
}

impl_from_error![
    EditError;
    [InvalidName, InvalidNameError]
];

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use EditError::*;

        match self {
            DuplicateName { name } => {
                write!(f, "a knot or stitch named '{}' already exists", name)
            }
            InvalidName(err) => write!(f, "invalid name: {}", err),
            IndexOutOfBounds { index, len } => write!(
                f,
                "address index {} is out of bounds for a content list of {} items",
                index, len
            ),
            InvalidParent { id } => write!(
                f,
                "item {:?} cannot hold nested content and may not be used as a parent",
                id
            ),
            NestedStitch => write!(
                f,
                "stitch markers may only be placed at the root level of a knot"
            ),
            UnknownItem { id } => write!(f, "no item with id {:?} exists in the knot", id),
            UnknownKnot { name } => write!(f, "no knot named '{}' exists in the document", name),
        }
    }
}
