//! Parsing of script text into the document model.

pub(crate) mod content;
mod document;

pub use document::parse_document;

use crate::content::ItemId;

/// Allocator of document-unique item identifiers.
#[derive(Debug, Default)]
pub(crate) struct IdGen {
    next: u64,
}

impl IdGen {
    /// Hand out the next identifier.
    pub fn next(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next += 1;

        id
    }

    /// Number of identifiers handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next
    }
}
