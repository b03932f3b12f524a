//! Parse, edit, validate and re-serialize ink-style script documents.
//!
//! The entry point is [`parse_document`], which turns script text into a
//! [`ParsedInk`] document. The document can be queried, edited through the
//! operations on [`ParsedInk`] and serialized back into text with
//! [`ParsedInk::to_text`]. Media references are resolved asynchronously by
//! the [`MediaValidator`].
//!
//! ```
//! use inkedit::parse_document;
//!
//! let document = parse_document("-> start\n\n=== start ===\nHello!\n-> END\n");
//!
//! assert_eq!(document.initial_divert.as_deref(), Some("start"));
//! assert_eq!(document.knots.len(), 1);
//! ```

mod consts;
mod content;
mod document;
mod edit;
mod error;
mod file;
mod line;
mod log;
mod media;
mod parse;
mod serialize;
mod validate;

pub use content::{
    Branch, BranchCondition, ChoiceData, ContentItem, ContentKind, FlagOperation, ItemId,
    MediaKind, StoryFlag,
};
pub use document::{FlagSummary, Knot, ParsedInk};
pub use edit::EditAddress;
pub use error::{EditError, InvalidNameError, MetaData};
pub use file::{DiskFileService, FileService};
pub use log::{LogMessage, Logger, Warning};
pub use media::{
    AssetLister, DirectoryAssetLister, MediaStatus, MediaValidator, ValidationOutcome,
};
pub use parse::parse_document;
pub use serialize::serialize_knot;
pub use validate::{full_report, validate_document};
