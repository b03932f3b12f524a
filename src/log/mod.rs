//! Warnings collected while parsing and analysing documents.
//!
//! Problems with script content are data, not errors: an editor shows them
//! inline and keeps working with the document as-is.

mod logger;
mod message;

pub use logger::Logger;
pub use message::{LogMessage, Warning};
