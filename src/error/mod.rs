//! Errors from editing documents and reading names.
//!
//! Parsing itself is infallible: script content that cannot be understood
//! is kept as raw lines and surfaced through the [log][crate::log] as
//! warnings, never as errors.

#[macro_use]
mod utils;
mod edit;
mod name;

pub use edit::EditError;
pub use name::InvalidNameError;
pub use utils::MetaData;

pub(crate) use utils::write_line_information;
