//! Classification and field parsing of single script lines.

mod choice;
mod classify;
mod directive;
mod divert;
mod media;
mod name;

pub use choice::ChoiceFields;
pub use classify::{classify_line, LineKind};
pub use directive::Directive;
pub use media::MediaFields;

pub(crate) use name::{validate_name, validate_stitch_name};
