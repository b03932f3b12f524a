//! Utilities for printing and handling errors.

use std::fmt;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Information about the origin of an item.
///
/// Used to point warnings and edit errors back at the script line which
/// the item came from.
pub struct MetaData {
    /// Which line in the original script the item originated from.
    pub line_index: u32,
}

impl MetaData {
    /// One-indexed line number, as presented to the author.
    pub fn line(&self) -> u32 {
        self.line_index + 1
    }
}

/// Write meta data information for a line or piece of content in a script.
pub(crate) fn write_line_information<W: fmt::Write>(
    buffer: &mut W,
    meta_data: &MetaData,
) -> fmt::Result {
    write!(buffer, "(line {}) ", meta_data.line())
}

impl fmt::Display for MetaData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}", self.line())
    }
}

/// Wrapper to implement From for variants when the variant is simply encapsulated
/// in the enum.
///
/// # Example
/// Running
/// ```ignore
/// impl_from_error![
///     MyError;
///     [Variant, ErrorData]
/// ];
/// ```
/// is identical to running
/// ```ignore
/// impl From<ErrorData> for MyError {
///     fn from(err: ErrorData) -> Self {
///         Self::Variant(err)
///     }
/// }
/// ```
macro_rules! impl_from_error {
    ($for_type:ident; $([$variant:ident, $from_type:ident]),+) => {
        $(
            impl From<$from_type> for $for_type {
                fn from(err: $from_type) -> Self {
                    $for_type::$variant(err)
                }
            }
        )*
    }
}

impl From<usize> for MetaData {
    fn from(line_index: usize) -> Self {
        MetaData {
            line_index: line_index as u32,
        }
    }
}

#[cfg(test)]
impl From<()> for MetaData {
    fn from(_: ()) -> Self {
        MetaData { line_index: 0 }
    }
}
