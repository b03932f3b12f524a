use crate::error::{write_line_information, MetaData};
use std::fmt;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Log message with information about where it originated from.
pub struct LogMessage {
    /// Detected problem.
    pub warning: Warning,
    /// Information of where the message originated from.
    pub meta_data: MetaData,
}

impl LogMessage {
    pub(crate) fn new(warning: Warning, meta_data: &MetaData) -> Self {
        LogMessage {
            warning,
            meta_data: meta_data.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// A detected non-fatal problem in a script.
///
/// None of these block parsing, serialization or saving. They exist so that
/// an editor can render inline hints next to the offending lines.
pub enum Warning {
    /// A choice has no divert and no nested content which ends in one.
    DanglingChoice {
        /// Display text of the choice.
        text: String,
    },
    /// Two knots in the document share a name. The first occurrence stays
    /// visible, later ones are flagged.
    DuplicateKnotName {
        /// The shared name.
        name: String,
    },
    /// Two stitches within one knot share a name.
    DuplicateStitchName {
        /// Name of the knot which contains the stitches.
        knot_name: String,
        /// The shared name.
        name: String,
    },
    /// A divert points at a knot or stitch which does not exist.
    UnknownDivertTarget {
        /// The unresolved target.
        target: String,
    },
    /// A line matched no known pattern and was preserved as raw content.
    UnrecognizedSyntax {
        /// The preserved line.
        line: String,
    },
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut buffer = String::new();
        write_line_information(&mut buffer, &self.meta_data)?;

        write!(f, "{}WARNING: {}", buffer, self.warning)
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Warning::*;

        match self {
            DanglingChoice { text } => write!(
                f,
                "choice '{}' has no divert and no content which leads anywhere",
                text
            ),
            DuplicateKnotName { name } => {
                write!(f, "another knot named '{}' already exists", name)
            }
            DuplicateStitchName { knot_name, name } => write!(
                f,
                "another stitch named '{}' already exists in knot '{}'",
                name, knot_name
            ),
            UnknownDivertTarget { target } => {
                write!(f, "divert target '{}' does not exist in the document", target)
            }
            UnrecognizedSyntax { line } => {
                write!(f, "unrecognized syntax was kept as-is: '{}'", line)
            }
        }
    }
}
