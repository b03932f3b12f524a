//! Errors from reading knot and stitch names.

use std::{error::Error, fmt};

#[derive(Clone, Debug, PartialEq)]
/// Invalid knot or stitch name.
pub enum InvalidNameError {
    /// Name contains a character which is not alphanumeric or an underscore.
    ContainsInvalidCharacter(char),
    /// Name contains a whitespace character.
    ContainsWhitespace,
    /// No name was present to read.
    Empty,
    /// Name was a reserved keyword.
    ReservedKeyword {
        /// The offending keyword.
        keyword: String,
    },
    /// Knot name starts with a digit.
    StartsWithDigit,
}

impl Error for InvalidNameError {}

impl fmt::Display for InvalidNameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use InvalidNameError::*;

        match self {
            ContainsInvalidCharacter(c) => {
                write!(f, "name contains invalid character '{}'", c)
            }
            ContainsWhitespace => write!(
                f,
                "name contains whitespace characters: only alphanumeric \
                 characters and underscores are allowed"
            ),
            Empty => write!(f, "no name was given"),
            ReservedKeyword { keyword } => write!(
                f,
                "name may not be the reserved keyword '{}'",
                keyword.to_lowercase()
            ),
            StartsWithDigit => write!(f, "name may not start with a digit"),
        }
    }
}
