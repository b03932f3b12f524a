//! Reading and validating knot and stitch names from header lines.

use crate::{
    consts::{KNOT_MARKER, RESERVED_KEYWORDS, STITCH_MARKER},
    error::InvalidNameError,
};

/// Read a knot name from a line which contains the text markers for a knot.
///
/// Knot headers carry two or more leading equals signs and an optional
/// closing run: `== name`, `=== name ===`. The name is validated before
/// returning. Unlike stitch names, knot names may not start with a digit.
pub fn read_knot_name(line: &str) -> Result<String, InvalidNameError> {
    if line.trim_start().starts_with(KNOT_MARKER) {
        let name = read_name_with_marker(line)?;
        reject_leading_digit(&name)?;

        Ok(name)
    } else {
        Err(InvalidNameError::Empty)
    }
}

/// Read a stitch name from a line which contains the text marker for a stitch.
///
/// Stitch headers carry exactly one leading equals sign: `= name`.
/// The name is validated before returning.
pub fn read_stitch_name(line: &str) -> Result<String, InvalidNameError> {
    if line.trim_start().starts_with(STITCH_MARKER) && !line.trim_start().starts_with(KNOT_MARKER) {
        read_name_with_marker(line)
    } else {
        Err(InvalidNameError::Empty)
    }
}

/// Validate a knot name given through an edit operation rather than read
/// from text.
pub fn validate_name(name: &str) -> Result<(), InvalidNameError> {
    read_name_chars(name)?;
    reject_leading_digit(name)
}

/// Validate a stitch name given through an edit operation.
///
/// Stitch names follow the same character rules as knot names but may
/// start with a digit.
pub fn validate_stitch_name(name: &str) -> Result<(), InvalidNameError> {
    read_name_chars(name).map(|_| ())
}

fn reject_leading_digit(name: &str) -> Result<(), InvalidNameError> {
    if name.chars().next().map_or(false, |c| c.is_ascii_digit()) {
        Err(InvalidNameError::StartsWithDigit)
    } else {
        Ok(())
    }
}

/// Read a name beginning with the given knot or stitch marker.
///
/// # Notes
///  *  Uses the [stitch marker][crate::consts::STITCH_MARKER] to trim
///     extraneous markers from the line before validating the name. Since
///     the stitch marker is a subset of the knot marker this trims both
///     kinds, but no other marker.
fn read_name_with_marker(line: &str) -> Result<String, InvalidNameError> {
    let trimmed_name = line
        .trim()
        .trim_start_matches(STITCH_MARKER)
        .trim_end_matches(STITCH_MARKER)
        .trim();

    read_name_chars(trimmed_name)
}

/// Validate that a name is a non-empty, non-reserved identifier.
///
/// Names consist of ASCII letters, digits and underscores.
fn read_name_chars(name: &str) -> Result<String, InvalidNameError> {
    if let Some(c) = name
        .chars()
        .find(|&c| !(c.is_ascii_alphanumeric() || c == '_'))
    {
        if c.is_whitespace() {
            Err(InvalidNameError::ContainsWhitespace)
        } else {
            Err(InvalidNameError::ContainsInvalidCharacter(c))
        }
    } else if name.is_empty() {
        Err(InvalidNameError::Empty)
    } else if RESERVED_KEYWORDS.contains(&name.to_uppercase().as_str()) {
        Err(InvalidNameError::ReservedKeyword {
            keyword: name.to_string(),
        })
    } else {
        Ok(name.to_string())
    }
}
