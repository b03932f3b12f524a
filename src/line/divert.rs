//! Reading divert markers and targets.

use crate::consts::{DIVERT_MARKER, DONE_KNOT};

/// Split a string at the divert marker and return both parts.
///
/// The second part contains the marker itself when one is present.
pub fn split_at_divert_marker(content: &str) -> (&str, &str) {
    if let Some(i) = content.find(DIVERT_MARKER) {
        content.split_at(i)
    } else {
        (content, "")
    }
}

/// Read a divert target from a string beginning with the divert marker.
///
/// Valid targets are bare knot names, `knot.stitch` addresses and the
/// sentinel `END`. Targets are not checked against the document here;
/// a missing target knot is an analysis warning, not a parse failure.
pub fn read_divert_target(content: &str) -> Option<String> {
    let trimmed = content.trim();

    if !trimmed.starts_with(DIVERT_MARKER) {
        return None;
    }

    let target = trimmed
        .get(DIVERT_MARKER.len()..)
        .map(str::trim)
        .unwrap_or("");

    if is_valid_target(target) {
        Some(target.to_string())
    } else {
        None
    }
}

/// Whether a string is a well-formed divert target.
pub fn is_valid_target(target: &str) -> bool {
    if target == DONE_KNOT {
        return true;
    }

    let mut parts = target.split('.');

    let address_is_valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(knot), None, _) => is_identifier(knot),
        (Some(knot), Some(stitch), None) => is_identifier(knot) && is_identifier(stitch),
        _ => false,
    };

    address_is_valid
}

fn is_identifier(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
