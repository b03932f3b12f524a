//! Parsing media tag lines.
//!
//! Media tags reference assets by bare filename inside angle brackets.
//! The canonical form names the variant explicitly:
//!
//! ```text
//! <image: beach>
//! <player-video: reaction>
//! ```
//!
//! A shorthand form carries a filename as written on disk; the variant is
//! read from a `player-` prefix and the kind from the extension, and both
//! are stripped: `<player-selfie.png>` is a player image named `selfie`.
//! The serializer always emits the canonical form, so shorthand disappears
//! after one round trip.

use crate::{
    consts::{
        IMAGE_EXTENSIONS, IMAGE_TAG, PLAYER_IMAGE_TAG, PLAYER_MEDIA_PREFIX, PLAYER_VIDEO_TAG,
        VIDEO_EXTENSIONS, VIDEO_TAG,
    },
    content::MediaKind,
};

/// Parsed fields of a media tag line.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaFields {
    /// Which of the four media variants the tag references.
    pub kind: MediaKind,
    /// Bare filename without extension.
    pub name: String,
}

/// Parse a media tag from a line, if the line represents one.
pub fn parse_media_tag(content: &str) -> Option<MediaFields> {
    let inner = read_tag_body(content.trim())?;

    match inner.find(':') {
        Some(i) => {
            let keyword = inner.get(..i).unwrap().trim();
            let name = inner.get(i + 1..).unwrap().trim();

            parse_canonical_tag(keyword, name)
        }
        None => parse_shorthand_tag(inner.trim()),
    }
}

/// Strip the angle brackets from a tag line.
fn read_tag_body(line: &str) -> Option<&str> {
    if line.len() >= 2 && line.starts_with('<') && line.ends_with('>') {
        let inner = line.get(1..line.len() - 1).unwrap();

        // A second bracket means this is not a single tag line.
        if inner.contains('<') || inner.contains('>') {
            None
        } else {
            Some(inner)
        }
    } else {
        None
    }
}

/// Parse the explicit `<kind: name>` form.
fn parse_canonical_tag(keyword: &str, name: &str) -> Option<MediaFields> {
    let kind = match keyword {
        IMAGE_TAG => MediaKind::Image,
        VIDEO_TAG => MediaKind::Video,
        PLAYER_IMAGE_TAG => MediaKind::PlayerImage,
        PLAYER_VIDEO_TAG => MediaKind::PlayerVideo,
        _ => return None,
    };

    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }

    Some(MediaFields {
        kind,
        name: name.to_string(),
    })
}

/// Parse the `<filename.ext>` shorthand written against files on disk.
fn parse_shorthand_tag(inner: &str) -> Option<MediaFields> {
    if inner.is_empty() || inner.contains(char::is_whitespace) {
        return None;
    }

    let (stem, is_video) = match inner.rfind('.') {
        Some(i) => {
            let stem = inner.get(..i).unwrap();
            let extension = inner.get(i + 1..).unwrap().to_lowercase();

            if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
                (stem, false)
            } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
                (stem, true)
            } else {
                return None;
            }
        }
        None => (inner, false),
    };

    let (name, is_player) = if stem.starts_with(PLAYER_MEDIA_PREFIX) {
        (stem.get(PLAYER_MEDIA_PREFIX.len()..).unwrap(), true)
    } else {
        (stem, false)
    };

    if name.is_empty() {
        return None;
    }

    let kind = match (is_player, is_video) {
        (false, false) => MediaKind::Image,
        (false, true) => MediaKind::Video,
        (true, false) => MediaKind::PlayerImage,
        (true, true) => MediaKind::PlayerVideo,
    };

    Some(MediaFields {
        kind,
        name: name.to_string(),
    })
}
