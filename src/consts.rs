// Section markers
pub const KNOT_MARKER: &str = "==";
pub const STITCH_MARKER: &str = "=";

// Level control markers
pub const CHOICE_MARKER: char = '*';
pub const STICKY_CHOICE_MARKER: char = '+';
pub const BRANCH_MARKER: char = '-';

// Text markers
pub const DIVERT_MARKER: &str = "->";
pub const LINE_COMMENT_MARKER: &str = "//";
pub const LAYOUT_COMMENT_MARKER: &str = "//@";
pub const DIRECTIVE_MARKER: char = '~';

// Directive keywords following the `~` marker
pub const SET_FLAG_DIRECTIVE: &str = "SetStoryFlag";
pub const REMOVE_FLAG_DIRECTIVE: &str = "RemoveStoryFlag";
pub const FAKE_TYPE_DIRECTIVE: &str = "FakeType";
pub const WAIT_DIRECTIVE: &str = "Wait";
pub const SIDE_STORY_DIRECTIVE: &str = "SideStory";
pub const TRANSITION_DIRECTIVE: &str = "Transition";

// Media tag keywords inside `<...>` tags
pub const IMAGE_TAG: &str = "image";
pub const VIDEO_TAG: &str = "video";
pub const PLAYER_IMAGE_TAG: &str = "player-image";
pub const PLAYER_VIDEO_TAG: &str = "player-video";
pub const PLAYER_MEDIA_PREFIX: &str = "player-";

/// Divert target which ends the story flow instead of moving to a knot.
pub const DONE_KNOT: &str = "END";

/// Pseudo-source used in reverse-divert maps for the initial divert.
pub const START_SOURCE: &str = "START";

/// Names which cannot be used for knots and stitches.
pub const RESERVED_KEYWORDS: &[&str] = &["END", "ELSE"];

// Asset resolution
pub const IMAGE_FOLDER: &str = "Images";
pub const VIDEO_FOLDER: &str = "Videos";
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

/// Number of spaces used when serializing nested content.
pub const NESTED_INDENT: usize = 4;
