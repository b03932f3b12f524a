//! Parsing `~` directive lines.
//!
//! Directives drive everything in the format which is not dialogue or flow
//! control: story flags, typing indicators, pauses, side stories and scene
//! transitions. They share one call-like shape: `~ Keyword(arguments)`.

use crate::consts::{
    DIRECTIVE_MARKER, FAKE_TYPE_DIRECTIVE, REMOVE_FLAG_DIRECTIVE, SET_FLAG_DIRECTIVE,
    SIDE_STORY_DIRECTIVE, TRANSITION_DIRECTIVE, WAIT_DIRECTIVE,
};

/// A recognized directive line.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// `~ SetStoryFlag("name")`
    SetFlag(String),
    /// `~ RemoveStoryFlag("name")`
    RemoveFlag(String),
    /// `~ FakeType(seconds)`
    FakeType(f32),
    /// `~ Wait(seconds)`
    Wait(f32),
    /// `~ SideStory("name")`
    SideStory(String),
    /// `~ Transition("title")` or `~ Transition("title", "subtitle")`
    Transition {
        /// Title shown to the player.
        title: String,
        /// Optional subtitle.
        subtitle: Option<String>,
    },
}

/// Parse a directive from a line, if the line represents one.
///
/// Lines starting with the directive marker but not matching any known
/// directive shape yield `None`; the caller preserves them as raw content.
pub fn parse_directive(content: &str) -> Option<Directive> {
    let trimmed = content.trim();

    if !trimmed.starts_with(DIRECTIVE_MARKER) {
        return None;
    }

    let call = trimmed
        .get(DIRECTIVE_MARKER.len_utf8()..)
        .map(str::trim)?;

    let (keyword, arguments) = split_call(call)?;

    match keyword {
        SET_FLAG_DIRECTIVE => single_string_argument(&arguments).map(Directive::SetFlag),
        REMOVE_FLAG_DIRECTIVE => single_string_argument(&arguments).map(Directive::RemoveFlag),
        FAKE_TYPE_DIRECTIVE => single_number_argument(&arguments).map(Directive::FakeType),
        WAIT_DIRECTIVE => single_number_argument(&arguments).map(Directive::Wait),
        SIDE_STORY_DIRECTIVE => single_string_argument(&arguments).map(Directive::SideStory),
        TRANSITION_DIRECTIVE => parse_transition_arguments(&arguments),
        _ => None,
    }
}

/// Split a `Keyword(arguments)` call into its parts.
fn split_call(call: &str) -> Option<(&str, Vec<String>)> {
    let open = call.find('(')?;

    if !call.ends_with(')') {
        return None;
    }

    let keyword = call.get(..open).unwrap().trim();
    let inner = call.get(open + 1..call.len() - 1).unwrap().trim();

    let arguments = if inner.is_empty() {
        Vec::new()
    } else {
        split_arguments(inner)?
    };

    Some((keyword, arguments))
}

/// Split a comma separated argument list, respecting quoted strings.
fn split_arguments(inner: &str) -> Option<Vec<String>> {
    let mut arguments = Vec::new();
    let mut current = String::new();
    let mut in_string = false;

    for c in inner.chars() {
        match c {
            '"' => {
                in_string = !in_string;
                current.push(c);
            }
            ',' if !in_string => {
                arguments.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    if in_string {
        return None;
    }

    arguments.push(current.trim().to_string());

    Some(arguments)
}

/// Read the single quoted-string argument of a directive.
fn single_string_argument(arguments: &[String]) -> Option<String> {
    match arguments {
        [argument] => read_quoted_string(argument),
        _ => None,
    }
}

/// Read the single numeric argument of a directive.
fn single_number_argument(arguments: &[String]) -> Option<f32> {
    match arguments {
        [argument] => argument.parse::<f32>().ok().filter(|seconds| *seconds >= 0.0),
        _ => None,
    }
}

fn parse_transition_arguments(arguments: &[String]) -> Option<Directive> {
    match arguments {
        [title] => Some(Directive::Transition {
            title: read_quoted_string(title)?,
            subtitle: None,
        }),
        [title, subtitle] => Some(Directive::Transition {
            title: read_quoted_string(title)?,
            subtitle: Some(read_quoted_string(subtitle)?),
        }),
        _ => None,
    }
}

fn read_quoted_string(argument: &str) -> Option<String> {
    if argument.len() >= 2 && argument.starts_with('"') && argument.ends_with('"') {
        Some(argument.get(1..argument.len() - 1).unwrap().to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_remove_flag_directives_capture_the_flag_name() {
        assert_eq!(
            parse_directive("~ SetStoryFlag(\"met_sam\")").unwrap(),
            Directive::SetFlag("met_sam".to_string())
        );
        assert_eq!(
            parse_directive("~ RemoveStoryFlag(\"met_sam\")").unwrap(),
            Directive::RemoveFlag("met_sam".to_string())
        );
    }

    #[test]
    fn fake_type_and_wait_directives_capture_seconds() {
        assert_eq!(
            parse_directive("~ FakeType(1.5)").unwrap(),
            Directive::FakeType(1.5)
        );
        assert_eq!(parse_directive("~ Wait(2)").unwrap(), Directive::Wait(2.0));
    }

    #[test]
    fn transition_directives_take_an_optional_subtitle() {
        assert_eq!(
            parse_directive("~ Transition(\"Chapter 1\")").unwrap(),
            Directive::Transition {
                title: "Chapter 1".to_string(),
                subtitle: None,
            }
        );
        assert_eq!(
            parse_directive("~ Transition(\"Chapter 1\", \"Later that night\")").unwrap(),
            Directive::Transition {
                title: "Chapter 1".to_string(),
                subtitle: Some("Later that night".to_string()),
            }
        );
    }

    #[test]
    fn side_story_directives_capture_the_story_name() {
        assert_eq!(
            parse_directive("~ SideStory(\"sam_texts\")").unwrap(),
            Directive::SideStory("sam_texts".to_string())
        );
    }

    #[test]
    fn quoted_strings_may_contain_commas() {
        assert_eq!(
            parse_directive("~ Transition(\"One, two\")").unwrap(),
            Directive::Transition {
                title: "One, two".to_string(),
                subtitle: None,
            }
        );
    }

    #[test]
    fn unknown_or_malformed_directives_are_not_recognized() {
        assert!(parse_directive("~ Unknown(\"x\")").is_none());
        assert!(parse_directive("~ SetStoryFlag(met_sam)").is_none());
        assert!(parse_directive("~ SetStoryFlag(\"a\", \"b\")").is_none());
        assert!(parse_directive("~ Wait(-1)").is_none());
        assert!(parse_directive("~ Wait(two)").is_none());
        assert!(parse_directive("~ SetStoryFlag").is_none());
    }

    #[test]
    fn lines_without_the_marker_are_not_directives() {
        assert!(parse_directive("SetStoryFlag(\"met_sam\")").is_none());
    }
}
