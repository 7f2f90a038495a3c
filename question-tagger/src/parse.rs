//! Validation of the model reply into a [`TaggingResult`].

use serde_json::Value;
use thiserror::Error;

use crate::record::TaggingResult;

/// Why a reply could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Not JSON at all.
    #[error("invalid_syntax")]
    InvalidSyntax,
    /// JSON, but not `{chapters: [string], difficulty: easy|medium|hard}`.
    #[error("invalid_shape")]
    InvalidShape,
}

/// Decodes a raw reply. Markdown code fences around the JSON are tolerated;
/// unknown extra keys are ignored.
pub fn parse_reply(raw: &str) -> Result<TaggingResult, ErrorKind> {
    let cleaned = cleanup_json_like(raw);
    let value: Value = serde_json::from_str(&cleaned).map_err(|_| ErrorKind::InvalidSyntax)?;
    serde_json::from_value(value).map_err(|_| ErrorKind::InvalidShape)
}

/// Trim common code-fence wrappers around JSON.
///
/// The info string after the opening fence (`json`, `JSON`, `jsonc`...) is
/// dropped whatever its case.
fn cleanup_json_like(s: &str) -> String {
    let t = s.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t.to_string();
    };
    let body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let body = match body.rfind("```") {
        Some(pos) => &body[..pos],
        None => body,
    };
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Difficulty;

    #[test]
    fn well_formed_reply() {
        let r = parse_reply(r#"{"chapters":["Vectors"],"difficulty":"hard"}"#).unwrap();
        assert_eq!(
            r,
            TaggingResult {
                chapters: vec!["Vectors".into()],
                difficulty: Difficulty::Hard
            }
        );
    }

    #[test]
    fn prose_is_a_syntax_error() {
        assert_eq!(
            parse_reply("I cannot classify this."),
            Err(ErrorKind::InvalidSyntax)
        );
        assert_eq!(parse_reply(""), Err(ErrorKind::InvalidSyntax));
    }

    #[test]
    fn wrong_shapes_are_shape_errors() {
        for raw in [
            r#"{"topic":"Algebra"}"#,
            r#"{"chapters":"Algebra","difficulty":"easy"}"#,
            r#"{"chapters":[1,2],"difficulty":"easy"}"#,
            r#"{"chapters":[],"difficulty":"impossible"}"#,
            r#"{"chapters":[]}"#,
            r#"["Algebra"]"#,
            "42",
        ] {
            assert_eq!(parse_reply(raw), Err(ErrorKind::InvalidShape), "{raw}");
        }
    }

    #[test]
    fn fenced_reply_is_accepted() {
        let raw = "```json\n{\"chapters\":[\"Integration\",\"Series\"],\"difficulty\":\"medium\"}\n```";
        let r = parse_reply(raw).unwrap();
        assert_eq!(r.chapters, vec!["Integration", "Series"]);
        assert_eq!(r.difficulty, Difficulty::Medium);
    }

    #[test]
    fn fence_language_tag_is_case_insensitive() {
        let raw = "```JSON\n{\"chapters\":[\"Vectors\"],\"difficulty\":\"hard\"}\n```";
        let r = parse_reply(raw).unwrap();
        assert_eq!(r.chapters, vec!["Vectors"]);
        assert_eq!(r.difficulty, Difficulty::Hard);

        let bare = "```\n{\"chapters\":[],\"difficulty\":\"easy\"}\n```";
        assert_eq!(parse_reply(bare).unwrap().difficulty, Difficulty::Easy);
    }

    #[test]
    fn extra_keys_are_ignored() {
        let r = parse_reply(r#"{"chapters":[],"difficulty":"easy","confidence":0.4}"#).unwrap();
        assert_eq!(r.difficulty, Difficulty::Easy);
        assert!(r.chapters.is_empty());
    }
}
