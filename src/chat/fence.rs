use crate::preview::{language_for_hint, language_for_path, PLAIN_TEXT};

pub const FENCE: &str = "```";
pub const UNSPECIFIED_PATH: &str = "unspecified file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub path: String,
    pub language: &'static str,
    pub body: String,
}

impl CodeBlock {
    pub fn has_path(&self) -> bool {
        self.path != UNSPECIFIED_PATH
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Prose(String),
    Code(CodeBlock),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceWarning {
    Unterminated,
}

impl FenceWarning {
    pub fn message(self) -> &'static str {
        match self {
            Self::Unterminated => "unterminated code fence; trailing text shown as-is",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedReply {
    pub segments: Vec<Segment>,
    pub warning: Option<FenceWarning>,
}

pub fn has_fence(content: &str) -> bool {
    content.contains(FENCE)
}

pub fn parse_reply(content: &str) -> ParsedReply {
    let parts: Vec<&str> = content.split(FENCE).collect();
    let unterminated = parts.len() % 2 == 0;
    let last = parts.len() - 1;

    let mut reply = ParsedReply::default();
    for (index, part) in parts.iter().enumerate() {
        if index % 2 == 0 {
            let prose = part.trim();
            if !prose.is_empty() {
                reply.segments.push(Segment::Prose(prose.to_string()));
            }
        } else if unterminated && index == last {
            reply
                .segments
                .push(Segment::Prose(format!("{FENCE}{part}").trim().to_string()));
            reply.warning = Some(FenceWarning::Unterminated);
        } else {
            reply.segments.push(Segment::Code(parse_code_block(part)));
        }
    }
    reply
}

/// Resolves the target path of one fenced block.
///
/// A multi-line block whose info line is `language:path` targets `path`.
/// A one-line block `path:code` targets `path` with `code` as its body.
/// Anything else has no target and keeps its full text.
pub fn parse_code_block(segment: &str) -> CodeBlock {
    let trimmed = segment.trim();
    let (first_line, rest) = match trimmed.split_once('\n') {
        Some((first, rest)) => (first, Some(rest)),
        None => (trimmed, None),
    };

    match (first_line.split_once(':'), rest) {
        (Some((hint, path)), Some(rest)) => {
            let path = path.trim();
            let from_path = language_for_path(path);
            CodeBlock {
                path: path.to_string(),
                language: if from_path == PLAIN_TEXT {
                    language_for_hint(hint)
                } else {
                    from_path
                },
                body: rest.to_string(),
            }
        }
        (Some((path, code)), None) => {
            let path = path.trim();
            CodeBlock {
                path: path.to_string(),
                language: language_for_path(path),
                body: code.trim().to_string(),
            }
        }
        (None, _) => CodeBlock {
            path: UNSPECIFIED_PATH.to_string(),
            language: PLAIN_TEXT,
            body: segment.trim_matches(|c| c == '\n' || c == '\r').to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_fence_splits_into_prose_code_prose() {
        let reply = parse_reply("intro ```path.py:code here``` outro");

        assert_eq!(reply.warning, None);
        assert_eq!(
            reply.segments,
            vec![
                Segment::Prose("intro".to_string()),
                Segment::Code(CodeBlock {
                    path: "path.py".to_string(),
                    language: "python",
                    body: "code here".to_string(),
                }),
                Segment::Prose("outro".to_string()),
            ]
        );
    }

    #[test]
    fn info_line_names_language_and_target() {
        let reply = parse_reply(
            "Update the helper:\n```python:src/util.py\ndef add(a, b):\n    return a + b\n```\nDone.",
        );

        let code: Vec<&CodeBlock> = reply
            .segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Code(block) => Some(block),
                Segment::Prose(_) => None,
            })
            .collect();
        assert_eq!(code.len(), 1);
        assert_eq!(code[0].path, "src/util.py");
        assert_eq!(code[0].language, "python");
        assert_eq!(code[0].body, "def add(a, b):\n    return a + b");
        assert_eq!(reply.segments.len(), 3);
    }

    #[test]
    fn windows_style_path_keeps_drive_colon() {
        let block = parse_code_block("rust:C:\\work\\main.rs\nfn main() {}\n");
        assert_eq!(block.path, "C:\\work\\main.rs");
        assert_eq!(block.body, "fn main() {}");
    }

    #[test]
    fn block_without_colon_has_unspecified_target() {
        let block = parse_code_block("\nprint('hi')\n");

        assert_eq!(block.path, UNSPECIFIED_PATH);
        assert!(!block.has_path());
        assert_eq!(block.body, "print('hi')");
        assert_eq!(block.language, PLAIN_TEXT);
    }

    #[test]
    fn reply_without_fence_is_single_prose_segment() {
        let reply = parse_reply("just **markdown** here");
        assert!(!has_fence("just **markdown** here"));
        assert_eq!(
            reply.segments,
            vec![Segment::Prose("just **markdown** here".to_string())]
        );
    }

    #[test]
    fn unterminated_fence_is_reported_and_kept_verbatim() {
        let reply = parse_reply("before ```a.py:x``` middle ```python\nnever closed");

        assert_eq!(reply.warning, Some(FenceWarning::Unterminated));
        assert_eq!(
            reply.segments.last(),
            Some(&Segment::Prose("```python\nnever closed".to_string()))
        );
        assert_eq!(reply.segments.len(), 4);
    }

    #[test]
    fn whitespace_only_prose_is_dropped() {
        let reply = parse_reply("```a.py:x```\n\n```b.py:y```");
        assert_eq!(reply.segments.len(), 2);
        assert!(reply
            .segments
            .iter()
            .all(|segment| matches!(segment, Segment::Code(_))));
    }
}
