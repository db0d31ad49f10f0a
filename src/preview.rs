use crate::workspace::selection::{ReadToken, TokenSource};

pub const PLAIN_TEXT: &str = "plaintext";

const LANGUAGES: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("html", "html"),
    ("css", "css"),
    ("json", "json"),
    ("rs", "rust"),
    ("ts", "typescript"),
    ("toml", "toml"),
    ("md", "markdown"),
    ("c", "c"),
    ("h", "c"),
    ("cpp", "cpp"),
    ("hpp", "cpp"),
    ("sh", "bash"),
];

pub fn language_for_path(path: &str) -> &'static str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return PLAIN_TEXT;
    };
    let extension = extension.to_ascii_lowercase();
    LANGUAGES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, language)| *language)
        .unwrap_or(PLAIN_TEXT)
}

pub fn language_for_hint(hint: &str) -> &'static str {
    let hint = hint.trim().to_ascii_lowercase();
    LANGUAGES
        .iter()
        .find(|(ext, language)| *ext == hint || *language == hint)
        .map(|(_, language)| *language)
        .unwrap_or(PLAIN_TEXT)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub path: String,
    pub content: String,
    pub language: &'static str,
}

#[derive(Debug, Default)]
pub struct PreviewState {
    document: Option<PreviewDocument>,
    latest: Option<ReadToken>,
    tokens: TokenSource,
}

impl PreviewState {
    pub fn request(&mut self) -> ReadToken {
        let token = self.tokens.issue();
        self.latest = Some(token);
        token
    }

    pub fn show(&mut self, token: ReadToken, path: &str, content: String) -> bool {
        if self.latest != Some(token) {
            return false;
        }
        self.latest = None;
        self.document = Some(PreviewDocument {
            path: path.to_string(),
            language: language_for_path(path),
            content,
        });
        true
    }

    pub fn fail(&mut self, token: ReadToken) -> bool {
        if self.latest != Some(token) {
            return false;
        }
        self.latest = None;
        true
    }

    pub fn clear(&mut self) {
        self.document = None;
        self.latest = None;
    }

    pub fn document(&self) -> Option<&PreviewDocument> {
        self.document.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.latest.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(language_for_path("demo/main.PY"), "python");
        assert_eq!(language_for_path("demo/app.js"), "javascript");
        assert_eq!(language_for_path("demo/index.html"), "html");
    }

    #[test]
    fn unknown_or_missing_extension_is_plain_text() {
        assert_eq!(language_for_path("demo/Makefile"), PLAIN_TEXT);
        assert_eq!(language_for_path("demo/archive.xyz"), PLAIN_TEXT);
        assert_eq!(language_for_path("demo.d/README"), PLAIN_TEXT);
    }

    #[test]
    fn hints_accept_extensions_and_names() {
        assert_eq!(language_for_hint("py"), "python");
        assert_eq!(language_for_hint("Rust"), "rust");
        assert_eq!(language_for_hint("brainfuck"), PLAIN_TEXT);
    }

    #[test]
    fn stale_preview_does_not_replace_newer_request() {
        let mut preview = PreviewState::default();
        let first = preview.request();
        let second = preview.request();

        assert!(!preview.show(first, "demo/a.py", "a".to_string()));
        assert!(preview.document().is_none());
        assert!(preview.show(second, "demo/b.css", "b".to_string()));

        let document = preview.document().expect("preview shown");
        assert_eq!(document.path, "demo/b.css");
        assert_eq!(document.language, "css");
        assert!(!preview.is_loading());
    }
}
