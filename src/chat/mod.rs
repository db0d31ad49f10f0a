pub mod fence;
pub mod markdown;

use fence::{has_fence, parse_reply, CodeBlock, FenceWarning, Segment};
use markdown::{render_markdown, MarkdownBlock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
    System,
    Error,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Assistant",
            Self::System => "System",
            Self::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedPart {
    Markdown(Vec<MarkdownBlock>),
    Code(CodeBlock),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub message: ChatMessage,
    pub parts: Vec<RenderedPart>,
    pub warning: Option<FenceWarning>,
}

impl TranscriptEntry {
    pub fn render(message: ChatMessage) -> Self {
        if message.sender != Sender::Assistant || !has_fence(&message.content) {
            return Self {
                parts: vec![RenderedPart::Markdown(render_markdown(&message.content))],
                warning: None,
                message,
            };
        }

        let reply = parse_reply(&message.content);
        let parts = reply
            .segments
            .into_iter()
            .map(|segment| match segment {
                Segment::Prose(text) => RenderedPart::Markdown(render_markdown(&text)),
                Segment::Code(block) => RenderedPart::Code(block),
            })
            .collect();
        Self {
            message,
            parts,
            warning: reply.warning,
        }
    }
}

#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    scroll_to_bottom: bool,
}

impl Transcript {
    pub fn append(&mut self, sender: Sender, content: impl Into<String>) {
        let message = ChatMessage {
            sender,
            content: content.into(),
        };
        self.entries.push(TranscriptEntry::render(message));
        self.scroll_to_bottom = true;
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_bottom)
    }
}

pub fn compose_user_message<'a>(prompt: &str, selected: impl IntoIterator<Item = &'a str>) -> String {
    let paths: Vec<&str> = selected.into_iter().collect();
    if paths.is_empty() {
        return prompt.to_string();
    }
    format!("{prompt}\n\nReference files:\n{}", paths.join("\n"))
}
