use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpanStyle {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    pub text: String,
    pub style: SpanStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading(u8),
    ListItem { depth: usize, marker: String },
    CodeBlock { language: String },
    Rule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownBlock {
    pub kind: BlockKind,
    pub quote_depth: usize,
    pub spans: Vec<InlineSpan>,
}

impl MarkdownBlock {
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

pub fn render_markdown(content: &str) -> Vec<MarkdownBlock> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = BlockBuilder::default();
    for event in Parser::new_ext(content, options) {
        builder.handle_event(event);
    }
    builder.finish()
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<MarkdownBlock>,
    current: Option<MarkdownBlock>,
    style: SpanStyle,
    // Ordered lists carry their next number, bullet lists carry None.
    lists: Vec<Option<u64>>,
    quote_ends: Vec<TagEnd>,
}

impl BlockBuilder {
    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => {
                let style = SpanStyle {
                    code: true,
                    ..self.style
                };
                self.push_span(&code, style);
            }
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.push_text("\n"),
            Event::Rule => {
                self.flush();
                self.open(BlockKind::Rule);
                self.flush();
            }
            Event::TaskListMarker(done) => self.push_text(if done { "[x] " } else { "[ ] " }),
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html),
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                let continues_item = matches!(
                    &self.current,
                    Some(block) if matches!(block.kind, BlockKind::ListItem { .. }) && block.spans.is_empty()
                );
                if !continues_item {
                    self.flush();
                    self.open(BlockKind::Paragraph);
                }
            }
            Tag::Heading { level, .. } => {
                self.flush();
                self.open(BlockKind::Heading(level as u8));
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_ends.push(tag.to_end());
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().unwrap_or("").to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.open(BlockKind::CodeBlock { language });
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{number}.");
                        *number += 1;
                        marker
                    }
                    _ => "•".to_string(),
                };
                self.open(BlockKind::ListItem { depth, marker });
            }
            Tag::Strong => self.style.bold = true,
            Tag::Emphasis => self.style.italic = true,
            Tag::Strikethrough => self.style.strikethrough = true,
            Tag::Link { .. } => self.style.link = true,
            Tag::TableCell => self.push_text(" | "),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::TableRow | TagEnd::TableHead => {
                self.flush()
            }
            TagEnd::CodeBlock => {
                if let Some(block) = self.current.as_mut() {
                    if let Some(last) = block.spans.last_mut() {
                        let trimmed_len = last.text.trim_end_matches('\n').len();
                        last.text.truncate(trimmed_len);
                    }
                }
                self.flush();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
            }
            TagEnd::Strong => self.style.bold = false,
            TagEnd::Emphasis => self.style.italic = false,
            TagEnd::Strikethrough => self.style.strikethrough = false,
            TagEnd::Link => self.style.link = false,
            other => {
                if self.quote_ends.last() == Some(&other) {
                    self.flush();
                    self.quote_ends.pop();
                }
            }
        }
    }

    fn open(&mut self, kind: BlockKind) {
        self.current = Some(MarkdownBlock {
            kind,
            quote_depth: self.quote_ends.len(),
            spans: Vec::new(),
        });
    }

    fn push_text(&mut self, text: &str) {
        let style = match &self.current {
            Some(MarkdownBlock {
                kind: BlockKind::CodeBlock { .. },
                ..
            }) => SpanStyle {
                code: true,
                ..SpanStyle::default()
            },
            _ => self.style,
        };
        self.push_span(text, style);
    }

    fn push_span(&mut self, text: &str, style: SpanStyle) {
        if self.current.is_none() {
            self.open(BlockKind::Paragraph);
        }
        let Some(block) = self.current.as_mut() else {
            return;
        };
        match block.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => block.spans.push(InlineSpan {
                text: text.to_string(),
                style,
            }),
        }
    }

    fn flush(&mut self) {
        if let Some(block) = self.current.take() {
            let keep = matches!(block.kind, BlockKind::Rule | BlockKind::CodeBlock { .. })
                || block.spans.iter().any(|span| !span.text.trim().is_empty());
            if keep {
                self.blocks.push(block);
            }
        }
    }

    fn finish(mut self) -> Vec<MarkdownBlock> {
        self.flush();
        self.blocks
    }
}
