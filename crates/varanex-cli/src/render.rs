use crossterm::style::Stylize;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::theme::Palette;

/// Render an assistant reply for the terminal.
///
/// With `palette = None` the output is plain text, which is what gets
/// printed when colors are disabled.
pub fn render_markdown(text: &str, palette: Option<&Palette>) -> String {
    let mut renderer = Renderer::new(palette);
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    for event in Parser::new_ext(text, options) {
        renderer.event(event);
    }
    renderer.finish()
}

struct Renderer<'p> {
    palette: Option<&'p Palette>,
    out: String,
    bold: usize,
    italic: usize,
    heading: bool,
    code_block: bool,
    lists: Vec<Option<u64>>,
    link: Option<String>,
}

impl<'p> Renderer<'p> {
    fn new(palette: Option<&'p Palette>) -> Self {
        Self {
            palette,
            out: String::new(),
            bold: 0,
            italic: 0,
            heading: false,
            code_block: false,
            lists: Vec::new(),
            link: None,
        }
    }

    fn finish(self) -> String {
        self.out.trim_end().to_string()
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.code_block {
                    self.code_lines(&text);
                } else {
                    self.push_styled(&text);
                }
            }
            Event::Code(code) => self.push_code(&format!("`{code}`")),
            Event::Html(html) | Event::InlineHtml(html) => self.out.push_str(&html),
            Event::SoftBreak | Event::HardBreak => self.out.push('\n'),
            Event::Rule => {
                self.line_start();
                self.out.push_str("────────\n\n");
            }
            Event::TaskListMarker(done) => self.out.push_str(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } => self.heading = true,
            Tag::BlockQuote(..) => self.out.push_str("│ "),
            Tag::CodeBlock(_) => {
                self.line_start();
                self.code_block = true;
            }
            Tag::List(start) => {
                self.line_start();
                self.lists.push(start);
            }
            Tag::Item => {
                self.line_start();
                let depth = self.lists.len().saturating_sub(1);
                self.out.push_str(&"  ".repeat(depth));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.out.push_str(&marker);
            }
            Tag::Emphasis => self.italic += 1,
            Tag::Strong => self.bold += 1,
            Tag::Link { dest_url, .. } => self.link = Some(dest_url.to_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.out.push_str("\n\n");
                } else {
                    self.out.push('\n');
                }
            }
            TagEnd::Heading(_) => {
                self.heading = false;
                self.out.push_str("\n\n");
            }
            TagEnd::CodeBlock => {
                self.code_block = false;
                self.line_start();
                if self.lists.is_empty() {
                    self.out.push('\n');
                }
            }
            TagEnd::List(_) => {
                self.lists.pop();
                self.line_start();
                if self.lists.is_empty() {
                    self.out.push('\n');
                }
            }
            TagEnd::Item => self.line_start(),
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            TagEnd::Link => {
                if let Some(url) = self.link.take() {
                    let suffix = format!(" ({url})");
                    self.push_muted(&suffix);
                }
            }
            _ => {}
        }
    }

    /// Start a new line unless already at one.
    fn line_start(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn code_lines(&mut self, text: &str) {
        let indent = "  ".repeat(self.lists.len()) + "    ";
        for line in text.split_inclusive('\n') {
            let (body, newline) = match line.strip_suffix('\n') {
                Some(body) => (body, true),
                None => (line, false),
            };
            self.out.push_str(&indent);
            self.push_code(body);
            if newline {
                self.out.push('\n');
            }
        }
    }

    fn push_styled(&mut self, text: &str) {
        let Some(palette) = self.palette else {
            self.out.push_str(text);
            return;
        };

        let mut styled = text.with(palette.fg);
        if self.heading {
            styled = styled.with(palette.accent).bold();
        }
        if self.bold > 0 {
            styled = styled.bold();
        }
        if self.italic > 0 {
            styled = styled.italic();
        }
        self.out.push_str(&styled.to_string());
    }

    fn push_code(&mut self, text: &str) {
        match self.palette {
            Some(palette) => self.out.push_str(&text.with(palette.code).to_string()),
            None => self.out.push_str(text),
        }
    }

    fn push_muted(&mut self, text: &str) {
        match self.palette {
            Some(palette) => self.out.push_str(&text.with(palette.muted).to_string()),
            None => self.out.push_str(text),
        }
    }
}
