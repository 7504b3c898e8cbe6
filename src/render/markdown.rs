//! Markdown to display-tree conversion
//!
//! Folds the pulldown-cmark event stream into [`DisplayNode`]s with an
//! explicit frame stack. Raw HTML in the source is kept as text.

use super::node::{Align, CodeBlock, DisplayNode, ElementKind, Link};
use super::RenderOptions;
use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use thiserror::Error;

/// Deepest element nesting accepted before giving up on structure
pub const MAX_NESTING_DEPTH: usize = 64;

/// Reasons the event stream could not be folded into a tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("end tag without a matching start tag")]
    UnbalancedEnd,
    #[error("{0} element(s) left open at end of input")]
    Unclosed(usize),
    #[error("content nested deeper than {MAX_NESTING_DEPTH} levels")]
    TooDeep,
}

enum Frame {
    Root(Vec<DisplayNode>),
    Element {
        kind: ElementKind,
        children: Vec<DisplayNode>,
    },
    Code {
        language: Option<String>,
        code: String,
    },
    /// Images become links labelled with their alt text
    Image {
        link: Link,
        children: Vec<DisplayNode>,
    },
}

impl Frame {
    fn children_mut(&mut self) -> Option<&mut Vec<DisplayNode>> {
        match self {
            Frame::Root(children)
            | Frame::Element { children, .. }
            | Frame::Image { children, .. } => Some(children),
            Frame::Code { .. } => None,
        }
    }

    fn into_node(self) -> Option<DisplayNode> {
        match self {
            Frame::Root(_) => None,
            Frame::Element { kind, children } => Some(DisplayNode::Element { kind, children }),
            Frame::Code { language, code } => Some(DisplayNode::CodeBlock(CodeBlock {
                language,
                code,
                highlighted: None,
            })),
            Frame::Image { link, mut children } => {
                if children.is_empty() {
                    children.push(DisplayNode::Text(link.href.clone()));
                }
                Some(DisplayNode::Element {
                    kind: ElementKind::Link(link),
                    children,
                })
            }
        }
    }
}

struct TreeBuilder {
    stack: Vec<Frame>,
    line_breaks: bool,
    alignments: Vec<Align>,
    in_table_head: bool,
    cell_index: usize,
}

impl TreeBuilder {
    fn new(line_breaks: bool) -> Self {
        Self {
            stack: vec![Frame::Root(Vec::new())],
            line_breaks,
            alignments: Vec::new(),
            in_table_head: false,
            cell_index: 0,
        }
    }

    fn push_frame(&mut self, frame: Frame) -> Result<(), RenderError> {
        if self.stack.len() > MAX_NESTING_DEPTH {
            return Err(RenderError::TooDeep);
        }
        self.stack.push(frame);
        Ok(())
    }

    fn open(&mut self, kind: ElementKind) -> Result<(), RenderError> {
        self.push_frame(Frame::Element {
            kind,
            children: Vec::new(),
        })
    }

    fn close(&mut self) -> Result<(), RenderError> {
        if self.stack.len() <= 1 {
            return Err(RenderError::UnbalancedEnd);
        }
        let node = self
            .stack
            .pop()
            .and_then(Frame::into_node)
            .ok_or(RenderError::UnbalancedEnd)?;
        self.append(node);
        Ok(())
    }

    /// Append to the innermost frame that accepts children.
    fn append(&mut self, node: DisplayNode) {
        let Some(children) = self.stack.iter_mut().rev().find_map(Frame::children_mut) else {
            return;
        };
        if let (Some(DisplayNode::Text(last)), DisplayNode::Text(text)) =
            (children.last_mut(), &node)
        {
            last.push_str(text);
            return;
        }
        children.push(node);
    }

    fn text(&mut self, text: &str) {
        if let Some(Frame::Code { code, .. }) = self.stack.last_mut() {
            code.push_str(text);
        } else {
            self.append(DisplayNode::Text(text.to_string()));
        }
    }

    fn start(&mut self, tag: Tag<'_>) -> Result<(), RenderError> {
        match tag {
            Tag::Paragraph => self.open(ElementKind::Paragraph),
            Tag::Heading { level, .. } => self.open(ElementKind::Heading(level as u8)),
            Tag::BlockQuote(_) => self.open(ElementKind::BlockQuote),
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|word| word.trim_matches(|c| c == '{' || c == '}' || c == '.'))
                        .filter(|word| !word.is_empty())
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.push_frame(Frame::Code {
                    language,
                    code: String::new(),
                })
            }
            Tag::List(start) => self.open(ElementKind::List { start }),
            Tag::Item => self.open(ElementKind::ListItem),
            Tag::Table(alignments) => {
                self.alignments = alignments.into_iter().map(align_from).collect();
                self.open(ElementKind::Table)
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.cell_index = 0;
                self.open(ElementKind::TableHead)
            }
            Tag::TableRow => {
                self.cell_index = 0;
                self.open(ElementKind::TableRow)
            }
            Tag::TableCell => {
                let align = self.alignments.get(self.cell_index).copied().unwrap_or_default();
                self.cell_index += 1;
                self.open(ElementKind::TableCell {
                    header: self.in_table_head,
                    align,
                })
            }
            Tag::Emphasis => self.open(ElementKind::Emphasis),
            Tag::Strong => self.open(ElementKind::Strong),
            Tag::Strikethrough => self.open(ElementKind::Strikethrough),
            Tag::Link {
                dest_url, title, ..
            } => self.open(ElementKind::Link(Link::new(dest_url.to_string(), title.to_string()))),
            Tag::Image {
                dest_url, title, ..
            } => self.push_frame(Frame::Image {
                link: Link::new(dest_url.to_string(), title.to_string()),
                children: Vec::new(),
            }),
            _ => self.open(ElementKind::Span),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        match event {
            Event::Start(tag) => self.start(tag)?,
            Event::End(end) => {
                if end == TagEnd::TableHead {
                    self.in_table_head = false;
                }
                self.close()?;
            }
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.append(DisplayNode::element(
                ElementKind::InlineCode,
                vec![DisplayNode::Text(code.to_string())],
            )),
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            Event::FootnoteReference(label) => self.text(&format!("[^{label}]")),
            Event::SoftBreak => {
                if self.line_breaks {
                    self.append(DisplayNode::LineBreak);
                } else {
                    self.text("\n");
                }
            }
            Event::HardBreak => self.append(DisplayNode::LineBreak),
            Event::Rule => self.append(DisplayNode::Rule),
            Event::TaskListMarker(checked) => self.append(DisplayNode::TaskMarker { checked }),
            _ => {}
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<DisplayNode>, RenderError> {
        if self.stack.len() != 1 {
            return Err(RenderError::Unclosed(self.stack.len() - 1));
        }
        match self.stack.pop() {
            Some(Frame::Root(children)) => Ok(children),
            _ => Err(RenderError::UnbalancedEnd),
        }
    }
}

fn align_from(alignment: Alignment) -> Align {
    match alignment {
        Alignment::None => Align::None,
        Alignment::Left => Align::Left,
        Alignment::Center => Align::Center,
        Alignment::Right => Align::Right,
    }
}

fn parser_options(options: &RenderOptions) -> Options {
    let mut parser_options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    if options.smart_punctuation {
        parser_options |= Options::ENABLE_SMART_PUNCTUATION;
    }
    parser_options
}

/// Parse Markdown into top-level display nodes.
///
/// Code blocks come back unhighlighted and links unhardened; those are
/// separate passes.
pub fn parse(text: &str, options: &RenderOptions) -> Result<Vec<DisplayNode>, RenderError> {
    let mut builder = TreeBuilder::new(options.line_breaks);
    for event in Parser::new_ext(text, parser_options(options)) {
        builder.event(event)?;
    }
    builder.finish()
}
