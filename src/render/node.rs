//! Display tree produced by the renderer
//!
//! Nodes own plain strings only. Markup is produced exclusively by
//! [`DisplayNode::to_html`], which escapes every text and attribute value;
//! the one exception is highlighter output, which is generated from the
//! code text by the highlighter itself and is escaped there.

use html_escape::{encode_double_quoted_attribute_to_string, encode_text_to_string};
use std::fmt::Write;

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn css_class(self) -> &'static str {
        match self {
            Role::User => "user-message",
            Role::Assistant => "assistant-message",
        }
    }
}

/// How the body of a turn was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Unformatted text, shown verbatim
    Plain,
    /// Structured content from a Markdown parse
    Markdown,
}

/// Column alignment in a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// A hyperlink; `target` and `rel` stay unset until hardening
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub title: String,
    pub target: Option<&'static str>,
    pub rel: Option<&'static str>,
}

impl Link {
    pub fn new(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: title.into(),
            target: None,
            rel: None,
        }
    }
}

/// A fenced or indented code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// First word of the fence info string, if any
    pub language: Option<String>,
    pub code: String,
    /// Highlighter HTML for `code`; `None` means show `code` as-is
    pub highlighted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Root of every rendered turn
    Turn { role: Role, format: Format },
    Paragraph,
    Heading(u8),
    BlockQuote,
    List { start: Option<u64> },
    ListItem,
    Table,
    TableHead,
    TableRow,
    TableCell { header: bool, align: Align },
    Emphasis,
    Strong,
    Strikethrough,
    InlineCode,
    Link(Link),
    /// Container for constructs without a dedicated element
    Span,
}

/// Structured, safe-to-render content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNode {
    Text(String),
    Element {
        kind: ElementKind,
        children: Vec<DisplayNode>,
    },
    CodeBlock(CodeBlock),
    LineBreak,
    Rule,
    TaskMarker { checked: bool },
}

impl DisplayNode {
    pub fn element(kind: ElementKind, children: Vec<DisplayNode>) -> Self {
        DisplayNode::Element { kind, children }
    }

    /// Root node for a turn whose body is structured content
    pub fn turn(role: Role, children: Vec<DisplayNode>) -> Self {
        Self::element(
            ElementKind::Turn {
                role,
                format: Format::Markdown,
            },
            children,
        )
    }

    /// Root node for a turn shown verbatim
    pub fn plain_turn(role: Role, text: &str) -> Self {
        let children = if text.is_empty() {
            vec![]
        } else {
            vec![DisplayNode::Text(text.to_string())]
        };
        Self::element(
            ElementKind::Turn {
                role,
                format: Format::Plain,
            },
            children,
        )
    }

    /// Format of the turn, when this node is a turn root
    pub fn format(&self) -> Option<Format> {
        match self {
            DisplayNode::Element {
                kind: ElementKind::Turn { format, .. },
                ..
            } => Some(*format),
            _ => None,
        }
    }

    /// Serialize to an HTML fragment.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, self);
        out
    }
}

// ============================================================================
// HTML serialization
// ============================================================================

fn write_node(out: &mut String, node: &DisplayNode) {
    match node {
        DisplayNode::Text(text) => {
            encode_text_to_string(text, out);
        }
        DisplayNode::LineBreak => out.push_str("<br>"),
        DisplayNode::Rule => out.push_str("<hr>"),
        DisplayNode::TaskMarker { checked } => {
            out.push_str(if *checked {
                r#"<input type="checkbox" disabled checked>"#
            } else {
                r#"<input type="checkbox" disabled>"#
            });
        }
        DisplayNode::CodeBlock(block) => write_code_block(out, block),
        DisplayNode::Element { kind, children } => write_element(out, kind, children),
    }
}

fn write_children(out: &mut String, children: &[DisplayNode]) {
    for child in children {
        write_node(out, child);
    }
}

fn write_element(out: &mut String, kind: &ElementKind, children: &[DisplayNode]) {
    match kind {
        ElementKind::Turn { role, format } => {
            let format = match format {
                Format::Plain => "plain",
                Format::Markdown => "markdown",
            };
            let _ = write!(
                out,
                r#"<div class="{}" data-format="{format}">"#,
                role.css_class()
            );
            write_children(out, children);
            out.push_str("</div>");
        }
        ElementKind::Heading(level) => {
            let level = (*level).clamp(1, 6);
            let _ = write!(out, "<h{level}>");
            write_children(out, children);
            let _ = write!(out, "</h{level}>");
        }
        ElementKind::List { start: None } => wrap(out, "ul", children),
        ElementKind::List { start: Some(start) } => {
            if *start == 1 {
                out.push_str("<ol>");
            } else {
                let _ = write!(out, r#"<ol start="{start}">"#);
            }
            write_children(out, children);
            out.push_str("</ol>");
        }
        ElementKind::Table => write_table(out, children),
        ElementKind::TableHead => {
            out.push_str("<thead><tr>");
            write_children(out, children);
            out.push_str("</tr></thead>");
        }
        ElementKind::TableCell { header, align } => {
            let tag = if *header { "th" } else { "td" };
            match align {
                Align::None => {
                    let _ = write!(out, "<{tag}>");
                }
                Align::Left => {
                    let _ = write!(out, r#"<{tag} style="text-align: left">"#);
                }
                Align::Center => {
                    let _ = write!(out, r#"<{tag} style="text-align: center">"#);
                }
                Align::Right => {
                    let _ = write!(out, r#"<{tag} style="text-align: right">"#);
                }
            }
            write_children(out, children);
            let _ = write!(out, "</{tag}>");
        }
        ElementKind::Link(link) => {
            out.push_str(r#"<a href=""#);
            encode_double_quoted_attribute_to_string(&link.href, out);
            out.push('"');
            if !link.title.is_empty() {
                out.push_str(r#" title=""#);
                encode_double_quoted_attribute_to_string(&link.title, out);
                out.push('"');
            }
            if let Some(target) = link.target {
                let _ = write!(out, r#" target="{target}""#);
            }
            if let Some(rel) = link.rel {
                let _ = write!(out, r#" rel="{rel}""#);
            }
            out.push('>');
            write_children(out, children);
            out.push_str("</a>");
        }
        ElementKind::Paragraph => wrap(out, "p", children),
        ElementKind::BlockQuote => wrap(out, "blockquote", children),
        ElementKind::ListItem => wrap(out, "li", children),
        ElementKind::TableRow => wrap(out, "tr", children),
        ElementKind::Emphasis => wrap(out, "em", children),
        ElementKind::Strong => wrap(out, "strong", children),
        ElementKind::Strikethrough => wrap(out, "del", children),
        ElementKind::InlineCode => wrap(out, "code", children),
        ElementKind::Span => wrap(out, "span", children),
    }
}

fn wrap(out: &mut String, tag: &str, children: &[DisplayNode]) {
    let _ = write!(out, "<{tag}>");
    write_children(out, children);
    let _ = write!(out, "</{tag}>");
}

/// The header comes first; body rows are grouped under `<tbody>`.
fn write_table(out: &mut String, children: &[DisplayNode]) {
    out.push_str("<table>");
    let (head, body): (Vec<_>, Vec<_>) = children.iter().partition(|child| {
        matches!(
            child,
            DisplayNode::Element {
                kind: ElementKind::TableHead,
                ..
            }
        )
    });
    for child in head {
        write_node(out, child);
    }
    if !body.is_empty() {
        out.push_str("<tbody>");
        for child in body {
            write_node(out, child);
        }
        out.push_str("</tbody>");
    }
    out.push_str("</table>");
}

fn write_code_block(out: &mut String, block: &CodeBlock) {
    out.push_str("<pre><code");
    if let Some(language) = &block.language {
        out.push_str(r#" class="language-"#);
        encode_double_quoted_attribute_to_string(language, out);
        out.push('"');
    }
    out.push('>');
    match &block.highlighted {
        Some(html) => out.push_str(html),
        None => {
            encode_text_to_string(&block.code, out);
        }
    }
    out.push_str("</code></pre>");
}

// ============================================================================
// Test helpers
// ============================================================================

#[cfg(test)]
impl DisplayNode {
    /// Every node in the subtree, depth-first, including `self`
    pub fn descendants(&self) -> Vec<&DisplayNode> {
        let mut out = vec![self];
        if let DisplayNode::Element { children, .. } = self {
            for child in children {
                out.extend(child.descendants());
            }
        }
        out
    }

    /// Concatenated text of the subtree
    pub fn text_content(&self) -> String {
        self.descendants()
            .into_iter()
            .filter_map(|node| match node {
                DisplayNode::Text(text) => Some(text.as_str()),
                DisplayNode::CodeBlock(block) => Some(block.code.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn links(&self) -> Vec<&Link> {
        self.descendants()
            .into_iter()
            .filter_map(|node| match node {
                DisplayNode::Element {
                    kind: ElementKind::Link(link),
                    ..
                } => Some(link),
                _ => None,
            })
            .collect()
    }

    pub fn code_blocks(&self) -> Vec<&CodeBlock> {
        self.descendants()
            .into_iter()
            .filter_map(|node| match node {
                DisplayNode::CodeBlock(block) => Some(block),
                _ => None,
            })
            .collect()
    }

    /// Elements of a given kind, compared by discriminant only
    pub fn elements_like(&self, probe: &ElementKind) -> Vec<&DisplayNode> {
        self.descendants()
            .into_iter()
            .filter(|node| match node {
                DisplayNode::Element { kind, .. } => {
                    std::mem::discriminant(kind) == std::mem::discriminant(probe)
                }
                _ => false,
            })
            .collect()
    }
}
