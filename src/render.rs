//! Turn rendering
//!
//! User text is always shown verbatim. Assistant text goes through a
//! pipeline with a total fallback at each fallible stage:
//!
//! 1. trim
//! 2. Markdown → display tree (on failure: the raw trimmed text)
//! 3. highlight code blocks (on failure: that block's raw code)
//! 4. harden links

pub mod highlight;
mod links;
mod markdown;
mod node;

#[cfg(test)]
mod proptests;

pub use node::{DisplayNode, Role};
#[allow(unused_imports)] // Public API re-exports
pub use {
    links::{REL_NO_OPENER, TARGET_NEW_CONTEXT},
    markdown::MAX_NESTING_DEPTH,
    node::{ElementKind, Format},
};

/// Markdown rendering switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Treat single newlines inside a paragraph as line breaks
    pub line_breaks: bool,
    /// Typographic quotes, dashes and ellipses
    pub smart_punctuation: bool,
    /// Syntax-highlight code blocks with a language tag
    pub highlight: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line_breaks: true,
            smart_punctuation: true,
            highlight: true,
        }
    }
}

/// Render user input. The text is never interpreted as markup.
pub fn render_user_turn(text: &str) -> DisplayNode {
    DisplayNode::plain_turn(Role::User, text)
}

/// Render assistant output with default options.
pub fn render_assistant_turn(text: &str) -> DisplayNode {
    render_assistant_turn_with(text, &RenderOptions::default())
}

/// Render assistant output. Never fails: input that cannot be structured is
/// shown as plain text.
pub fn render_assistant_turn_with(text: &str, options: &RenderOptions) -> DisplayNode {
    let text = text.trim();
    match markdown::parse(text, options) {
        Ok(mut blocks) => {
            if options.highlight {
                highlight::highlight_blocks(&mut blocks);
            }
            links::harden(&mut blocks);
            DisplayNode::turn(Role::Assistant, blocks)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Markdown rendering failed, showing raw text");
            DisplayNode::plain_turn(Role::Assistant, text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_assistant_text_renders_empty_turn() {
        for text in ["", "   ", "\n\t\n"] {
            let node = render_assistant_turn(text);
            assert_eq!(node, DisplayNode::turn(Role::Assistant, vec![]));
            assert_eq!(
                node.to_html(),
                r#"<div class="assistant-message" data-format="markdown"></div>"#
            );
        }
    }

    #[test]
    fn test_bold_and_python_block() {
        let node = render_assistant_turn("Plan: **do X**\n```python\nprint(1)\n```");

        let strong = node.elements_like(&ElementKind::Strong);
        assert_eq!(strong.len(), 1);
        assert_eq!(strong[0].text_content(), "do X");

        let blocks = node.code_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language.as_deref(), Some("python"));
        assert!(blocks[0].code.contains("print(1)"));
        assert!(blocks[0].highlighted.is_some());
        assert!(node.to_html().contains("<pre><code class=\"language-python\">"));
    }

    #[test]
    fn test_unrecognized_language_keeps_raw_code() {
        let node = render_assistant_turn("```brainfork\n+[<b>]\n```");
        let blocks = node.code_blocks();
        assert_eq!(blocks[0].highlighted, None);
        assert!(node.to_html().contains("+[&lt;b&gt;]"));
    }

    #[test]
    fn test_highlighting_can_be_disabled() {
        let options = RenderOptions {
            highlight: false,
            ..RenderOptions::default()
        };
        let node = render_assistant_turn_with("```python\nprint(1)\n```", &options);
        assert_eq!(node.code_blocks()[0].highlighted, None);
    }

    #[test]
    fn test_links_open_isolated() {
        let node = render_assistant_turn("See [here](http://evil.example)");
        let links = node.links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "http://evil.example");
        assert_eq!(links[0].target, Some(TARGET_NEW_CONTEXT));
        assert_eq!(links[0].rel, Some(REL_NO_OPENER));
        assert!(node.to_html().contains(
            r#"<a href="http://evil.example" target="_blank" rel="noopener noreferrer">here</a>"#
        ));
    }

    #[test]
    fn test_autolinks_and_images_are_hardened_too() {
        let node = render_assistant_turn("<https://a.example> and ![pic](https://b.example/p.png)");
        let links = node.links();
        assert_eq!(links.len(), 2);
        assert!(links
            .iter()
            .all(|link| link.target == Some(TARGET_NEW_CONTEXT) && link.rel == Some(REL_NO_OPENER)));
    }

    #[test]
    fn test_user_text_is_never_markup() {
        let node = render_user_turn("<b>x</b>");
        assert_eq!(node.text_content(), "<b>x</b>");
        assert!(node.elements_like(&ElementKind::Strong).is_empty());
        assert_eq!(
            node.to_html(),
            r#"<div class="user-message" data-format="plain">&lt;b&gt;x&lt;/b&gt;</div>"#
        );
    }

    #[test]
    fn test_user_markdown_is_not_parsed() {
        let node = render_user_turn("**not bold** [no](http://link.example)");
        assert!(node.links().is_empty());
        assert_eq!(node.format(), Some(Format::Plain));
    }

    #[test]
    fn test_assistant_html_is_not_interpreted() {
        let node = render_assistant_turn("<img src=x onerror=alert(1)>");
        let html = node.to_html();
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn test_too_deep_falls_back_to_plain_text() {
        let deep = format!("  {} bottom  ", "> ".repeat(MAX_NESTING_DEPTH * 2));
        let node = render_assistant_turn(&deep);
        assert_eq!(node.format(), Some(Format::Plain));
        assert_eq!(node.text_content(), deep.trim());
    }

    #[test]
    fn test_text_is_trimmed_before_parsing() {
        let node = render_assistant_turn("\n\n    indented? no, trimmed\n");
        assert!(node.code_blocks().is_empty());
        assert_eq!(node.text_content(), "indented? no, trimmed");
    }
}
