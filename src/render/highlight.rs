//! Syntax highlighting for code blocks
//!
//! Highlighting is best-effort. An unknown language tag or a highlighter
//! error leaves the block's raw code in place.

use super::node::DisplayNode;
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use thiserror::Error;

/// Class prefix keeps highlighter classes apart from page styles
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

const THEME_NAME: &str = "InspiredGitHub";

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("no syntax for language {0:?}")]
    UnknownLanguage(String),
    #[error("no highlighting theme available")]
    NoTheme,
    #[error("highlighter failed: {0}")]
    Syntect(#[from] syntect::Error),
}

struct HighlightAssets {
    syntax_set: SyntaxSet,
    theme: Option<Theme>,
}

/// Syntax definitions are loaded once per process.
fn assets() -> &'static HighlightAssets {
    static ASSETS: OnceLock<HighlightAssets> = OnceLock::new();
    ASSETS.get_or_init(|| {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set.themes.remove(THEME_NAME).or_else(|| {
            theme_set
                .themes
                .into_values()
                .next()
        });
        HighlightAssets { syntax_set, theme }
    })
}

/// Highlight `code` as `language`, returning class-annotated HTML.
pub fn highlight(code: &str, language: &str) -> Result<String, HighlightError> {
    let assets = assets();
    let syntax = assets
        .syntax_set
        .find_syntax_by_token(language)
        .ok_or_else(|| HighlightError::UnknownLanguage(language.to_string()))?;

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &assets.syntax_set, CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}

/// CSS for the classes emitted by [`highlight`].
pub fn stylesheet() -> Result<String, HighlightError> {
    let theme = assets().theme.as_ref().ok_or(HighlightError::NoTheme)?;
    Ok(css_for_theme_with_class_style(theme, CLASS_STYLE)?)
}

/// Fill in `highlighted` for every code block that has a known language.
pub(super) fn highlight_blocks(nodes: &mut [DisplayNode]) {
    for node in nodes {
        match node {
            DisplayNode::CodeBlock(block) => {
                let Some(language) = block.language.as_deref() else {
                    continue;
                };
                match highlight(&block.code, language) {
                    Ok(html) => block.highlighted = Some(html),
                    Err(e) => {
                        tracing::debug!(language, error = %e, "Leaving code block unhighlighted");
                    }
                }
            }
            DisplayNode::Element { children, .. } => highlight_blocks(children),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::node::CodeBlock;

    #[test]
    fn test_known_language_produces_classed_spans() {
        let html = highlight("print(1)\n", "python").unwrap();
        assert!(html.contains("hl-"));
        assert!(html.contains("print"));
    }

    #[test]
    fn test_highlighted_output_is_escaped() {
        let html = highlight("x = \"<b>\"\n", "python").unwrap();
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_language_tokens_match_extensions() {
        assert!(highlight("fn main() {}\n", "rs").is_ok());
        assert!(highlight("fn main() {}\n", "rust").is_ok());
    }

    #[test]
    fn test_unknown_language_is_an_error() {
        assert!(matches!(
            highlight("whatever", "no-such-language"),
            Err(HighlightError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn test_stylesheet_targets_prefixed_classes() {
        let css = stylesheet().unwrap();
        assert!(css.contains(".hl-"));
    }

    #[test]
    fn test_blocks_without_known_language_stay_raw() {
        let mut nodes = vec![
            DisplayNode::CodeBlock(CodeBlock {
                language: None,
                code: "a\n".to_string(),
                highlighted: None,
            }),
            DisplayNode::CodeBlock(CodeBlock {
                language: Some("klingon".to_string()),
                code: "b\n".to_string(),
                highlighted: None,
            }),
        ];
        highlight_blocks(&mut nodes);
        for node in &nodes {
            let DisplayNode::CodeBlock(block) = node else {
                panic!("expected code block");
            };
            assert_eq!(block.highlighted, None);
        }
    }
}
