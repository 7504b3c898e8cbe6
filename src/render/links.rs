//! Link hardening
//!
//! Every link in assistant output is external, untrusted navigation: it
//! opens in a new browsing context without access to its opener.

use super::node::{DisplayNode, ElementKind};

pub const TARGET_NEW_CONTEXT: &str = "_blank";
pub const REL_NO_OPENER: &str = "noopener noreferrer";

const BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Set target/rel on every link and neutralize script-capable hrefs.
pub(super) fn harden(nodes: &mut [DisplayNode]) {
    for node in nodes {
        if let DisplayNode::Element { kind, children } = node {
            if let ElementKind::Link(link) = kind {
                if is_script_capable(&link.href) {
                    tracing::debug!(href = %link.href, "Neutralized script-capable link");
                    link.href = "#".to_string();
                }
                link.target = Some(TARGET_NEW_CONTEXT);
                link.rel = Some(REL_NO_OPENER);
            }
            harden(children);
        }
    }
}

/// Browsers ignore whitespace and control characters inside a scheme, so
/// strip them before comparing.
fn is_script_capable(href: &str) -> bool {
    let normalized: String = href
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}
