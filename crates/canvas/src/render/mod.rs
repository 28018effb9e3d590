//! Per-platform renderers.
//!
//! Two policies hold for every renderer:
//! - an empty section body is rendered as [`EMPTY_CONTENT`], never as blank
//!   text (several platforms silently drop empty fields);
//! - only actions with a non-empty URL become controls, other actions are
//!   skipped without error.

pub mod discord;
pub mod markdown;
pub mod slack;
pub mod teams;
pub mod zalo;

use serde::Serialize;

use crate::types::{CanvasAction, CanvasSection};

pub use {
    discord::DiscordMessage, slack::SlackBlock, teams::AdaptiveCard, zalo::ZaloMessage,
};

/// Placeholder emitted in place of an empty section body.
pub const EMPTY_CONTENT: &str = "(empty)";

/// A canvas projected into one platform's payload shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderedCanvas {
    Embed(DiscordMessage),
    Blocks(Vec<SlackBlock>),
    Markdown(String),
    AdaptiveCard(AdaptiveCard),
    InlineLinkText(ZaloMessage),
}

impl RenderedCanvas {
    /// Plain text body, for the text-based families.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Markdown(text) => Some(text),
            Self::InlineLinkText(msg) => Some(&msg.text),
            Self::Embed(_) | Self::Blocks(_) | Self::AdaptiveCard(_) => None,
        }
    }
}

/// Section body with the empty-content placeholder applied.
///
/// `escape` runs on real content only; the placeholder is emitted verbatim.
pub(crate) fn section_body(section: &CanvasSection, escape: impl Fn(&str) -> String) -> String {
    if section.content.is_empty() {
        EMPTY_CONTENT.to_string()
    } else {
        escape(&section.content)
    }
}

/// `(label, url)` for each action that should become a control.
pub(crate) fn link_actions(actions: &[CanvasAction]) -> impl Iterator<Item = (&str, &str)> {
    actions
        .iter()
        .filter_map(|a| a.link_url().map(|url| (a.label.as_str(), url)))
}

/// Truncate to at most `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_uses_placeholder_without_escaping() {
        let section = CanvasSection::new("t", "");
        assert_eq!(section_body(&section, |s| format!("<{s}>")), EMPTY_CONTENT);
    }

    #[test]
    fn non_empty_body_is_escaped() {
        let section = CanvasSection::new("t", "x");
        assert_eq!(section_body(&section, |s| format!("<{s}>")), "<x>");
    }

    #[test]
    fn link_actions_skip_inert_and_command_actions() {
        let actions = vec![
            CanvasAction::link("Open", "https://example.com"),
            CanvasAction::command("Snooze", "snooze"),
            CanvasAction {
                label: "Nothing".into(),
                url: None,
                action: None,
            },
            CanvasAction::link("Blank", ""),
        ];
        let links: Vec<_> = link_actions(&actions).collect();
        assert_eq!(links, [("Open", "https://example.com")]);
    }

    #[test]
    fn truncate_chars_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo", 5), "héllo");
        assert_eq!(truncate_chars("héllo wörld", 6), "héllo…");
    }
}
