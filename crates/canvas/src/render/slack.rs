//! Slack Block Kit.

use serde::Serialize;

use {
    super::{link_actions, section_body, truncate_chars},
    crate::types::Canvas,
};

/// Slack rejects header text longer than this.
const MAX_HEADER_CHARS: usize = 150;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackText {
    PlainText { text: String },
    Mrkdwn { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackElement {
    Button { text: SlackText, url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackBlock {
    Header { text: SlackText },
    Section { text: SlackText },
    Actions { elements: Vec<SlackElement> },
}

/// Escape the three characters Slack treats as control sequences in mrkdwn.
pub fn escape_mrkdwn(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_blocks(canvas: &Canvas) -> Vec<SlackBlock> {
    let mut blocks = vec![SlackBlock::Header {
        text: SlackText::PlainText {
            text: truncate_chars(&canvas.title, MAX_HEADER_CHARS),
        },
    }];

    if let Some(description) = canvas.description.as_deref().filter(|d| !d.is_empty()) {
        blocks.push(SlackBlock::Section {
            text: SlackText::Mrkdwn {
                text: escape_mrkdwn(description),
            },
        });
    }

    for section in &canvas.sections {
        blocks.push(SlackBlock::Section {
            text: SlackText::Mrkdwn {
                text: format!(
                    "*{}*\n{}",
                    escape_mrkdwn(&section.title),
                    section_body(section, escape_mrkdwn)
                ),
            },
        });

        let buttons: Vec<SlackElement> = link_actions(&section.actions)
            .map(|(label, url)| SlackElement::Button {
                text: SlackText::PlainText {
                    text: label.to_string(),
                },
                url: url.to_string(),
            })
            .collect();
        if !buttons.is_empty() {
            blocks.push(SlackBlock::Actions { elements: buttons });
        }
    }

    blocks
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::types::{CanvasAction, CanvasSection},
        serde_json::json,
    };

    #[test]
    fn header_description_then_sections() {
        let canvas = Canvas::new("Daily Briefing")
            .with_description("Your morning summary")
            .add_section(CanvasSection::new(
                "Updates",
                "• New task assigned\n• Meeting at 2pm",
            ));
        let blocks = render_blocks(&canvas);

        assert_eq!(blocks.len(), 3);
        let value = serde_json::to_value(&blocks).unwrap();
        assert_eq!(
            value[0],
            json!({"type": "header", "text": {"type": "plain_text", "text": "Daily Briefing"}})
        );
        assert_eq!(
            value[1],
            json!({"type": "section", "text": {"type": "mrkdwn", "text": "Your morning summary"}})
        );
        assert_eq!(
            value[2]["text"]["text"],
            "*Updates*\n• New task assigned\n• Meeting at 2pm"
        );
    }

    #[test]
    fn no_description_block_when_absent() {
        let blocks = render_blocks(&Canvas::new("t"));
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], SlackBlock::Header { .. }));
    }

    #[test]
    fn empty_content_becomes_placeholder() {
        let blocks = render_blocks(&Canvas::new("t").add_section(CanvasSection::new("Quiet", "")));
        assert_eq!(blocks[1], SlackBlock::Section {
            text: SlackText::Mrkdwn {
                text: "*Quiet*\n(empty)".into()
            }
        });
    }

    #[test]
    fn url_actions_follow_their_section() {
        let canvas = Canvas::new("t").add_section(
            CanvasSection::new("Pending", "x")
                .with_action(CanvasAction::command("Snooze", "snooze"))
                .with_action(CanvasAction::link("Open", "https://example.com")),
        );
        let value = serde_json::to_value(render_blocks(&canvas)).unwrap();
        assert_eq!(value[2]["type"], "actions");
        assert_eq!(value[2]["elements"].as_array().unwrap().len(), 1);
        assert_eq!(value[2]["elements"][0]["type"], "button");
        assert_eq!(value[2]["elements"][0]["url"], "https://example.com");
    }

    #[test]
    fn mrkdwn_control_characters_are_escaped() {
        let canvas = Canvas::new("t").add_section(CanvasSection::new("A & B", "<@here> now"));
        let value = serde_json::to_value(render_blocks(&canvas)).unwrap();
        assert_eq!(value[1]["text"]["text"], "*A &amp; B*\n&lt;@here&gt; now");
    }
}
