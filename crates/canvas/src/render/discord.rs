//! Discord rich embed with link buttons.

use serde::Serialize;

use {
    super::{link_actions, section_body, truncate_chars},
    crate::types::Canvas,
};

/// Discord "blurple".
pub const EMBED_COLOR: u32 = 0x5865F2;

const MAX_TITLE_CHARS: usize = 256;
const MAX_FIELD_NAME_CHARS: usize = 256;
const MAX_FIELD_VALUE_CHARS: usize = 1024;
const MAX_FIELDS: usize = 25;
const MAX_BUTTONS_PER_ROW: usize = 5;
const MAX_ROWS: usize = 5;

const COMPONENT_ACTION_ROW: u8 = 1;
const COMPONENT_BUTTON: u8 = 2;
const BUTTON_STYLE_LINK: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscordEmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscordEmbed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<DiscordEmbedField>,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscordButton {
    #[serde(rename = "type")]
    pub kind: u8,
    pub style: u8,
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscordActionRow {
    #[serde(rename = "type")]
    pub kind: u8,
    pub components: Vec<DiscordButton>,
}

/// Embed plus message components. Embeds cannot carry buttons themselves,
/// so URL actions travel as link-button rows next to the embed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscordMessage {
    pub embed: DiscordEmbed,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<DiscordActionRow>,
}

pub fn render_embed(canvas: &Canvas) -> DiscordMessage {
    let fields = canvas
        .sections
        .iter()
        .take(MAX_FIELDS)
        .map(|section| DiscordEmbedField {
            name: truncate_chars(&section.title, MAX_FIELD_NAME_CHARS),
            value: truncate_chars(
                &section_body(section, str::to_string),
                MAX_FIELD_VALUE_CHARS,
            ),
            inline: false,
        })
        .collect();

    let buttons: Vec<DiscordButton> = canvas
        .sections
        .iter()
        .flat_map(|section| link_actions(&section.actions))
        .take(MAX_BUTTONS_PER_ROW * MAX_ROWS)
        .map(|(label, url)| DiscordButton {
            kind: COMPONENT_BUTTON,
            style: BUTTON_STYLE_LINK,
            label: label.to_string(),
            url: url.to_string(),
        })
        .collect();

    let components = buttons
        .chunks(MAX_BUTTONS_PER_ROW)
        .map(|row| DiscordActionRow {
            kind: COMPONENT_ACTION_ROW,
            components: row.to_vec(),
        })
        .collect();

    DiscordMessage {
        embed: DiscordEmbed {
            title: truncate_chars(&canvas.title, MAX_TITLE_CHARS),
            description: canvas.description.clone(),
            fields,
            color: EMBED_COLOR,
        },
        components,
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            render::EMPTY_CONTENT,
            types::{CanvasAction, CanvasSection},
        },
    };

    #[test]
    fn maps_header_and_sections() {
        let canvas = Canvas::new("Daily Briefing")
            .with_description("Your morning summary")
            .add_section(
                CanvasSection::new("Updates", "- New task assigned\n- Meeting at 2pm")
                    .with_action(CanvasAction::link("View All", "https://example.com")),
            );
        let msg = render_embed(&canvas);

        assert_eq!(msg.embed.title, "Daily Briefing");
        assert_eq!(
            msg.embed.description.as_deref(),
            Some("Your morning summary")
        );
        assert_eq!(msg.embed.fields.len(), 1);
        assert_eq!(msg.embed.fields[0].name, "Updates");
        assert!(!msg.embed.fields[0].inline);
        assert_eq!(msg.embed.color, EMBED_COLOR);
    }

    #[test]
    fn empty_content_becomes_placeholder() {
        let canvas = Canvas::new("t").add_section(CanvasSection::new("Quiet", ""));
        assert_eq!(render_embed(&canvas).embed.fields[0].value, EMPTY_CONTENT);
    }

    #[test]
    fn only_url_actions_become_buttons() {
        let canvas = Canvas::new("t").add_section(
            CanvasSection::new("Pending", "Review pending items")
                .with_action(CanvasAction::link("Open", "https://example.com"))
                .with_action(CanvasAction::command("Dismiss", "dismiss")),
        );
        let msg = render_embed(&canvas);
        assert_eq!(msg.components.len(), 1);
        assert_eq!(msg.components[0].components.len(), 1);
        let button = &msg.components[0].components[0];
        assert_eq!(button.label, "Open");
        assert_eq!(button.style, BUTTON_STYLE_LINK);
    }

    #[test]
    fn buttons_wrap_into_rows_of_five() {
        let mut section = CanvasSection::new("Links", "many");
        for i in 0..7 {
            section = section.with_action(CanvasAction::link(format!("l{i}"), "https://x.test"));
        }
        let msg = render_embed(&Canvas::new("t").add_section(section));
        let sizes: Vec<_> = msg.components.iter().map(|r| r.components.len()).collect();
        assert_eq!(sizes, [5, 2]);
    }

    #[test]
    fn no_components_key_without_links() {
        let value = serde_json::to_value(render_embed(&Canvas::new("t"))).unwrap();
        assert!(value.get("components").is_none());
        assert_eq!(value["embed"]["fields"], serde_json::json!([]));
        assert!(value["embed"].get("description").is_none());
    }

    #[test]
    fn long_field_values_are_truncated() {
        let canvas = Canvas::new("t").add_section(CanvasSection::new("big", "x".repeat(2000)));
        let value = &render_embed(&canvas).embed.fields[0].value;
        assert_eq!(value.chars().count(), MAX_FIELD_VALUE_CHARS);
        assert!(value.ends_with('…'));
    }
}
