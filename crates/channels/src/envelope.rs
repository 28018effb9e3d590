//! Per-platform request bodies around a rendered canvas.

use {
    herald_canvas::RenderedCanvas,
    herald_common::ChannelType,
    serde_json::{Value, json},
};

use crate::{Error, Result};

pub const TEAMS_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// Wrap `payload` in the message body `channel` expects.
///
/// Fails when the payload was produced by a renderer that does not belong
/// to `channel` (e.g. Slack blocks handed to the Telegram sender).
pub fn envelope(channel: ChannelType, payload: &RenderedCanvas) -> Result<Value> {
    let body = match (channel, payload) {
        (ChannelType::Discord, RenderedCanvas::Embed(msg)) => {
            let mut body = json!({ "embeds": [msg.embed] });
            if !msg.components.is_empty() {
                body["components"] = serde_json::to_value(&msg.components)?;
            }
            body
        },
        (ChannelType::Slack, RenderedCanvas::Blocks(blocks)) => json!({ "blocks": blocks }),
        (ChannelType::Telegram, RenderedCanvas::Markdown(text)) => {
            json!({ "text": text, "parse_mode": "Markdown" })
        },
        (ChannelType::Signal | ChannelType::IMessage, RenderedCanvas::Markdown(text)) => {
            json!({ "body": text })
        },
        (ChannelType::Teams, RenderedCanvas::AdaptiveCard(card)) => json!({
            "attachments": [{
                "contentType": TEAMS_CARD_CONTENT_TYPE,
                "contentUrl": null,
                "content": card,
            }]
        }),
        (ChannelType::Zalo, RenderedCanvas::InlineLinkText(msg)) => serde_json::to_value(msg)?,
        (channel, other) => {
            return Err(Error::invalid_payload(
                channel,
                format!("unexpected {} payload", family_name(other)),
            ));
        },
    };
    Ok(body)
}

fn family_name(payload: &RenderedCanvas) -> &'static str {
    match payload {
        RenderedCanvas::Embed(_) => "embed",
        RenderedCanvas::Blocks(_) => "block",
        RenderedCanvas::Markdown(_) => "markdown",
        RenderedCanvas::AdaptiveCard(_) => "adaptive card",
        RenderedCanvas::InlineLinkText(_) => "inline-link text",
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        herald_canvas::{Canvas, CanvasAction, CanvasSection, render},
    };

    fn canvas() -> Canvas {
        Canvas::new("Briefing").add_section(
            CanvasSection::new("Pending", "Review")
                .with_action(CanvasAction::link("Open", "https://example.com")),
        )
    }

    fn wrapped(channel: ChannelType) -> Value {
        envelope(channel, &render(channel, &canvas())).unwrap()
    }

    #[test]
    fn every_channel_accepts_its_own_rendering() {
        for channel in ChannelType::ALL {
            assert!(wrapped(channel).is_object(), "{channel}");
        }
    }

    #[test]
    fn discord_wraps_embed_and_components() {
        let body = wrapped(ChannelType::Discord);
        assert_eq!(body["embeds"][0]["title"], "Briefing");
        assert_eq!(body["components"][0]["components"][0]["label"], "Open");
    }

    #[test]
    fn discord_omits_components_without_links() {
        let body = envelope(
            ChannelType::Discord,
            &render(ChannelType::Discord, &Canvas::new("t")),
        )
        .unwrap();
        assert!(body.get("components").is_none());
    }

    #[test]
    fn telegram_sets_parse_mode() {
        let body = wrapped(ChannelType::Telegram);
        assert_eq!(body["parse_mode"], "Markdown");
        assert!(body["text"].as_str().unwrap().starts_with("*Briefing*"));
    }

    #[test]
    fn signal_and_imessage_use_body() {
        for channel in [ChannelType::Signal, ChannelType::IMessage] {
            let body = wrapped(channel);
            assert!(body["body"].is_string(), "{channel}");
            assert!(body.get("text").is_none());
        }
    }

    #[test]
    fn teams_wraps_card_attachment() {
        let body = wrapped(ChannelType::Teams);
        let attachment = &body["attachments"][0];
        assert_eq!(attachment["contentType"], TEAMS_CARD_CONTENT_TYPE);
        assert!(attachment["contentUrl"].is_null());
        assert_eq!(attachment["content"]["type"], "AdaptiveCard");
    }

    #[test]
    fn zalo_is_text_object() {
        let body = wrapped(ChannelType::Zalo);
        assert!(
            body["text"]
                .as_str()
                .unwrap()
                .contains("[Open](https://example.com)")
        );
    }

    #[test]
    fn mismatched_payload_is_rejected() {
        let blocks = render(ChannelType::Slack, &canvas());
        let err = envelope(ChannelType::Telegram, &blocks).unwrap_err();
        assert!(matches!(err, Error::InvalidPayload {
            channel: ChannelType::Telegram,
            ..
        }));
        assert_eq!(
            err.to_string(),
            "invalid payload for telegram: unexpected block payload"
        );
    }
}
