//! Microsoft Teams Adaptive Card.

use serde::Serialize;

use {
    super::{link_actions, section_body},
    crate::types::Canvas,
};

pub const ADAPTIVE_CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
pub const ADAPTIVE_CARD_VERSION: &str = "1.4";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CardAction {
    #[serde(rename = "Action.OpenUrl")]
    OpenUrl { title: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TextBlock {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CardElement {
    TextBlock(TextBlock),
    ActionSet { actions: Vec<CardAction> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdaptiveCard {
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub version: &'static str,
    pub body: Vec<CardElement>,
}

pub fn render_adaptive_card(canvas: &Canvas) -> AdaptiveCard {
    let mut body = vec![CardElement::TextBlock(TextBlock {
        text: canvas.title.clone(),
        weight: Some("bolder"),
        size: Some("large"),
        ..Default::default()
    })];

    if let Some(description) = canvas.description.as_deref().filter(|d| !d.is_empty()) {
        body.push(CardElement::TextBlock(TextBlock {
            text: description.to_string(),
            wrap: Some(true),
            separator: Some(true),
            ..Default::default()
        }));
    }

    for section in &canvas.sections {
        body.push(CardElement::TextBlock(TextBlock {
            text: section.title.clone(),
            weight: Some("bolder"),
            separator: Some(true),
            ..Default::default()
        }));
        body.push(CardElement::TextBlock(TextBlock {
            text: section_body(section, str::to_string),
            wrap: Some(true),
            ..Default::default()
        }));

        let actions: Vec<CardAction> = link_actions(&section.actions)
            .map(|(label, url)| CardAction::OpenUrl {
                title: label.to_string(),
                url: url.to_string(),
            })
            .collect();
        if !actions.is_empty() {
            body.push(CardElement::ActionSet { actions });
        }
    }

    AdaptiveCard {
        schema: ADAPTIVE_CARD_SCHEMA,
        kind: "AdaptiveCard",
        version: ADAPTIVE_CARD_VERSION,
        body,
    }
}
