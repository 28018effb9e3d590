//! Zalo text with inline links.

use serde::Serialize;

use {
    super::{link_actions, section_body},
    crate::types::Canvas,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZaloAttachment {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZaloMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<ZaloAttachment>>,
}

/// Zalo's markup only needs backslash, backtick and pipe escaped.
pub fn escape_zalo(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '`' | '|') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Link text also escapes the brackets that would close it early.
fn link_label(label: &str) -> String {
    escape_zalo(label)
        .replace('[', "\\[")
        .replace(']', "\\]")
}

/// Parentheses and spaces would end the link target.
fn link_target(url: &str) -> String {
    url.replace('(', "%28")
        .replace(')', "%29")
        .replace(' ', "%20")
}

pub fn render_inline_links(canvas: &Canvas) -> ZaloMessage {
    let mut text = format!("*{}*\n", escape_zalo(&canvas.title));
    if let Some(description) = canvas.description.as_deref().filter(|d| !d.is_empty()) {
        text.push_str(&escape_zalo(description));
        text.push_str("\n\n");
    }
    for section in &canvas.sections {
        text.push_str(&format!("*{}*\n", escape_zalo(&section.title)));
        text.push_str(&section_body(section, escape_zalo));
        text.push('\n');
        for (label, url) in link_actions(&section.actions) {
            text.push_str(&format!("[{}]({})\n", link_label(label), link_target(url)));
        }
        text.push('\n');
    }
    ZaloMessage {
        text,
        attachments: None,
    }
}
