//! Channel → renderer routing.

use herald_common::ChannelType;

use crate::{
    Result,
    render::{RenderedCanvas, discord, markdown, slack, teams, zalo},
    types::Canvas,
};

/// Rendering strategies. Several channels share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Renderer {
    /// Rich embed with fields (Discord).
    Embed,
    /// Block Kit sections (Slack).
    Blocks,
    /// Escaped markdown text (Telegram, Signal, iMessage).
    Markdown,
    /// Adaptive Card text blocks (Teams).
    AdaptiveCard,
    /// Lightly escaped text with `[label](url)` links (Zalo).
    InlineLinkText,
}

impl Renderer {
    /// Static routing table. Adding a [`ChannelType`] member fails to compile
    /// until it is given a row here.
    #[must_use]
    pub fn for_channel(channel: ChannelType) -> Self {
        match channel {
            ChannelType::Discord => Self::Embed,
            ChannelType::Slack => Self::Blocks,
            ChannelType::Telegram | ChannelType::Signal | ChannelType::IMessage => Self::Markdown,
            ChannelType::Teams => Self::AdaptiveCard,
            ChannelType::Zalo => Self::InlineLinkText,
        }
    }

    #[must_use]
    pub fn render(self, canvas: &Canvas) -> RenderedCanvas {
        match self {
            Self::Embed => RenderedCanvas::Embed(discord::render_embed(canvas)),
            Self::Blocks => RenderedCanvas::Blocks(slack::render_blocks(canvas)),
            Self::Markdown => RenderedCanvas::Markdown(markdown::render_markdown(canvas)),
            Self::AdaptiveCard => {
                RenderedCanvas::AdaptiveCard(teams::render_adaptive_card(canvas))
            },
            Self::InlineLinkText => {
                RenderedCanvas::InlineLinkText(zalo::render_inline_links(canvas))
            },
        }
    }
}

/// Render `canvas` for `channel`.
#[must_use]
pub fn render(channel: ChannelType, canvas: &Canvas) -> RenderedCanvas {
    Renderer::for_channel(channel).render(canvas)
}

/// Render for a channel given by name, e.g. from an untyped request.
///
/// Unknown names fail with [`crate::Error::UnsupportedChannel`].
pub fn render_named(channel: &str, canvas: &Canvas) -> Result<RenderedCanvas> {
    let channel: ChannelType = channel.parse()?;
    Ok(render(channel, canvas))
}
