//! Builds briefing canvases from the memory service's context.

use std::sync::Arc;

use {
    async_trait::async_trait,
    herald_canvas::{Canvas, CanvasSection},
    herald_memory::{ContextItem, ContextSource, MemoryContext},
    tracing::{debug, warn},
};

use crate::{Result, kind::BriefingKind};

/// Produces the canvas for a briefing kind.
///
/// The dispatcher only sees this trait, so an aggregation failure aborts a
/// dispatch without touching any channel.
#[async_trait]
pub trait Composer: Send + Sync {
    async fn compose(&self, kind: BriefingKind) -> Result<Canvas>;
}

pub struct Aggregator {
    source: Arc<dyn ContextSource>,
}

impl Aggregator {
    pub fn new(source: Arc<dyn ContextSource>) -> Self {
        Self { source }
    }

    /// Current context, or an empty one when the source is unavailable.
    async fn context(&self) -> MemoryContext {
        match self.source.get_context().await {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!(error = %e, "memory context unavailable, using empty context");
                MemoryContext::default()
            },
        }
    }

    pub async fn morning(&self) -> Canvas {
        compose_from(BriefingKind::Morning, &self.context().await)
    }

    pub async fn pre_meeting(&self) -> Canvas {
        compose_from(BriefingKind::PreMeeting, &self.context().await)
    }

    pub async fn weekly(&self) -> Canvas {
        compose_from(BriefingKind::Weekly, &self.context().await)
    }
}

#[async_trait]
impl Composer for Aggregator {
    async fn compose(&self, kind: BriefingKind) -> Result<Canvas> {
        let canvas = match kind {
            BriefingKind::Morning => self.morning().await,
            BriefingKind::PreMeeting => self.pre_meeting().await,
            BriefingKind::Weekly => self.weekly().await,
        };
        debug!(%kind, sections = canvas.sections.len(), "briefing composed");
        Ok(canvas)
    }
}

/// Lay out `ctx` as the canvas for `kind`.
#[must_use]
pub fn compose_from(kind: BriefingKind, ctx: &MemoryContext) -> Canvas {
    let (title, description, sections) = match kind {
        BriefingKind::Morning => (
            "☀️ Morning Briefing",
            "Your daily context and pending items",
            vec![
                bullet_section("Pending Decisions", &ctx.pending_decisions, 5),
                bullet_section("Open Loops", &ctx.open_loops, 5),
            ],
        ),
        BriefingKind::PreMeeting => (
            "📅 Pre-Meeting Briefing",
            "Quick context before your meeting",
            vec![bullet_section("Decisions Needed", &ctx.pending_decisions, 3)],
        ),
        BriefingKind::Weekly => (
            "🗓️ Weekly Briefing",
            "Your week at a glance",
            vec![
                bullet_section("Decisions Awaiting You", &ctx.pending_decisions, 10),
                bullet_section("Open Loops", &ctx.open_loops, 10),
            ],
        ),
    };

    sections
        .into_iter()
        .flatten()
        .fold(Canvas::new(title).with_description(description), |canvas, section| {
            canvas.add_section(section)
        })
}

/// `• title` lines for the first `limit` items; `None` when there are none.
fn bullet_section(title: &str, items: &[ContextItem], limit: usize) -> Option<CanvasSection> {
    if items.is_empty() {
        return None;
    }
    let content = items
        .iter()
        .take(limit)
        .map(|item| format!("• {}", item.title))
        .collect::<Vec<_>>()
        .join("\n");
    Some(CanvasSection::new(title, content))
}
