//! Channel-agnostic briefing canvas and its per-platform renderers.
//!
//! A [`Canvas`] is built once and projected into each chat platform's native
//! payload by [`router::render`]. Renderers are pure functions; the same
//! canvas can be rendered for every channel concurrently.

pub mod error;
pub mod render;
pub mod router;
pub mod types;

pub use {
    error::{Error, Result},
    render::RenderedCanvas,
    router::{Renderer, render, render_named},
    types::{Canvas, CanvasAction, CanvasSection},
};
