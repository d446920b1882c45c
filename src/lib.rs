//! Glyphfall renders the falling-glyph "code rain" animation onto a 2D drawing surface.
//!
//! Columns of katakana glyphs scroll down fixed horizontal slots, each at its own
//! speed. Every frame washes the surface with translucent black so earlier glyphs
//! leave fading trails, and individual glyphs flicker to new characters over time.
//!
//! # Pieces
//!
//! - [`GlyphCell`] and [`Column`]: plain data plus explicit update functions.
//! - [`AnimationEngine`]: the frame loop (fade, render, recycle, re-schedule).
//! - [`LifecycleController`]: pause / resume / single-step and debounced resize.
//! - [`Scheduler`]: the host's frame and timer primitives, injected so the loop
//!   can run synchronously under a [`VirtualScheduler`].
//! - [`Surface`]: the drawing context. [`RecordingSurface`] captures draw calls;
//!   [`PixmapSurface`] rasterizes on the CPU with `vello_cpu`.
//!
//! The per-frame path is infallible; only initialization (a missing container id
//! or an invalid geometry) and the raster/encode collaborators return errors.
#![forbid(unsafe_code)]

mod encode;
mod engine;
mod foundation;
mod host;
mod rain;
mod render;

pub use encode::ffmpeg::{Mp4Settings, Mp4Writer, ensure_parent_dir, is_ffmpeg_on_path};
pub use engine::animation::{AnimationEngine, EngineStats, FADE_ALPHA};
pub use engine::lifecycle::{
    LifecycleController, LifecycleState, MAX_SURFACE_EDGE, RESIZE_DEBOUNCE,
};
pub use engine::schedule::{FrameHandle, Scheduler, TimerHandle};
pub use foundation::config::{RainConfig, SlotMetrics};
pub use foundation::error::{GlyphfallError, GlyphfallResult};
pub use host::clock::{TickReport, VirtualScheduler, Wake};
pub use host::container::{Container, PixmapContainer, init};
pub use host::input::{HostEvent, Key, ScriptedEvent};
pub use rain::column::{Column, MAX_CELLS, MIN_CELLS};
pub use rain::glyph::{
    GLYPH_FIRST, GLYPH_LAST, GlyphCell, GlyphTone, LEAD_COLOR, MUTATION_THRESHOLD, TRAIL_COLOR,
    random_glyph,
};
pub use render::cpu::PixmapSurface;
pub use render::font::GlyphFont;
pub use render::recording::{DrawCall, RecordingSurface};
pub use render::{FrameRGBA, GlyphStyle, Rgb8, Surface};
