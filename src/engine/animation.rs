use rand::rngs::SmallRng;

use crate::{
    engine::schedule::{FrameHandle, Scheduler},
    foundation::config::{RainConfig, SlotMetrics},
    rain::column::Column,
    render::{Rgb8, Surface},
};

/// Opacity of the black wash applied at the start of every frame.
pub const FADE_ALPHA: f32 = 0.85;

/// Counters accumulated over an engine's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub frames_rendered: u64,
    pub columns_recycled: u64,
    pub glyphs_drawn: u64,
}

/// Owns the columns and the frame loop state.
///
/// One column per horizontal slot; at most one frame request outstanding.
pub struct AnimationEngine {
    metrics: SlotMetrics,
    highlight_lead: bool,
    columns: Vec<Column>,
    frame: Option<FrameHandle>,
    paused: bool,
    rng: SmallRng,
    stats: EngineStats,
}

impl AnimationEngine {
    /// Engine with no columns, paused, and nothing scheduled.
    pub fn new(config: &RainConfig, rng: SmallRng) -> Self {
        Self {
            metrics: config.metrics(),
            highlight_lead: config.highlight_lead,
            columns: Vec::new(),
            frame: None,
            paused: true,
            rng,
            stats: EngineStats::default(),
        }
    }

    pub fn metrics(&self) -> &SlotMetrics {
        &self.metrics
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// (Re)build the full column set and begin scheduling.
    #[tracing::instrument(skip(self, scheduler), fields(width = self.metrics.width, height = self.metrics.height))]
    pub fn start<C: Scheduler + ?Sized>(&mut self, scheduler: &mut C) {
        let count = self.metrics.column_count();
        let columns: Vec<Column> = (0..count).map(|i| self.fresh_column(i)).collect();
        self.columns = columns;
        tracing::info!(columns = self.columns.len(), "rain started");
        self.unpause(scheduler);
    }

    /// Cancel any pending frame and stop scheduling. Idempotent.
    pub fn pause<C: Scheduler + ?Sized>(&mut self, scheduler: &mut C) {
        if let Some(handle) = self.frame.take() {
            scheduler.cancel_frame(handle);
        }
        self.paused = true;
    }

    /// Resume scheduling. No-op when a frame is already pending.
    pub fn unpause<C: Scheduler + ?Sized>(&mut self, scheduler: &mut C) {
        if self.frame.is_none() {
            self.paused = false;
            self.frame = Some(scheduler.request_frame());
        }
    }

    /// Consume the pending frame request if `handle` is it.
    pub(crate) fn claim_frame(&mut self, handle: FrameHandle) -> bool {
        if self.frame == Some(handle) {
            self.frame = None;
            return true;
        }
        false
    }

    /// Draw one frame: fade, render and recycle columns, then schedule the
    /// next frame unless paused.
    pub fn render_frame<S, C>(&mut self, surface: &mut S, scheduler: &mut C)
    where
        S: Surface + ?Sized,
        C: Scheduler + ?Sized,
    {
        let (w, h) = (f64::from(self.metrics.width), f64::from(self.metrics.height));
        surface.fill_rect(kurbo::Rect::new(0.0, 0.0, w, h), Rgb8::BLACK, FADE_ALPHA);

        let char_size = self.metrics.char_size;
        let mut completed = Vec::new();
        for (index, column) in self.columns.iter_mut().enumerate() {
            self.stats.glyphs_drawn += column.render(surface, char_size, &mut self.rng) as u64;
            if column.is_complete(&self.metrics) {
                completed.push(index);
            }
        }

        for index in completed {
            self.columns[index] = self.fresh_column(index);
            self.stats.columns_recycled += 1;
        }

        surface.end_frame();
        self.stats.frames_rendered += 1;
        tracing::trace!(frame = self.stats.frames_rendered, "frame rendered");

        if !self.paused && self.frame.is_none() {
            self.frame = Some(scheduler.request_frame());
        }
    }

    /// Adopt new surface dimensions and reflow columns to the new slot count.
    ///
    /// Columns whose slot still exists keep falling; new slots get fresh columns.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.metrics = self.metrics.with_size(width, height);
        let count = self.metrics.column_count();
        let before = self.columns.len();
        self.columns.truncate(count);
        while self.columns.len() < count {
            let column = self.fresh_column(self.columns.len());
            self.columns.push(column);
        }
        tracing::debug!(width, height, before, after = count, "columns reflowed");
    }

    fn fresh_column(&mut self, index: usize) -> Column {
        Column::new(
            self.metrics.slot_x(index),
            self.metrics.char_size,
            self.highlight_lead,
            &mut self.rng,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/animation.rs"]
mod tests;
