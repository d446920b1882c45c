use std::time::Duration;

use rand::rngs::SmallRng;

use crate::{
    engine::{
        animation::AnimationEngine,
        schedule::{FrameHandle, Scheduler, TimerHandle},
    },
    foundation::{config::RainConfig, error::GlyphfallResult},
    host::input::{HostEvent, Key},
    render::Surface,
};

/// Quiet period after the first resize request before the new size is applied.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(700);

/// Largest surface edge a resize is applied with; raster surfaces address pixels as u16.
pub const MAX_SURFACE_EDGE: u32 = u16::MAX as u32;

/// Observable controller state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Paused with no frame scheduled.
    Stopped,
    /// A frame is scheduled and the loop re-arms itself.
    Running,
    /// Paused while a resize debounce timer is pending.
    Resizing,
}

#[derive(Clone, Copy, Debug)]
struct PendingResize {
    timer: TimerHandle,
    width: u32,
    height: u32,
}

/// Drives an [`AnimationEngine`] through pause, resume, single-step and resize.
///
/// Owns the surface and the scheduler; host callbacks and input enter here.
pub struct LifecycleController<S, C> {
    engine: AnimationEngine,
    surface: S,
    scheduler: C,
    resize: Option<PendingResize>,
}

impl<S: Surface, C: Scheduler> LifecycleController<S, C> {
    /// Validate `config` and assemble a stopped controller.
    pub fn new(config: &RainConfig, surface: S, scheduler: C, rng: SmallRng) -> GlyphfallResult<Self> {
        config.validate()?;
        Ok(Self {
            engine: AnimationEngine::new(config, rng),
            surface,
            scheduler,
            resize: None,
        })
    }

    pub fn state(&self) -> LifecycleState {
        match (self.engine.is_paused(), self.resize.is_some()) {
            (false, _) => LifecycleState::Running,
            (true, true) => LifecycleState::Resizing,
            (true, false) => LifecycleState::Stopped,
        }
    }

    pub fn engine(&self) -> &AnimationEngine {
        &self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &C {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut C {
        &mut self.scheduler
    }

    pub fn into_parts(self) -> (AnimationEngine, S, C) {
        (self.engine, self.surface, self.scheduler)
    }

    /// Build the columns and start the frame loop.
    pub fn start(&mut self) {
        self.engine.start(&mut self.scheduler);
    }

    pub fn pause(&mut self) {
        if !self.engine.is_paused() {
            tracing::info!("rain paused");
        }
        self.engine.pause(&mut self.scheduler);
    }

    pub fn unpause(&mut self) {
        if self.engine.pending_frame().is_none() {
            tracing::info!("rain resumed");
        }
        self.engine.unpause(&mut self.scheduler);
    }

    pub fn toggle_pause(&mut self) {
        if self.engine.is_paused() {
            self.unpause();
        } else {
            self.pause();
        }
    }

    /// Render exactly one frame while paused. Returns whether a frame was drawn.
    pub fn step(&mut self) -> bool {
        if !self.engine.is_paused() {
            return false;
        }
        tracing::debug!("single step");
        self.engine.render_frame(&mut self.surface, &mut self.scheduler);
        true
    }

    /// Pause now and apply the new size after [`RESIZE_DEBOUNCE`].
    ///
    /// Requests arriving while a timer is pending only update the target size;
    /// the window is neither restarted nor duplicated.
    pub fn request_resize(&mut self, width: u32, height: u32) {
        self.pause();
        match self.resize.as_mut() {
            Some(pending) => {
                pending.width = width;
                pending.height = height;
                tracing::debug!(width, height, "resize coalesced");
            }
            None => {
                let timer = self.scheduler.set_timeout(RESIZE_DEBOUNCE);
                self.resize = Some(PendingResize {
                    timer,
                    width,
                    height,
                });
                tracing::debug!(width, height, "resize armed");
            }
        }
    }

    /// Host callback for a frame requested earlier. Stale handles are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if !self.engine.claim_frame(handle) {
            tracing::debug!(?handle, "ignoring stale frame callback");
            return false;
        }
        self.engine.render_frame(&mut self.surface, &mut self.scheduler);
        true
    }

    /// Host callback for an armed timer. Applies a pending resize and resumes.
    pub fn on_timeout(&mut self, handle: TimerHandle) -> bool {
        let Some(pending) = self.resize.filter(|p| p.timer == handle) else {
            tracing::debug!(?handle, "ignoring unknown timer");
            return false;
        };
        self.resize = None;
        let width = pending.width.clamp(1, MAX_SURFACE_EDGE);
        let height = pending.height.clamp(1, MAX_SURFACE_EDGE);
        if (width, height) != (pending.width, pending.height) {
            tracing::warn!(
                requested_width = pending.width,
                requested_height = pending.height,
                width,
                height,
                "clamping resize"
            );
        }
        self.engine.resize(width, height);
        self.surface.resize(width, height);
        tracing::info!(width, height, "resize applied");
        self.unpause();
        true
    }

    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Space => {
                if self.engine.is_paused() {
                    self.step();
                }
            }
            Key::Escape => self.toggle_pause(),
            Key::Other => {}
        }
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Key(key) => self.handle_key(key),
            HostEvent::Resize { width, height } => self.request_resize(width, height),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/lifecycle.rs"]
mod tests;
