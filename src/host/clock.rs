use std::time::Duration;

use crate::{
    engine::{
        lifecycle::LifecycleController,
        schedule::{FrameHandle, Scheduler, TimerHandle},
    },
    render::Surface,
};

/// A host callback that came due on a [`VirtualScheduler`] tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wake {
    Timer(TimerHandle),
    Frame(FrameHandle),
}

/// Deterministic scheduler driven by an explicit virtual clock.
///
/// Frame requests come due on the next [`advance`](Self::advance); timers come
/// due once the clock reaches their deadline. Within one tick, timers are
/// reported before frames.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now: Duration,
    next_id: u64,
    frames: Vec<FrameHandle>,
    timers: Vec<(TimerHandle, Duration)>,
    frames_requested: u64,
    frames_canceled: u64,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Frame requests not yet delivered or canceled.
    pub fn pending_frames(&self) -> &[FrameHandle] {
        &self.frames
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn frames_requested(&self) -> u64 {
        self.frames_requested
    }

    pub fn frames_canceled(&self) -> u64 {
        self.frames_canceled
    }

    /// Move the clock forward by `dt` and collect everything that came due.
    pub fn advance(&mut self, dt: Duration) -> Vec<Wake> {
        self.now += dt;

        let now = self.now;
        let mut due: Vec<(TimerHandle, Duration)> = Vec::new();
        self.timers.retain(|&(handle, deadline)| {
            if deadline <= now {
                due.push((handle, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(handle, deadline)| (deadline, handle));

        let mut wakes: Vec<Wake> = due.into_iter().map(|(h, _)| Wake::Timer(h)).collect();
        wakes.extend(self.frames.drain(..).map(Wake::Frame));
        wakes
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Scheduler for VirtualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.push(handle);
        self.frames_requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.frames.len();
        self.frames.retain(|&h| h != handle);
        if self.frames.len() != before {
            self.frames_canceled += 1;
        }
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        self.timers.push((handle, self.now + delay));
        handle
    }
}

/// What one [`LifecycleController::tick`] dispatched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub frames_rendered: usize,
    pub timers_fired: usize,
}

impl<S: Surface> LifecycleController<S, VirtualScheduler> {
    /// Advance the virtual clock by `dt` and deliver every due callback.
    pub fn tick(&mut self, dt: Duration) -> TickReport {
        let wakes = self.scheduler_mut().advance(dt);
        let mut report = TickReport::default();
        for wake in wakes {
            match wake {
                Wake::Timer(handle) => {
                    if self.on_timeout(handle) {
                        report.timers_fired += 1;
                    }
                }
                Wake::Frame(handle) => {
                    if self.on_frame(handle) {
                        report.frames_rendered += 1;
                    }
                }
            }
        }
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/clock.rs"]
mod tests;
