use std::time::Duration;

/// Handle to one requested animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Handle to one armed one-shot timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Host scheduling primitives the animation is driven by.
///
/// Requests never call back synchronously: the host later invokes
/// [`LifecycleController::on_frame`](crate::LifecycleController::on_frame) or
/// [`LifecycleController::on_timeout`](crate::LifecycleController::on_timeout)
/// with the handle it returned here.
pub trait Scheduler {
    /// Ask for one frame callback.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a frame request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Arm a one-shot timer firing after `delay`.
    fn set_timeout(&mut self, delay: Duration) -> TimerHandle;
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn request_frame(&mut self) -> FrameHandle {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        (**self).set_timeout(delay)
    }
}
