use super::*;

#[test]
fn frames_come_due_on_the_next_advance() {
    let mut s = VirtualScheduler::new();
    let a = s.request_frame();
    assert_eq!(s.pending_frames(), &[a]);

    let wakes = s.advance(Duration::from_millis(16));
    assert_eq!(wakes, vec![Wake::Frame(a)]);
    assert!(s.pending_frames().is_empty());
    assert!(s.advance(Duration::from_millis(16)).is_empty());
}

#[test]
fn canceled_frames_never_fire() {
    let mut s = VirtualScheduler::new();
    let a = s.request_frame();
    s.cancel_frame(a);
    s.cancel_frame(a);
    assert_eq!(s.frames_canceled(), 1);
    assert!(s.advance(Duration::from_millis(16)).is_empty());
}

#[test]
fn timers_fire_at_deadline_before_frames() {
    let mut s = VirtualScheduler::new();
    let t = s.set_timeout(Duration::from_millis(50));
    assert!(s.advance(Duration::from_millis(49)).is_empty());

    let f = s.request_frame();
    let wakes = s.advance(Duration::from_millis(1));
    assert_eq!(wakes, vec![Wake::Timer(t), Wake::Frame(f)]);
    assert_eq!(s.pending_timers(), 0);
    assert_eq!(s.now(), Duration::from_millis(50));
}

#[test]
fn handles_are_unique_across_kinds() {
    let mut s = VirtualScheduler::new();
    let f = s.request_frame();
    let t = s.set_timeout(Duration::ZERO);
    let g = s.request_frame();
    assert_ne!(f, g);
    assert_ne!(f.0, t.0);
    assert_eq!(s.frames_requested(), 2);
}
