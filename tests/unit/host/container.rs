use super::*;
use crate::{
    LifecycleState, foundation::error::GlyphfallError, host::clock::VirtualScheduler,
    render::recording::RecordingSurface,
};

fn config(id: Option<&str>) -> RainConfig {
    RainConfig {
        container_id: id.map(str::to_string),
        char_size: 12.0,
        padding: 7.0,
        width: 100,
        height: 80,
        highlight_lead: true,
    }
}

#[test]
fn init_mounts_into_the_named_container_and_runs() {
    let mut seen = Vec::new();
    let mut container = |id: &str, w: u32, h: u32| -> GlyphfallResult<RecordingSurface> {
        seen.push((id.to_string(), w, h));
        Ok(RecordingSurface::new(w, h))
    };

    let ctl = init(
        &config(Some("canvas")),
        &mut container,
        VirtualScheduler::new(),
        Some(1),
    )
    .unwrap();
    assert_eq!(ctl.state(), LifecycleState::Running);
    assert_eq!(ctl.surface().size(), (100, 80));
    drop(ctl);
    assert_eq!(seen, vec![("canvas".to_string(), 100, 80)]);
}

#[test]
fn init_without_container_id_mounts_nothing() {
    let mut mounts = 0;
    let mut container = |_: &str, w: u32, h: u32| -> GlyphfallResult<RecordingSurface> {
        mounts += 1;
        Ok(RecordingSurface::new(w, h))
    };

    let err = init(&config(None), &mut container, VirtualScheduler::new(), Some(1))
        .err()
        .unwrap();
    assert!(matches!(err, GlyphfallError::Config(_)));
    assert_eq!(mounts, 0);
}

#[test]
fn pixmap_container_tracks_remounts() {
    let mut container = PixmapContainer::new(None);
    let a = container.attach("canvas", 32, 16).unwrap();
    assert_eq!(a.size(), (32, 16));
    container.attach("canvas", 64, 32).unwrap();
    container.attach("other", 8, 8).unwrap();

    assert_eq!(container.mounted().len(), 2);
    assert_eq!(container.mounted()["canvas"], (64, 32));
}

#[test]
fn pixmap_container_surfaces_error_for_bad_sizes() {
    let mut container = PixmapContainer::new(None);
    assert!(container.attach("canvas", 0, 16).is_err());
    assert!(container.mounted().is_empty());
}
