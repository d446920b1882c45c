use super::*;

fn out_path(name: &str) -> PathBuf {
    PathBuf::from("target").join("encode").join(name)
}

#[test]
fn settings_reject_odd_zero_and_frozen_outputs() {
    assert!(Mp4Settings::new(out_path("a.mp4"), 0, 10, 30).is_err());
    assert!(Mp4Settings::new(out_path("a.mp4"), 11, 10, 30).is_err());
    assert!(Mp4Settings::new(out_path("a.mp4"), 10, 10, 0).is_err());

    let ok = Mp4Settings::new(out_path("a.mp4"), 640, 360, 60).unwrap();
    assert_eq!(ok.frame_len(), 640 * 360 * 4);
}

#[test]
fn ensure_parent_dir_accepts_bare_file_names() {
    assert!(ensure_parent_dir(Path::new("out.mp4")).is_ok());
}

#[test]
fn surface_frames_are_written_until_finish() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let path = out_path("finish.mp4");
    let mut writer = Mp4Writer::spawn(Mp4Settings::new(&path, 16, 8, 30).unwrap()).unwrap();
    let mut surface = PixmapSurface::new(16, 8).unwrap();
    for _ in 0..3 {
        writer.write_surface(&mut surface).unwrap();
    }
    assert_eq!(writer.finish().unwrap(), 3);
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn mismatched_frames_are_refused() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let mut writer =
        Mp4Writer::spawn(Mp4Settings::new(out_path("mismatch.mp4"), 16, 8, 30).unwrap()).unwrap();
    assert!(writer.write_rgba(&[0u8; 4]).is_err());
    let mut wrong = PixmapSurface::new(8, 8).unwrap();
    assert!(writer.write_surface(&mut wrong).is_err());
    assert_eq!(writer.frames_written(), 0);
    writer.abort();
}

#[test]
fn abort_kills_ffmpeg_and_removes_the_partial_file() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let path = out_path("aborted.mp4");
    let mut writer = Mp4Writer::spawn(Mp4Settings::new(&path, 16, 8, 30).unwrap()).unwrap();
    let mut surface = PixmapSurface::new(16, 8).unwrap();
    writer.write_surface(&mut surface).unwrap();
    writer.abort();
    assert!(!path.exists());
}

#[test]
fn dropping_an_unfinished_writer_cleans_up() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let path = out_path("dropped.mp4");
    {
        let mut writer = Mp4Writer::spawn(Mp4Settings::new(&path, 16, 8, 30).unwrap()).unwrap();
        writer.write_rgba(&[0u8; 16 * 8 * 4]).unwrap();
    }
    assert!(!path.exists());
}
