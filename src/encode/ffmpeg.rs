use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    foundation::error::{GlyphfallError, GlyphfallResult},
    render::{Surface, cpu::PixmapSurface},
};

/// Where and how a rain run is recorded as H.264 MP4.
#[derive(Clone, Debug, PartialEq)]
pub struct Mp4Settings {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Mp4Settings {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32, fps: u32) -> GlyphfallResult<Self> {
        let settings = Self {
            path: path.into(),
            width,
            height,
            fps,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> GlyphfallResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GlyphfallError::config("mp4 width/height must be non-zero"));
        }
        // yuv420p subsamples chroma by two in both directions.
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(GlyphfallError::config(format!(
                "mp4 width/height must be even, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(GlyphfallError::config("mp4 fps must be non-zero"));
        }
        Ok(())
    }

    fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

pub fn ensure_parent_dir(path: &Path) -> GlyphfallResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

/// Pipes opaque surface frames into a system `ffmpeg` process.
///
/// A writer that is dropped or aborted before [`finish`](Self::finish) kills
/// ffmpeg and removes the partial file.
pub struct Mp4Writer {
    settings: Mp4Settings,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    frames: u64,
}

impl Mp4Writer {
    #[tracing::instrument(skip_all, fields(path = %settings.path.display()))]
    pub fn spawn(settings: Mp4Settings) -> GlyphfallResult<Self> {
        settings.validate()?;
        ensure_parent_dir(&settings.path)?;
        if !is_ffmpeg_on_path() {
            return Err(GlyphfallError::encode(
                "ffmpeg is required for mp4 output, but was not found on PATH",
            ));
        }

        let size = format!("{}x{}", settings.width, settings.height);
        let rate = settings.fps.to_string();
        let mut child = Command::new("ffmpeg")
            .args(["-y", "-loglevel", "error"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgba", "-s", &size, "-r", &rate])
            .args(["-i", "pipe:0", "-an"])
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-movflags", "+faststart"])
            .arg(&settings.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GlyphfallError::encode(format!("spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| GlyphfallError::encode("ffmpeg stdin unavailable"))?;

        tracing::debug!(%size, fps = settings.fps, "ffmpeg started");
        Ok(Self {
            settings,
            child: Some(child),
            stdin: Some(stdin),
            frames: 0,
        })
    }

    pub fn settings(&self) -> &Mp4Settings {
        &self.settings
    }

    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    /// Append the surface's current pixels as the next frame.
    pub fn write_surface(&mut self, surface: &mut PixmapSurface) -> GlyphfallResult<()> {
        let (w, h) = surface.size();
        if (w, h) != (self.settings.width, self.settings.height) {
            return Err(GlyphfallError::encode(format!(
                "mp4 frames must stay {}x{}; surface is {w}x{h}",
                self.settings.width, self.settings.height
            )));
        }
        self.write_rgba(surface.pixels())
    }

    /// Append one frame of opaque RGBA8 pixels.
    pub fn write_rgba(&mut self, rgba: &[u8]) -> GlyphfallResult<()> {
        if rgba.len() != self.settings.frame_len() {
            return Err(GlyphfallError::encode(format!(
                "frame has {} bytes, expected {}",
                rgba.len(),
                self.settings.frame_len()
            )));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| GlyphfallError::encode("mp4 writer already closed"))?;
        stdin
            .write_all(rgba)
            .map_err(|e| GlyphfallError::encode(format!("write frame to ffmpeg: {e}")))?;
        self.frames += 1;
        Ok(())
    }

    /// Close the pipe and wait for ffmpeg to finish the file.
    pub fn finish(mut self) -> GlyphfallResult<u64> {
        drop(self.stdin.take());
        let Some(child) = self.child.take() else {
            return Err(GlyphfallError::encode("mp4 writer already closed"));
        };
        let output = child
            .wait_with_output()
            .map_err(|e| GlyphfallError::encode(format!("wait for ffmpeg: {e}")))?;
        if !output.status.success() {
            remove_partial(&self.settings.path);
            return Err(GlyphfallError::encode(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        tracing::debug!(frames = self.frames, "mp4 finished");
        Ok(self.frames)
    }

    /// Stop ffmpeg and delete whatever it wrote so far.
    pub fn abort(mut self) {
        self.discard();
    }

    fn discard(&mut self) {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return;
        };
        if let Err(e) = child.kill() {
            tracing::debug!(error = %e, "ffmpeg already exited");
        }
        if let Err(e) = child.wait() {
            tracing::warn!(error = %e, "wait for killed ffmpeg");
        }
        remove_partial(&self.settings.path);
        tracing::info!(frames = self.frames, path = %self.settings.path.display(), "mp4 discarded");
    }
}

impl Drop for Mp4Writer {
    fn drop(&mut self) {
        self.discard();
    }
}

fn remove_partial(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "remove partial mp4"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
