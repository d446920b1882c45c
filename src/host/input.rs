use std::str::FromStr;

use crate::foundation::error::{GlyphfallError, GlyphfallResult};

/// Keys the animation reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Render one frame while paused.
    Space,
    /// Toggle pause.
    Escape,
    Other,
}

impl Key {
    /// Map a DOM-style key name (`" "`, `"Escape"`) or a lowercase alias.
    pub fn from_name(name: &str) -> Self {
        match name {
            " " | "space" | "Space" => Key::Space,
            "Escape" | "escape" | "esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// Raw host input translated into controller calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    Key(Key),
    /// The viewport now measures `width` x `height`.
    Resize { width: u32, height: u32 },
}

impl FromStr for HostEvent {
    type Err = GlyphfallError;

    /// `space`, `escape`, or `resize=WIDTHxHEIGHT`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(size) = s.strip_prefix("resize=") {
            let (w, h) = size.split_once('x').ok_or_else(|| {
                GlyphfallError::config(format!("resize event '{s}' must look like resize=WxH"))
            })?;
            let width = parse_dim(w, s)?;
            let height = parse_dim(h, s)?;
            return Ok(HostEvent::Resize { width, height });
        }
        match Key::from_name(s) {
            Key::Other => Err(GlyphfallError::config(format!("unknown host event '{s}'"))),
            key => Ok(HostEvent::Key(key)),
        }
    }
}

fn parse_dim(v: &str, event: &str) -> GlyphfallResult<u32> {
    let n: u32 = v
        .trim()
        .parse()
        .map_err(|_| GlyphfallError::config(format!("bad dimension '{v}' in event '{event}'")))?;
    if n == 0 {
        return Err(GlyphfallError::config(format!(
            "zero dimension in event '{event}'"
        )));
    }
    Ok(n)
}

/// A host event delivered before a given virtual tick, written `TICK:EVENT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScriptedEvent {
    pub tick: u64,
    pub event: HostEvent,
}

impl FromStr for ScriptedEvent {
    type Err = GlyphfallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tick, event) = s.split_once(':').ok_or_else(|| {
            GlyphfallError::config(format!("scripted event '{s}' must look like TICK:EVENT"))
        })?;
        let tick = tick
            .trim()
            .parse()
            .map_err(|_| GlyphfallError::config(format!("bad tick in scripted event '{s}'")))?;
        Ok(Self {
            tick,
            event: event.parse()?,
        })
    }
}
