use std::collections::BTreeMap;

use rand::{SeedableRng, rngs::SmallRng};

use crate::{
    engine::{lifecycle::LifecycleController, schedule::Scheduler},
    foundation::{config::RainConfig, error::GlyphfallResult},
    render::{Surface, cpu::PixmapSurface, font::GlyphFont},
};

/// Host element that drawing surfaces are mounted into, addressed by id.
pub trait Container {
    type Surface: Surface;

    /// Create a `width` x `height` surface inside `container_id`, replacing
    /// whatever that container held before.
    fn attach(
        &mut self,
        container_id: &str,
        width: u32,
        height: u32,
    ) -> GlyphfallResult<Self::Surface>;
}

impl<F, S> Container for F
where
    F: FnMut(&str, u32, u32) -> GlyphfallResult<S>,
    S: Surface,
{
    type Surface = S;

    fn attach(&mut self, container_id: &str, width: u32, height: u32) -> GlyphfallResult<S> {
        self(container_id, width, height)
    }
}

/// Mounts [`PixmapSurface`]s, optionally drawing with a real font.
#[derive(Debug, Default)]
pub struct PixmapContainer {
    font: Option<GlyphFont>,
    mounted: BTreeMap<String, (u32, u32)>,
}

impl PixmapContainer {
    pub fn new(font: Option<GlyphFont>) -> Self {
        Self {
            font,
            mounted: BTreeMap::new(),
        }
    }

    /// Size each container id was last mounted with.
    pub fn mounted(&self) -> &BTreeMap<String, (u32, u32)> {
        &self.mounted
    }
}

impl Container for PixmapContainer {
    type Surface = PixmapSurface;

    fn attach(
        &mut self,
        container_id: &str,
        width: u32,
        height: u32,
    ) -> GlyphfallResult<PixmapSurface> {
        let mut surface = PixmapSurface::new(width, height)?;
        if let Some(font) = &self.font {
            surface = surface.with_font(font)?;
        }
        if self
            .mounted
            .insert(container_id.to_string(), (width, height))
            .is_some()
        {
            tracing::debug!(container_id, "replacing previously mounted surface");
        }
        Ok(surface)
    }
}

/// Validate `config`, mount a surface into its container and start the rain.
///
/// A missing container id is reported before anything is mounted.
#[tracing::instrument(skip_all, fields(container_id = config.container_id.as_deref()))]
pub fn init<K, C>(
    config: &RainConfig,
    container: &mut K,
    scheduler: C,
    seed: Option<u64>,
) -> GlyphfallResult<LifecycleController<K::Surface, C>>
where
    K: Container,
    C: Scheduler,
{
    config.validate()?;
    let surface = container.attach(config.container_id()?, config.width, config.height)?;
    let rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let mut controller = LifecycleController::new(config, surface, scheduler, rng)?;
    controller.start();
    Ok(controller)
}

#[cfg(test)]
#[path = "../../tests/unit/host/container.rs"]
mod tests;
