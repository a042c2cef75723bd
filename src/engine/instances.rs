use std::collections::BTreeMap;
use std::sync::Arc;

use crate::effects::{AnyEffectState, EffectRegistry, ErasedEffect, Generators, SetupCtx};
use crate::engine::clock::FrameClock;
use crate::engine::host::Host;
use crate::engine::opts::LoopProgress;
use crate::engine::scheduler::{Phase, Scheduler, TickOutcome};
use crate::foundation::core::{ElementHandle, InstanceId, Timestamp};
use crate::foundation::error::{DisruptError, DisruptResult};
use crate::foundation::math::{Rng64, instance_seed};
use crate::render::pixmap::Pixmap;
use crate::render::surface::Surface;

/// Effect state plus the tick loop driving it. Present once the instance has been set up.
#[derive(Debug)]
struct Animation {
    state: AnyEffectState,
    scheduler: Scheduler,
}

/// One live disruption: a captured element, its overlay and its effect.
pub struct DisruptionInstance {
    id: InstanceId,
    element: ElementHandle,
    effect: Arc<dyn ErasedEffect>,
    looping: bool,
    surface: Surface,
    image: Pixmap,
    rng: Rng64,
    animation: Option<Animation>,
}

impl std::fmt::Debug for DisruptionInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisruptionInstance")
            .field("id", &self.id)
            .field("element", &self.element)
            .field("effect", &self.effect.id())
            .field("looping", &self.looping)
            .field("animation", &self.animation)
            .finish_non_exhaustive()
    }
}

impl DisruptionInstance {
    /// Engine-assigned id.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Element this instance covers.
    pub fn element(&self) -> ElementHandle {
        self.element
    }

    /// Id of the effect playing on this instance.
    pub fn effect_id(&self) -> &str {
        self.effect.id()
    }

    /// Whether the animation repeats forever.
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// The overlay surface as last painted.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The captured source image.
    pub fn image(&self) -> &Pixmap {
        &self.image
    }

    /// Whether `setup` has run.
    pub fn is_set_up(&self) -> bool {
        self.animation.is_some()
    }

    /// Runtime of one pass, once set up.
    pub fn runtime_ms(&self) -> Option<f64> {
        self.animation.as_ref().map(|a| a.scheduler.runtime_ms())
    }

    /// Timestamp of the first tick, once the animation is running.
    pub fn started_at(&self) -> Option<Timestamp> {
        match self.animation.as_ref()?.scheduler.phase() {
            Phase::Running { start } => Some(start),
            _ => None,
        }
    }

    /// Run the effect's setup and build the scheduler. Fails on an unusable runtime.
    pub(crate) fn setup(&mut self, loop_progress: LoopProgress) -> DisruptResult<()> {
        let mut ctx = SetupCtx {
            size: self.surface.size(),
            image: &self.image,
            generators: Generators,
            rng: &mut self.rng,
        };
        let state = self.effect.setup_any(&mut ctx);
        let scheduler = Scheduler::new(state.runtime_ms(), self.looping, loop_progress)?;
        self.animation = Some(Animation { state, scheduler });
        Ok(())
    }

    pub(crate) fn start<C: FrameClock + ?Sized>(&mut self, clock: &mut C) -> DisruptResult<()> {
        let Some(anim) = self.animation.as_mut() else {
            return Err(DisruptError::validation(format!(
                "{} must be set up before it starts",
                self.id
            )));
        };
        anim.scheduler.start(clock, self.id);
        Ok(())
    }

    pub(crate) fn tick<C: FrameClock + ?Sized>(
        &mut self,
        clock: &mut C,
        ts: Timestamp,
    ) -> DisruptResult<TickOutcome> {
        let Some(Animation { state, scheduler }) = self.animation.as_mut() else {
            return Ok(TickOutcome::Ignored);
        };
        let effect = &self.effect;
        let surface = &mut self.surface;
        let image = &self.image;
        scheduler.tick(clock, self.id, ts, |progress| {
            effect.animate_any(surface, image, state, progress)
        })
    }

    fn stop<C: FrameClock + ?Sized>(&mut self, clock: &mut C) {
        if let Some(anim) = self.animation.as_mut() {
            anim.scheduler.stop(clock);
        }
    }
}

/// Owns every live [`DisruptionInstance`] and allocates their ids.
#[derive(Debug)]
pub(crate) struct InstanceManager {
    seed: u64,
    next_id: u64,
    live: BTreeMap<InstanceId, DisruptionInstance>,
}

impl InstanceManager {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            seed,
            next_id: 0,
            live: BTreeMap::new(),
        }
    }

    /// Capture `element` and register a new instance for it.
    ///
    /// Nothing is allocated when the capture fails. An unregistered `effect_id` falls back to
    /// `fallback_effect`.
    pub(crate) fn create<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        registry: &EffectRegistry,
        element: ElementHandle,
        effect_id: &str,
        fallback_effect: &str,
        looping: bool,
    ) -> DisruptResult<InstanceId> {
        let snapshot = host
            .capture(element)
            .and_then(|snap| snap.validate().map(|()| snap))
            .map_err(|e| match e {
                DisruptError::CaptureFailed { .. } => e,
                other => DisruptError::capture_failed(element, other.to_string()),
            })?;

        let effect = match registry.get(effect_id) {
            Ok(effect) => effect,
            Err(err) => {
                tracing::warn!(
                    %element,
                    error = %err,
                    fallback = fallback_effect,
                    "falling back to default effect"
                );
                registry.get(fallback_effect)?
            }
        };

        self.next_id += 1;
        let id = InstanceId(self.next_id);
        let instance = DisruptionInstance {
            id,
            element,
            effect,
            looping,
            surface: snapshot.surface,
            image: snapshot.image,
            rng: Rng64::new(instance_seed(self.seed, id.0)),
            animation: None,
        };

        if let Err(err) = host.position_overlay(element, id, &instance.surface) {
            tracing::warn!(%id, %element, error = %err, "overlay placement failed");
        }
        tracing::debug!(
            %id,
            %element,
            effect = instance.effect_id(),
            looping,
            "created disruption"
        );
        self.live.insert(id, instance);
        Ok(id)
    }

    pub(crate) fn get(&self, id: InstanceId) -> DisruptResult<&DisruptionInstance> {
        self.live.get(&id).ok_or(DisruptError::NotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: InstanceId) -> DisruptResult<&mut DisruptionInstance> {
        self.live.get_mut(&id).ok_or(DisruptError::NotFound(id))
    }

    /// Tear down one instance: cancel its tick, show its element, detach its overlay.
    ///
    /// Every step runs even if an earlier host call fails.
    pub(crate) fn remove<H, C>(
        &mut self,
        host: &mut H,
        clock: &mut C,
        id: InstanceId,
    ) -> DisruptResult<()>
    where
        H: Host + ?Sized,
        C: FrameClock + ?Sized,
    {
        let mut instance = self.live.remove(&id).ok_or(DisruptError::NotFound(id))?;
        instance.stop(clock);
        if let Err(err) = host.show(instance.element) {
            tracing::warn!(
                %id,
                element = %instance.element,
                error = %err,
                "failed to show element"
            );
        }
        if let Err(err) = host.remove_overlay(id) {
            tracing::warn!(%id, error = %err, "failed to remove overlay");
        }
        tracing::debug!(%id, "removed disruption");
        Ok(())
    }

    /// Remove every live instance in ascending id order.
    pub(crate) fn remove_all<H, C>(&mut self, host: &mut H, clock: &mut C)
    where
        H: Host + ?Sized,
        C: FrameClock + ?Sized,
    {
        for id in self.ids() {
            // Ids come from the live map, so removal cannot miss.
            let _ = self.remove(host, clock, id);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.live.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Return `true` when some live instance covers `element`.
    pub(crate) fn covers(&self, element: ElementHandle) -> bool {
        self.live.values().any(|i| i.element == element)
    }

    /// Live ids in ascending order.
    pub(crate) fn ids(&self) -> Vec<InstanceId> {
        self.live.keys().copied().collect()
    }

    pub(crate) fn overlay(&self, id: InstanceId) -> DisruptResult<&Surface> {
        self.get(id).map(DisruptionInstance::surface)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/instances.rs"]
mod tests;
