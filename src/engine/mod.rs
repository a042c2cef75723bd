//! Disruption engine: discovers targets, captures them, and drives their effects frame by
//! frame until each one settles back onto its element.
//!
//! The engine is single-threaded and cooperative. The host calls [`Engine::frame`] once per
//! display refresh; every tick requested before that call runs inside it.

use std::collections::BTreeSet;

use crate::effects::EffectRegistry;
use crate::foundation::core::{ElementHandle, InstanceId, Timestamp};
use crate::foundation::error::{DisruptError, DisruptResult};
use crate::render::surface::Surface;

pub(crate) mod clock;
pub(crate) mod host;
pub(crate) mod instances;
pub(crate) mod opts;
pub(crate) mod scheduler;

pub use clock::{FrameClock, TickQueue};
pub use host::{
    CaptureService, ElementDiscovery, Host, OverlayPlacement, Snapshot, VisibilityControl,
};
pub use instances::DisruptionInstance;
pub use opts::{EngineOpts, LoopProgress};

use instances::InstanceManager;
use scheduler::TickOutcome;

/// What one [`Engine::frame`] call did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Instances whose effect was animated this frame.
    pub ticked: Vec<InstanceId>,
    /// Instances that finished this frame and were removed.
    pub finished: Vec<InstanceId>,
}

/// A target resolved from its class tags.
#[derive(Clone, Debug)]
struct Target {
    element: ElementHandle,
    effect_id: String,
    looping: bool,
}

/// Explicit, constructible disruption engine.
///
/// Nothing happens until [`Engine::start_all`] is called.
pub struct Engine<H: Host, C: FrameClock = TickQueue> {
    host: H,
    clock: C,
    registry: EffectRegistry,
    opts: EngineOpts,
    instances: InstanceManager,
}

impl<H: Host, C: FrameClock> std::fmt::Debug for Engine<H, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("opts", &self.opts)
            .field("live", &self.instances.ids())
            .finish_non_exhaustive()
    }
}

impl<H: Host, C: FrameClock> Engine<H, C> {
    /// Build an engine. Fails when `opts` are invalid or name an unregistered default effect.
    pub fn new(
        host: H,
        clock: C,
        registry: EffectRegistry,
        opts: EngineOpts,
    ) -> DisruptResult<Self> {
        opts.validate()?;
        if !registry.contains(&opts.default_effect) {
            return Err(DisruptError::validation(format!(
                "default effect '{}' is not registered",
                opts.default_effect
            )));
        }
        Ok(Self {
            instances: InstanceManager::new(opts.seed),
            host,
            clock,
            registry,
            opts,
        })
    }

    /// Engine with the built-in effects and default options.
    pub fn with_defaults(host: H, clock: C) -> Self {
        let opts = EngineOpts::default();
        Self {
            instances: InstanceManager::new(opts.seed),
            host,
            clock,
            registry: EffectRegistry::builtin(),
            opts,
        }
    }

    /// Disrupt every target the host reports.
    ///
    /// All captures complete before any effect starts. A target whose capture fails is
    /// skipped; the others proceed. Elements that are still disrupted keep their current
    /// instance and get no new one. Returns the ids of the started instances.
    #[tracing::instrument(skip(self), fields(target_tag = %self.opts.target_tag))]
    pub fn start_all(&mut self) -> Vec<InstanceId> {
        let targets = self.resolve_targets();

        let mut created = Vec::with_capacity(targets.len());
        for t in &targets {
            if self.instances.covers(t.element) {
                tracing::debug!(element = %t.element, "element already disrupted");
                continue;
            }
            match self.instances.create(
                &mut self.host,
                &self.registry,
                t.element,
                &t.effect_id,
                &self.opts.default_effect,
                t.looping,
            ) {
                Ok(id) => created.push(id),
                Err(err) => {
                    tracing::warn!(element = %t.element, error = %err, "skipping target");
                }
            }
        }

        let mut started = Vec::with_capacity(created.len());
        for id in created {
            match self.start_instance(id) {
                Ok(()) => started.push(id),
                Err(err) => {
                    tracing::warn!(%id, error = %err, "could not start disruption");
                    let _ = self.instances.remove(&mut self.host, &mut self.clock, id);
                }
            }
        }

        tracing::info!(
            targets = targets.len(),
            started = started.len(),
            "disruptions started"
        );
        started
    }

    fn resolve_targets(&self) -> Vec<Target> {
        self.host
            .find_disruptable(&self.opts.target_tag)
            .into_iter()
            .map(|element| {
                let tags: BTreeSet<String> = self.host.class_tags(element);
                Target {
                    element,
                    effect_id: self
                        .registry
                        .resolve_tags(&tags)
                        .unwrap_or(self.opts.default_effect.as_str())
                        .to_owned(),
                    looping: tags.contains(&self.opts.loop_tag),
                }
            })
            .collect()
    }

    fn start_instance(&mut self, id: InstanceId) -> DisruptResult<()> {
        let instance = self.instances.get_mut(id)?;
        instance.setup(self.opts.loop_progress)?;
        let element = instance.element();
        if let Err(err) = self.host.hide(element) {
            tracing::warn!(%id, %element, error = %err, "failed to hide element");
        }
        instance.start(&mut self.clock)?;
        tracing::debug!(%id, runtime_ms = instance.runtime_ms(), "disruption started");
        Ok(())
    }

    /// Remove every live disruption, restoring all elements.
    #[tracing::instrument(skip(self))]
    pub fn stop_all(&mut self) {
        let count = self.instances.len();
        self.instances.remove_all(&mut self.host, &mut self.clock);
        tracing::info!(removed = count, "disruptions stopped");
    }

    /// Remove one disruption, restoring its element.
    pub fn remove(&mut self, id: InstanceId) -> DisruptResult<()> {
        self.instances.remove(&mut self.host, &mut self.clock, id)
    }

    /// [`Engine::stop_all`] followed by [`Engine::start_all`].
    pub fn restart_all(&mut self) -> Vec<InstanceId> {
        self.stop_all();
        self.start_all()
    }

    /// Run every tick requested before this call at timestamp `ts`.
    ///
    /// Instances whose animation finished are removed before returning. An instance whose
    /// effect fails to animate is removed as well.
    pub fn frame(&mut self, ts: Timestamp) -> FrameReport {
        let mut report = FrameReport::default();
        for id in self.clock.drain_requested() {
            let Ok(instance) = self.instances.get_mut(id) else {
                continue;
            };
            let outcome = instance.tick(&mut self.clock, ts);
            let done = match outcome {
                Ok(TickOutcome::Ignored) => false,
                Ok(TickOutcome::Continue) => {
                    report.ticked.push(id);
                    false
                }
                Ok(TickOutcome::Finished) => {
                    report.ticked.push(id);
                    report.finished.push(id);
                    true
                }
                Err(err) => {
                    tracing::warn!(%id, error = %err, "animation failed");
                    true
                }
            };
            if done {
                let _ = self.instances.remove(&mut self.host, &mut self.clock, id);
            }
        }
        report
    }

    /// Return `true` when no disruption is live.
    pub fn is_idle(&self) -> bool {
        self.instances.is_empty()
    }

    /// Live instance ids in ascending order.
    pub fn live_instances(&self) -> Vec<InstanceId> {
        self.instances.ids()
    }

    /// Read-only view of a live instance.
    pub fn instance(&self, id: InstanceId) -> DisruptResult<&DisruptionInstance> {
        self.instances.get(id)
    }

    /// Overlay pixels of a live instance.
    pub fn overlay(&self, id: InstanceId) -> DisruptResult<&Surface> {
        self.instances.overlay(id)
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The frame clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The effect registry.
    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    /// The engine options.
    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "../../tests/unit/engine/mod.rs"]
mod tests;
