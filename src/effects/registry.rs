use std::collections::BTreeSet;
use std::sync::Arc;

use crate::effects::blocks::Blocks;
use crate::effects::dissolve::Dissolve;
use crate::effects::horizontal::HorizontalBars;
use crate::effects::rgb_shift::RgbShift;
use crate::effects::scale_down::ScaleDown;
use crate::effects::{Effect, ErasedEffect};
use crate::foundation::error::{DisruptError, DisruptResult};

/// Ordered, append-only table of effect definitions.
///
/// Order matters: when a target carries several effect tags, the first id in registration
/// order wins.
#[derive(Clone, Default)]
pub struct EffectRegistry {
    entries: Vec<Arc<dyn ErasedEffect>>,
}

impl std::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

impl EffectRegistry {
    /// Registry without any effects.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the five built-in effects.
    pub fn builtin() -> Self {
        let mut reg = Self::empty();
        // Ids are distinct constants; registration cannot fail here.
        reg.push(HorizontalBars);
        reg.push(Dissolve);
        reg.push(Blocks);
        reg.push(ScaleDown);
        reg.push(RgbShift);
        reg
    }

    fn push<E: Effect>(&mut self, effect: E) {
        self.entries.push(Arc::new(effect));
    }

    /// Append `effect`. Fails when its id is empty or already registered.
    pub fn register<E: Effect>(&mut self, effect: E) -> DisruptResult<()> {
        let id = Effect::id(&effect);
        if id.trim().is_empty() {
            return Err(DisruptError::validation("effect id must be non-empty"));
        }
        if self.contains(id) {
            return Err(DisruptError::validation(format!(
                "effect '{id}' is already registered"
            )));
        }
        tracing::debug!(effect = id, "registered effect");
        self.push(effect);
        Ok(())
    }

    /// Look up an effect by id.
    pub fn get(&self, id: &str) -> DisruptResult<Arc<dyn ErasedEffect>> {
        self.entries
            .iter()
            .find(|e| e.id() == id)
            .cloned()
            .ok_or_else(|| DisruptError::unknown_effect(id))
    }

    /// Return `true` when `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id() == id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.id())
    }

    /// Number of registered effects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when no effect is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First registered id present in `tags`, if any.
    pub fn resolve_tags(&self, tags: &BTreeSet<String>) -> Option<&str> {
        self.ids().find(|id| tags.contains(*id))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/registry.rs"]
mod tests;
