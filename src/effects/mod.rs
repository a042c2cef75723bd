//! Procedural disruption effects.
//!
//! An effect is a pair of operations:
//!
//! - `setup` runs once per disruption instance and returns that instance's private state,
//!   including the effect's runtime. All randomness happens here or in `animate` through
//!   the instance's own [`Rng64`], so each instance gets independent parameters while a
//!   fixed engine seed still reproduces the same pixels.
//! - `animate` repaints the whole surface for a progress value. Progress is
//!   `elapsed / runtime`, unclamped; every built-in effect draws the untouched source image
//!   for `progress >= 1`.
//!
//! Effects are authored against the typed [`Effect`] trait and stored in the
//! [`EffectRegistry`] behind the object-safe [`ErasedEffect`].

use std::any::Any;

use crate::foundation::core::SurfaceSize;
use crate::foundation::error::{DisruptError, DisruptResult};
use crate::foundation::math::Rng64;
use crate::render::pixmap::Pixmap;
use crate::render::surface::Surface;

pub(crate) mod blocks;
pub(crate) mod dissolve;
pub(crate) mod generators;
pub(crate) mod horizontal;
pub(crate) mod registry;
pub(crate) mod rgb_shift;
pub(crate) mod scale_down;

pub use blocks::{Blocks, BlocksState};
pub use dissolve::{Dissolve, DissolveState};
pub use generators::{Generators, Sprite};
pub use horizontal::{HorizontalBars, HorizontalBarsState};
pub use registry::EffectRegistry;
pub use rgb_shift::{RgbShift, RgbShiftState};
pub use scale_down::{ScaleDown, ScaleDownState};

/// Shaking horizontal strips.
pub const HORIZONTAL: &str = "dsrpt-horizontal";
/// Jittered grid that dissolves into place.
pub const DISSOLVE: &str = "dsrpt-dissolve";
/// Displaced blocks that snap back.
pub const BLOCKS: &str = "dsrpt-blocks";
/// Scale-down fade-in with freezing blocks.
pub const SCALE_DOWN: &str = "dsrpt-scale-down";
/// Chromatic misregistration with glitch bursts.
pub const RGB_SHIFT: &str = "dsrpt-rgb-shift";

/// Effect used when a target names no known effect.
pub const DEFAULT_EFFECT: &str = HORIZONTAL;

/// Inputs available to [`Effect::setup`].
pub struct SetupCtx<'a> {
    /// Size of the snapshot surface.
    pub size: SurfaceSize,
    /// The captured source image.
    pub image: &'a Pixmap,
    /// Geometry helpers.
    pub generators: Generators,
    /// The instance's private random stream.
    pub rng: &'a mut Rng64,
}

/// Per-instance state produced by [`Effect::setup`].
pub trait EffectState: Send + 'static {
    /// Duration of one pass of the animation in milliseconds.
    fn runtime_ms(&self) -> f64;
}

/// A procedural animation definition.
pub trait Effect: Send + Sync + 'static {
    /// State owned by one disruption instance.
    type State: EffectState;

    /// Registry identifier, also the class tag that selects the effect.
    fn id(&self) -> &str;

    /// Build fresh randomized state for one instance.
    fn setup(&self, ctx: &mut SetupCtx<'_>) -> Self::State;

    /// Repaint `surface` for `progress`.
    fn animate(
        &self,
        surface: &mut Surface,
        image: &Pixmap,
        state: &mut Self::State,
        progress: f64,
    );
}

/// Type-erased [`EffectState`] as stored on a disruption instance.
pub struct AnyEffectState {
    runtime_ms: f64,
    inner: Box<dyn Any + Send>,
}

impl AnyEffectState {
    /// Runtime reported by the wrapped state.
    pub fn runtime_ms(&self) -> f64 {
        self.runtime_ms
    }
}

impl std::fmt::Debug for AnyEffectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyEffectState")
            .field("runtime_ms", &self.runtime_ms)
            .finish_non_exhaustive()
    }
}

/// Object-safe view of an [`Effect`], implemented for every effect.
pub trait ErasedEffect: Send + Sync {
    /// Registry identifier.
    fn id(&self) -> &str;

    /// [`Effect::setup`] with the state boxed.
    fn setup_any(&self, ctx: &mut SetupCtx<'_>) -> AnyEffectState;

    /// [`Effect::animate`] on boxed state. Fails if `state` came from another effect.
    fn animate_any(
        &self,
        surface: &mut Surface,
        image: &Pixmap,
        state: &mut AnyEffectState,
        progress: f64,
    ) -> DisruptResult<()>;
}

impl<E: Effect> ErasedEffect for E {
    fn id(&self) -> &str {
        Effect::id(self)
    }

    fn setup_any(&self, ctx: &mut SetupCtx<'_>) -> AnyEffectState {
        let state = self.setup(ctx);
        AnyEffectState {
            runtime_ms: state.runtime_ms(),
            inner: Box::new(state),
        }
    }

    fn animate_any(
        &self,
        surface: &mut Surface,
        image: &Pixmap,
        state: &mut AnyEffectState,
        progress: f64,
    ) -> DisruptResult<()> {
        let state = state.inner.downcast_mut::<E::State>().ok_or_else(|| {
            DisruptError::validation(format!(
                "effect '{}' was handed state built by another effect",
                Effect::id(self)
            ))
        })?;
        self.animate(surface, image, state, progress);
        Ok(())
    }
}

/// Parabolic ease-out used by the scale effects: `1 - (x - 1)^2`.
pub(crate) fn parabola(x: f64) -> f64 {
    1.0 - (x - 1.0).powi(2)
}

/// `progress / span`, capped at 1.
pub(crate) fn sub_progress(progress: f64, span: f64) -> f64 {
    if span <= 0.0 {
        return 1.0;
    }
    (progress / span).min(1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "../../tests/unit/effects/mod.rs"]
mod tests;
