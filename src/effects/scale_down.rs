use crate::effects::{Effect, EffectState, SCALE_DOWN, SetupCtx, Sprite, parabola, sub_progress};
use crate::foundation::core::{Rect, SurfaceSize};
use crate::render::pixmap::Pixmap;
use crate::render::surface::Surface;

const BLOCK_COUNT: usize = 15;
const RUNTIME_MS: f64 = 1500.0;
const MIN_SCALE: f64 = 1.0;
const MAX_SCALE: f64 = 1.5;
/// Share of the runtime the base image needs to settle.
const BASE_SPAN: f64 = 0.3;

/// The source fades in while shrinking to natural size; some blocks lag behind on their own
/// clock and occasionally freeze mid-way.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScaleDown;

#[derive(Clone, Debug)]
pub(crate) struct ScaleBlock {
    pub(crate) sprite: Sprite,
    /// Share of the runtime this block needs to reach natural scale.
    pub(crate) anim_time: f64,
    pub(crate) stop_at: f64,
    pub(crate) stop_length: f64,
    /// Scale latched on the first frozen frame.
    pub(crate) stop_scale: Option<f64>,
}

impl ScaleBlock {
    fn is_frozen(&self, progress: f64) -> bool {
        progress < 1.0 && self.stop_at < progress && progress <= self.stop_at + self.stop_length
    }
}

/// Per-instance state of [`ScaleDown`].
#[derive(Clone, Debug)]
pub struct ScaleDownState {
    pub(crate) size: SurfaceSize,
    pub(crate) blocks: Vec<ScaleBlock>,
}

impl EffectState for ScaleDownState {
    fn runtime_ms(&self) -> f64 {
        RUNTIME_MS
    }
}

impl ScaleDownState {
    fn scale_at(progress: f64) -> f64 {
        MAX_SCALE - parabola(progress) * (MAX_SCALE - MIN_SCALE)
    }

    /// `rect` scaled by `scale` about the surface centre.
    fn scaled(size: SurfaceSize, rect: Rect, scale: f64) -> Rect {
        let bx = -size.w() * (scale - 1.0) / 2.0;
        let by = -size.h() * (scale - 1.0) / 2.0;
        Rect::new(
            bx + rect.x0 * scale,
            by + rect.y0 * scale,
            bx + rect.x1 * scale,
            by + rect.y1 * scale,
        )
    }
}

impl Effect for ScaleDown {
    type State = ScaleDownState;

    fn id(&self) -> &str {
        SCALE_DOWN
    }

    fn setup(&self, ctx: &mut SetupCtx<'_>) -> ScaleDownState {
        let blocks = (0..BLOCK_COUNT)
            .map(|_| {
                let sprite = ctx.generators.random_rect(ctx.size, ctx.rng);
                let anim_time = (0.4 + ctx.rng.range(0.0, 0.7)).min(1.0);
                ScaleBlock {
                    sprite,
                    anim_time,
                    stop_at: ctx.rng.range(0.0, anim_time),
                    stop_length: ctx.rng.range(0.0, anim_time.min(0.4)),
                    stop_scale: None,
                }
            })
            .collect();
        ScaleDownState {
            size: ctx.size,
            blocks,
        }
    }

    fn animate(
        &self,
        surface: &mut Surface,
        image: &Pixmap,
        state: &mut ScaleDownState,
        progress: f64,
    ) {
        surface.clear();

        let base_progress = sub_progress(progress, BASE_SPAN);
        let base_scale = ScaleDownState::scale_at(base_progress);
        surface.set_global_alpha(base_progress);
        let size = state.size;
        let base_dst = ScaleDownState::scaled(size, image.rect(), base_scale);
        surface.draw_image_rect(image, image.rect(), base_dst);

        for block in &mut state.blocks {
            let src = block.sprite.src;
            surface.clear_rect(ScaleDownState::scaled(size, src, base_scale));

            let own_progress = sub_progress(progress, block.anim_time);
            let mut scale = ScaleDownState::scale_at(own_progress);
            if block.is_frozen(progress) {
                scale = *block.stop_scale.get_or_insert(scale);
            }

            surface.set_global_alpha(own_progress);
            surface.draw_image_rect(image, src, ScaleDownState::scaled(size, src, scale));
        }
        surface.set_global_alpha(1.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/scale_down.rs"]
mod tests;
