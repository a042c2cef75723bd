use crate::effects::{Effect, EffectState, HORIZONTAL, SetupCtx, Sprite};
use crate::foundation::core::{Rect, Vec2};
use crate::foundation::math::Rng64;
use crate::render::pixmap::Pixmap;
use crate::render::surface::Surface;

const STRIPS: u32 = 7;
const RUNTIME_MS: f64 = 2000.0;
/// Largest progress gap between two movements of the same strip.
const MAX_MOVE_GAP: f64 = 0.3;

/// Horizontal strips that shake left and right, calming down towards the end.
#[derive(Clone, Copy, Debug, Default)]
pub struct HorizontalBars;

#[derive(Clone, Debug)]
pub(crate) struct Strip {
    pub(crate) sprite: Sprite,
    /// Progress after which the strip picks a new offset.
    pub(crate) next_movement: f64,
    pub(crate) offset: f64,
}

/// Per-instance state of [`HorizontalBars`].
#[derive(Clone, Debug)]
pub struct HorizontalBarsState {
    pub(crate) strips: Vec<Strip>,
    rng: Rng64,
}

impl EffectState for HorizontalBarsState {
    fn runtime_ms(&self) -> f64 {
        RUNTIME_MS
    }
}

impl Effect for HorizontalBars {
    type State = HorizontalBarsState;

    fn id(&self) -> &str {
        HORIZONTAL
    }

    fn setup(&self, ctx: &mut SetupCtx<'_>) -> HorizontalBarsState {
        let (w, h) = (ctx.size.w(), ctx.size.h());
        let strips = (0..STRIPS)
            .map(|i| {
                let y0 = h * f64::from(i) / f64::from(STRIPS);
                let y1 = h * f64::from(i + 1) / f64::from(STRIPS);
                Strip {
                    sprite: Sprite::in_place(Rect::new(0.0, y0, w, y1)),
                    next_movement: 0.0,
                    offset: 0.0,
                }
            })
            .collect();

        HorizontalBarsState {
            strips,
            rng: Rng64::new(ctx.rng.next_u64()),
        }
    }

    fn animate(
        &self,
        surface: &mut Surface,
        image: &Pixmap,
        state: &mut HorizontalBarsState,
        progress: f64,
    ) {
        surface.clear();
        surface.set_global_alpha(1.0);

        let rng = &mut state.rng;
        for strip in &mut state.strips {
            if progress >= 1.0 {
                strip.offset = 0.0;
            } else if progress > strip.next_movement {
                let amp = strip.sprite.src.height();
                let damper = (1.0 - progress).max(0.0);
                strip.offset = rng.signed(amp) * damper;
                strip.next_movement =
                    (strip.next_movement + rng.range(0.0, MAX_MOVE_GAP)).min(1.0);
            }

            let moved = strip.sprite.displaced(Vec2::new(strip.offset, 0.0));
            surface.draw_image_rect(image, moved.src, moved.dst_rect());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/horizontal.rs"]
mod tests;
