use crate::effects::{DISSOLVE, Effect, EffectState, SetupCtx, Sprite};
use crate::foundation::core::Vec2;
use crate::render::pixmap::Pixmap;
use crate::render::surface::Surface;

const COLUMNS: u32 = 30;
const ROWS: u32 = 8;
const RUNTIME_MS: f64 = 1500.0;

/// A distorted checkerboard that dissolves in: every cell appears at its own moment,
/// jittered, and settles into place at another.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dissolve;

#[derive(Clone, Debug)]
pub(crate) struct Cell {
    pub(crate) sprite: Sprite,
    pub(crate) jitter: Vec2,
    /// Not drawn until progress passes this.
    pub(crate) show_at: f64,
    /// Drawn jittered until progress reaches this.
    pub(crate) correct_at: f64,
}

/// Per-instance state of [`Dissolve`].
#[derive(Clone, Debug)]
pub struct DissolveState {
    pub(crate) cells: Vec<Cell>,
}

impl EffectState for DissolveState {
    fn runtime_ms(&self) -> f64 {
        RUNTIME_MS
    }
}

impl Effect for Dissolve {
    type State = DissolveState;

    fn id(&self) -> &str {
        DISSOLVE
    }

    fn setup(&self, ctx: &mut SetupCtx<'_>) -> DissolveState {
        let cells = ctx
            .generators
            .grid(ctx.size, COLUMNS, ROWS)
            .into_iter()
            .map(|rect| Cell {
                sprite: Sprite::in_place(rect),
                jitter: Vec2::new(
                    ctx.rng.signed(rect.width()),
                    ctx.rng.signed(rect.height()),
                ),
                show_at: ctx.rng.next_f64_01(),
                correct_at: ctx.rng.next_f64_01(),
            })
            .collect();
        DissolveState { cells }
    }

    fn animate(
        &self,
        surface: &mut Surface,
        image: &Pixmap,
        state: &mut DissolveState,
        progress: f64,
    ) {
        surface.clear();
        surface.set_global_alpha(1.0);

        for cell in &state.cells {
            if progress <= cell.show_at {
                continue;
            }
            let sprite = if progress < cell.correct_at {
                cell.sprite.displaced(cell.jitter)
            } else {
                cell.sprite
            };
            surface.draw_image_rect(image, sprite.src, sprite.dst_rect());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/dissolve.rs"]
mod tests;
