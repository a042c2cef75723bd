use crate::effects::{BLOCKS, Effect, EffectState, SetupCtx, Sprite};
use crate::foundation::core::{Point, Vec2};
use crate::render::pixmap::Pixmap;
use crate::render::surface::Surface;

const BLOCK_COUNT: usize = 15;
const RUNTIME_MS: f64 = 2500.0;
const MAX_OFFSET: f64 = 20.0;

/// Blocks of the source render in the wrong place, then snap back.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blocks;

#[derive(Clone, Debug)]
pub(crate) struct Block {
    pub(crate) sprite: Sprite,
    /// The displaced copy disappears once progress reaches this.
    pub(crate) reposition_at: f64,
}

/// Per-instance state of [`Blocks`].
#[derive(Clone, Debug)]
pub struct BlocksState {
    pub(crate) blocks: Vec<Block>,
}

impl EffectState for BlocksState {
    fn runtime_ms(&self) -> f64 {
        RUNTIME_MS
    }
}

impl Effect for Blocks {
    type State = BlocksState;

    fn id(&self) -> &str {
        BLOCKS
    }

    fn setup(&self, ctx: &mut SetupCtx<'_>) -> BlocksState {
        let blocks = (0..BLOCK_COUNT)
            .map(|_| {
                let sprite = ctx.generators.random_rect(ctx.size, ctx.rng);
                let by = Vec2::new(ctx.rng.signed(MAX_OFFSET), ctx.rng.signed(MAX_OFFSET));
                Block {
                    sprite: sprite.displaced(by),
                    reposition_at: ctx.rng.range(0.1, 1.0),
                }
            })
            .collect();
        BlocksState { blocks }
    }

    fn animate(
        &self,
        surface: &mut Surface,
        image: &Pixmap,
        state: &mut BlocksState,
        progress: f64,
    ) {
        surface.clear();
        surface.set_global_alpha(1.0);
        surface.draw_image(image, Point::ORIGIN);

        let displaced = || state.blocks.iter().filter(|b| b.reposition_at > progress);

        // All holes go in before any block is drawn so a later hole never erases a block.
        for b in displaced() {
            surface.clear_rect(b.sprite.src);
        }
        for b in displaced() {
            surface.draw_image_rect(image, b.sprite.src, b.sprite.dst_rect());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blocks.rs"]
mod tests;
