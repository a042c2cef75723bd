use crate::effects::{Effect, EffectState, RGB_SHIFT, SetupCtx};
use crate::foundation::core::{Point, Rect, Rgba8Premul, SurfaceSize, Vec2};
use crate::foundation::math::Rng64;
use crate::render::pixmap::Pixmap;
use crate::render::surface::Surface;

const RUNTIME_MS: f64 = 2500.0;
/// Normal horizontal misregistration of a channel, in pixels.
const AMPLITUDE: f64 = 5.0;
/// Largest progress gap before a channel picks a new offset.
const CHANNEL_CHANGE_FREQ: f64 = 0.1;
/// Length of one glitch burst, in progress units.
const GLITCH_TIME: f64 = 0.05;
/// Largest progress gap between two glitch bursts.
const MAX_GLITCH_DELAY: f64 = 0.8;
/// Channel offsets picked during a burst are this much larger.
const GLITCH_AMPLITUDE_MODIFIER: f64 = 10.0;
const BAR_COUNT: usize = 3;
const BAR_HEIGHT: f64 = 1.0;
const BAR_MAX_OFFSET: f64 = 20.0;
const BAR_MAX_MOVE_TIME: f64 = 0.03;

const CHANNEL_ALPHA: f64 = 1.0 / 3.0;
const TRUE_COLOR_ALPHA: f64 = 2.0 / 3.0;

/// Chromatic misregistration: red, green and blue copies of the source drift independently,
/// with recurring glitch bursts and thin bars of resampled pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct RgbShift;

#[derive(Clone, Debug)]
pub(crate) struct Channel {
    pub(crate) image: Pixmap,
    pub(crate) x: f64,
    pub(crate) dx: f64,
    pub(crate) change_at: f64,
}

#[derive(Clone, Debug)]
pub(crate) struct GlitchBar {
    pub(crate) rect: Rect,
    pub(crate) dx: f64,
    pub(crate) move_at: f64,
}

impl GlitchBar {
    fn idle() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, 0.0, BAR_HEIGHT),
            dx: 0.0,
            move_at: 0.0,
        }
    }

    fn update(&mut self, size: SurfaceSize, rng: &mut Rng64, progress: f64) {
        if progress <= self.move_at {
            return;
        }
        let w = rng.range(0.0, size.w());
        let x = rng.range(0.0, size.w() - w);
        let y = rng.range(0.0, (size.h() - BAR_HEIGHT).max(0.0)).floor();
        self.rect = Rect::new(x, y, x + w, y + BAR_HEIGHT);
        self.dx = rng.signed(BAR_MAX_OFFSET);
        self.move_at = progress + rng.range(0.0, BAR_MAX_MOVE_TIME);
    }
}

/// Per-instance state of [`RgbShift`].
#[derive(Clone, Debug)]
pub struct RgbShiftState {
    pub(crate) size: SurfaceSize,
    pub(crate) channels: Vec<Channel>,
    pub(crate) glitch_at: f64,
    pub(crate) bars: Vec<GlitchBar>,
    rng: Rng64,
}

impl EffectState for RgbShiftState {
    fn runtime_ms(&self) -> f64 {
        RUNTIME_MS
    }
}

impl RgbShiftState {
    pub(crate) fn is_glitching(&self, progress: f64) -> bool {
        progress > self.glitch_at && progress <= self.glitch_at + GLITCH_TIME
    }

    fn schedule_glitch(&mut self, progress: f64) {
        self.glitch_at = progress + self.rng.range(0.0, MAX_GLITCH_DELAY);
    }
}

impl Effect for RgbShift {
    type State = RgbShiftState;

    fn id(&self) -> &str {
        RGB_SHIFT
    }

    fn setup(&self, ctx: &mut SetupCtx<'_>) -> RgbShiftState {
        let channels = [
            Rgba8Premul::opaque(255, 0, 0),
            Rgba8Premul::opaque(0, 255, 0),
            Rgba8Premul::opaque(0, 0, 255),
        ]
        .into_iter()
        .map(|color| Channel {
            image: ctx.image.tinted(color),
            x: 0.0,
            dx: 0.0,
            change_at: 0.0,
        })
        .collect();

        let mut state = RgbShiftState {
            size: ctx.size,
            channels,
            glitch_at: 0.0,
            bars: (0..BAR_COUNT).map(|_| GlitchBar::idle()).collect(),
            rng: Rng64::new(ctx.rng.next_u64()),
        };
        state.schedule_glitch(0.0);
        state
    }

    fn animate(
        &self,
        surface: &mut Surface,
        image: &Pixmap,
        state: &mut RgbShiftState,
        progress: f64,
    ) {
        surface.clear();
        surface.set_global_alpha(1.0);
        if progress >= 1.0 {
            surface.draw_image(image, Point::ORIGIN);
            return;
        }

        let glitching = state.is_glitching(progress);
        surface.set_global_alpha(CHANNEL_ALPHA);
        for ch in &mut state.channels {
            if progress > ch.change_at {
                ch.change_at = progress + state.rng.range(0.0, CHANNEL_CHANGE_FREQ);
                ch.x = state.rng.signed(AMPLITUDE);
                ch.dx = if glitching {
                    ch.x * GLITCH_AMPLITUDE_MODIFIER
                } else {
                    ch.x
                };
            }
            surface.draw_image(&ch.image, Point::new(ch.dx, 0.0));
        }

        if !glitching {
            surface.set_global_alpha(TRUE_COLOR_ALPHA);
            surface.draw_image(image, Point::ORIGIN);
        }

        if progress > state.glitch_at + GLITCH_TIME {
            state.schedule_glitch(progress);
        }

        // The burst may have been rescheduled above; bars follow the current window.
        let glitching = state.is_glitching(progress);
        for bar in &mut state.bars {
            bar.update(state.size, &mut state.rng, progress);

            surface.clear_rect(bar.rect);

            surface.set_global_alpha(CHANNEL_ALPHA);
            for ch in &state.channels {
                let dst = bar.rect + Vec2::new(bar.dx + ch.dx, 0.0);
                surface.draw_image_rect(&ch.image, bar.rect, dst);
            }

            if !glitching {
                surface.set_global_alpha(TRUE_COLOR_ALPHA);
                surface.draw_image_rect(image, bar.rect, bar.rect + Vec2::new(bar.dx, 0.0));
            }
        }
        surface.set_global_alpha(1.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/rgb_shift.rs"]
mod tests;
