use crate::foundation::core::{Point, Rect, SurfaceSize, Vec2};
use crate::foundation::math::Rng64;

/// A rectangular piece of the source image and where it is drawn on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    /// Region sampled from the source image.
    pub src: Rect,
    /// Top-left corner of the destination, same size as `src`.
    pub dst: Point,
}

impl Sprite {
    /// Sprite drawn exactly where it was sampled.
    pub fn in_place(src: Rect) -> Self {
        Self {
            src,
            dst: src.origin(),
        }
    }

    /// Destination rectangle at natural size. An undisplaced sprite yields `src` exactly.
    pub fn dst_rect(&self) -> Rect {
        self.src + (self.dst - self.src.origin())
    }

    /// Same sprite with its destination moved by `by`.
    pub fn displaced(self, by: Vec2) -> Self {
        Self {
            src: self.src,
            dst: self.dst + by,
        }
    }
}

/// Stateless helpers producing randomized geometry for effect setup.
#[derive(Clone, Copy, Debug, Default)]
pub struct Generators;

impl Generators {
    /// Random rectangle inside `size`: the origin is uniform over the surface and the extent
    /// is a uniform fraction of the remaining room, so the rectangle never leaves the bounds.
    pub fn random_rect(&self, size: SurfaceSize, rng: &mut Rng64) -> Sprite {
        let x = size.w() * rng.next_f64_01();
        let y = size.h() * rng.next_f64_01();
        let w = (size.w() - x) * rng.next_f64_01();
        let h = (size.h() - y) * rng.next_f64_01();
        Sprite::in_place(Rect::new(x, y, x + w, y + h))
    }

    /// Uniform partition of `size` into `cols x rows` cells, column-major like the grid the
    /// dissolve effect walks. Cell edges are computed from the same expression on both
    /// sides so neighbouring cells share exact boundaries.
    pub fn grid(&self, size: SurfaceSize, cols: u32, rows: u32) -> Vec<Rect> {
        let edge = |extent: f64, i: u32, n: u32| extent * f64::from(i) / f64::from(n);
        let mut out = Vec::with_capacity((cols as usize) * (rows as usize));
        for c in 0..cols {
            for r in 0..rows {
                out.push(Rect::new(
                    edge(size.w(), c, cols),
                    edge(size.h(), r, rows),
                    edge(size.w(), c + 1, cols),
                    edge(size.h(), r + 1, rows),
                ));
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/generators.rs"]
mod tests;
