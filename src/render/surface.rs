use crate::foundation::core::{Point, Rect, SurfaceSize};
use crate::render::composite::over;
use crate::render::pixmap::Pixmap;

/// Mutable drawing target for an effect: the overlay that sits on top of a hidden element.
///
/// The operation set mirrors what the effects need from a 2D canvas: clear, clear a
/// rectangle, a global alpha, and drawing a (sub-rectangle of a) source image into a
/// destination rectangle with nearest-neighbour scaling. All drawing is source-over in
/// premultiplied RGBA8 and clipped to the surface.
///
/// Coverage rule: a destination pixel is touched when its centre lies in the half-open
/// rectangle `[x0, x1) x [y0, y1)`. Adjacent rectangles sharing an edge therefore never
/// touch the same pixel twice, and a 1:1 draw reproduces the source bit for bit.
#[derive(Clone, Debug)]
pub struct Surface {
    pixmap: Pixmap,
    global_alpha: f32,
}

impl Surface {
    /// Transparent surface of the given size.
    pub fn new(size: SurfaceSize) -> Self {
        Self::from_pixmap(Pixmap::new(size))
    }

    /// Surface whose initial contents are `pixmap`.
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            pixmap,
            global_alpha: 1.0,
        }
    }

    /// Pixel dimensions.
    pub fn size(&self) -> SurfaceSize {
        self.pixmap.size()
    }

    /// Current pixels.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Consume the surface, keeping its pixels.
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Opacity multiplier applied to subsequent draws, clamped to `[0, 1]`.
    pub fn set_global_alpha(&mut self, alpha: f64) {
        self.global_alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0) as f32
        } else {
            0.0
        };
    }

    /// Current opacity multiplier.
    pub fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    /// Make every pixel transparent.
    pub fn clear(&mut self) {
        self.pixmap.data_mut().fill(0);
    }

    /// Make every pixel covered by `rect` transparent. Ignores global alpha.
    pub fn clear_rect(&mut self, rect: Rect) {
        let Some((xs, ys)) = covered_span(rect, self.size()) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                let i = self.pixmap.index(x, y);
                self.pixmap.data_mut()[i..i + 4].fill(0);
            }
        }
    }

    /// Draw the whole `image` with its top-left corner at `at`, at natural size.
    pub fn draw_image(&mut self, image: &Pixmap, at: Point) {
        let src = image.rect();
        let dst = Rect::from_origin_size(at, src.size());
        self.draw_image_rect(image, src, dst);
    }

    /// Draw the `src` region of `image` stretched into `dst`.
    ///
    /// Source samples falling outside `src` or outside the image are skipped, so a region
    /// never bleeds pixels from its neighbours.
    pub fn draw_image_rect(&mut self, image: &Pixmap, src: Rect, dst: Rect) {
        if !(src.width() > 0.0 && src.height() > 0.0 && dst.width() > 0.0 && dst.height() > 0.0)
        {
            return;
        }
        if self.global_alpha <= 0.0 {
            return;
        }
        let Some((xs, ys)) = covered_span(dst, self.size()) else {
            return;
        };

        let sx_scale = src.width() / dst.width();
        let sy_scale = src.height() / dst.height();
        let iw = f64::from(image.width());
        let ih = f64::from(image.height());
        let opacity = self.global_alpha;

        for y in ys {
            let sy = src.y0 + (f64::from(y) + 0.5 - dst.y0) * sy_scale;
            if sy < src.y0 || sy >= src.y1 || sy < 0.0 || sy >= ih {
                continue;
            }
            let sy = sy.floor() as u32;
            for x in xs.clone() {
                let sx = src.x0 + (f64::from(x) + 0.5 - dst.x0) * sx_scale;
                if sx < src.x0 || sx >= src.x1 || sx < 0.0 || sx >= iw {
                    continue;
                }
                let s = image.pixel(sx.floor() as u32, sy);
                let i = self.pixmap.index(x, y);
                let data = self.pixmap.data_mut();
                let d = [data[i], data[i + 1], data[i + 2], data[i + 3]];
                data[i..i + 4].copy_from_slice(&over(d, s, opacity));
            }
        }
    }
}

/// Pixel index ranges whose centres fall inside `rect`, clipped to `size`.
fn covered_span(
    rect: Rect,
    size: SurfaceSize,
) -> Option<(std::ops::Range<u32>, std::ops::Range<u32>)> {
    let rect = rect.abs();
    if !rect.is_finite() {
        return None;
    }
    let first = |lo: f64| (lo - 0.5).ceil().max(0.0);
    let end = |hi: f64, max: u32| (hi - 0.5).ceil().clamp(0.0, f64::from(max));

    let x0 = first(rect.x0);
    let x1 = end(rect.x1, size.width);
    let y0 = first(rect.y0);
    let y1 = end(rect.y1, size.height);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32..x1 as u32, y0 as u32..y1 as u32))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
