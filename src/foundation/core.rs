use std::fmt;

use crate::foundation::error::{DisruptError, DisruptResult};

pub use kurbo::{Point, Rect, Vec2};

/// Engine-assigned id of a live disruption.
///
/// Ids are allocated in strictly increasing order and never reused for the lifetime of the
/// engine that issued them.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance #{}", self.0)
    }
}

/// Opaque handle to a host element. The engine never looks inside it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementHandle(pub u64);

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element #{}", self.0)
    }
}

/// Cancellable handle for one requested frame tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickHandle(pub u64);

/// Host frame timestamp in milliseconds (same unit as a display-refresh callback).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Timestamp(pub f64);

impl Timestamp {
    /// Build a timestamp from milliseconds.
    pub fn from_millis(ms: f64) -> Self {
        Self(ms)
    }

    /// Milliseconds elapsed since `earlier` (negative if `earlier` is later).
    pub fn millis_since(self, earlier: Timestamp) -> f64 {
        self.0 - earlier.0
    }
}

/// Pixel dimensions of a snapshot surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Create a validated, non-empty size.
    pub fn new(width: u32, height: u32) -> DisruptResult<Self> {
        if width == 0 || height == 0 {
            return Err(DisruptError::validation(format!(
                "surface size must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width as `f64`, for geometry.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`, for geometry.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// The full surface as a rectangle anchored at the origin.
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.w(), self.h())
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Opaque colour from straight RGB.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Pixel bytes in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
