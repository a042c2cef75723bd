use crate::foundation::core::{Rect, Rgba8Premul, SurfaceSize};
use crate::foundation::error::{DisruptError, DisruptResult};
use crate::render::composite::{PremulRgba8, source_in};

/// Premultiplied RGBA8 image, tightly packed, row-major.
///
/// Used both as the immutable "source image" of a snapshot and as the backing store of a
/// [`Surface`](crate::Surface).
#[derive(Clone, PartialEq, Eq)]
pub struct Pixmap {
    size: SurfaceSize,
    data: Vec<u8>,
}

impl std::fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pixmap")
            .field("width", &self.size.width)
            .field("height", &self.size.height)
            .finish_non_exhaustive()
    }
}

impl Pixmap {
    /// Fully transparent pixmap.
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            data: vec![0; size.byte_len()],
        }
    }

    /// Pixmap filled with a single colour.
    pub fn solid(size: SurfaceSize, color: Rgba8Premul) -> Self {
        let px = color.to_array();
        let mut data = Vec::with_capacity(size.byte_len());
        for _ in 0..(size.byte_len() / 4) {
            data.extend_from_slice(&px);
        }
        Self { size, data }
    }

    /// Wrap an existing premultiplied buffer. The length must be `width * height * 4`.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> DisruptResult<Self> {
        let size = SurfaceSize::new(width, height)?;
        if data.len() != size.byte_len() {
            return Err(DisruptError::render(format!(
                "pixmap buffer is {} bytes, expected {} for {width}x{height}",
                data.len(),
                size.byte_len()
            )));
        }
        Ok(Self { size, data })
    }

    /// Pixel dimensions.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// The full image as a rectangle at the origin.
    pub fn rect(&self) -> Rect {
        self.size.to_rect()
    }

    /// Raw premultiplied bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied pixel at `(x, y)`. Out-of-bounds reads are transparent.
    pub fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        if x >= self.size.width || y >= self.size.height {
            return [0, 0, 0, 0];
        }
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// A copy recoloured with `color` wherever this image has coverage ("source-in" fill).
    pub fn tinted(&self, color: Rgba8Premul) -> Pixmap {
        let mut out = self.clone();
        for px in out.data.chunks_exact_mut(4) {
            let tinted = source_in([px[0], px[1], px[2], px[3]], color);
            px.copy_from_slice(&tinted);
        }
        out
    }

    /// Return `true` when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.size.width as usize) + (x as usize)) * 4
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
