use std::path::Path;

use anyhow::Context;

use crate::foundation::error::DisruptResult;
use crate::render::composite::{premultiply_rgba8_in_place, unpremultiply};
use crate::render::pixmap::Pixmap;

/// Decode encoded image bytes and convert to a premultiplied [`Pixmap`].
pub fn decode_image(bytes: &[u8]) -> DisruptResult<Pixmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Pixmap::from_premul(width, height, rgba8_premul)
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> DisruptResult<Pixmap> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

/// Write `pixmap` as a straight-alpha PNG.
pub fn save_png(pixmap: &Pixmap, path: &Path) -> DisruptResult<()> {
    let mut straight = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.data().chunks_exact(4) {
        straight.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
    }

    image::save_buffer_with_format(
        path,
        &straight,
        pixmap.width(),
        pixmap.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
