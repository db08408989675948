//! The square raster particles are drawn onto.
//!
//! [`Surface`] is the drawing seam: the sketch only clears and fills
//! axis-aligned rectangles. [`Canvas`] implements it over an
//! [`image::RgbaImage`], blending each rectangle by its exact fractional
//! pixel coverage so sub-pixel squares still leave a faint mark.

use std::path::{Path, PathBuf};

use glam::DVec2;
use image::{DynamicImage, RgbaImage};
use tracing::info;

use crate::color::Color;
use crate::error::ExportError;

/// A square drawing target.
pub trait Surface {
    /// Side length in pixels.
    fn size(&self) -> u32;

    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: Color);

    /// Fill an axis-aligned rectangle centered on `center`.
    fn fill_rect(&mut self, center: DVec2, width: f64, height: f64, color: Color);

    /// Fill a square of side `side` centered on `center`.
    fn fill_square(&mut self, center: DVec2, side: f64, color: Color) {
        self.fill_rect(center, side, side, color);
    }
}

/// CPU raster backed by an RGBA8 image.
#[derive(Clone, Debug)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Create a `size` x `size` canvas cleared to opaque black.
    pub fn new(size: u32) -> Self {
        let mut canvas = Self {
            image: RgbaImage::new(size, size),
        };
        canvas.clear(Color::BLACK);
        canvas
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Color at pixel `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(|p| {
            let [r, g, b, a] = p.0;
            Color { r, g, b, a }
        })
    }

    /// Write the canvas to disk. The format follows the file extension.
    ///
    /// The canvas is always opaque, so it is flattened to RGB first; this lets
    /// JPEG output work alongside PNG.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        DynamicImage::ImageRgba8(self.image.clone())
            .to_rgb8()
            .save(path)?;
        info!(target: "canvas", path = %path.display(), "canvas exported");
        Ok(())
    }
}

/// Path for the `index`-th snapshot: `out.png` becomes `out-0003.png`.
pub fn numbered_path(base: &Path, index: u64) -> PathBuf {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("snapshot");
    let name = match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}-{index:04}.{ext}"),
        None => format!("{stem}-{index:04}.png"),
    };
    base.with_file_name(name)
}

impl Surface for Canvas {
    fn size(&self) -> u32 {
        self.image.width()
    }

    fn clear(&mut self, color: Color) {
        let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut *self.image);
        pixels.fill(color.to_array());
    }

    fn fill_rect(&mut self, center: DVec2, width: f64, height: f64, color: Color) {
        if !(width > 0.0 && height > 0.0) || !center.is_finite() {
            return;
        }
        let (w, h) = (self.image.width() as f64, self.image.height() as f64);
        let (x0, x1) = (center.x - width * 0.5, center.x + width * 0.5);
        let (y0, y1) = (center.y - height * 0.5, center.y + height * 0.5);
        if x1 <= 0.0 || y1 <= 0.0 || x0 >= w || y0 >= h {
            return;
        }

        let px_start = x0.max(0.0).floor() as u32;
        let px_end = x1.min(w).ceil() as u32;
        let py_start = y0.max(0.0).floor() as u32;
        let py_end = y1.min(h).ceil() as u32;

        for py in py_start..py_end {
            let top = py as f64;
            let cover_y = y1.min(top + 1.0) - y0.max(top);
            if cover_y <= 0.0 {
                continue;
            }
            for px in px_start..px_end {
                let left = px as f64;
                let cover_x = x1.min(left + 1.0) - x0.max(left);
                if cover_x <= 0.0 {
                    continue;
                }
                let pixel = self.image.get_pixel_mut(px, py);
                pixel.0 = color.blend_over(pixel.0, cover_x * cover_y);
            }
        }
    }
}
