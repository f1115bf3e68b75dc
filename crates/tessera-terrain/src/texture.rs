//! CPU-side RGBA textures synthesized from scalar and color grids.
//!
//! These are the images bound to a chunk's terrain surface: the biome
//! texture built from ground colors, and the height / temperature /
//! humidity views built from the raw fields.

use crate::color::Rgba;
use crate::grid::Grid;

/// A 2D texture stored as row-major RGBA bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    /// Length = `width * height * 4`.
    pixels: Vec<u8>,
}

impl Texture {
    /// Create a new transparent black texture with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    /// One texel per grid cell, copied from `colors`.
    pub fn from_color_grid(colors: &Grid<Rgba>) -> Self {
        let mut texture = Self::new(colors.width() as u32, colors.height() as u32);
        for (coord, &color) in colors.iter() {
            texture.set_pixel(coord.x as u32, coord.y as u32, color);
        }
        texture
    }

    /// Maps each scalar in `[0, 1]` onto the gradient `low -> high`.
    ///
    /// Values outside the unit range are clamped.
    pub fn from_scalar_grid(values: &Grid<f32>, low: Rgba, high: Rgba) -> Self {
        Self::from_color_grid(&values.map(|&v| low.lerp(high, v)))
    }

    /// Black-to-white view of a scalar grid.
    pub fn grayscale(values: &Grid<f32>) -> Self {
        Self::from_scalar_grid(values, Rgba::BLACK, Rgba::WHITE)
    }

    /// Set a single texel.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        let idx = ((y * self.width + x) * 4) as usize;
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Get a texel.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = ((y * self.width + x) * 4) as usize;
        Rgba {
            r: self.pixels[idx],
            g: self.pixels[idx + 1],
            b: self.pixels[idx + 2],
            a: self.pixels[idx + 3],
        }
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Count the number of unique colors (ignoring alpha).
    pub fn unique_color_count(&self) -> usize {
        let mut colors = std::collections::HashSet::new();
        for px in self.pixels.chunks_exact(4) {
            colors.insert((px[0], px[1], px[2]));
        }
        colors.len()
    }
}
