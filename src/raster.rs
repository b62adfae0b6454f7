//! CPU rasterization into an RGBA8 buffer.
//!
//! Used to render fields headlessly and to write PNG snapshots. Shapes are
//! anti-aliased by a one-pixel coverage ramp and composited source-over with
//! straight (non-premultiplied) alpha.

use std::path::Path;

use glam::Vec2;
use image::RgbaImage;

use crate::color::{Rgb, Rgba};
use crate::config::FieldConfig;
use crate::error::SnapshotError;
use crate::field::ParticleField;
use crate::scheduler::ManualScheduler;
use crate::surface::Surface;

/// A pixel buffer that implements [`Surface`].
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    background: Option<Rgb>,
}

impl RasterSurface {
    /// A transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            background: None,
        }
    }

    /// Clear to an opaque color instead of transparent.
    pub fn with_background(mut self, color: Rgb) -> Self {
        self.background = Some(color);
        self.clear();
        self
    }

    /// Resize and clear.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize * 4];
        self.clear();
    }

    /// Raw RGBA8 rows, top to bottom.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    pub fn to_image(&self) -> Result<RgbaImage, SnapshotError> {
        let expected = self.width as usize * self.height as usize * 4;
        let actual = self.pixels.len();
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or(SnapshotError::BufferSize { expected, actual })
    }

    /// Write the surface as a PNG (format picked from the extension).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        self.to_image()?.save(path)?;
        Ok(())
    }

    /// Composite `color` at `coverage` over pixel `(x, y)`.
    fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let src_a = color.alpha * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }

        let i = (y as usize * self.width as usize + x as usize) * 4;
        let dst_a = self.pixels[i + 3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let src = [color.rgb.r, color.rgb.g, color.rgb.b];
        for c in 0..3 {
            let s = src[c] as f32;
            let d = self.pixels[i + c] as f32;
            let v = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
            self.pixels[i + c] = v.round().clamp(0.0, 255.0) as u8;
        }
        self.pixels[i + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Visit every pixel whose center lies in the box, passing its center.
    fn for_each_in_box(&mut self, min: Vec2, max: Vec2, mut f: impl FnMut(&mut Self, i64, i64, Vec2)) {
        let x0 = (min.x.floor() as i64).max(0);
        let y0 = (min.y.floor() as i64).max(0);
        let x1 = (max.x.ceil() as i64).min(self.width as i64 - 1);
        let y1 = (max.y.ceil() as i64).min(self.height as i64 - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                f(self, x, y, center);
            }
        }
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        match self.background {
            Some(bg) => {
                for px in self.pixels.chunks_exact_mut(4) {
                    px.copy_from_slice(&[bg.r, bg.g, bg.b, 255]);
                }
            }
            None => self.pixels.fill(0),
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let reach = Vec2::splat(radius + 1.0);
        self.for_each_in_box(center - reach, center + reach, |s, x, y, p| {
            let coverage = radius + 0.5 - p.distance(center);
            s.blend(x, y, color, coverage);
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let half = width * 0.5;
        let reach = Vec2::splat(half + 1.0);
        let segment = to - from;
        let length_sq = segment.length_squared();
        self.for_each_in_box(from.min(to) - reach, from.max(to) + reach, |s, x, y, p| {
            let t = if length_sq > 0.0 {
                ((p - from).dot(segment) / length_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let distance = p.distance(from + segment * t);
            s.blend(x, y, color, half + 0.5 - distance);
        });
    }
}

/// Run a field headlessly for `frames` frames and return the last image.
///
/// Autonomous fields run through a [`ManualScheduler`]; interactive ones are
/// advanced directly, with no pointer.
pub fn render_snapshot(
    config: FieldConfig,
    width: u32,
    height: u32,
    frames: u32,
    background: Option<Rgb>,
) -> RasterSurface {
    let mut surface = RasterSurface::new(width, height);
    if let Some(bg) = background {
        surface = surface.with_background(bg);
    }

    let mut field = ParticleField::new(config);
    let mut scheduler = ManualScheduler::new();
    field.initialize(width as f32, height as f32);
    field.start(&mut scheduler);

    for _ in 0..frames {
        if field.config().interactive {
            field.advance(&mut surface);
        } else {
            for handle in scheduler.tick() {
                field.on_frame(handle, &mut surface, &mut scheduler);
            }
        }
    }
    if frames == 0 {
        field.render(&mut surface);
    }

    field.teardown(&mut scheduler);
    surface
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_transparent() {
        let surface = RasterSurface::new(4, 4);
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn test_circle_covers_center() {
        let mut surface = RasterSurface::new(20, 20);
        surface.fill_circle(Vec2::new(10.0, 10.0), 3.0, Rgb::WHITE.with_alpha(1.0));
        let center = surface.pixel(10, 10).unwrap();
        assert_eq!(center, [255, 255, 255, 255]);
        assert_eq!(surface.pixel(0, 0).unwrap()[3], 0);
    }

    #[test]
    fn test_partial_alpha() {
        let mut surface = RasterSurface::new(20, 20);
        surface.fill_circle(Vec2::new(10.0, 10.0), 4.0, Rgb::BLUE.with_alpha(0.5));
        let px = surface.pixel(10, 10).unwrap();
        assert_eq!(&px[..3], &[0x3b, 0x82, 0xf6]);
        assert!((px[3] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_line_and_clear() {
        let mut surface = RasterSurface::new(20, 20);
        surface.stroke_line(Vec2::new(0.0, 10.5), Vec2::new(20.0, 10.5), 1.0, Rgb::WHITE.with_alpha(1.0));
        assert!(surface.pixel(5, 10).unwrap()[3] > 200);
        assert_eq!(surface.pixel(5, 2).unwrap()[3], 0);

        surface.clear();
        assert!(surface.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_background() {
        let surface = RasterSurface::new(2, 2).with_background(Rgb::new(1, 2, 3));
        assert_eq!(surface.pixel(1, 1), Some([1, 2, 3, 255]));
    }

    #[test]
    fn test_render_snapshot_draws_particles() {
        let config = FieldConfig::default()
            .with_particle_count(5)
            .with_interactive(false)
            .with_seed(11);
        let surface = render_snapshot(config, 64, 48, 3, None);
        assert_eq!(surface.size(), (64, 48));
        assert!(surface.pixels().chunks_exact(4).any(|px| px[3] > 0));
    }

    #[test]
    fn test_to_image_dimensions() {
        let surface = RasterSurface::new(8, 5);
        let img = surface.to_image().unwrap();
        assert_eq!(img.dimensions(), (8, 5));
    }
}
