//! The 2D drawing surface a field renders into.
//!
//! Implementations:
//! - [`RecordingSurface`]: keeps the draw calls, for inspection
//! - [`RasterSurface`](crate::raster::RasterSurface): CPU pixels, PNG export
//! - [`GpuSurface`](crate::gpu::GpuSurface): wgpu, for a window

use glam::Vec2;

use crate::color::Rgba;

/// A raster canvas: clear, filled circles, stroked lines.
pub trait Surface {
    /// Current size in surface units (pixels).
    fn size(&self) -> (u32, u32);

    /// Erase everything to transparent.
    fn clear(&mut self);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
}

/// A surface that records draw calls instead of drawing them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Every command recorded so far, including earlier frames.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands issued since the most recent clear.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map(|i| i + 1)
            .unwrap_or(0);
        &self.commands[start..]
    }

    pub fn circle_count(&self) -> usize {
        self.last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    pub fn line_count(&self) -> usize {
        self.last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    /// Number of clears, i.e. frames rendered.
    pub fn frame_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_last_frame_starts_after_clear() {
        let mut surface = RecordingSurface::new(10, 10);
        let c = Rgb::WHITE.with_alpha(1.0);
        surface.clear();
        surface.fill_circle(Vec2::ZERO, 1.0, c);
        surface.clear();
        surface.fill_circle(Vec2::ONE, 1.0, c);
        surface.stroke_line(Vec2::ZERO, Vec2::ONE, 0.5, c);

        assert_eq!(surface.frame_count(), 2);
        assert_eq!(surface.last_frame().len(), 2);
        assert_eq!(surface.circle_count(), 1);
        assert_eq!(surface.line_count(), 1);
    }
}
