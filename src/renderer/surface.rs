//! Drawing targets for the minimap.
//!
//! The minimap composes its layers as a list of primitive draws and hands them
//! to an [`OverlaySurface`]. Two surfaces ship with the crate:
//!
//! - [`ImageSurface`]: a software rasterizer over an [`image::RgbaImage`],
//!   used for snapshots and tests
//! - [`RecordingSurface`]: records the draws and exposes line vertices ready
//!   for upload to a GPU vertex buffer

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use image::{Rgba, RgbaImage};

/// Linear RGBA color with components in `[0, 1]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba8(0, 0, 0, 0.0);
    pub const BLACK: Self = Self::rgba8(0, 0, 0, 1.0);

    /// Builds a color from 8-bit channels and a float alpha, like CSS `rgba()`.
    pub const fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    /// Opaque color from 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 1.0)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    fn to_rgba8(self) -> [u8; 4] {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        ]
    }
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }
}

/// A 2D drawing target.
pub trait OverlaySurface {
    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    /// Resizes the surface; contents are discarded.
    fn resize(&mut self, width: u32, height: u32);

    /// Clears every pixel to transparent.
    fn clear(&mut self);

    /// Fills a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Strokes a line segment.
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32);
}

/// Software rasterizer over an RGBA image.
#[derive(Debug, Clone)]
pub struct ImageSurface {
    image: RgbaImage,
}

impl ImageSurface {
    /// Creates a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// The underlying image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Pixel at `(x, y)` as RGBA bytes.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.image.width() && y < self.image.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    /// Composites `other` on top of this surface.
    pub fn overlay(&mut self, other: &ImageSurface) {
        image::imageops::overlay(&mut self.image, &other.image, 0, 0);
    }

    /// Writes the surface to an image file; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.image.save(path)
    }

    fn blend(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        let src = color.to_rgba8();
        let src_a = color.a.clamp(0.0, 1.0);
        let dst_a = pixel.0[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            *pixel = Rgba([0, 0, 0, 0]);
            return;
        }
        let mut out = [0u8; 4];
        for i in 0..3 {
            let s = src[i] as f32;
            let d = pixel.0[i] as f32;
            out[i] = ((s * src_a + d * dst_a * (1.0 - src_a)) / out_a).round() as u8;
        }
        out[3] = (out_a * 255.0).round() as u8;
        *pixel = Rgba(out);
    }
}

impl OverlaySurface for ImageSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let x0 = rect.x.round() as i64;
        let y0 = rect.y.round() as i64;
        let x1 = (rect.x + rect.width).round() as i64;
        let y1 = (rect.y + rect.height).round() as i64;
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color);
            }
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32) {
        // Sub-pixel widths fade the line instead of thinning it.
        let color = color.with_alpha(color.a * width.clamp(0.0, 1.0));
        let brush = width.round().max(1.0) as i64;
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let samples = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        let mut last = None;
        for i in 0..=samples {
            let t = i as f32 / samples as f32;
            let px = (from.0 + dx * t).floor() as i64;
            let py = (from.1 + dy * t).floor() as i64;
            if last == Some((px, py)) {
                continue;
            }
            last = Some((px, py));
            for oy in 0..brush {
                for ox in 0..brush {
                    self.blend(px + ox - brush / 2, py + oy - brush / 2, color);
                }
            }
        }
    }
}

/// One recorded draw.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect {
        rect: Rect,
        color: Color,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
        width: f32,
    },
}

/// Vertex layout for line lists, castable to bytes with [`bytemuck`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Records draws without rasterizing them.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Creates an empty recording surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Draws recorded since the last clear, including the clear itself.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded line segments as `(from, to)` pairs.
    pub fn lines(&self) -> impl Iterator<Item = ((f32, f32), (f32, f32))> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }

    /// Recorded lines as a line-list vertex buffer, two vertices per segment.
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Line {
                    from, to, color, ..
                } => Some((*from, *to, *color)),
                _ => None,
            })
            .flat_map(|(from, to, color)| {
                let color = [color.r, color.g, color.b, color.a];
                [
                    LineVertex {
                        position: [from.0, from.1],
                        color,
                    },
                    LineVertex {
                        position: [to.0, to.1],
                        color,
                    },
                ]
            })
            .collect()
    }
}

impl OverlaySurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_and_clear() {
        let mut surface = ImageSurface::new(8, 8);
        surface.fill_rect(Rect::new(2.0, 2.0, 4.0, 4.0), Color::rgb8(0x33, 0x33, 0x33));

        assert_eq!(surface.pixel(2, 2), Some([0x33, 0x33, 0x33, 255]));
        assert_eq!(surface.pixel(5, 5), Some([0x33, 0x33, 0x33, 255]));
        assert_eq!(surface.pixel(6, 6), Some([0, 0, 0, 0]));

        surface.clear();
        assert_eq!(surface.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_stroke_line_covers_endpoints() {
        let mut surface = ImageSurface::new(16, 16);
        surface.stroke_line((1.5, 1.5), (12.5, 1.5), Color::BLACK, 1.0);

        assert_eq!(surface.pixel(1, 1), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(12, 1), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(6, 1), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(6, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_drawing_outside_is_ignored() {
        let mut surface = ImageSurface::new(4, 4);
        surface.fill_rect(Rect::new(-10.0, -10.0, 5.0, 5.0), Color::BLACK);
        surface.stroke_line((-5.0, -5.0), (-1.0, -1.0), Color::BLACK, 1.0);
        assert!(surface.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_recorded_lines_cast_to_bytes() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.clear();
        surface.stroke_line((0.0, 0.0), (4.0, 2.0), Color::BLACK, 0.5);

        let vertices = surface.line_vertices();
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].position, [4.0, 2.0]);

        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 2 * std::mem::size_of::<LineVertex>());
        assert_eq!(std::mem::size_of::<LineVertex>(), 24);
    }
}
