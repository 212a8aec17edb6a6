mod background;
mod canvas_transform;
mod compositing;
mod raster;
mod uniform;

pub use background::{blit_scaled, fit_rect, limit_size, render_background};
pub use canvas_transform::ViewportTransform;
pub use compositing::{blend, destination_out, source_over};
pub use raster::{draw_polyline, fill_circle, fill_rect, stroke_ring};
pub use uniform::Uniforms;

/// Axis-aligned rectangle in whatever pixel space the caller works in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: [f32; 2]) -> bool {
        p[0] >= self.x && p[0] <= self.x + self.w && p[1] >= self.y && p[1] <= self.y + self.h
    }

    pub fn center(&self) -> [f32; 2] {
        [self.x + self.w * 0.5, self.y + self.h * 0.5]
    }

    pub fn inset(&self, by: f32) -> Rect {
        Rect::new(self.x + by, self.y + by, (self.w - 2.0 * by).max(0.0), (self.h - 2.0 * by).max(0.0))
    }
}
