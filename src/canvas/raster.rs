use super::Rect;
use super::compositing::{blend, source_over};
use crate::drawing::CompositeMode;
use image::RgbaImage;

/// Per-pixel coverage of a shape, limited to the shape's clipped bounding box.
struct CoverageMask {
    x0: u32,
    y0: u32,
    w: u32,
    h: u32,
    cov: Vec<f32>,
}

impl CoverageMask {
    fn around(points: &[[f32; 2]], pad: f32, surface_w: u32, surface_h: u32) -> Option<Self> {
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for p in points {
            min_x = min_x.min(p[0]);
            min_y = min_y.min(p[1]);
            max_x = max_x.max(p[0]);
            max_y = max_y.max(p[1]);
        }
        let x0 = (min_x - pad).floor().max(0.0);
        let y0 = (min_y - pad).floor().max(0.0);
        let x1 = (max_x + pad).ceil().min(surface_w as f32);
        let y1 = (max_y + pad).ceil().min(surface_h as f32);
        if !(x1 > x0 && y1 > y0) {
            return None;
        }
        let (x0, y0) = (x0 as u32, y0 as u32);
        let (w, h) = (x1 as u32 - x0, y1 as u32 - y0);
        Some(Self {
            x0,
            y0,
            w,
            h,
            cov: vec![0.0; (w * h) as usize],
        })
    }

    /// Union in one round-capped segment of half-width `r`.
    fn add_segment(&mut self, a: [f32; 2], b: [f32; 2], r: f32) {
        let pad = r + 1.0;
        let lo_x = ((a[0].min(b[0]) - pad).floor() as i64).max(self.x0 as i64);
        let lo_y = ((a[1].min(b[1]) - pad).floor() as i64).max(self.y0 as i64);
        let hi_x = ((a[0].max(b[0]) + pad).ceil() as i64).min((self.x0 + self.w) as i64);
        let hi_y = ((a[1].max(b[1]) + pad).ceil() as i64).min((self.y0 + self.h) as i64);

        let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
        let len_sq = dx * dx + dy * dy;
        for py in lo_y..hi_y {
            for px in lo_x..hi_x {
                let cx = px as f32 + 0.5;
                let cy = py as f32 + 0.5;
                let t = if len_sq > 0.0 {
                    (((cx - a[0]) * dx + (cy - a[1]) * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let ex = cx - (a[0] + t * dx);
                let ey = cy - (a[1] + t * dy);
                let d = (ex * ex + ey * ey).sqrt();
                let c = (r + 0.5 - d).clamp(0.0, 1.0);
                if c > 0.0 {
                    let idx = ((py as u32 - self.y0) * self.w + (px as u32 - self.x0)) as usize;
                    if c > self.cov[idx] {
                        self.cov[idx] = c;
                    }
                }
            }
        }
    }

    fn apply(&self, surface: &mut RgbaImage, mode: CompositeMode, color: [u8; 4]) {
        for y in 0..self.h {
            for x in 0..self.w {
                let c = self.cov[(y * self.w + x) as usize];
                if c > 0.0 {
                    let px = surface.get_pixel_mut(self.x0 + x, self.y0 + y);
                    blend(px, mode, color, c);
                }
            }
        }
    }
}

/// Stroke a connected polyline with round caps and joins as a single path,
/// so overlapping segments of the same line never blend twice.
///
/// A lone point has no segment and paints nothing.
pub fn draw_polyline(
    surface: &mut RgbaImage,
    points: &[[f32; 2]],
    width: f32,
    mode: CompositeMode,
    color: [u8; 4],
) {
    if points.len() < 2 || width <= 0.0 {
        return;
    }
    let r = width * 0.5;
    let (sw, sh) = surface.dimensions();
    let Some(mut mask) = CoverageMask::around(points, r + 1.0, sw, sh) else {
        return;
    };
    for pair in points.windows(2) {
        mask.add_segment(pair[0], pair[1], r);
    }
    mask.apply(surface, mode, color);
}

pub fn fill_circle(surface: &mut RgbaImage, center: [f32; 2], radius: f32, color: [u8; 4]) {
    draw_polyline(
        surface,
        &[center, center],
        radius * 2.0,
        CompositeMode::SourceOver,
        color,
    );
}

/// Circle outline. With `dashes = Some(n)` the ring is cut into `n` dashes.
pub fn stroke_ring(
    surface: &mut RgbaImage,
    center: [f32; 2],
    radius: f32,
    thickness: f32,
    color: [u8; 4],
    dashes: Option<u32>,
) {
    let (sw, sh) = surface.dimensions();
    let half = thickness * 0.5;
    let Some(mask) = CoverageMask::around(&[center], radius + half + 1.0, sw, sh) else {
        return;
    };
    for y in 0..mask.h {
        for x in 0..mask.w {
            let px = (mask.x0 + x) as f32 + 0.5 - center[0];
            let py = (mask.y0 + y) as f32 + 0.5 - center[1];
            let d = (px * px + py * py).sqrt();
            let c = (half + 0.5 - (d - radius).abs()).clamp(0.0, 1.0);
            if c <= 0.0 {
                continue;
            }
            if let Some(n) = dashes {
                let turn = (py.atan2(px) / std::f32::consts::TAU).rem_euclid(1.0);
                if ((turn * n as f32 * 2.0) as u32) % 2 == 1 {
                    continue;
                }
            }
            let target = surface.get_pixel_mut(mask.x0 + x, mask.y0 + y);
            source_over(target, color, c);
        }
    }
}

pub fn fill_rect(surface: &mut RgbaImage, rect: Rect, color: [u8; 4]) {
    let (sw, sh) = surface.dimensions();
    let x0 = rect.x.round().max(0.0) as u32;
    let y0 = rect.y.round().max(0.0) as u32;
    let x1 = ((rect.x + rect.w).round().max(0.0) as u32).min(sw);
    let y1 = ((rect.y + rect.h).round().max(0.0) as u32).min(sh);
    for y in y0..y1 {
        for x in x0..x1 {
            source_over(surface.get_pixel_mut(x, y), color, 1.0);
        }
    }
}
