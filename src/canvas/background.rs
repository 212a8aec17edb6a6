use super::Rect;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Largest rect with the source aspect ratio that fits inside the
/// destination, centered.
pub fn fit_rect(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> Rect {
    if src_w == 0 || src_h == 0 {
        return Rect::default();
    }
    let scale = (dst_w as f32 / src_w as f32).min(dst_h as f32 / src_h as f32);
    let w = src_w as f32 * scale;
    let h = src_h as f32 * scale;
    Rect::new((dst_w as f32 - w) / 2.0, (dst_h as f32 - h) / 2.0, w, h)
}

/// Draw `image` resampled into `rect` of `target`, alpha-blended.
pub fn blit_scaled(target: &mut RgbaImage, image: &RgbaImage, rect: Rect) {
    let w = rect.w.round().max(1.0) as u32;
    let h = rect.h.round().max(1.0) as u32;
    if image.width() == 0 || image.height() == 0 {
        return;
    }
    if image.dimensions() == (w, h) {
        imageops::overlay(target, image, rect.x.round() as i64, rect.y.round() as i64);
    } else {
        let scaled = imageops::resize(image, w, h, FilterType::Triangle);
        imageops::overlay(target, &scaled, rect.x.round() as i64, rect.y.round() as i64);
    }
}

/// Shrink `image` so neither side exceeds `max`, keeping its aspect ratio.
/// Images already within the limit are returned untouched.
pub fn limit_size(image: RgbaImage, max: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let max = max.max(1);
    if w <= max && h <= max {
        return image;
    }
    let scale = max as f32 / w.max(h) as f32;
    let nw = ((w as f32 * scale).round() as u32).clamp(1, max);
    let nh = ((h as f32 * scale).round() as u32).clamp(1, max);
    imageops::resize(&image, nw, nh, FilterType::Triangle)
}

/// Rebuild the background surface: cleared, then the image (if it has
/// arrived) fitted and centered. Drawing never touches this surface.
pub fn render_background(surface: &mut RgbaImage, image: Option<&RgbaImage>) {
    for px in surface.pixels_mut() {
        *px = Rgba([0, 0, 0, 0]);
    }
    if let Some(image) = image {
        let (w, h) = surface.dimensions();
        let rect = fit_rect(image.width(), image.height(), w, h);
        blit_scaled(surface, image, rect);
    }
}
