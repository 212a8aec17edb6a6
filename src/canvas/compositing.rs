use crate::drawing::CompositeMode;
use image::Rgba;

/// Paint `color`, scaled by `coverage`, over `dst`.
pub fn source_over(dst: &mut Rgba<u8>, color: [u8; 4], coverage: f32) {
    let sa = color[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let keep = da * (1.0 - sa);
    for c in 0..3 {
        let v = (color[c] as f32 * sa + dst[c] as f32 * keep) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Remove existing alpha wherever an opaque source covers the pixel.
pub fn destination_out(dst: &mut Rgba<u8>, coverage: f32) {
    let sa = coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let out_a = (dst[3] as f32 * (1.0 - sa)).round() as u8;
    if out_a == 0 {
        *dst = Rgba([0, 0, 0, 0]);
    } else {
        dst[3] = out_a;
    }
}

pub fn blend(dst: &mut Rgba<u8>, mode: CompositeMode, color: [u8; 4], coverage: f32) {
    match mode {
        CompositeMode::SourceOver => source_over(dst, color, coverage),
        CompositeMode::DestinationOut => destination_out(dst, coverage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_source_over_replaces_pixel() {
        let mut px = Rgba([10, 20, 30, 255]);
        source_over(&mut px, [200, 100, 50, 255], 1.0);
        assert_eq!(px, Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn partial_coverage_on_transparent_keeps_color() {
        let mut px = Rgba([0, 0, 0, 0]);
        source_over(&mut px, [200, 100, 50, 255], 0.5);
        assert_eq!(px, Rgba([200, 100, 50, 128]));
    }

    #[test]
    fn half_coverage_mixes_with_opaque_destination() {
        let mut px = Rgba([0, 0, 0, 255]);
        source_over(&mut px, [200, 200, 200, 255], 0.5);
        assert_eq!(px, Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn destination_out_clears_fully_covered_pixels() {
        let mut px = Rgba([34, 34, 34, 255]);
        destination_out(&mut px, 1.0);
        assert_eq!(px, Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn destination_out_thins_partially_covered_pixels() {
        let mut px = Rgba([34, 34, 34, 200]);
        destination_out(&mut px, 0.5);
        assert_eq!(px, Rgba([34, 34, 34, 100]));
    }

    #[test]
    fn zero_coverage_leaves_pixel_alone() {
        let mut px = Rgba([1, 2, 3, 4]);
        blend(&mut px, CompositeMode::SourceOver, [255, 255, 255, 255], 0.0);
        blend(&mut px, CompositeMode::DestinationOut, [0, 0, 0, 255], 0.0);
        assert_eq!(px, Rgba([1, 2, 3, 4]));
    }
}
