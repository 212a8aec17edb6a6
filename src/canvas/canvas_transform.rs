use super::Rect;

/// Letterbox mapping between window pixels and page-frame pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub offset: [f32; 2],
    pub scale: f32,
}

impl ViewportTransform {
    pub fn new() -> Self {
        Self {
            offset: [0.0, 0.0],
            scale: 1.0,
        }
    }

    /// Fit a frame of `frame` size into `window`, keeping its aspect ratio.
    pub fn fit(frame: (u32, u32), window: (u32, u32)) -> Self {
        if frame.0 == 0 || frame.1 == 0 || window.0 == 0 || window.1 == 0 {
            return Self::new();
        }
        let (fw, fh) = (frame.0 as f32, frame.1 as f32);
        let (ww, wh) = (window.0 as f32, window.1 as f32);
        let scale = (ww / fw).min(wh / fh);
        Self {
            offset: [(ww - fw * scale) / 2.0, (wh - fh * scale) / 2.0],
            scale,
        }
    }

    pub fn screen_to_frame(&self, screen_pos: [f32; 2]) -> [f32; 2] {
        [
            (screen_pos[0] - self.offset[0]) / self.scale,
            (screen_pos[1] - self.offset[1]) / self.scale,
        ]
    }

    pub fn frame_to_screen(&self, frame_pos: [f32; 2]) -> [f32; 2] {
        [
            frame_pos[0] * self.scale + self.offset[0],
            frame_pos[1] * self.scale + self.offset[1],
        ]
    }

    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        let [x, y] = self.frame_to_screen([rect.x, rect.y]);
        Rect::new(x, y, rect.w * self.scale, rect.h * self.scale)
    }
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_window_centers_frame_horizontally() {
        let t = ViewportTransform::fit((100, 50), (400, 100));
        assert_eq!(t.scale, 2.0);
        assert_eq!(t.offset, [100.0, 0.0]);
        assert_eq!(t.screen_to_frame([100.0, 0.0]), [0.0, 0.0]);
        assert_eq!(t.screen_to_frame([300.0, 100.0]), [100.0, 50.0]);
    }

    #[test]
    fn round_trips_points() {
        let t = ViewportTransform::fit((588, 470), (1280, 720));
        let p = [123.0, 45.0];
        let back = t.screen_to_frame(t.frame_to_screen(p));
        assert!((back[0] - p[0]).abs() < 1e-3 && (back[1] - p[1]).abs() < 1e-3);
    }

    #[test]
    fn rect_scales_with_window() {
        let t = ViewportTransform::fit((100, 100), (200, 200));
        assert_eq!(t.rect_to_screen(Rect::new(10.0, 20.0, 30.0, 40.0)), Rect::new(20.0, 40.0, 60.0, 80.0));
    }

    #[test]
    fn degenerate_window_is_identity() {
        assert_eq!(ViewportTransform::fit((100, 100), (0, 0)), ViewportTransform::new());
    }
}
