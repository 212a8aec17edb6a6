use crate::canvas::draw_polyline;
use crate::drawing::{CompositeMode, Stroke};
use crate::stroke_log::StrokeLog;
use image::{Rgba, RgbaImage};

const ERASER_INK: [u8; 4] = [0, 0, 0, 255];

/// Clear `surface` and draw every stroke again, in log order.
///
/// Erase strokes only see what the pencil strokes before them left behind,
/// which is why this always starts from an empty surface.
pub fn replay(surface: &mut RgbaImage, strokes: &[Stroke]) {
    for px in surface.pixels_mut() {
        *px = Rgba([0, 0, 0, 0]);
    }
    for stroke in strokes {
        let Some(mode) = stroke.tool().composite_mode() else {
            continue;
        };
        let ink = match mode {
            CompositeMode::SourceOver => stroke.color().rgba(),
            CompositeMode::DestinationOut => ERASER_INK,
        };
        draw_polyline(surface, stroke.points(), stroke.width(), mode, ink);
    }
}

/// Owns the drawing surface and rebuilds it whenever the log revision moves.
pub struct StrokeRenderer {
    surface: RgbaImage,
    drawn_revision: Option<u64>,
}

impl StrokeRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: RgbaImage::new(width, height),
            drawn_revision: None,
        }
    }

    /// Returns true when the surface changed.
    pub fn sync(&mut self, log: &StrokeLog) -> bool {
        if self.drawn_revision == Some(log.revision()) {
            return false;
        }
        replay(&mut self.surface, log.strokes());
        self.drawn_revision = Some(log.revision());
        true
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{Color, Tool};

    fn stroke(log: &mut StrokeLog, tool: Tool, from: [f32; 2], to: [f32; 2]) {
        log.begin_stroke(tool, Color::BLACK, 6.0, from);
        log.extend_stroke([(from[0] + to[0]) / 2.0, (from[1] + to[1]) / 2.0]);
        log.extend_stroke(to);
        log.end_stroke();
    }

    #[test]
    fn undoing_eraser_restores_erased_pixels() {
        let mut log = StrokeLog::new();
        let mut renderer = StrokeRenderer::new(60, 40);

        stroke(&mut log, Tool::Pencil, [5.0, 10.0], [55.0, 10.0]);
        stroke(&mut log, Tool::Pencil, [5.0, 30.0], [55.0, 30.0]);
        renderer.sync(&log);
        let before_erase = renderer.surface().clone();
        assert_eq!(before_erase.get_pixel(30, 10)[3], 255);

        stroke(&mut log, Tool::Eraser, [30.0, 0.0], [30.0, 20.0]);
        renderer.sync(&log);
        assert_eq!(renderer.surface().get_pixel(30, 10)[3], 0);
        // the second pencil stroke is out of the eraser's reach
        assert_eq!(renderer.surface().get_pixel(30, 30)[3], 255);

        assert!(log.undo());
        assert!(renderer.sync(&log));
        assert_eq!(renderer.surface(), &before_erase);

        assert!(log.redo());
        renderer.sync(&log);
        assert_eq!(renderer.surface().get_pixel(30, 10)[3], 0);
    }

    #[test]
    fn pencil_after_eraser_paints_again() {
        let mut log = StrokeLog::new();
        let mut s = RgbaImage::new(40, 20);
        stroke(&mut log, Tool::Pencil, [0.0, 10.0], [40.0, 10.0]);
        stroke(&mut log, Tool::Eraser, [0.0, 10.0], [40.0, 10.0]);
        stroke(&mut log, Tool::Pencil, [20.0, 0.0], [20.0, 20.0]);
        replay(&mut s, log.strokes());
        assert_eq!(s.get_pixel(5, 10)[3], 0);
        assert_eq!(s.get_pixel(20, 10)[3], 255);
    }

    #[test]
    fn add_character_strokes_are_ignored() {
        let mut log = StrokeLog::new();
        let mut s = RgbaImage::new(20, 20);
        stroke(&mut log, Tool::AddCharacter, [0.0, 10.0], [20.0, 10.0]);
        replay(&mut s, log.strokes());
        assert!(s.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn sync_skips_unchanged_log() {
        let mut log = StrokeLog::new();
        let mut renderer = StrokeRenderer::new(10, 10);
        assert!(renderer.sync(&log));
        assert!(!renderer.sync(&log));
        stroke(&mut log, Tool::Pencil, [0.0, 5.0], [10.0, 5.0]);
        assert!(renderer.sync(&log));
    }

    #[test]
    fn clear_empties_surface() {
        let mut log = StrokeLog::new();
        let mut renderer = StrokeRenderer::new(10, 10);
        stroke(&mut log, Tool::Pencil, [0.0, 5.0], [10.0, 5.0]);
        renderer.sync(&log);
        log.clear();
        renderer.sync(&log);
        assert!(renderer.surface().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn pencil_uses_stroke_color() {
        let mut log = StrokeLog::new();
        let mut s = RgbaImage::new(20, 20);
        let red: Color = "#E53935".parse().unwrap();
        log.begin_stroke(Tool::Pencil, red, 6.0, [0.0, 10.0]);
        log.extend_stroke([20.0, 10.0]);
        log.end_stroke();
        replay(&mut s, log.strokes());
        assert_eq!(*s.get_pixel(10, 10), Rgba([0xE5, 0x39, 0x35, 255]));
    }
}
