use crate::drawing::{Color, Stroke, Tool};
use std::collections::VecDeque;

/// Ordered strokes plus a linear redo buffer.
///
/// While a gesture is open the last stroke is the only one that grows.
/// Every mutation bumps `revision`, which the replay renderer uses to know
/// when the surface has to be rebuilt.
#[derive(Debug, Default)]
pub struct StrokeLog {
    strokes: Vec<Stroke>,
    redo: VecDeque<Stroke>,
    open: bool,
    revision: u64,
}

impl StrokeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_stroke(&mut self, tool: Tool, color: Color, width: f32, point: [f32; 2]) {
        // a gesture still open here is simply superseded
        self.strokes.push(Stroke::new(tool, color, width, point));
        self.redo.clear();
        self.open = true;
        self.touch();
        log::debug!("stroke {} opened with {:?}", self.strokes.len(), tool);
    }

    pub fn extend_stroke(&mut self, point: [f32; 2]) -> bool {
        if !self.open {
            return false;
        }
        match self.strokes.last_mut() {
            Some(stroke) => {
                stroke.push(point);
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn end_stroke(&mut self) {
        if self.open {
            self.open = false;
            if let Some(stroke) = self.strokes.last() {
                log::debug!("stroke closed with {} points", stroke.points().len());
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        self.end_stroke();
        match self.strokes.pop() {
            Some(stroke) => {
                self.redo.push_front(stroke);
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.end_stroke();
        match self.redo.pop_front() {
            Some(stroke) => {
                self.strokes.push(stroke);
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.open = false;
        self.strokes.clear();
        self.redo.clear();
        self.touch();
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn redo_buffer(&self) -> impl Iterator<Item = &Stroke> {
        self.redo.iter()
    }

    pub fn can_undo(&self) -> bool {
        !self.strokes.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(log: &mut StrokeLog, tool: Tool, points: &[[f32; 2]]) {
        log.begin_stroke(tool, Color::BLACK, 4.0, points[0]);
        for &p in &points[1..] {
            log.extend_stroke(p);
        }
        log.end_stroke();
    }

    #[test]
    fn extend_without_open_stroke_is_noop() {
        let mut log = StrokeLog::new();
        assert!(!log.extend_stroke([1.0, 1.0]));
        assert!(log.strokes().is_empty());

        draw(&mut log, Tool::Pencil, &[[0.0, 0.0], [1.0, 1.0]]);
        assert!(!log.extend_stroke([9.0, 9.0]));
        assert_eq!(log.strokes()[0].points().len(), 2);
    }

    #[test]
    fn only_last_stroke_grows() {
        let mut log = StrokeLog::new();
        draw(&mut log, Tool::Pencil, &[[0.0, 0.0], [1.0, 0.0]]);
        log.begin_stroke(Tool::Pencil, Color::BLACK, 4.0, [5.0, 5.0]);
        log.extend_stroke([6.0, 5.0]);
        log.extend_stroke([7.0, 5.0]);
        assert_eq!(log.strokes()[0].points().len(), 2);
        assert_eq!(log.strokes()[1].points().len(), 3);
    }

    #[test]
    fn length_tracks_begins_undos_and_redos() {
        let mut log = StrokeLog::new();
        let mut expected: i64 = 0;
        let ops = ["b", "b", "u", "b", "u", "u", "u", "r", "b", "r", "u", "r"];
        for op in ops {
            match op {
                "b" => {
                    draw(&mut log, Tool::Pencil, &[[0.0, 0.0], [2.0, 2.0]]);
                    expected += 1;
                }
                "u" => {
                    if log.undo() {
                        expected -= 1;
                    }
                }
                _ => {
                    if log.redo() {
                        expected += 1;
                    }
                }
            }
            assert_eq!(log.strokes().len() as i64, expected.max(0));
        }
    }

    #[test]
    fn undo_then_redo_restores_identical_stroke() {
        let mut log = StrokeLog::new();
        draw(&mut log, Tool::Pencil, &[[0.0, 0.0], [3.0, 4.0], [5.0, 1.0]]);
        draw(&mut log, Tool::Eraser, &[[1.0, 1.0], [2.0, 2.0]]);
        let before = log.strokes().to_vec();

        assert!(log.undo());
        assert_eq!(log.strokes().len(), 1);
        assert!(log.redo());
        assert_eq!(log.strokes(), &before[..]);
        assert!(!log.can_redo());
    }

    #[test]
    fn undo_pushes_to_front_of_redo_buffer() {
        let mut log = StrokeLog::new();
        draw(&mut log, Tool::Pencil, &[[0.0, 0.0], [1.0, 0.0]]);
        draw(&mut log, Tool::Pencil, &[[0.0, 5.0], [1.0, 5.0]]);
        log.undo();
        log.undo();
        let firsts: Vec<[f32; 2]> = log.redo_buffer().map(|s| s.points()[0]).collect();
        assert_eq!(firsts, vec![[0.0, 0.0], [0.0, 5.0]]);

        log.redo();
        assert_eq!(log.strokes()[0].points()[0], [0.0, 0.0]);
    }

    #[test]
    fn new_stroke_discards_redo_history() {
        let mut log = StrokeLog::new();
        draw(&mut log, Tool::Pencil, &[[0.0, 0.0], [1.0, 0.0]]);
        log.undo();
        assert!(log.can_redo());
        draw(&mut log, Tool::Pencil, &[[2.0, 0.0], [3.0, 0.0]]);
        assert!(!log.can_redo());
        assert!(!log.redo());
    }

    #[test]
    fn undo_and_redo_on_empty_are_noops() {
        let mut log = StrokeLog::new();
        let rev = log.revision();
        assert!(!log.undo());
        assert!(!log.redo());
        assert_eq!(log.revision(), rev);
    }

    #[test]
    fn clear_empties_everything() {
        let mut log = StrokeLog::new();
        draw(&mut log, Tool::Pencil, &[[0.0, 0.0], [1.0, 0.0]]);
        draw(&mut log, Tool::Pencil, &[[0.0, 1.0], [1.0, 1.0]]);
        log.undo();
        log.begin_stroke(Tool::Pencil, Color::BLACK, 4.0, [0.0, 0.0]);
        log.clear();
        assert!(log.strokes().is_empty());
        assert!(!log.can_redo());
        assert!(!log.is_open());
        assert!(!log.extend_stroke([1.0, 1.0]));
    }

    #[test]
    fn undo_closes_open_gesture() {
        let mut log = StrokeLog::new();
        draw(&mut log, Tool::Pencil, &[[0.0, 0.0], [1.0, 0.0]]);
        log.begin_stroke(Tool::Pencil, Color::BLACK, 4.0, [5.0, 5.0]);
        assert!(log.undo());
        assert!(!log.is_open());
        assert!(!log.extend_stroke([6.0, 6.0]));
        assert_eq!(log.strokes()[0].points(), &[[0.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn every_mutation_bumps_revision() {
        let mut log = StrokeLog::new();
        let r0 = log.revision();
        log.begin_stroke(Tool::Pencil, Color::BLACK, 4.0, [0.0, 0.0]);
        let r1 = log.revision();
        log.extend_stroke([1.0, 1.0]);
        let r2 = log.revision();
        log.end_stroke();
        assert!(r0 != r1 && r1 != r2);
        assert_eq!(log.revision(), r2);
    }
}
