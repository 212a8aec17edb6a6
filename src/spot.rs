use crate::canvas::Rect;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An authored point of interest, in percent of the picture, with a pixel
/// tolerance radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub tolerance: f32,
    #[serde(alias = "description")]
    pub label: String,
}

impl Target {
    fn new(id: u32, x: f32, y: f32, label: &str) -> Self {
        Self {
            id,
            x,
            y,
            tolerance: 25.0,
            label: label.to_string(),
        }
    }
}

/// The six differences between the two bundled pictures.
pub fn default_targets() -> Vec<Target> {
    vec![
        Target::new(1, 64.7, 9.7, "girl"),
        Target::new(2, 51.7, 40.5, "ball"),
        Target::new(3, 91.5, 93.3, "radio"),
        Target::new(4, 41.0, 54.6, "glasses"),
        Target::new(5, 24.5, 31.2, "boy"),
        Target::new(6, 7.5, 54.2, "wheels"),
    ]
}

pub fn parse_targets(json: &str) -> Result<Vec<Target>> {
    serde_json::from_str(json).context("parsing target list")
}

/// Map a position to percent (0..100 per axis) of `bounds`.
pub fn normalize(position: [f32; 2], bounds: Rect) -> [f32; 2] {
    [
        (position[0] - bounds.x) / bounds.w * 100.0,
        (position[1] - bounds.y) / bounds.h * 100.0,
    ]
}

/// Found-state of one spot-the-difference session.
#[derive(Debug, Clone)]
pub struct SpotGame {
    targets: Vec<Target>,
    found: BTreeSet<u32>,
    show_hint: bool,
}

impl SpotGame {
    pub fn new(targets: Vec<Target>) -> Self {
        Self {
            targets,
            found: BTreeSet::new(),
            show_hint: false,
        }
    }

    /// Find every unfound target whose tolerance zone contains the click.
    ///
    /// `position` and `bounds` share one pixel space. All overlapping
    /// targets qualify, not only the nearest. Returns the ids newly found.
    pub fn register_click(&mut self, position: [f32; 2], bounds: Rect) -> Vec<u32> {
        if self.is_complete() {
            return Vec::new();
        }
        let short_side = bounds.w.min(bounds.h);
        if !(short_side > 0.0) {
            return Vec::new();
        }
        let [x, y] = normalize(position, bounds);

        let mut hits = Vec::new();
        for target in &self.targets {
            if self.found.contains(&target.id) {
                continue;
            }
            let distance = ((x - target.x).powi(2) + (y - target.y).powi(2)).sqrt();
            let tolerance_percent = target.tolerance / short_side * 100.0;
            if distance <= tolerance_percent {
                hits.push(target.id);
            }
        }
        self.found.extend(hits.iter().copied());

        for id in &hits {
            if let Some(t) = self.target(*id) {
                log::info!("found difference {} ({})", t.id, t.label);
            }
        }
        if !hits.is_empty() && self.is_complete() {
            log::info!("all {} differences found", self.targets.len());
        }
        hits
    }

    pub fn reset(&mut self) {
        self.found.clear();
        self.show_hint = false;
    }

    pub fn toggle_hint(&mut self) {
        self.show_hint = !self.show_hint;
    }

    pub fn show_hint(&self) -> bool {
        self.show_hint
    }

    /// Fraction of targets found, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.targets.is_empty() {
            return 1.0;
        }
        self.found.len() as f32 / self.targets.len() as f32
    }

    pub fn is_complete(&self) -> bool {
        self.found.len() == self.targets.len()
    }

    pub fn is_found(&self, id: u32) -> bool {
        self.found.contains(&id)
    }

    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn found_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| self.found.contains(&t.id))
    }

    fn target(&self, id: u32) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single() -> SpotGame {
        SpotGame::new(vec![Target::new(1, 50.0, 50.0, "only")])
    }

    const BOX: Rect = Rect::new(0.0, 0.0, 200.0, 200.0);

    #[test]
    fn click_on_target_center_finds_it() {
        let mut game = single();
        assert_eq!(game.register_click([100.0, 100.0], BOX), vec![1]);
        assert!(game.is_found(1));
        assert!(game.is_complete());
    }

    #[test]
    fn far_click_misses() {
        let mut game = single();
        // (90%, 90%) is ~56.6% away; tolerance is 25 / 200 * 100 = 12.5%
        assert!(game.register_click([180.0, 180.0], BOX).is_empty());
        assert_eq!(game.found_count(), 0);
        assert_eq!(game.progress(), 0.0);
    }

    #[test]
    fn tolerance_edge_is_inclusive() {
        let mut game = single();
        // 12.5% right of center is exactly on the tolerance circle
        assert_eq!(game.register_click([125.0, 100.0], BOX), vec![1]);
    }

    #[test]
    fn position_is_relative_to_container_origin() {
        let mut game = single();
        let shifted = Rect::new(300.0, 40.0, 200.0, 200.0);
        assert!(game.register_click([100.0, 100.0], shifted).is_empty());
        assert_eq!(game.register_click([400.0, 140.0], shifted), vec![1]);
    }

    #[test]
    fn tolerance_follows_rendered_size() {
        // 5% off center is 10px in a 200px box but 50px in a 1000px one
        let mut small = single();
        assert_eq!(small.register_click([110.0, 100.0], BOX).len(), 1);
        let mut big = single();
        let large = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        assert!(big.register_click([550.0, 500.0], large).is_empty());
    }

    #[test]
    fn overlapping_targets_are_all_found_by_one_click() {
        let mut game = SpotGame::new(vec![
            Target::new(1, 50.0, 50.0, "a"),
            Target::new(2, 55.0, 50.0, "b"),
            Target::new(3, 90.0, 10.0, "c"),
        ]);
        let hits = game.register_click([105.0, 100.0], BOX);
        assert_eq!(hits, vec![1, 2]);
        assert_eq!(game.found_count(), 2);
        assert!(!game.is_complete());
    }

    #[test]
    fn found_targets_are_not_counted_twice() {
        let mut game = SpotGame::new(default_targets());
        let b = Rect::new(0.0, 0.0, 400.0, 300.0);
        assert_eq!(game.register_click([0.647 * 400.0, 0.097 * 300.0], b), vec![1]);
        assert!(game.register_click([0.647 * 400.0, 0.097 * 300.0], b).is_empty());
        assert_eq!(game.found_count(), 1);
    }

    #[test]
    fn progress_is_monotonic_and_completion_sticks() {
        let mut game = SpotGame::new(default_targets());
        let b = Rect::new(0.0, 0.0, 400.0, 300.0);
        let mut last = game.progress();
        let clicks: Vec<[f32; 2]> = default_targets()
            .iter()
            .map(|t| [t.x / 100.0 * b.w, t.y / 100.0 * b.h])
            .collect();
        for (i, click) in clicks.iter().enumerate() {
            game.register_click([200.0, 290.0], b);
            game.register_click(*click, b);
            let p = game.progress();
            assert!(p >= last);
            last = p;
            assert_eq!(game.is_complete(), i == clicks.len() - 1);
        }
        assert_eq!(game.progress(), 1.0);
        assert!(game.register_click(clicks[0], b).is_empty());
        assert!(game.is_complete());
    }

    #[test]
    fn reset_clears_found_and_hint() {
        let mut game = single();
        game.toggle_hint();
        game.register_click([100.0, 100.0], BOX);
        assert!(game.is_complete() && game.show_hint());

        game.reset();
        assert_eq!(game.progress(), 0.0);
        assert!(!game.is_complete());
        assert!(!game.show_hint());
        assert_eq!(game.register_click([100.0, 100.0], BOX), vec![1]);
    }

    #[test]
    fn degenerate_bounds_are_ignored() {
        let mut game = single();
        assert!(game.register_click([0.0, 0.0], Rect::new(0.0, 0.0, 0.0, 200.0)).is_empty());
        assert_eq!(game.found_count(), 0);
    }

    #[test]
    fn authored_json_uses_description_key() {
        let targets = parse_targets(
            r#"[{"id": 1, "x": 64.7, "y": 9.7, "tolerance": 25, "description": "girl"}]"#,
        )
        .unwrap();
        assert_eq!(targets[0].label, "girl");
        assert_eq!(targets[0].tolerance, 25.0);
    }

    #[test]
    fn empty_target_list_counts_as_complete() {
        let game = SpotGame::new(Vec::new());
        assert!(game.is_complete());
        assert_eq!(game.progress(), 1.0);
    }
}
