use crate::assets::{AssetKind, ImageSlot};
use crate::canvas::{
    Rect, ViewportTransform, blit_scaled, draw_polyline, fill_circle, fill_rect, stroke_ring,
};
use crate::drawing::CompositeMode;
use crate::spot::{SpotGame, Target};
use crate::ui::{self, Action, ButtonBar};
use image::{Rgba, RgbaImage};

const WIDTH: f32 = 528.0;
const PICTURE_W: f32 = 480.0;
const DEFAULT_ASPECT: f32 = 2.0 / 3.0;

const PAGE_BG: [u8; 4] = [0xFA, 0xFA, 0xFA, 255];
const COMPLETE_BG: [u8; 4] = [0xE8, 0xF5, 0xE9, 255];
const PLACEHOLDER: [u8; 4] = [0xE0, 0xE0, 0xE0, 255];
const TRACK: [u8; 4] = [0xF0, 0xF0, 0xF0, 255];
const TRACK_BORDER: [u8; 4] = [0xDD, 0xDD, 0xDD, 255];
const FOUND: [u8; 4] = [0x4C, 0xAF, 0x50, 255];
const FOUND_FILL: [u8; 4] = [0x4C, 0xAF, 0x50, 51];
const CHECK: [u8; 4] = [255, 255, 255, 255];
const HINT: [u8; 4] = [0xFF, 0x98, 0x00, 255];
const HINT_FILL: [u8; 4] = [0xFF, 0x98, 0x00, 26];

struct Layout {
    progress: Rect,
    top: Rect,
    bottom: Rect,
    controls: ButtonBar,
    footer: ButtonBar,
    size: (u32, u32),
}

impl Layout {
    fn new(top_aspect: f32, bottom_aspect: f32) -> Self {
        let x = (WIDTH - PICTURE_W) / 2.0;
        let progress = Rect::new(x, 24.0, PICTURE_W, 16.0);
        let top = Rect::new(x, progress.y + progress.h + 16.0, PICTURE_W, PICTURE_W * top_aspect);
        let bottom = Rect::new(x, top.y + top.h + 16.0, PICTURE_W, PICTURE_W * bottom_aspect);
        let controls = ui::spot_controls(WIDTH / 2.0, bottom.y + bottom.h + 16.0);
        let footer = ui::footer(WIDTH, controls.bottom() + 16.0);
        let height = footer.bottom() + 16.0;
        Self {
            progress,
            top,
            bottom,
            controls,
            footer,
            size: (WIDTH as u32, height.ceil() as u32),
        }
    }
}

fn aspect(slot: &ImageSlot) -> f32 {
    match slot.image() {
        Some(img) if img.width() > 0 => img.height() as f32 / img.width() as f32,
        _ => DEFAULT_ASPECT,
    }
}

/// Spot-the-difference page: two stacked pictures sharing one target list.
pub struct SpotPage {
    game: SpotGame,
    top: ImageSlot,
    bottom: ImageSlot,
    layout: Layout,
    hovered: Option<String>,
    dirty: bool,
}

impl SpotPage {
    pub fn new(targets: Vec<Target>) -> Self {
        Self {
            game: SpotGame::new(targets),
            top: ImageSlot::Pending,
            bottom: ImageSlot::Pending,
            layout: Layout::new(DEFAULT_ASPECT, DEFAULT_ASPECT),
            hovered: None,
            dirty: true,
        }
    }

    pub fn frame_size(&self) -> (u32, u32) {
        self.layout.size
    }

    pub fn set_picture(&mut self, kind: AssetKind, slot: ImageSlot) {
        match kind {
            AssetKind::SpotTop => self.top = slot,
            AssetKind::SpotBottom => self.bottom = slot,
            AssetKind::DrawingBackground => return,
        }
        // containers take the picture's aspect so percent positions line up
        self.layout = Layout::new(aspect(&self.top), aspect(&self.bottom));
        self.dirty = true;
    }

    /// Press at `frame_pos` (which is `screen_pos` seen through `transform`).
    ///
    /// Hit-testing runs in logical window pixels against the picture's
    /// on-screen bounds, so the tolerance radius tracks the rendered size
    /// but not the display's pixel density. `scale_factor` converts the
    /// physical `screen_pos` and transform into logical pixels.
    pub fn pointer_down(
        &mut self,
        frame_pos: [f32; 2],
        screen_pos: [f32; 2],
        transform: &ViewportTransform,
        scale_factor: f32,
    ) -> Option<Action> {
        let hit = self
            .layout
            .controls
            .handle_click(frame_pos)
            .or_else(|| self.layout.footer.handle_click(frame_pos));
        if hit.is_some() {
            return hit;
        }
        let k = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        for container in [self.layout.top, self.layout.bottom] {
            if container.contains(frame_pos) {
                let b = transform.rect_to_screen(container);
                let bounds = Rect::new(b.x / k, b.y / k, b.w / k, b.h / k);
                let position = [screen_pos[0] / k, screen_pos[1] / k];
                log::debug!("click at {:?} in {:?}", position, bounds);
                if !self.game.register_click(position, bounds).is_empty() {
                    self.dirty = true;
                }
                break;
            }
        }
        None
    }

    /// Track the button under the pointer. Returns true when it changed.
    pub fn hover(&mut self, frame_pos: [f32; 2]) -> bool {
        let tip = self
            .layout
            .controls
            .button_at(frame_pos)
            .or_else(|| self.layout.footer.button_at(frame_pos))
            .map(|b| b.tooltip());
        let changed = tip != self.hovered;
        self.hovered = tip;
        changed
    }

    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::ToggleHint => self.game.toggle_hint(),
            Action::Reset => {
                self.game.reset();
                log::info!("spot the difference reset");
            }
            _ => return false,
        }
        self.dirty = true;
        true
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    pub fn compose_frame(&mut self) -> RgbaImage {
        let (w, h) = self.layout.size;
        let bg = if self.game.is_complete() { COMPLETE_BG } else { PAGE_BG };
        let mut frame = RgbaImage::from_pixel(w, h, Rgba(bg));

        let bar = self.layout.progress;
        fill_rect(&mut frame, bar.inset(-2.0), TRACK_BORDER);
        fill_rect(&mut frame, bar, TRACK);
        let filled = Rect::new(bar.x, bar.y, bar.w * self.game.progress(), bar.h);
        fill_rect(&mut frame, filled, FOUND);
        if self.game.is_complete() {
            let [cx, cy] = bar.center();
            let check = [[cx - 8.0, cy], [cx - 2.0, cy + 5.0], [cx + 8.0, cy - 5.0]];
            draw_polyline(&mut frame, &check, 3.0, CompositeMode::SourceOver, CHECK);
        }

        for (rect, slot) in [(self.layout.top, &self.top), (self.layout.bottom, &self.bottom)] {
            match slot.image() {
                Some(img) => blit_scaled(&mut frame, img, rect),
                None => fill_rect(&mut frame, rect, PLACEHOLDER),
            }
            self.paint_markers(&mut frame, rect);
        }

        ui::paint_bar(&mut frame, &self.layout.controls, |a| {
            a == Action::ToggleHint && self.game.show_hint()
        });
        ui::paint_bar(&mut frame, &self.layout.footer, |_| false);

        self.dirty = false;
        frame
    }

    fn paint_markers(&self, frame: &mut RgbaImage, rect: Rect) {
        let at = |t: &Target| [rect.x + t.x / 100.0 * rect.w, rect.y + t.y / 100.0 * rect.h];
        if self.game.show_hint() {
            for t in self.game.targets() {
                fill_circle(frame, at(t), 15.0, HINT_FILL);
                stroke_ring(frame, at(t), 15.0, 2.0, HINT, Some(10));
            }
        }
        for t in self.game.found_targets() {
            fill_circle(frame, at(t), 20.0, FOUND_FILL);
            stroke_ring(frame, at(t), 20.0, 3.0, FOUND, None);
        }
    }

    pub fn title(&self) -> String {
        let total = self.game.targets().len();
        let title = if self.game.is_complete() {
            format!("Spot the Difference: you found all {total} differences!")
        } else {
            format!(
                "Spot the Difference: {} of {} found",
                self.game.found_count(),
                total
            )
        };
        match &self.hovered {
            Some(tip) => format!("{title} | {tip}"),
            None => title,
        }
    }

    pub fn game(&self) -> &SpotGame {
        &self.game
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spot::default_targets;

    fn at(rect: Rect, x: f32, y: f32) -> [f32; 2] {
        [rect.x + x / 100.0 * rect.w, rect.y + y / 100.0 * rect.h]
    }

    #[test]
    fn clicks_on_either_picture_find_targets() {
        let mut page = SpotPage::new(default_targets());
        let t = ViewportTransform::new();
        let top = page.layout.top;
        let bottom = page.layout.bottom;

        let p = at(top, 64.7, 9.7);
        assert_eq!(page.pointer_down(p, p, &t, 1.0), None);
        let p = at(bottom, 51.7, 40.5);
        page.pointer_down(p, p, &t, 1.0);

        assert!(page.game().is_found(1));
        assert!(page.game().is_found(2));
        assert_eq!(page.game().found_count(), 2);
        assert!(page.title().contains("2 of 6"));
    }

    #[test]
    fn scaled_window_uses_on_screen_bounds() {
        let mut page = SpotPage::new(default_targets());
        let (fw, fh) = page.frame_size();
        let t = ViewportTransform::fit((fw, fh), (fw * 2, fh * 2));
        let target = at(page.layout.top, 64.7, 9.7);
        // 20 frame px off is 40 of 960 screen px (4.2%); 25px of the 640px
        // short side is 3.9%. Unscaled the same offset would still hit.
        let off = [target[0] + 20.0, target[1]];
        page.pointer_down(off, t.frame_to_screen(off), &t, 1.0);
        assert_eq!(page.game().found_count(), 0);
        page.pointer_down(target, t.frame_to_screen(target), &t, 1.0);
        assert!(page.game().is_found(1));
    }

    #[test]
    fn pixel_density_does_not_shrink_tolerance() {
        // a 2x display reports the unscaled layout at twice the pixels
        let mut page = SpotPage::new(default_targets());
        let (fw, fh) = page.frame_size();
        let t = ViewportTransform::fit((fw, fh), (fw * 2, fh * 2));
        let target = at(page.layout.top, 64.7, 9.7);
        let off = [target[0] + 20.0, target[1]];
        page.pointer_down(off, t.frame_to_screen(off), &t, 2.0);
        assert!(page.game().is_found(1));
    }

    #[test]
    fn reset_button_clears_progress() {
        let mut page = SpotPage::new(default_targets());
        let t = ViewportTransform::new();
        let p = at(page.layout.top, 7.5, 54.2);
        page.pointer_down(p, p, &t, 1.0);
        assert_eq!(page.game().found_count(), 1);

        let reset = page.layout.controls.buttons()[1].rect.center();
        let action = page.pointer_down(reset, reset, &t, 1.0);
        assert_eq!(action, Some(Action::Reset));
        assert!(page.apply(Action::Reset));
        assert_eq!(page.game().progress(), 0.0);
    }

    #[test]
    fn hovering_hint_names_its_key() {
        let mut page = SpotPage::new(default_targets());
        let hint = page.layout.controls.buttons()[0].rect.center();
        assert!(page.hover(hint));
        assert!(page.title().ends_with("| Show Hints (H)"));
    }

    #[test]
    fn picture_arrival_resizes_containers() {
        let mut page = SpotPage::new(default_targets());
        let before = page.layout.top.h;
        page.set_picture(AssetKind::SpotTop, ImageSlot::Ready(RgbaImage::new(400, 400)));
        assert_eq!(page.layout.top.h, PICTURE_W);
        assert!(page.layout.top.h > before);
        assert!(page.layout.bottom.y > page.layout.top.y + page.layout.top.h);
        assert!(page.needs_redraw());
    }

    #[test]
    fn completed_frame_is_tinted_and_full() {
        let mut page = SpotPage::new(vec![Target {
            id: 1,
            x: 50.0,
            y: 50.0,
            tolerance: 25.0,
            label: "only".into(),
        }]);
        let t = ViewportTransform::new();
        let p = at(page.layout.top, 50.0, 50.0);
        page.pointer_down(p, p, &t, 1.0);
        let frame = page.compose_frame();
        assert_eq!(frame.get_pixel(2, 2).0, COMPLETE_BG);
        let bar = page.layout.progress;
        let end = frame.get_pixel((bar.x + bar.w - 2.0) as u32, (bar.y + 4.0) as u32);
        assert_eq!(end.0, FOUND);
        assert!(page.title().contains("all 1"));
    }
}
