use crate::canvas::{Rect, draw_polyline, fill_circle, fill_rect, stroke_ring};
use crate::drawing::{Color, CompositeMode, Tool};
use image::RgbaImage;

pub const BUTTON_SIZE: f32 = 40.0;
const GAP: f32 = 8.0;
const SWATCH: f32 = 28.0;

const SELECTED_BG: [u8; 4] = [0x14, 0x8E, 0xFF, 255];
const BUTTON_BG: [u8; 4] = [0xF2, 0xF2, 0xF2, 255];
const ICON: [u8; 4] = [0x44, 0x44, 0x44, 255];
const ICON_DISABLED: [u8; 4] = [0xBB, 0xBB, 0xBB, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    SelectTool(Tool),
    Thinner,
    Thicker,
    PickColor(usize),
    Undo,
    Redo,
    Clear,
    Save,
    ToggleHint,
    Reset,
    PrevPage,
    NextPage,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::SelectTool(tool) => tool.label(),
            Action::Thinner => "Thinner",
            Action::Thicker => "Thicker",
            Action::PickColor(_) => "Color",
            Action::Undo => "Undo",
            Action::Redo => "Redo",
            Action::Clear => "Clear",
            Action::Save => "Save",
            Action::ToggleHint => "Show Hints",
            Action::Reset => "Reset Game",
            Action::PrevPage => "Previous",
            Action::NextPage => "Next",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Button {
    pub action: Action,
    pub rect: Rect,
    pub key_binding: &'static str,
}

impl Button {
    /// Label plus shortcut, e.g. "Undo (Ctrl+Z)".
    pub fn tooltip(&self) -> String {
        if self.key_binding.is_empty() {
            self.action.label().to_string()
        } else {
            format!("{} ({})", self.action.label(), self.key_binding)
        }
    }
}

/// A row of clickable buttons laid out in frame pixels.
#[derive(Debug, Clone, Default)]
pub struct ButtonBar {
    buttons: Vec<Button>,
}

impl ButtonBar {
    fn row(actions: &[(Action, &'static str)], center_x: f32, y: f32, size: [f32; 2], gap: f32) -> Self {
        let n = actions.len() as f32;
        let total = n * size[0] + (n - 1.0).max(0.0) * gap;
        let mut x = center_x - total / 2.0;
        let buttons = actions
            .iter()
            .map(|&(action, key_binding)| {
                let rect = Rect::new(x, y, size[0], size[1]);
                x += size[0] + gap;
                Button {
                    action,
                    rect,
                    key_binding,
                }
            })
            .collect();
        Self { buttons }
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn button_at(&self, mouse_pos: [f32; 2]) -> Option<&Button> {
        self.buttons.iter().find(|b| b.rect.contains(mouse_pos))
    }

    pub fn handle_click(&self, mouse_pos: [f32; 2]) -> Option<Action> {
        self.button_at(mouse_pos).map(|b| b.action)
    }

    pub fn bottom(&self) -> f32 {
        self.buttons
            .iter()
            .map(|b| b.rect.y + b.rect.h)
            .fold(0.0, f32::max)
    }
}

pub fn drawing_tools(center_x: f32, y: f32) -> ButtonBar {
    ButtonBar::row(
        &[
            (Action::SelectTool(Tool::Pencil), "P"),
            (Action::Thinner, "["),
            (Action::Thicker, "]"),
            (Action::SelectTool(Tool::AddCharacter), "A"),
            (Action::SelectTool(Tool::Eraser), "E"),
            (Action::Undo, "Ctrl+Z"),
            (Action::Redo, "Ctrl+Y"),
            (Action::Clear, "Delete"),
            (Action::Save, "Ctrl+S"),
        ],
        center_x,
        y,
        [BUTTON_SIZE, BUTTON_SIZE],
        GAP,
    )
}

pub fn palette(center_x: f32, y: f32, colors: usize) -> ButtonBar {
    const KEYS: [&str; 9] = ["1", "2", "3", "4", "5", "6", "7", "8", "9"];
    let actions: Vec<(Action, &'static str)> = (0..colors)
        .map(|i| (Action::PickColor(i), KEYS.get(i).copied().unwrap_or("")))
        .collect();
    ButtonBar::row(&actions, center_x, y, [SWATCH, SWATCH], 12.0)
}

pub fn spot_controls(center_x: f32, y: f32) -> ButtonBar {
    ButtonBar::row(
        &[(Action::ToggleHint, "H"), (Action::Reset, "R")],
        center_x,
        y,
        [120.0, BUTTON_SIZE],
        16.0,
    )
}

/// Previous/next page arrows pinned to the frame edges.
pub fn footer(frame_width: f32, y: f32) -> ButtonBar {
    let size = [BUTTON_SIZE * 1.5, BUTTON_SIZE * 0.8];
    ButtonBar {
        buttons: vec![
            Button {
                action: Action::PrevPage,
                rect: Rect::new(24.0, y, size[0], size[1]),
                key_binding: "Left",
            },
            Button {
                action: Action::NextPage,
                rect: Rect::new(frame_width - 24.0 - size[0], y, size[0], size[1]),
                key_binding: "Right",
            },
        ],
    }
}

/// What the toolbar needs to know to draw its selected/disabled states.
pub struct ToolbarState<'a> {
    pub tool: Tool,
    pub color: Color,
    pub width: f32,
    pub palette: &'a [Color],
    pub can_undo: bool,
    pub can_redo: bool,
}

pub fn paint_tools(frame: &mut RgbaImage, bar: &ButtonBar, state: &ToolbarState<'_>) {
    for button in bar.buttons() {
        let (selected, enabled) = match button.action {
            Action::SelectTool(tool) => (tool == state.tool, true),
            Action::Undo => (false, state.can_undo),
            Action::Redo => (false, state.can_redo),
            _ => (false, true),
        };
        paint_button(frame, button, selected, enabled, state);
    }
}

pub fn paint_palette(frame: &mut RgbaImage, bar: &ButtonBar, state: &ToolbarState<'_>) {
    for button in bar.buttons() {
        let Action::PickColor(i) = button.action else {
            continue;
        };
        let Some(color) = state.palette.get(i) else {
            continue;
        };
        let c = button.rect.center();
        let r = button.rect.w * 0.5;
        if *color == state.color {
            stroke_ring(frame, c, r, 3.0, SELECTED_BG, None);
        }
        fill_circle(frame, c, r - 4.0, color.rgba());
    }
}

pub fn paint_bar(frame: &mut RgbaImage, bar: &ButtonBar, highlighted: impl Fn(Action) -> bool) {
    for button in bar.buttons() {
        let selected = highlighted(button.action);
        fill_rect(frame, button.rect, if selected { SELECTED_BG } else { BUTTON_BG });
        let ink = if selected { WHITE } else { ICON };
        paint_icon(frame, button.action, button.rect, ink, 4.0);
    }
}

fn paint_button(
    frame: &mut RgbaImage,
    button: &Button,
    selected: bool,
    enabled: bool,
    state: &ToolbarState<'_>,
) {
    fill_rect(frame, button.rect, if selected { SELECTED_BG } else { BUTTON_BG });
    let ink = match (selected, enabled) {
        (true, _) => WHITE,
        (false, true) => ICON,
        (false, false) => ICON_DISABLED,
    };
    let c = button.rect.center();
    match button.action {
        Action::Thinner | Action::Thicker => {
            let preview = state.width.clamp(6.0, 20.0) * 0.5;
            let step = if button.action == Action::Thinner { -2.0 } else { 2.0 };
            fill_circle(frame, c, (preview + step).clamp(2.0, 12.0), state.color.rgba());
        }
        action => paint_icon(frame, action, button.rect, ink, 3.0),
    }
}

/// Tiny line-art icons, drawn with the same rasterizer as the strokes.
fn paint_icon(frame: &mut RgbaImage, action: Action, rect: Rect, ink: [u8; 4], line: f32) {
    let [cx, cy] = rect.center();
    let s = rect.w.min(rect.h) * 0.25;
    if action == Action::ToggleHint {
        stroke_ring(frame, [cx, cy], s, line * 0.7, ink, Some(6));
        return;
    }
    let mut lines = |points: &[[f32; 2]]| {
        draw_polyline(frame, points, line, CompositeMode::SourceOver, ink);
    };
    match action {
        Action::SelectTool(Tool::Pencil) => {
            lines(&[[cx - s, cy + s], [cx + s, cy - s]]);
            lines(&[[cx - s, cy + s], [cx - s * 0.6, cy + s * 0.2]]);
        }
        Action::SelectTool(Tool::Eraser) => {
            lines(&[
                [cx - s, cy - s * 0.5],
                [cx + s, cy - s * 0.5],
                [cx + s, cy + s * 0.5],
                [cx - s, cy + s * 0.5],
                [cx - s, cy - s * 0.5],
            ]);
        }
        Action::SelectTool(Tool::AddCharacter) => {
            for dx in [-s, 0.0, s] {
                lines(&[[cx + dx, cy - s * 0.3], [cx + dx, cy - s * 0.3]]);
                lines(&[[cx + dx - s * 0.4, cy + s], [cx + dx, cy + s * 0.3], [cx + dx + s * 0.4, cy + s]]);
            }
        }
        Action::Undo | Action::PrevPage => {
            lines(&[[cx + s, cy], [cx - s, cy]]);
            lines(&[[cx - s * 0.3, cy - s * 0.7], [cx - s, cy], [cx - s * 0.3, cy + s * 0.7]]);
        }
        Action::Redo | Action::NextPage => {
            lines(&[[cx - s, cy], [cx + s, cy]]);
            lines(&[[cx + s * 0.3, cy - s * 0.7], [cx + s, cy], [cx + s * 0.3, cy + s * 0.7]]);
        }
        Action::Clear | Action::Reset => {
            lines(&[[cx - s, cy - s], [cx + s, cy + s]]);
            lines(&[[cx - s, cy + s], [cx + s, cy - s]]);
        }
        Action::Save => {
            lines(&[[cx, cy - s], [cx, cy + s * 0.4]]);
            lines(&[[cx - s * 0.6, cy - s * 0.2], [cx, cy + s * 0.4], [cx + s * 0.6, cy - s * 0.2]]);
            lines(&[[cx - s, cy + s], [cx + s, cy + s]]);
        }
        Action::ToggleHint | Action::Thinner | Action::Thicker | Action::PickColor(_) => {}
    }
}
