use crate::assets::ImageSlot;
use crate::canvas::{Rect, fill_rect, render_background};
use crate::config::{Config, DrawingConfig, ExportConfig};
use crate::drawing::{Color, Tool};
use crate::export;
use crate::replay::StrokeRenderer;
use crate::stroke_log::StrokeLog;
use crate::ui::{self, Action, ButtonBar, ToolbarState};
use image::{Rgba, RgbaImage, imageops};

const MARGIN: f32 = 24.0;
const WIDTH_STEP: f32 = 2.0;
const PAGE_BG: [u8; 4] = [0xFA, 0xFA, 0xFA, 255];
const CANVAS_BG: [u8; 4] = [255, 255, 255, 255];
const CANVAS_BORDER: [u8; 4] = [0xEF, 0xEF, 0xEF, 255];

struct Layout {
    canvas: Rect,
    tools: ButtonBar,
    palette: ButtonBar,
    footer: ButtonBar,
    size: (u32, u32),
}

impl Layout {
    fn new(canvas_w: u32, canvas_h: u32, colors: usize) -> Self {
        let width = canvas_w as f32 + MARGIN * 2.0;
        let canvas = Rect::new(MARGIN, MARGIN, canvas_w as f32, canvas_h as f32);
        let center = width / 2.0;
        let tools = ui::drawing_tools(center, canvas.y + canvas.h + 16.0);
        let palette = ui::palette(center, tools.bottom() + 12.0, colors);
        let footer = ui::footer(width, palette.bottom() + 16.0);
        let height = footer.bottom() + 16.0;
        Self {
            canvas,
            tools,
            palette,
            footer,
            size: (width.ceil() as u32, height.ceil() as u32),
        }
    }
}

/// The freehand drawing page: stroke capture, toolbar and export.
pub struct DrawingGame {
    log: StrokeLog,
    renderer: StrokeRenderer,
    background: RgbaImage,
    background_image: ImageSlot,
    tool: Tool,
    color: Color,
    width: f32,
    settings: DrawingConfig,
    export: ExportConfig,
    layout: Layout,
    hovered: Option<String>,
    dirty: bool,
}

impl DrawingGame {
    pub fn new(config: &Config) -> Self {
        let (w, h) = (config.canvas.width.max(1), config.canvas.height.max(1));
        let settings = config.drawing.clone().sanitized();
        Self {
            log: StrokeLog::new(),
            renderer: StrokeRenderer::new(w, h),
            background: RgbaImage::new(w, h),
            background_image: ImageSlot::Pending,
            tool: Tool::Pencil,
            color: settings.color,
            width: settings.width,
            layout: Layout::new(w, h, settings.palette.len()),
            settings,
            export: config.export.clone(),
            hovered: None,
            dirty: true,
        }
    }

    pub fn frame_size(&self) -> (u32, u32) {
        self.layout.size
    }

    /// Frame pixels to drawing-surface pixels.
    pub fn frame_to_surface(&self, frame_pos: [f32; 2]) -> [f32; 2] {
        let c = self.layout.canvas;
        let (sw, sh) = self.renderer.surface().dimensions();
        [
            (frame_pos[0] - c.x) * sw as f32 / c.w,
            (frame_pos[1] - c.y) * sh as f32 / c.h,
        ]
    }

    /// Press at `frame_pos`. Toolbar hits come back as an action for the
    /// caller to apply; presses on the canvas open a stroke.
    pub fn pointer_down(&mut self, frame_pos: [f32; 2]) -> Option<Action> {
        let hit = self
            .layout
            .tools
            .handle_click(frame_pos)
            .or_else(|| self.layout.palette.handle_click(frame_pos))
            .or_else(|| self.layout.footer.handle_click(frame_pos));
        if hit.is_some() {
            return hit;
        }
        if self.layout.canvas.contains(frame_pos) && self.tool.composite_mode().is_some() {
            let point = self.frame_to_surface(frame_pos);
            self.log.begin_stroke(self.tool, self.color, self.width, point);
            self.dirty = true;
        }
        None
    }

    pub fn pointer_move(&mut self, frame_pos: [f32; 2]) {
        if !self.log.is_open() {
            return;
        }
        if !self.layout.canvas.contains(frame_pos) {
            self.log.end_stroke();
            return;
        }
        let point = self.frame_to_surface(frame_pos);
        if self.log.extend_stroke(point) {
            self.dirty = true;
        }
    }

    /// Track the button under the pointer. Returns true when it changed.
    pub fn hover(&mut self, frame_pos: [f32; 2]) -> bool {
        let l = &self.layout;
        let tip = l
            .tools
            .button_at(frame_pos)
            .or_else(|| l.palette.button_at(frame_pos))
            .or_else(|| l.footer.button_at(frame_pos))
            .map(|b| b.tooltip());
        let changed = tip != self.hovered;
        self.hovered = tip;
        changed
    }

    pub fn pointer_up(&mut self) {
        self.log.end_stroke();
    }

    /// Apply a toolbar or keyboard action. Returns false for actions that
    /// belong to someone else (page navigation).
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::SelectTool(tool) => self.tool = tool,
            Action::Thinner => self.set_width(self.width - WIDTH_STEP),
            Action::Thicker => self.set_width(self.width + WIDTH_STEP),
            Action::PickColor(i) => match self.settings.palette.get(i) {
                Some(color) => self.color = *color,
                None => return true,
            },
            Action::Undo => {
                self.log.undo();
            }
            Action::Redo => {
                self.log.redo();
            }
            Action::Clear => self.log.clear(),
            Action::Save => {
                if let Err(e) = self.save() {
                    log::error!("export failed: {e:#}");
                }
                return true;
            }
            _ => return false,
        }
        self.dirty = true;
        true
    }

    fn set_width(&mut self, width: f32) {
        self.width = width.clamp(self.settings.min_width, self.settings.max_width);
    }

    pub fn save(&mut self) -> anyhow::Result<()> {
        self.renderer.sync(&self.log);
        export::export_image(&self.background, self.renderer.surface(), &self.export)
    }

    pub fn set_background(&mut self, slot: ImageSlot) {
        self.background_image = slot;
        self.refresh_background();
    }

    /// Re-fit the background picture; called on arrival and on resize.
    pub fn refresh_background(&mut self) {
        render_background(&mut self.background, self.background_image.image());
        self.dirty = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    pub fn compose_frame(&mut self) -> RgbaImage {
        self.renderer.sync(&self.log);
        let (w, h) = self.layout.size;
        let mut frame = RgbaImage::from_pixel(w, h, Rgba(PAGE_BG));

        let c = self.layout.canvas;
        fill_rect(&mut frame, c.inset(-1.0), CANVAS_BORDER);
        fill_rect(&mut frame, c, CANVAS_BG);
        let (x, y) = (c.x.round() as i64, c.y.round() as i64);
        imageops::overlay(&mut frame, &self.background, x, y);
        imageops::overlay(&mut frame, self.renderer.surface(), x, y);

        let state = ToolbarState {
            tool: self.tool,
            color: self.color,
            width: self.width,
            palette: &self.settings.palette,
            can_undo: self.log.can_undo(),
            can_redo: self.log.can_redo(),
        };
        ui::paint_tools(&mut frame, &self.layout.tools, &state);
        ui::paint_palette(&mut frame, &self.layout.palette, &state);
        ui::paint_bar(&mut frame, &self.layout.footer, |_| false);

        self.dirty = false;
        frame
    }

    pub fn title(&self) -> String {
        let title = format!("Drawing: {}, {} px, {}", self.tool.label(), self.width, self.color);
        match &self.hovered {
            Some(tip) => format!("{title} | {tip}"),
            None => title,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn log(&self) -> &StrokeLog {
        &self.log
    }
}
