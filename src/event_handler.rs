use crate::app_state::State;
use crate::assets::{AssetEvent, AssetKind, ImageSlot};
use crate::drawing::Tool;
use crate::state::Page;
use crate::state::UserInputState::{Drawing, Idle};
use crate::ui::Action;

use winit::event::*;
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// Keyboard map. Ctrl (Cmd on macOS) combinations never fall through to
/// the bare-letter shortcuts.
pub fn shortcut(code: KeyCode, modifiers: ModifiersState) -> Option<Action> {
    let command = modifiers.control_key() || modifiers.super_key();
    let shift = modifiers.shift_key();
    let action = match code {
        KeyCode::KeyZ if command && shift => Action::Redo,
        KeyCode::KeyZ if command => Action::Undo,
        KeyCode::KeyY if command => Action::Redo,
        KeyCode::KeyS if command => Action::Save,
        _ if command => return None,
        KeyCode::KeyP => Action::SelectTool(Tool::Pencil),
        KeyCode::KeyE => Action::SelectTool(Tool::Eraser),
        KeyCode::KeyA => Action::SelectTool(Tool::AddCharacter),
        KeyCode::BracketLeft => Action::Thinner,
        KeyCode::BracketRight => Action::Thicker,
        KeyCode::Delete | KeyCode::Backspace => Action::Clear,
        KeyCode::KeyH => Action::ToggleHint,
        KeyCode::KeyR => Action::Reset,
        KeyCode::ArrowLeft => Action::PrevPage,
        KeyCode::ArrowRight => Action::NextPage,
        KeyCode::Digit1 => Action::PickColor(0),
        KeyCode::Digit2 => Action::PickColor(1),
        KeyCode::Digit3 => Action::PickColor(2),
        KeyCode::Digit4 => Action::PickColor(3),
        KeyCode::Digit5 => Action::PickColor(4),
        KeyCode::Digit6 => Action::PickColor(5),
        KeyCode::Digit7 => Action::PickColor(6),
        KeyCode::Digit8 => Action::PickColor(7),
        _ => return None,
    };
    Some(action)
}

impl State {
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.gpu.config.width = new_size.width;
            self.gpu.config.height = new_size.height;
            self.gpu
                .surface
                .configure(&self.gpu.device, &self.gpu.config);

            self.drawing.refresh_background();
            self.fit_viewport();
            self.window.request_redraw();
        }
    }

    pub fn fit_viewport(&mut self) {
        let frame = self.frame_size();
        self.viewport.fit(
            &self.gpu.queue,
            frame,
            (self.size.width, self.size.height),
        );
    }

    /// Returns true when the event was consumed.
    pub fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.input.modifiers = modifiers.state();
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.mouse_pos = [position.x as f32, position.y as f32];
                self.pointer_moved();
                true
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                match state {
                    ElementState::Pressed => self.pointer_pressed(),
                    ElementState::Released => self.pointer_released(),
                }
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer_released();
                true
            }
            WindowEvent::Touch(touch) => {
                self.input.mouse_pos = [touch.location.x as f32, touch.location.y as f32];
                match touch.phase {
                    TouchPhase::Started => self.pointer_pressed(),
                    TouchPhase::Moved => self.pointer_moved(),
                    TouchPhase::Ended | TouchPhase::Cancelled => self.pointer_released(),
                }
                true
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => match shortcut(*code, self.input.modifiers) {
                Some(action) => {
                    self.dispatch(action);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn pointer_pressed(&mut self) {
        let screen = self.input.mouse_pos;
        let frame = self.viewport.transform.screen_to_frame(screen);
        let action = match self.page {
            Page::Drawing => {
                let action = self.drawing.pointer_down(frame);
                if self.drawing.log().is_open() {
                    self.input.state = Drawing;
                }
                action
            }
            Page::Spot => self.spot.pointer_down(
                frame,
                screen,
                &self.viewport.transform,
                self.window.scale_factor() as f32,
            ),
        };
        if let Some(action) = action {
            self.dispatch(action);
        }
        self.window.request_redraw();
    }

    fn pointer_moved(&mut self) {
        let frame = self.viewport.transform.screen_to_frame(self.input.mouse_pos);
        if self.input.state != Drawing {
            let changed = match self.page {
                Page::Drawing => self.drawing.hover(frame),
                Page::Spot => self.spot.hover(frame),
            };
            if changed {
                self.window.set_title(&self.title());
            }
            return;
        }
        self.drawing.pointer_move(frame);
        if !self.drawing.log().is_open() {
            self.input.state = Idle;
        }
        self.window.request_redraw();
    }

    fn pointer_released(&mut self) {
        if self.input.state == Drawing {
            self.drawing.pointer_up();
            self.input.state = Idle;
        }
    }

    fn dispatch(&mut self, action: Action) {
        let handled = match action {
            Action::PrevPage => self.switch_page(self.page.prev()),
            Action::NextPage => self.switch_page(self.page.next()),
            _ => match self.page {
                Page::Drawing => self.drawing.apply(action),
                Page::Spot => self.spot.apply(action),
            },
        };
        if handled {
            self.window.request_redraw();
        } else {
            log::debug!("{} does nothing on the {:?} page", action.label(), self.page);
        }
    }

    fn switch_page(&mut self, page: Page) -> bool {
        if self.input.state == Drawing {
            self.drawing.pointer_up();
            self.input.state = Idle;
        }
        log::info!("switching to the {:?} page", page);
        self.page = page;
        self.frame_stale = true;
        true
    }

    /// Route a finished asset load to the page that shows it.
    pub fn asset(&mut self, event: AssetEvent) {
        let (kind, slot) = match event {
            AssetEvent::Loaded { kind, image } => {
                log::info!("{:?} arrived ({}x{})", kind, image.width(), image.height());
                (kind, ImageSlot::Ready(image))
            }
            AssetEvent::Failed { kind, reason } => {
                log::warn!("{:?} unavailable: {}", kind, reason);
                (kind, ImageSlot::Missing)
            }
        };
        match kind {
            AssetKind::DrawingBackground => self.drawing.set_background(slot),
            AssetKind::SpotTop | AssetKind::SpotBottom => self.spot.set_picture(kind, slot),
        }
        self.window.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_z_undoes_and_shift_redoes() {
        assert_eq!(shortcut(KeyCode::KeyZ, ModifiersState::CONTROL), Some(Action::Undo));
        assert_eq!(
            shortcut(KeyCode::KeyZ, ModifiersState::CONTROL | ModifiersState::SHIFT),
            Some(Action::Redo)
        );
        assert_eq!(shortcut(KeyCode::KeyY, ModifiersState::SUPER), Some(Action::Redo));
        assert_eq!(shortcut(KeyCode::KeyS, ModifiersState::CONTROL), Some(Action::Save));
    }

    #[test]
    fn command_blocks_bare_letter_shortcuts() {
        assert_eq!(shortcut(KeyCode::KeyP, ModifiersState::CONTROL), None);
        assert_eq!(shortcut(KeyCode::KeyR, ModifiersState::SUPER), None);
        assert_eq!(shortcut(KeyCode::KeyZ, ModifiersState::empty()), None);
    }

    #[test]
    fn plain_keys_pick_tools_colors_and_pages() {
        let none = ModifiersState::empty();
        assert_eq!(shortcut(KeyCode::KeyE, none), Some(Action::SelectTool(Tool::Eraser)));
        assert_eq!(shortcut(KeyCode::BracketRight, none), Some(Action::Thicker));
        assert_eq!(shortcut(KeyCode::Digit8, none), Some(Action::PickColor(7)));
        assert_eq!(shortcut(KeyCode::KeyH, ModifiersState::SHIFT), Some(Action::ToggleHint));
        assert_eq!(shortcut(KeyCode::ArrowLeft, none), Some(Action::PrevPage));
        assert_eq!(shortcut(KeyCode::Escape, none), None);
    }
}
