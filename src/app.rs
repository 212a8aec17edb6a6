use crate::app_state::State;
use crate::assets::{self, AssetEvent, AssetKind, AssetLoader};
use crate::config::Config;
use crate::spot::Target;
use anyhow::{Context, Result};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

struct App {
    config: Config,
    targets: Vec<Target>,
    loader: AssetLoader,
    state: Option<State>,
}

impl App {
    fn request_assets(&self) {
        let assets = &self.config.assets;
        self.loader
            .request(AssetKind::DrawingBackground, &assets.drawing_background);
        self.loader.request(AssetKind::SpotTop, &assets.spot_top);
        self.loader.request(AssetKind::SpotBottom, &assets.spot_bottom);
    }
}

impl ApplicationHandler<AssetEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes()
            .with_title("Friendly Hammock")
            .with_inner_size(winit::dpi::LogicalSize::new(720.0, 780.0));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("could not create window: {e}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(target_arch = "wasm32")]
        if let Err(e) = web::attach_canvas(&window) {
            log::error!("{e:#}");
        }

        let targets = std::mem::take(&mut self.targets);
        match pollster::block_on(State::new(window, &self.config, targets)) {
            Ok(state) => {
                self.state = Some(state);
                self.request_assets();
            }
            Err(e) => {
                log::error!("graphics setup failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AssetEvent) {
        // native loads are sent from `resumed`, after the state exists
        match &mut self.state {
            Some(state) => state.asset(event),
            None => log::debug!("dropping an asset that arrived before the window"),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if window_id != state.window().id() || state.input(&event) {
            return;
        }
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                if cfg!(not(target_arch = "wasm32")) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(physical_size) => {
                log::info!("WindowEvent::Resized: {}x{}", physical_size.width, physical_size.height);
                state.resize(physical_size);
            }
            WindowEvent::RedrawRequested => {
                state.update();
                match state.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.resize(state.size)
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                    Err(e) => log::warn!("frame skipped: {e:?}"),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            if state.needs_update() {
                state.window().request_redraw();
            }
        }
    }
}

pub async fn run() -> Result<()> {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Info).context("initializing logger")?;
        } else {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        }
    }

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("using default config: {e:#}");
        Config::default()
    });
    let targets = assets::load_targets(config.assets.targets.as_deref());

    let event_loop = EventLoop::<AssetEvent>::with_user_event()
        .build()
        .context("creating event loop")?;
    let mut app = App {
        config,
        targets,
        loader: AssetLoader::new(event_loop.create_proxy()),
        state: None,
    };

    event_loop.run_app(&mut app).context("running event loop")?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
mod web {
    use anyhow::{Result, anyhow};
    use winit::platform::web::WindowExtWebSys;
    use winit::window::Window;

    /// Put the winit canvas into `#hammock`, or the body when that is absent.
    pub fn attach_canvas(window: &Window) -> Result<()> {
        let canvas = window.canvas().ok_or_else(|| anyhow!("window has no canvas"))?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| anyhow!("no document"))?;
        let parent: web_sys::Element = match document.get_element_by_id("hammock") {
            Some(element) => element,
            None => document.body().ok_or_else(|| anyhow!("no body"))?.into(),
        };
        parent
            .append_child(&canvas)
            .map_err(|e| anyhow!("appending canvas: {e:?}"))?;

        let style = canvas.style();
        for (name, value) in [("width", "100vw"), ("height", "100vh"), ("display", "block")] {
            style
                .set_property(name, value)
                .map_err(|e| anyhow!("styling canvas: {e:?}"))?;
        }
        Ok(())
    }
}
