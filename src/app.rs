use crate::assets::AssetManager;
use crate::config;
use crate::core::gfx::{self as renderer, Backend, RenderList, RenderObject};
use crate::scene::Scene;
use log::{error, info};
use std::{error::Error, fs, sync::Arc, time::Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::Window,
};

pub struct App {
    window: Option<Arc<Window>>,
    backend: Option<Backend>,
    asset_manager: AssetManager,
    scene: Scene,
    last_frame_time: Instant,
    start_time: Instant,
    fatal: Option<Box<dyn Error>>,
}

impl App {
    pub fn new() -> Self {
        Self {
            window: None,
            backend: None,
            asset_manager: AssetManager::new(),
            scene: Scene::new(),
            last_frame_time: Instant::now(),
            start_time: Instant::now(),
            fatal: None,
        }
    }

    /// The error that stopped the run, if any.
    pub fn take_fatal(&mut self) -> Option<Box<dyn Error>> {
        self.fatal.take()
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        let window_attributes = Window::default_attributes()
            .with_title(config::WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(config::WINDOW_WIDTH, config::WINDOW_HEIGHT))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let vertex_src = fs::read_to_string(config::VERTEX_SHADER_PATH)
            .map_err(|e| format!("failed to read {}: {}", config::VERTEX_SHADER_PATH, e))?;
        let fragment_src = fs::read_to_string(config::FRAGMENT_SHADER_PATH)
            .map_err(|e| format!("failed to read {}: {}", config::FRAGMENT_SHADER_PATH, e))?;

        let mut backend = renderer::create_backend(window.clone(), &vertex_src, &fragment_src)?;
        self.asset_manager.load_initial_assets(&mut backend)?;

        self.window = Some(window);
        self.backend = Some(backend);
        self.last_frame_time = Instant::now();
        self.start_time = Instant::now();
        info!("Starting render loop...");
        Ok(())
    }

    fn build_render_list(&self) -> RenderList {
        RenderList {
            clear_color: self.scene.background.clear_color(),
            objects: self
                .scene
                .objects
                .iter()
                .map(|object| RenderObject {
                    texture_key: object.texture_key,
                    transform: object.model_matrix(),
                })
                .collect(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_graphics(event_loop) {
                error!("Failed to initialize: {}", e);
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref().cloned() else {
            return;
        };
        if window_id != window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested. Shutting down.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(backend) = &mut self.backend {
                    backend.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = now.duration_since(self.last_frame_time).as_secs_f32();
                self.last_frame_time = now;
                let clock_seconds = now.duration_since(self.start_time).as_secs_f32();

                self.scene
                    .update(delta_time, clock_seconds, &mut rand::rng());

                let frame = self.build_render_list();
                if let Some(backend) = &mut self.backend {
                    if let Err(e) = backend.draw(&frame, &self.asset_manager.textures) {
                        error!("Failed to draw frame: {}", e);
                        self.fatal = Some(e);
                        event_loop.exit();
                    }
                }
            }
            // Quit is the only recognized input; everything else is ignored.
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(backend) = &mut self.backend {
            backend.dispose_textures(&mut self.asset_manager.textures);
            backend.cleanup();
        }
    }
}
