use crate::app::App;
use log::{LevelFilter, error, info};
use std::error::Error;
use winit::event_loop::EventLoop;

mod app;
mod assets;
mod config;
mod core;
mod scene;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .init();

    info!("Application starting...");

    let event_loop = EventLoop::new()?;
    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    // A startup or draw failure stops the event loop with the cause stored on
    // the app; returning it here yields a nonzero exit code.
    if let Some(e) = app.take_fatal() {
        error!("Application exited with error: {}", e);
        return Err(e);
    }

    info!("Application exited gracefully.");
    Ok(())
}
