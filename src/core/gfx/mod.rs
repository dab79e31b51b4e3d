mod opengl;

pub use opengl::{State, Texture};

use cgmath::Matrix4;
use std::error::Error;
use std::sync::Arc;
use winit::window::Window;

// --- Public Data Contract ---
// Everything the backend needs to draw one frame.
pub struct RenderList {
    pub clear_color: [f32; 4],
    pub objects: Vec<RenderObject>,
}

pub struct RenderObject {
    pub texture_key: &'static str,
    pub transform: Matrix4<f32>,
}

pub type Backend = State;

/// Creates and initializes the graphics backend for the given window.
pub fn create_backend(
    window: Arc<Window>,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<Backend, Box<dyn Error>> {
    opengl::init(window, vertex_src, fragment_src)
}
