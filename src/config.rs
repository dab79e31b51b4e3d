// Window
pub const WINDOW_TITLE: &str = "Twirl";
pub const WINDOW_WIDTH: u32 = 640;
pub const WINDOW_HEIGHT: u32 = 480;

// Shader sources, read relative to the working directory at startup.
pub const VERTEX_SHADER_PATH: &str = "shaders/vertex.glsl";
pub const FRAGMENT_SHADER_PATH: &str = "shaders/fragment.glsl";

// Texture files. Machine-specific absolute paths, deliberately not
// configurable; a missing file is a fatal startup error.
pub const TEXTURE_A_PATH: &str = "/Users/Shared/twirl/tatsuya.jpeg";
pub const TEXTURE_B_PATH: &str = "/Users/Shared/twirl/maya.jpeg";

// Background
pub const INITIAL_BACKGROUND: [f32; 3] = [0.1922, 0.549, 0.9059];
pub const BACKGROUND_OPACITY: f32 = 1.0;
pub const BACKGROUND_CYCLE_SECONDS: f32 = 2.0;

// Animation constants (world units per second, degrees per second)
pub const DRIFTER_VELOCITY: [f32; 2] = [0.01, 0.01];
pub const SPINNER_VELOCITY: [f32; 2] = [0.02, 0.02];
pub const SPINNER_SPIN_DEG_PER_SEC: f32 = 45.0;
