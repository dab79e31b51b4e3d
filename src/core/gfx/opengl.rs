use crate::core::gfx::RenderList;
use crate::core::space::ortho_projection;
use cgmath::{Matrix4, SquareMatrix};
use glow::{HasContext, PixelUnpackData, UniformLocation};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextAttributesBuilder, PossiblyCurrentContext},
    display::{Display, DisplayApiPreference},
    prelude::*,
    surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use image::RgbaImage;
use log::{info, warn};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::{collections::HashMap, error::Error, ffi::CStr, mem, num::NonZeroU32, sync::Arc};
use winit::window::Window;

/// A handle to an OpenGL texture on the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture(glow::Texture);

pub struct State {
    gl: glow::Context,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    program: glow::Program,
    mvp_location: UniformLocation,
    texture_location: UniformLocation,
    projection: Matrix4<f32>,
    view: Matrix4<f32>,
    window_size: (u32, u32),
    shared_vao: glow::VertexArray,
    shared_vbo: glow::Buffer,
    vertex_count: i32,
}

pub fn init(
    window: Arc<Window>,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<State, Box<dyn Error>> {
    info!("Initializing OpenGL backend...");

    let (gl_surface, gl_context, gl) = create_opengl_context(&window)?;
    let (program, mvp_location, texture_location) =
        create_graphics_program(&gl, vertex_src, fragment_src)?;

    // One shared VAO/VBO holding the single triangle reused for every object.
    let (shared_vao, shared_vbo, vertex_count) = unsafe {
        // x, y, u, v
        const TRIANGLE_VERTICES: [[f32; 4]; 3] = [
            [0.5, -0.5, 1.0, 0.0],
            [0.0, 0.5, 0.5, 1.0],
            [-0.5, -0.5, 0.0, 0.0],
        ];

        let vao = gl.create_vertex_array()?;
        let vbo = gl.create_buffer()?;

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&TRIANGLE_VERTICES),
            glow::STATIC_DRAW,
        );

        let stride = (4 * mem::size_of::<f32>()) as i32;
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(
            1,
            2,
            glow::FLOAT,
            false,
            stride,
            (2 * mem::size_of::<f32>()) as i32,
        );

        gl.bind_vertex_array(None);

        (vao, vbo, TRIANGLE_VERTICES.len() as i32)
    };

    let initial_size = window.inner_size();

    // Set a valid viewport immediately so the very first clear covers the
    // whole surface.
    unsafe {
        gl.viewport(0, 0, initial_size.width as i32, initial_size.height as i32);
    }

    // Constant program state: texture unit 0 and standard alpha blending.
    unsafe {
        gl.use_program(Some(program));
        gl.active_texture(glow::TEXTURE0);
        gl.uniform_1_i32(Some(&texture_location), 0);
        gl.enable(glow::BLEND);
        gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        gl.use_program(None);
    }

    let state = State {
        gl,
        gl_surface,
        gl_context,
        program,
        mvp_location,
        texture_location,
        projection: ortho_projection(),
        view: Matrix4::identity(),
        window_size: (initial_size.width, initial_size.height),
        shared_vao,
        shared_vbo,
        vertex_count,
    };

    info!("OpenGL backend initialized successfully.");
    Ok(state)
}

impl State {
    pub fn draw(
        &mut self,
        frame: &RenderList,
        textures: &HashMap<&'static str, Texture>,
    ) -> Result<(), Box<dyn Error>> {
        let (width, height) = self.window_size;
        if width == 0 || height == 0 {
            return Ok(());
        }

        unsafe {
            let c = frame.clear_color;
            self.gl.clear_color(c[0], c[1], c[2], c[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT);

            self.gl.use_program(Some(self.program));
            self.gl.active_texture(glow::TEXTURE0);
            self.gl.bind_vertex_array(Some(self.shared_vao));

            // Track the bound texture to avoid redundant GL calls.
            let mut last_bound: Option<Texture> = None;

            for object in &frame.objects {
                let Some(texture) = textures.get(object.texture_key).copied() else {
                    warn!(
                        "No texture registered for key '{}'; skipping object",
                        object.texture_key
                    );
                    continue;
                };
                if last_bound != Some(texture) {
                    self.gl.bind_texture(glow::TEXTURE_2D, Some(texture.0));
                    last_bound = Some(texture);
                }

                let mvp: [[f32; 4]; 4] = (self.projection * self.view * object.transform).into();
                self.gl.uniform_matrix_4_f32_slice(
                    Some(&self.mvp_location),
                    false,
                    bytemuck::cast_slice(&mvp),
                );

                self.gl.draw_arrays(glow::TRIANGLES, 0, self.vertex_count);
            }

            self.gl.bind_vertex_array(None);
        }

        self.gl_surface.swap_buffers(&self.gl_context)?;
        Ok(())
    }

    pub fn create_texture(&mut self, image: &RgbaImage) -> Result<Texture, String> {
        unsafe {
            let t = self.gl.create_texture()?;
            self.gl.bind_texture(glow::TEXTURE_2D, Some(t));

            // Well-defined pixel-store state for tightly-packed RGBA8 uploads.
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.pixel_store_i32(glow::UNPACK_ROW_LENGTH, 0);

            // Clamp and linear sample, no mips.
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );

            // Pin sampling to mip level 0.
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_BASE_LEVEL, 0);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAX_LEVEL, 0);

            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                image.width() as i32,
                image.height() as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(image.as_raw().as_slice())),
            );

            self.gl.bind_texture(glow::TEXTURE_2D, None);
            Ok(Texture(t))
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let (Some(width_nz), Some(height_nz)) = (NonZeroU32::new(width), NonZeroU32::new(height))
        {
            self.gl_surface
                .resize(&self.gl_context, width_nz, height_nz);
            unsafe {
                self.gl.viewport(0, 0, width as i32, height as i32);
            }
            self.window_size = (width, height);
        } else {
            warn!("Ignoring resize to zero dimensions.");
        }
    }

    pub fn dispose_textures(&mut self, textures: &mut HashMap<&'static str, Texture>) {
        unsafe {
            for Texture(handle) in std::mem::take(textures).into_values() {
                self.gl.delete_texture(handle);
            }
        }
    }

    pub fn cleanup(&mut self) {
        info!("Cleaning up OpenGL resources...");
        unsafe {
            self.gl.delete_program(self.program);
            self.gl.delete_vertex_array(self.shared_vao);
            self.gl.delete_buffer(self.shared_vbo);
        }
        info!("OpenGL resources cleaned up.");
    }
}

fn create_opengl_context(
    window: &Window,
) -> Result<(Surface<WindowSurface>, PossiblyCurrentContext, glow::Context), Box<dyn Error>> {
    let display_handle = window.display_handle()?.as_raw();
    let raw_window_handle = window.window_handle()?.as_raw();

    #[cfg(target_os = "windows")]
    let preference = DisplayApiPreference::WglThenEgl(Some(raw_window_handle));
    #[cfg(target_os = "macos")]
    let preference = DisplayApiPreference::Cgl;
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let preference = DisplayApiPreference::Egl;

    let display = unsafe { Display::new(display_handle, preference)? };

    let template = ConfigTemplateBuilder::new().with_alpha_size(8).build();
    let config = unsafe { display.find_configs(template)?.next() }
        .ok_or("Failed to find a suitable GL config")?;

    let (width, height): (u32, u32) = window.inner_size().into();
    let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        raw_window_handle,
        NonZeroU32::new(width).ok_or("window width is zero")?,
        NonZeroU32::new(height).ok_or("window height is zero")?,
    );
    let surface = unsafe { display.create_window_surface(&config, &surface_attributes)? };

    let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
    let context =
        unsafe { display.create_context(&config, &context_attributes)? }.make_current(&surface)?;

    // Uncapped frame pacing: present as fast as the driver allows.
    if let Err(e) = surface.set_swap_interval(&context, SwapInterval::DontWait) {
        warn!("Could not disable vsync: {}", e);
    }

    let gl =
        unsafe { glow::Context::from_loader_function_cstr(|s: &CStr| display.get_proc_address(s)) };
    Ok((surface, context, gl))
}

fn create_graphics_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<(glow::Program, UniformLocation, UniformLocation), String> {
    unsafe {
        let program = gl.create_program()?;
        let shader_sources = [
            (glow::VERTEX_SHADER, vertex_src),
            (glow::FRAGMENT_SHADER, fragment_src),
        ];

        let mut shaders = Vec::with_capacity(shader_sources.len());
        for (shader_type, shader_source) in shader_sources {
            let shader = gl.create_shader(shader_type)?;
            gl.shader_source(shader, shader_source);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                return Err(gl.get_shader_info_log(shader));
            }
            gl.attach_shader(program, shader);
            shaders.push(shader);
        }

        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            return Err(gl.get_program_info_log(program));
        }
        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        let mvp_location = gl
            .get_uniform_location(program, "u_model_view_proj")
            .ok_or("u_model_view_proj")?;
        let texture_location = gl
            .get_uniform_location(program, "u_texture")
            .ok_or("u_texture")?;

        Ok((program, mvp_location, texture_location))
    }
}
