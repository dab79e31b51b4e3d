use crate::config;
use crate::core::gfx::{Backend, Texture};
use image::RgbaImage;
use log::info;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

pub const DRIFTER_TEXTURE_KEY: &str = "drifter";
pub const SPINNER_TEXTURE_KEY: &str = "spinner";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load texture {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to upload texture {path}: {message}")]
    Upload { path: String, message: String },
}

pub struct AssetManager {
    pub textures: HashMap<&'static str, Texture>,
}

impl AssetManager {
    pub fn new() -> Self {
        AssetManager {
            textures: HashMap::new(),
        }
    }

    /// Decodes and uploads every texture the scene references. Any failure
    /// aborts the load; the caller decides what to do with the error.
    pub fn load_initial_assets(&mut self, backend: &mut Backend) -> Result<(), AssetError> {
        info!("Loading textures...");
        for (key, path) in [
            (DRIFTER_TEXTURE_KEY, config::TEXTURE_A_PATH),
            (SPINNER_TEXTURE_KEY, config::TEXTURE_B_PATH),
        ] {
            let image = decode_image(Path::new(path))?;
            let texture = backend
                .create_texture(&image)
                .map_err(|message| AssetError::Upload {
                    path: path.to_string(),
                    message,
                })?;
            self.textures.insert(key, texture);
        }
        info!("All textures loaded.");
        Ok(())
    }
}

/// Decodes an image file into tightly-packed RGBA8 pixels.
pub fn decode_image(path: &Path) -> Result<RgbaImage, AssetError> {
    let image = image::open(path).map_err(|source| AssetError::Decode {
        path: path.display().to_string(),
        source,
    })?;
    let rgba = image.to_rgba8();
    info!(
        "Decoded {} ({}x{})",
        path.display(),
        rgba.width(),
        rgba.height()
    );
    Ok(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_texture_error_names_the_path() {
        let err = decode_image(Path::new("/no/such/texture.png")).unwrap_err();
        assert!(err.to_string().contains("/no/such/texture.png"));
    }
}
