//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which owns a GPU texture and
//! remembers the dimensions it was uploaded with.

use std::sync::Arc;

use glow::HasContext;
use image::{DynamicImage, GenericImageView};

/// Represents a texture stored on the GPU side.
pub struct Texture {
    pub(super) gl: Arc<glow::Context>,
    pub(super) id: glow::Texture,
    pub(super) width: u32,
    pub(super) height: u32,
}

impl Texture {
    /// Creates a new texture from the given [`image::DynamicImage`].
    ///
    /// Sprite art is uploaded as RGBA8 with NEAREST filtering and no mipmaps.
    pub fn new(gl: &Arc<glow::Context>, image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        let data = image.to_rgba8().into_raw();
        unsafe {
            let texture = gl.create_texture().unwrap();
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(data.as_slice())),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            Self {
                gl: Arc::clone(gl),
                id: texture,
                width,
                height,
            }
        }
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind_to_unit(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }

    /// The width in pixels the texture was uploaded with.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height in pixels the texture was uploaded with.
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}
