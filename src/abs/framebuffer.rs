//! Module to work with OpenGL framebuffers.
//!
//! This module provides functionality to create, bind, and manage OpenGL
//! framebuffers for off-screen rendering, so a frame can be post-processed
//! before it reaches the screen.

use std::sync::Arc;

use glow::HasContext;

use crate::abs::Texture;

/// Represents an OpenGL framebuffer with an RGBA8 color texture and an
/// optional depth attachment.
pub struct Framebuffer {
    gl: Arc<glow::Context>,
    fbo: glow::Framebuffer,
    color_tex: Texture,
    depth_tex: Option<Texture>,
}

impl Framebuffer {
    /// Creates a new framebuffer with the specified width and height.
    pub fn new(gl: &Arc<glow::Context>, width: i32, height: i32, use_depth: bool) -> Self {
        unsafe {
            let fbo = gl.create_framebuffer().unwrap();
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));

            let color_tex = {
                let tex = gl.create_texture().unwrap();
                gl.bind_texture(glow::TEXTURE_2D, Some(tex));

                gl.tex_image_2d(
                    glow::TEXTURE_2D,
                    0,
                    glow::RGBA8 as i32,
                    width,
                    height,
                    0,
                    glow::RGBA,
                    glow::UNSIGNED_BYTE,
                    glow::PixelUnpackData::Slice(None),
                );

                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_MIN_FILTER,
                    glow::LINEAR as i32,
                );
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_MAG_FILTER,
                    glow::LINEAR as i32,
                );
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_WRAP_S,
                    glow::CLAMP_TO_EDGE as i32,
                );
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_WRAP_T,
                    glow::CLAMP_TO_EDGE as i32,
                );

                gl.framebuffer_texture_2d(
                    glow::FRAMEBUFFER,
                    glow::COLOR_ATTACHMENT0,
                    glow::TEXTURE_2D,
                    Some(tex),
                    0,
                );

                gl.bind_texture(glow::TEXTURE_2D, None);
                tex
            };

            let depth_tex = if use_depth {
                let tex = gl.create_texture().unwrap();
                gl.bind_texture(glow::TEXTURE_2D, Some(tex));

                gl.tex_image_2d(
                    glow::TEXTURE_2D,
                    0,
                    glow::DEPTH_COMPONENT24 as i32,
                    width,
                    height,
                    0,
                    glow::DEPTH_COMPONENT,
                    glow::UNSIGNED_INT,
                    glow::PixelUnpackData::Slice(None),
                );

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
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_WRAP_S,
                    glow::CLAMP_TO_EDGE as i32,
                );
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_WRAP_T,
                    glow::CLAMP_TO_EDGE as i32,
                );

                gl.framebuffer_texture_2d(
                    glow::FRAMEBUFFER,
                    glow::DEPTH_ATTACHMENT,
                    glow::TEXTURE_2D,
                    Some(tex),
                    0,
                );

                gl.bind_texture(glow::TEXTURE_2D, None);
                Some(tex)
            } else {
                None
            };

            assert!(
                gl.check_framebuffer_status(glow::FRAMEBUFFER) == glow::FRAMEBUFFER_COMPLETE,
                "Framebuffer incomplete"
            );

            gl.bind_framebuffer(glow::FRAMEBUFFER, None);

            Self {
                gl: gl.clone(),
                fbo,
                color_tex: Texture {
                    gl: gl.clone(),
                    id: color_tex,
                    width: width as u32,
                    height: height as u32,
                },
                depth_tex: depth_tex.map(|tex| Texture {
                    gl: gl.clone(),
                    id: tex,
                    width: width as u32,
                    height: height as u32,
                }),
            }
        }
    }

    /// Binds the framebuffer for rendering.
    pub fn bind(&self) {
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
        }
    }

    /// Unbinds the framebuffer, reverting to the default framebuffer.
    pub fn unbind(gl: &glow::Context) {
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
    }

    /// Respecifies the attachment storage for a new drawable size.
    pub fn resize(&mut self, width: i32, height: i32) {
        unsafe {
            self.gl
                .bind_texture(glow::TEXTURE_2D, Some(self.color_tex.id));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(None),
            );
            if let Some(depth) = &self.depth_tex {
                self.gl.bind_texture(glow::TEXTURE_2D, Some(depth.id));
                self.gl.tex_image_2d(
                    glow::TEXTURE_2D,
                    0,
                    glow::DEPTH_COMPONENT24 as i32,
                    width,
                    height,
                    0,
                    glow::DEPTH_COMPONENT,
                    glow::UNSIGNED_INT,
                    glow::PixelUnpackData::Slice(None),
                );
            }
            self.gl.bind_texture(glow::TEXTURE_2D, None);
        }
        self.color_tex.width = width as u32;
        self.color_tex.height = height as u32;
        if let Some(depth) = &mut self.depth_tex {
            depth.width = width as u32;
            depth.height = height as u32;
        }
    }

    /// Returns the color texture of the framebuffer.
    pub fn texture(&self) -> &Texture {
        &self.color_tex
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_framebuffer(self.fbo);
        }
    }
}
