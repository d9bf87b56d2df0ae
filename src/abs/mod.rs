//! This module contains the core components for the graphics layer,
//! including application setup, shader management, mesh handling, textures
//! and off-screen framebuffers.

pub mod app;
pub mod framebuffer;
pub mod mesh;
pub mod shader;
pub mod texture;

pub use app::*;
pub use framebuffer::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;

use glow::HasContext;

/// Returns the pending OpenGL error flag, if any.
pub fn gl_error(gl: &glow::Context) -> Option<u32> {
    let code = unsafe { gl.get_error() };
    (code != glow::NO_ERROR).then_some(code)
}
