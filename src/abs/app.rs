//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::sync::Arc;

use crate::settings::Settings;

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates a new [`App`] instance with the specified title. Window size,
    /// fullscreen mode and the swap interval come from [`Settings`]; the size
    /// options are ignored when `fullscreen` is set.
    pub fn new(title: &str, settings: &Settings) -> Result<Self, String> {
        let sdl = sdl2::init()?;
        let video_subsystem = sdl.video()?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        let display_mode = video_subsystem.current_display_mode(0)?;
        let (width, height) = if settings.fullscreen {
            (display_mode.w as u32, display_mode.h as u32)
        } else {
            (settings.window_width, settings.window_height)
        };
        let mut window = video_subsystem
            .window(title, width, height)
            .opengl()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;
        window.set_fullscreen(if settings.fullscreen {
            sdl2::video::FullscreenType::Desktop
        } else {
            sdl2::video::FullscreenType::Off
        })?;
        let gl_context = window.gl_create_context()?;
        window.gl_make_current(&gl_context)?;
        video_subsystem.gl_set_swap_interval(if settings.vsync {
            sdl2::video::SwapInterval::VSync
        } else {
            sdl2::video::SwapInterval::Immediate
        })?;
        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump()?;

        // High-DPI displays hand out a drawable larger than the window.
        // Everything sized in pixels must use the drawable size.
        let (drawable_w, drawable_h) = window.drawable_size();
        if (drawable_w, drawable_h) != window.size() {
            log::warn!(
                "high-DPI display: drawable size is {}x{}, window size is {}x{}",
                drawable_w,
                drawable_h,
                window.size().0,
                window.size().1,
            );
        }

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl: Arc::new(gl),
            event_pump,
        })
    }

    /// The size of the window's drawable area in pixels.
    pub fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }
}
