use std::time::Instant;

use glam::*;
use glow::HasContext;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;

use crate::abs::{App, Framebuffer};
use crate::error::RenderError;
use crate::render::animation::AnimationState;
use crate::render::{EffectId, GeometryId, RenderSystem, TextureId};
use crate::settings::Settings;

mod abs;
mod error;
mod render;
mod settings;

fn main() {
    env_logger::init();

    let settings = Settings::load();
    if let Err(e) = run(&settings) {
        log::error!("graphics setup failed: {e}");
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            log::error!("caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run(settings: &Settings) -> Result<(), RenderError> {
    let mut app = App::new("Catnap2D", settings).map_err(RenderError::Window)?;
    let mut renderer = RenderSystem::new(&app)?;

    unsafe {
        app.gl.enable(glow::DEPTH_TEST);
        app.gl.enable(glow::BLEND);
        app.gl
            .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
    }

    let (width, height) = app.drawable_size();
    let mut screen_size = vec2(width as f32, height as f32);
    let mut projection =
        Mat4::orthographic_rh_gl(0.0, screen_size.x, screen_size.y, 0.0, -3.0, 3.0);

    let mut cat_state = AnimationState::MovingRight;
    let mut cat = renderer.cat_animations[&cat_state];
    let mut dog = renderer.dog_animations[&AnimationState::Sleeping];
    let mut villager = renderer.villager_animations[&AnimationState::MovingDown];
    let fish_extents = renderer
        .mesh_data(GeometryId::Fish)
        .map(|data| data.original_extents)
        .unwrap_or(Vec3::ONE);

    let mut window_events = Vec::new();
    let mut last_time = Instant::now();
    let mut time = 0.0f32;

    'running: loop {
        for event in app.event_pump.poll_iter() {
            if matches!(event, Event::Quit { .. }) {
                break 'running;
            }
            window_events.push(event);
        }

        for event in &window_events {
            match event {
                Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::Window {
                    win_event: WindowEvent::FocusLost,
                    ..
                } => cat.reset(),
                Event::Window {
                    win_event: WindowEvent::Resized(w, h),
                    ..
                } => {
                    renderer.resize(*w, *h);
                    unsafe {
                        app.gl.viewport(0, 0, *w, *h);
                    }
                    screen_size = vec2(*w as f32, *h as f32);
                    projection = Mat4::orthographic_rh_gl(
                        0.0,
                        screen_size.x,
                        screen_size.y,
                        0.0,
                        -3.0,
                        3.0,
                    );
                }
                _ => {}
            }
        }

        let dt_ms = last_time.elapsed().as_secs_f32() * 1000.0;
        last_time = Instant::now();

        // The cat paces back and forth across the middle of the screen.
        let phase = time * 0.2;
        let heading_right = phase as i32 % 2 == 0;
        let desired = if heading_right {
            AnimationState::MovingRight
        } else {
            AnimationState::MovingLeft
        };
        if desired != cat_state {
            cat_state = desired;
            cat = renderer.cat_animations[&cat_state];
        }
        cat.advance(dt_ms);
        dog.advance(dt_ms);
        villager.advance(dt_ms);

        unsafe {
            renderer.screen_target().bind();

            app.gl.clear_color(0.45, 0.62, 0.45, 1.0);
            app.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            // Grass strip along the bottom of the screen.
            let textured = renderer.effect(EffectId::Textured);
            textured.use_program();
            renderer.texture(TextureId::GrassTile).bind_to_unit(0);
            textured.set_uniform("texture_sampler", 0);
            let tile = 64.0;
            let tiles = (screen_size.x / tile).ceil() as i32;
            for i in 0..tiles {
                let center = vec3(
                    (i as f32 + 0.5) * tile,
                    screen_size.y - tile / 2.0,
                    0.0,
                );
                let transform = projection
                    * Mat4::from_translation(center)
                    * Mat4::from_scale(vec3(tile, tile, 1.0));
                textured.set_uniform("transform", transform);
                renderer.geometry(GeometryId::Sprite).draw();
            }

            // The cat walks a lap around the middle of the screen.
            let animated = renderer.effect(EffectId::AnimatedSprite);
            animated.use_program();
            renderer.texture(TextureId::CatSheet).bind_to_unit(0);
            animated.set_uniform("sheet_sampler", 0);
            let (uv_min, uv_max) = cat.uv_rect();
            animated.set_uniform("uv_min", uv_min);
            animated.set_uniform("uv_size", uv_max - uv_min);
            let lap = phase.fract();
            let along = if heading_right { lap } else { 1.0 - lap };
            let cat_pos = vec3(
                screen_size.x * (0.2 + 0.6 * along),
                screen_size.y * 0.6,
                1.0,
            );
            animated.set_uniform(
                "transform",
                projection
                    * Mat4::from_translation(cat_pos)
                    * Mat4::from_scale(vec3(96.0, 96.0, 1.0)),
            );
            renderer.geometry(GeometryId::Sprite).draw();

            // The dog naps by the grass; the villager paces in place.
            for (sheet, anim, pos, size) in [
                (
                    TextureId::DogSheet,
                    &dog,
                    vec3(screen_size.x * 0.15, screen_size.y * 0.8, 1.0),
                    80.0,
                ),
                (
                    TextureId::VillagerSheet,
                    &villager,
                    vec3(screen_size.x * 0.85, screen_size.y * 0.8, 1.0),
                    80.0,
                ),
            ] {
                renderer.texture(sheet).bind_to_unit(0);
                let (uv_min, uv_max) = anim.uv_rect();
                animated.set_uniform("uv_min", uv_min);
                animated.set_uniform("uv_size", uv_max - uv_min);
                animated.set_uniform(
                    "transform",
                    projection
                        * Mat4::from_translation(pos)
                        * Mat4::from_scale(vec3(size, size, 1.0)),
                );
                renderer.geometry(GeometryId::Sprite).draw();
            }

            // Today's catch, pinned to the corner of the screen.
            textured.use_program();
            renderer.texture(TextureId::Fish).bind_to_unit(0);
            textured.set_uniform(
                "transform",
                projection
                    * Mat4::from_translation(vec3(48.0, 48.0, 1.0))
                    * Mat4::from_scale(vec3(48.0, 48.0, 1.0)),
            );
            renderer.geometry(GeometryId::Sprite).draw();

            // A fish hanging in the pond, sized by its on-disk extents.
            let colored = renderer.effect(EffectId::Colored);
            colored.use_program();
            let fish_scale = vec3(fish_extents.x * 40.0, fish_extents.y * 40.0, 1.0);
            colored.set_uniform(
                "transform",
                projection
                    * Mat4::from_translation(vec3(
                        screen_size.x * 0.5,
                        screen_size.y * 0.3,
                        0.0,
                    ))
                    * Mat4::from_scale(fish_scale),
            );
            renderer.geometry(GeometryId::Fish).draw();

            // Marker under the cat so the walk path is visible.
            colored.set_uniform(
                "transform",
                projection
                    * Mat4::from_translation(cat_pos.with_z(0.5))
                    * Mat4::from_scale(vec3(8.0, 8.0, 1.0)),
            );
            renderer.geometry(GeometryId::DebugLine).draw();

            // Post-process the frame onto the screen.
            Framebuffer::unbind(&app.gl);

            app.gl.disable(glow::DEPTH_TEST);
            app.gl.clear(glow::COLOR_BUFFER_BIT);
            let post = renderer.effect(EffectId::PostProcess);
            post.use_program();
            renderer.screen_target().texture().bind_to_unit(0);
            post.set_uniform("screen_sampler", 0);
            post.set_uniform("time", time);
            renderer.geometry(GeometryId::ScreenTriangle).draw();
            app.gl.enable(glow::DEPTH_TEST);
        }

        app.window.gl_swap_window();

        window_events.clear();
        time += dt_ms / 1000.0;
    }

    if let Err(e) = settings.save() {
        log::warn!("could not save settings: {e}");
    }

    Ok(())
}
