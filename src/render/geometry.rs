//! Fixed geometry and OBJ mesh loading.
//!
//! The CPU side of every vertex/index buffer the game uploads at startup:
//! the unit sprite quad, the debug quad, the full-screen triangle, and
//! meshes parsed from OBJ files.

use std::path::Path;

use glam::{Vec2, Vec3, vec2, vec3};
use glow::HasContext;

use crate::abs::Vertex;
use crate::error::RenderError;

/// Vertex with a texture coordinate, used by sprites.
#[derive(Clone, Copy)]
#[repr(C, packed)]
pub struct TexturedVertex {
    pub position: Vec3,
    pub uv: Vec2,
}

impl Vertex for TexturedVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<TexturedVertex>() as i32;

            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);

            gl.vertex_attrib_pointer_f32(
                1,
                2,
                glow::FLOAT,
                false,
                stride,
                std::mem::size_of::<Vec3>() as i32,
            );
            gl.enable_vertex_attrib_array(1);
        }
    }
}

/// Vertex with a flat color, used by debug geometry and OBJ meshes.
#[derive(Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct ColoredVertex {
    pub position: Vec3,
    pub color: Vec3,
}

impl Vertex for ColoredVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<ColoredVertex>() as i32;

            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);

            gl.vertex_attrib_pointer_f32(
                1,
                3,
                glow::FLOAT,
                false,
                stride,
                std::mem::size_of::<Vec3>() as i32,
            );
            gl.enable_vertex_attrib_array(1);
        }
    }
}

/// Bare position vertex, used by the full-screen triangle.
#[derive(Clone, Copy)]
#[repr(C, packed)]
pub struct PositionVertex {
    pub position: Vec3,
}

impl Vertex for PositionVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<PositionVertex>() as i32;
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);
        }
    }
}

/// A unit quad centered on the origin; the position corresponds to the
/// center of the texture.
pub fn sprite_quad() -> (Vec<TexturedVertex>, Vec<u32>) {
    let vertices = vec![
        TexturedVertex {
            position: vec3(-0.5, 0.5, 0.0),
            uv: vec2(0.0, 1.0),
        },
        TexturedVertex {
            position: vec3(0.5, 0.5, 0.0),
            uv: vec2(1.0, 1.0),
        },
        TexturedVertex {
            position: vec3(0.5, -0.5, 0.0),
            uv: vec2(1.0, 0.0),
        },
        TexturedVertex {
            position: vec3(-0.5, -0.5, 0.0),
            uv: vec2(0.0, 0.0),
        },
    ];

    // Counterclockwise, the default OpenGL front winding direction.
    let indices = vec![0, 3, 1, 1, 3, 2];
    (vertices, indices)
}

/// A red unit quad sitting between the world and the UI, for marking
/// positions while debugging.
pub fn debug_line_quad() -> (Vec<ColoredVertex>, Vec<u32>) {
    const DEPTH: f32 = 0.5;
    const RED: Vec3 = Vec3::new(0.8, 0.1, 0.1);

    let vertices = vec![
        ColoredVertex {
            position: vec3(-0.5, -0.5, DEPTH),
            color: RED,
        },
        ColoredVertex {
            position: vec3(-0.5, 0.5, DEPTH),
            color: RED,
        },
        ColoredVertex {
            position: vec3(0.5, 0.5, DEPTH),
            color: RED,
        },
        ColoredVertex {
            position: vec3(0.5, -0.5, DEPTH),
            color: RED,
        },
    ];

    let indices = vec![0, 1, 3, 1, 2, 3];
    (vertices, indices)
}

/// A single triangle large enough to cover the whole screen in clip space.
pub fn screen_triangle() -> (Vec<PositionVertex>, Vec<u32>) {
    let vertices = vec![
        PositionVertex {
            position: vec3(-1.0, -6.0, 0.0),
        },
        PositionVertex {
            position: vec3(6.0, -1.0, 0.0),
        },
        PositionVertex {
            position: vec3(-1.0, 6.0, 0.0),
        },
    ];

    let indices = vec![0, 1, 2];
    (vertices, indices)
}

/// An OBJ mesh on the CPU side: positions normalized into the unit box,
/// with the extents it had on disk retained for sizing in the world.
#[derive(Debug)]
pub struct MeshData {
    pub vertices: Vec<ColoredVertex>,
    pub indices: Vec<u32>,
    pub original_extents: Vec3,
}

/// Parses an OBJ file into a [`MeshData`], triangulated with a single index
/// stream. Per-vertex colors are honored where the file carries them.
pub fn load_obj(path: &Path) -> Result<MeshData, RenderError> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| RenderError::Mesh {
        path: path.to_path_buf(),
        source,
    })?;

    let mut positions: Vec<Vec3> = Vec::new();
    let mut colors: Vec<Vec3> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let base = positions.len() as u32;
        for i in 0..mesh.positions.len() / 3 {
            positions.push(vec3(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ));
            colors.push(if mesh.vertex_color.len() >= (i + 1) * 3 {
                vec3(
                    mesh.vertex_color[i * 3],
                    mesh.vertex_color[i * 3 + 1],
                    mesh.vertex_color[i * 3 + 2],
                )
            } else {
                vec3(0.6, 0.6, 0.6)
            });
        }
        indices.extend(mesh.indices.iter().map(|&i| base + i));
    }

    if positions.is_empty() || indices.is_empty() {
        return Err(RenderError::EmptyMesh {
            path: path.to_path_buf(),
        });
    }

    let mut min = positions[0];
    let mut max = positions[0];
    for p in &positions {
        min = min.min(*p);
        max = max.max(*p);
    }
    let extents = max - min;
    let center = (min + max) / 2.0;

    // Normalize each axis into [-0.5, 0.5]; flat axes collapse to zero.
    let vertices = positions
        .iter()
        .zip(&colors)
        .map(|(p, c)| {
            let rel = *p - center;
            let position = vec3(
                if extents.x > 0.0 { rel.x / extents.x } else { 0.0 },
                if extents.y > 0.0 { rel.y / extents.y } else { 0.0 },
                if extents.z > 0.0 { rel.z / extents.z } else { 0.0 },
            );
            ColoredVertex {
                position,
                color: *c,
            }
        })
        .collect();

    Ok(MeshData {
        vertices,
        indices,
        original_extents: extents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fish_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/meshes/fish.obj")
    }

    #[test]
    fn sprite_quad_is_a_centered_unit_quad() {
        let (vertices, indices) = sprite_quad();
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices.len(), 6);
        for v in &vertices {
            let position = v.position;
            assert!(position.x.abs() == 0.5 && position.y.abs() == 0.5);
            assert_eq!(position.z, 0.0);
            let uv = v.uv;
            assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y));
        }
    }

    #[test]
    fn sprite_quad_triangles_wind_counterclockwise() {
        let (vertices, indices) = sprite_quad();
        for triangle in indices.chunks(3) {
            let a = vertices[triangle[0] as usize].position;
            let b = vertices[triangle[1] as usize].position;
            let c = vertices[triangle[2] as usize].position;
            let signed_area = (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y);
            assert!(signed_area > 0.0, "triangle {triangle:?} winds clockwise");
        }
    }

    #[test]
    fn debug_quad_sits_at_mid_depth_and_is_red() {
        let (vertices, indices) = debug_line_quad();
        assert_eq!(indices.len(), 6);
        for v in &vertices {
            let position = v.position;
            let color = v.color;
            assert_eq!(position.z, 0.5);
            assert_eq!(color, Vec3::new(0.8, 0.1, 0.1));
        }
    }

    #[test]
    fn screen_triangle_covers_clip_space() {
        let (vertices, indices) = screen_triangle();
        assert_eq!(indices, vec![0, 1, 2]);
        // The triangle's bounding box must contain the [-1, 1] square.
        let mut min = vertices[0].position;
        let mut max = vertices[0].position;
        for v in &vertices {
            let position = v.position;
            min = min.min(position);
            max = max.max(position);
        }
        assert!(min.x <= -1.0 && min.y <= -1.0);
        assert!(max.x >= 1.0 && max.y >= 1.0);
    }

    #[test]
    fn fish_mesh_normalizes_into_the_unit_box() {
        let data = load_obj(&fish_path()).unwrap();
        assert!(!data.vertices.is_empty());
        assert_eq!(data.indices.len() % 3, 0);
        for v in &data.vertices {
            let position = v.position;
            for value in [position.x, position.y, position.z] {
                assert!((-0.5..=0.5).contains(&value), "{value} outside unit box");
            }
        }
    }

    #[test]
    fn fish_mesh_keeps_its_original_extents() {
        let data = load_obj(&fish_path()).unwrap();
        let extents = data.original_extents;
        assert!((extents.x - 2.8).abs() < 1e-5);
        assert!((extents.y - 1.4).abs() < 1e-5);
        assert_eq!(extents.z, 0.0);
    }

    #[test]
    fn fish_mesh_carries_vertex_colors() {
        let data = load_obj(&fish_path()).unwrap();
        assert!(data.vertices.iter().any(|v| {
            let color = v.color;
            color != Vec3::new(0.6, 0.6, 0.6)
        }));
    }

    #[test]
    fn missing_obj_reports_the_path() {
        let err = load_obj(Path::new("assets/meshes/no_such.obj")).unwrap_err();
        assert!(err.to_string().contains("no_such.obj"));
    }
}
