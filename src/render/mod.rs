//! One-shot setup of every GPU resource the game renders with.
//!
//! [`RenderSystem::new`] walks the fixed resource lists in order (screen
//! target, textures, effects, geometry, animation tables) and stops at the
//! first failure. After it returns, every ID enum below indexes a populated
//! table slot, and dropping the system releases every handle it acquired.

pub mod animation;
pub mod geometry;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use fxhash::FxHashMap;

use crate::abs::{App, Framebuffer, Mesh, Shader, ShaderProgram, Texture, gl_error};
use crate::error::RenderError;
use animation::{Animation, AnimationState, cat_animations, dog_animations, villager_animations};
use geometry::MeshData;

/// Still images and sprite sheets uploaded at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    GrassTile,
    Fish,
    CatSheet,
    DogSheet,
    VillagerSheet,
}

impl TextureId {
    pub const ALL: [TextureId; 5] = [
        TextureId::GrassTile,
        TextureId::Fish,
        TextureId::CatSheet,
        TextureId::DogSheet,
        TextureId::VillagerSheet,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            TextureId::GrassTile => "grass_tile.png",
            TextureId::Fish => "fish.png",
            TextureId::CatSheet => "cat_sheet.png",
            TextureId::DogSheet => "dog_sheet.png",
            TextureId::VillagerSheet => "villager_sheet.png",
        }
    }
}

/// Shader programs, each loaded from `<stem>.vs.glsl` / `<stem>.fs.glsl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectId {
    Colored,
    Textured,
    AnimatedSprite,
    PostProcess,
}

impl EffectId {
    pub const ALL: [EffectId; 4] = [
        EffectId::Colored,
        EffectId::Textured,
        EffectId::AnimatedSprite,
        EffectId::PostProcess,
    ];

    pub fn stem(self) -> &'static str {
        match self {
            EffectId::Colored => "colored",
            EffectId::Textured => "textured",
            EffectId::AnimatedSprite => "animated_sprite",
            EffectId::PostProcess => "post_process",
        }
    }
}

/// Vertex/index buffers built at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryId {
    Sprite,
    DebugLine,
    ScreenTriangle,
    Fish,
}

impl GeometryId {
    pub const ALL: [GeometryId; 4] = [
        GeometryId::Sprite,
        GeometryId::DebugLine,
        GeometryId::ScreenTriangle,
        GeometryId::Fish,
    ];

    /// The OBJ file backing this geometry, for meshes that come from disk.
    pub fn obj_file(self) -> Option<&'static str> {
        match self {
            GeometryId::Fish => Some("fish.obj"),
            _ => None,
        }
    }
}

pub fn texture_path(file_name: &str) -> PathBuf {
    ["assets", "textures", file_name].iter().collect()
}

pub fn mesh_path(file_name: &str) -> PathBuf {
    ["assets", "meshes", file_name].iter().collect()
}

pub fn shader_path(file_name: &str) -> PathBuf {
    ["shaders", file_name].iter().collect()
}

/// Owns every GPU resource: textures, effects, geometry, the off-screen
/// render target and the animation tables.
pub struct RenderSystem {
    textures: Vec<Texture>,
    effects: Vec<ShaderProgram>,
    geometry: Vec<Mesh>,
    mesh_data: FxHashMap<GeometryId, MeshData>,
    screen: Framebuffer,
    pub cat_animations: FxHashMap<AnimationState, Animation>,
    pub dog_animations: FxHashMap<AnimationState, Animation>,
    pub villager_animations: FxHashMap<AnimationState, Animation>,
}

impl RenderSystem {
    /// Brings up the whole graphics state for the game. Resources load in a
    /// fixed order; the first failure aborts with the offending file or the
    /// driver's diagnostic attached.
    pub fn new(app: &App) -> Result<Self, RenderError> {
        let gl = Arc::clone(&app.gl);

        let (width, height) = app.drawable_size();
        let screen = Framebuffer::new(&gl, width as i32, height as i32, true);
        check_gl(&gl, "screen target setup")?;

        let mut textures = Vec::with_capacity(TextureId::ALL.len());
        for id in TextureId::ALL {
            let path = texture_path(id.file_name());
            let image = image::open(&path).map_err(|source| RenderError::Image {
                path: path.clone(),
                source,
            })?;
            let texture = Texture::new(&gl, &image);
            log::debug!(
                "loaded texture {:?} ({}x{}) from {}",
                id,
                texture.width(),
                texture.height(),
                path.display()
            );
            textures.push(texture);
        }
        check_gl(&gl, "texture upload")?;

        let mut effects = Vec::with_capacity(EffectId::ALL.len());
        for id in EffectId::ALL {
            effects.push(load_effect(&gl, id)?);
            log::debug!("linked effect {:?}", id);
        }
        check_gl(&gl, "effect linking")?;

        let mut geometry = Vec::with_capacity(GeometryId::ALL.len());
        let mut mesh_data = FxHashMap::default();
        for id in GeometryId::ALL {
            let mesh = match id {
                GeometryId::Sprite => {
                    let (vertices, indices) = geometry::sprite_quad();
                    Mesh::new(&gl, &vertices, &indices, glow::TRIANGLES)
                }
                GeometryId::DebugLine => {
                    let (vertices, indices) = geometry::debug_line_quad();
                    Mesh::new(&gl, &vertices, &indices, glow::TRIANGLES)
                }
                GeometryId::ScreenTriangle => {
                    let (vertices, indices) = geometry::screen_triangle();
                    Mesh::new(&gl, &vertices, &indices, glow::TRIANGLES)
                }
                GeometryId::Fish => {
                    let path = mesh_path(id.obj_file().expect("fish is an OBJ mesh"));
                    let data = geometry::load_obj(&path)?;
                    let mesh = Mesh::new(&gl, &data.vertices, &data.indices, glow::TRIANGLES);
                    mesh_data.insert(id, data);
                    mesh
                }
            };
            log::debug!("uploaded geometry {:?} ({} indices)", id, mesh.index_count());
            geometry.push(mesh);
        }
        check_gl(&gl, "geometry upload")?;

        Ok(Self {
            textures,
            effects,
            geometry,
            mesh_data,
            screen,
            cat_animations: cat_animations(),
            dog_animations: dog_animations(),
            villager_animations: villager_animations(),
        })
    }

    pub fn texture(&self, id: TextureId) -> &Texture {
        &self.textures[id as usize]
    }

    pub fn effect(&self, id: EffectId) -> &ShaderProgram {
        &self.effects[id as usize]
    }

    pub fn geometry(&self, id: GeometryId) -> &Mesh {
        &self.geometry[id as usize]
    }

    /// CPU-side data for geometry that came from an OBJ file.
    pub fn mesh_data(&self, id: GeometryId) -> Option<&MeshData> {
        self.mesh_data.get(&id)
    }

    /// The off-screen target the frame renders into before post-processing.
    pub fn screen_target(&self) -> &Framebuffer {
        &self.screen
    }

    /// Tracks a new drawable size after a window resize.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.screen.resize(width, height);
    }
}

fn load_effect(gl: &Arc<glow::Context>, id: EffectId) -> Result<ShaderProgram, RenderError> {
    let vs_path = shader_path(&format!("{}.vs.glsl", id.stem()));
    let fs_path = shader_path(&format!("{}.fs.glsl", id.stem()));

    let vs_source = fs::read_to_string(&vs_path).map_err(|source| RenderError::Io {
        path: vs_path.clone(),
        source,
    })?;
    let fs_source = fs::read_to_string(&fs_path).map_err(|source| RenderError::Io {
        path: fs_path.clone(),
        source,
    })?;

    let vertex =
        Shader::new(gl, glow::VERTEX_SHADER, &vs_source).map_err(|log| RenderError::Shader {
            name: vs_path.display().to_string(),
            log,
        })?;
    let fragment =
        Shader::new(gl, glow::FRAGMENT_SHADER, &fs_source).map_err(|log| RenderError::Shader {
            name: fs_path.display().to_string(),
            log,
        })?;

    ShaderProgram::new(gl, &[&vertex, &fragment]).map_err(|log| RenderError::Shader {
        name: id.stem().to_string(),
        log,
    })
}

fn check_gl(gl: &glow::Context, stage: &'static str) -> Result<(), RenderError> {
    match gl_error(gl) {
        Some(code) => Err(RenderError::Gl { stage, code }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::Path;

    #[test]
    fn texture_ids_index_their_table_in_order() {
        for (index, id) in TextureId::ALL.iter().enumerate() {
            assert_eq!(*id as usize, index);
        }
    }

    #[test]
    fn effect_ids_index_their_table_in_order() {
        for (index, id) in EffectId::ALL.iter().enumerate() {
            assert_eq!(*id as usize, index);
        }
    }

    #[test]
    fn geometry_ids_index_their_table_in_order() {
        for (index, id) in GeometryId::ALL.iter().enumerate() {
            assert_eq!(*id as usize, index);
        }
    }

    #[test]
    fn texture_file_names_are_unique() {
        let names: HashSet<_> = TextureId::ALL.iter().map(|id| id.file_name()).collect();
        assert_eq!(names.len(), TextureId::ALL.len());
    }

    #[test]
    fn effect_stems_are_unique() {
        let stems: HashSet<_> = EffectId::ALL.iter().map(|id| id.stem()).collect();
        assert_eq!(stems.len(), EffectId::ALL.len());
    }

    #[test]
    fn every_effect_has_both_shader_stages_on_disk() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        for id in EffectId::ALL {
            for suffix in [".vs.glsl", ".fs.glsl"] {
                let path = root.join(shader_path(&format!("{}{}", id.stem(), suffix)));
                assert!(path.is_file(), "missing shader source {}", path.display());
            }
        }
    }

    #[test]
    fn obj_backed_geometry_exists_on_disk() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        for id in GeometryId::ALL {
            if let Some(file) = id.obj_file() {
                let path = root.join(mesh_path(file));
                assert!(path.is_file(), "missing mesh {}", path.display());
            }
        }
    }

    #[test]
    fn paths_land_in_their_asset_directories() {
        assert_eq!(
            texture_path("cat_sheet.png"),
            Path::new("assets/textures/cat_sheet.png")
        );
        assert_eq!(mesh_path("fish.obj"), Path::new("assets/meshes/fish.obj"));
        assert_eq!(
            shader_path("colored.vs.glsl"),
            Path::new("shaders/colored.vs.glsl")
        );
    }
}
