use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while bringing up the graphics subsystem.
///
/// There is no recovery from any of these: the caller reports the chain and
/// exits.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("window setup failed: {0}")]
    Window(String),

    #[error("could not read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode image {}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not parse mesh {}", path.display())]
    Mesh {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("mesh {} contains no geometry", path.display())]
    EmptyMesh { path: PathBuf },

    #[error("shader {name}: {log}")]
    Shader { name: String, log: String },

    #[error("OpenGL error {code:#06x} during {stage}")]
    Gl { stage: &'static str, code: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_error_carries_the_driver_log() {
        let err = RenderError::Shader {
            name: "post_process.fs.glsl".to_string(),
            log: "0:12(3): error: syntax error".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("post_process.fs.glsl"));
        assert!(text.contains("syntax error"));
    }

    #[test]
    fn io_error_keeps_its_source() {
        let err = RenderError::Io {
            path: PathBuf::from("assets/textures/cat_sheet.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("cat_sheet.png"));
    }

    #[test]
    fn gl_error_formats_the_code_as_hex() {
        let err = RenderError::Gl {
            stage: "texture upload",
            code: 0x0502,
        };
        assert_eq!(
            err.to_string(),
            "OpenGL error 0x0502 during texture upload"
        );
    }
}
