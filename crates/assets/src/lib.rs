//! Asset providers for the cube field demo.
//!
//! The renderer consumes shader source and texture pixels through the
//! provider traits here, never through raw file paths. Hosts pick an
//! implementation: embedded shaders, file-backed images with a procedural
//! fallback for running without asset files.

use std::path::PathBuf;

pub mod shaders;

/// Logical name of the vertex-stage shader module.
pub const VERTEX_SHADER: &str = "cube.vert";
/// Logical name of the fragment-stage shader module.
pub const FRAGMENT_SHADER: &str = "cube.frag";
/// Logical name of the primary (crate) texture.
pub const CONTAINER_TEXTURE: &str = "container";
/// Logical name of the secondary (face) texture.
pub const FACE_TEXTURE: &str = "awesomeface";

/// Decoded RGBA8 pixels, row-major, already flipped to texture orientation.
#[derive(Debug, Clone)]
pub struct PixelData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("unknown asset: {0}")]
    Unknown(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Supplies shader source modules by logical name.
pub trait ShaderProvider {
    fn source(&self, name: &str) -> Result<String, AssetError>;
}

/// Supplies texture pixels by logical name.
pub trait TextureProvider {
    fn pixels(&self, name: &str) -> Result<PixelData, AssetError>;
}

/// Shader pair compiled into the binary.
#[derive(Debug, Default)]
pub struct EmbeddedShaders;

impl ShaderProvider for EmbeddedShaders {
    fn source(&self, name: &str) -> Result<String, AssetError> {
        match name {
            VERTEX_SHADER => Ok(shaders::CUBE_VERTEX.to_string()),
            FRAGMENT_SHADER => Ok(shaders::CUBE_FRAGMENT.to_string()),
            other => Err(AssetError::Unknown(other.to_string())),
        }
    }
}

/// Textures decoded from image files under a root directory.
///
/// Images are flipped vertically at load so texcoord (0,0) addresses the
/// bottom-left texel.
#[derive(Debug)]
pub struct FileTextures {
    root: PathBuf,
}

impl FileTextures {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> Option<PathBuf> {
        let file = match name {
            CONTAINER_TEXTURE => "container.jpg",
            FACE_TEXTURE => "awesomeface.png",
            _ => return None,
        };
        Some(self.root.join(file))
    }
}

impl TextureProvider for FileTextures {
    fn pixels(&self, name: &str) -> Result<PixelData, AssetError> {
        let path = self
            .path_for(name)
            .ok_or_else(|| AssetError::Unknown(name.to_string()))?;
        let decoded = image::open(&path).map_err(|source| match source {
            image::ImageError::IoError(source) => AssetError::Io {
                path: path.clone(),
                source,
            },
            source => AssetError::Decode {
                path: path.clone(),
                source,
            },
        })?;
        let rgba = decoded.flipv().to_rgba8();
        tracing::debug!(name, ?path, width = rgba.width(), height = rgba.height(), "texture loaded");
        Ok(PixelData {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }
}

/// Synthesized stand-in textures so the demo runs without asset files:
/// a wooden-ish checkerboard for the container, a disc on yellow for the
/// face.
#[derive(Debug, Default)]
pub struct ProceduralTextures;

const PROCEDURAL_SIZE: u32 = 256;

impl TextureProvider for ProceduralTextures {
    fn pixels(&self, name: &str) -> Result<PixelData, AssetError> {
        match name {
            CONTAINER_TEXTURE => Ok(checkerboard(PROCEDURAL_SIZE)),
            FACE_TEXTURE => Ok(disc(PROCEDURAL_SIZE)),
            other => Err(AssetError::Unknown(other.to_string())),
        }
    }
}

fn checkerboard(size: u32) -> PixelData {
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let light = ((x / 32) + (y / 32)) % 2 == 0;
            if light {
                rgba.extend_from_slice(&[0xb5, 0x7a, 0x3c, 0xff]);
            } else {
                rgba.extend_from_slice(&[0x6e, 0x45, 0x1e, 0xff]);
            }
        }
    }
    PixelData {
        width: size,
        height: size,
        rgba,
    }
}

fn disc(size: u32) -> PixelData {
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    let center = size as f32 / 2.0;
    let radius = size as f32 * 0.4;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            if (dx * dx + dy * dy).sqrt() <= radius {
                rgba.extend_from_slice(&[0xf2, 0xd4, 0x2c, 0xff]);
            } else {
                rgba.extend_from_slice(&[0x20, 0x20, 0x20, 0xff]);
            }
        }
    }
    PixelData {
        width: size,
        height: size,
        rgba,
    }
}
