/// Errors surfaced by the terminal viewer
use std::io;

use softrast_core::obj::ObjError;
use softrast_core::RenderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to load mesh: {0}")]
    Mesh(#[from] ObjError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("failed to load texture: {0}")]
    Image(#[from] image::ImageError),

    #[error("{0}\n\nusage: softrast-terminal [--config FILE] [--print-config] [MESH.obj] [TEXTURE.png]")]
    Usage(String),
}
