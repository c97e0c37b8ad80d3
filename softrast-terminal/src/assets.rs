/// Mesh and texture sources for the viewer.
use std::path::Path;

use softrast_core::{color, obj, Mesh, Texture};

use crate::error::AppError;

const CHECKER_SIZE: u32 = 64;
const CHECKER_CELL: u32 = 8;

/// Loads an OBJ file, or the built-in cube when no path is given.
pub fn load_mesh(path: Option<&Path>) -> Result<Mesh, AppError> {
    match path {
        Some(path) => Ok(obj::load_obj(path)?),
        None => Ok(Mesh::cube(2.0)),
    }
}

/// Decodes an image file into a texture.
pub fn load_texture(path: &Path) -> Result<Texture, AppError> {
    let image = image::open(path)?.to_rgba8();
    let (width, height) = image.dimensions();
    let texture = Texture::from_rgba8(width, height, image.as_raw())?;
    log::info!("loaded texture {:?}: {}x{}", path, width, height);
    Ok(texture)
}

/// Texture used when none is given on the command line.
pub fn default_texture() -> Texture {
    Texture::checkerboard(
        CHECKER_SIZE,
        CHECKER_SIZE,
        CHECKER_CELL,
        color::WHITE,
        color::pack(0x30, 0x60, 0xC0, 0xFF),
    )
}
