/// softrast core library: a CPU rasterization pipeline.
///
/// Meshes are transformed into view space, backface culled, projected,
/// ordered back to front and scan converted into a packed-pixel frame
/// buffer. Presentation is left to the front-end crates.

pub mod color;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod math;
pub mod obj;
pub mod projection;
pub mod raster;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod transform;
pub mod triangle;
pub mod visibility;

// Re-export commonly used types
pub use error::RenderError;
pub use framebuffer::FrameBuffer;
pub use geometry::{Face, Mesh};
pub use projection::Projection;
pub use renderer::{FrameStats, RenderMode, RenderSettings, Renderer};
pub use scene::{Camera, Light, Scene};
pub use texture::Texture;
pub use transform::MeshTransform;
pub use triangle::Triangle;
pub use visibility::CullMode;
