/// Per-frame orchestration: transform, cull, project, sort, rasterize.
use serde::{Deserialize, Serialize};

use crate::color;
use crate::error::RenderError;
use crate::framebuffer::FrameBuffer;
use crate::math;
use crate::projection::Projection;
use crate::raster;
use crate::scene::Scene;
use crate::texture::Texture;
use crate::transform;
use crate::triangle::Triangle;
use crate::visibility::{self, CullMode};

const GRID_SPACING: u32 = 10;

/// Which layers are drawn for each triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Wireframe,
    WireframeVertices,
    Filled,
    FilledWireframe,
    Textured,
    TexturedWireframe,
}

impl RenderMode {
    pub fn draws_wireframe(self) -> bool {
        matches!(
            self,
            Self::Wireframe | Self::WireframeVertices | Self::FilledWireframe | Self::TexturedWireframe
        )
    }

    pub fn draws_vertices(self) -> bool {
        self == Self::WireframeVertices
    }

    pub fn draws_filled(self) -> bool {
        matches!(self, Self::Filled | Self::FilledWireframe)
    }

    pub fn draws_textured(self) -> bool {
        matches!(self, Self::Textured | Self::TexturedWireframe)
    }

    /// The mode bound to number key `digit` (1 to 6).
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::WireframeVertices),
            2 => Some(Self::Wireframe),
            3 => Some(Self::Filled),
            4 => Some(Self::FilledWireframe),
            5 => Some(Self::Textured),
            6 => Some(Self::TexturedWireframe),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Wireframe => "wireframe",
            Self::WireframeVertices => "wireframe+vertices",
            Self::Filled => "filled",
            Self::FilledWireframe => "filled+wireframe",
            Self::Textured => "textured",
            Self::TexturedWireframe => "textured+wireframe",
        }
    }
}

/// Options read once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub render_mode: RenderMode,
    pub cull_mode: CullMode,
    /// Packed `0xAARRGGBB` clear color.
    pub background: u32,
    pub draw_grid: bool,
}

impl RenderSettings {
    pub fn with_render_mode(self, render_mode: RenderMode) -> Self {
        Self {
            render_mode,
            ..self
        }
    }

    pub fn with_cull_mode(self, cull_mode: CullMode) -> Self {
        Self { cull_mode, ..self }
    }

    pub fn with_grid(self, draw_grid: bool) -> Self {
        Self { draw_grid, ..self }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::default(),
            cull_mode: CullMode::default(),
            background: color::BLACK,
            draw_grid: true,
        }
    }
}

/// Triangle counts for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub faces: usize,
    pub culled: usize,
    pub drawn: usize,
}

/// Owns the frame buffer and turns scenes into pixels.
pub struct Renderer {
    framebuffer: FrameBuffer,
    projection: Projection,
}

impl Renderer {
    /// Creates a renderer with a `width` x `height` frame buffer. The
    /// projection's aspect ratio is taken from the dimensions.
    pub fn new(width: u32, height: u32, projection: Projection) -> Result<Self, RenderError> {
        let framebuffer = FrameBuffer::new(width, height)?;
        let mut projection = projection;
        projection.resize(width, height);
        log::info!(
            "renderer created: {}x{}, fov {:.2} rad, z {}..{}",
            width,
            height,
            projection.fov,
            projection.znear,
            projection.zfar
        );
        Ok(Self {
            framebuffer,
            projection,
        })
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    /// Reallocates the frame buffer for a new viewport.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == self.width() && height == self.height() {
            return Ok(());
        }
        self.framebuffer.resize(width, height)?;
        self.projection.resize(width, height);
        log::debug!("renderer resized to {}x{}", width, height);
        Ok(())
    }

    /// Transforms, culls, projects and lights every face, farthest first.
    ///
    /// The world and view matrices are built once for the whole mesh.
    pub fn prepare_triangles(
        &self,
        scene: &Scene<'_>,
        cull: CullMode,
    ) -> Result<Vec<Triangle>, RenderError> {
        let mesh = scene.mesh;
        let model_view =
            transform::model_view(&mesh.transform.world_matrix(), &scene.camera.view_matrix());
        let projection = self.projection.matrix();
        let (width, height) = (self.width(), self.height());

        let mut triangles = Vec::new();
        triangles
            .try_reserve(mesh.faces.len())
            .map_err(|source| RenderError::Allocation {
                what: "triangle list",
                source,
            })?;

        for face in &mesh.faces {
            let transformed = transform::transform_face(mesh, face, &model_view);
            let view_space = transformed.map(math::vec3_from_vec4);

            let normal = visibility::face_normal(&view_space);
            if !visibility::is_visible(cull, &normal, &view_space[0]) {
                continue;
            }

            let points = transformed
                .map(|vertex| self.projection.project_to_screen(&projection, vertex, width, height));
            let intensity = scene.light.intensity(&normal).clamp(0.0, 1.0);

            triangles.push(Triangle {
                points,
                texcoords: face.uvs,
                color: color::apply_intensity(face.color, intensity),
                intensity,
                avg_depth: visibility::average_depth(&transformed),
            });
        }

        visibility::sort_back_to_front(&mut triangles);
        Ok(triangles)
    }

    /// Renders one frame into the frame buffer.
    ///
    /// If the triangle list cannot be allocated the frame is skipped and the
    /// previous frame's pixels are left in place.
    pub fn render_frame(
        &mut self,
        scene: &Scene<'_>,
        settings: &RenderSettings,
    ) -> Result<FrameStats, RenderError> {
        let triangles = self
            .prepare_triangles(scene, settings.cull_mode)
            .map_err(|err| {
                log::warn!("skipping frame: {err}");
                err
            })?;

        self.framebuffer.clear(settings.background);
        if settings.draw_grid {
            self.framebuffer.draw_grid(GRID_SPACING, color::GRID);
        }

        for triangle in &triangles {
            self.draw_triangle(triangle, settings.render_mode, scene.texture);
        }

        let faces = scene.mesh.faces.len();
        let stats = FrameStats {
            faces,
            culled: faces - triangles.len(),
            drawn: triangles.len(),
        };
        log::trace!("frame rendered: {:?}", stats);
        Ok(stats)
    }

    /// Surfaces first, then the wireframe, then vertex markers on top.
    fn draw_triangle(&mut self, triangle: &Triangle, mode: RenderMode, texture: Option<&Texture>) {
        let fb = &mut self.framebuffer;

        if mode.draws_textured() {
            match texture {
                Some(texture) => raster::fill_textured_triangle(fb, triangle, texture),
                None => raster::fill_triangle(fb, triangle),
            }
        } else if mode.draws_filled() {
            raster::fill_triangle(fb, triangle);
        }

        if mode.draws_wireframe() {
            raster::draw_wireframe(fb, triangle, color::WHITE);
        }
        if mode.draws_vertices() {
            raster::draw_vertices(fb, triangle, color::RED);
        }
    }
}
