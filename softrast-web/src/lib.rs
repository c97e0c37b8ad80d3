/// softrast web: drives the software rasterizer from JavaScript and blits
/// each frame into an HTML canvas.
use nalgebra::Vector3;
use softrast_core::{
    color, Camera, CullMode, Light, Mesh, Projection, RenderMode, RenderSettings, Renderer, Scene,
    Texture,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

const MESH_DISTANCE: f32 = 5.0;
const FOV_DEGREES: f32 = 100.0;
const ZNEAR: f32 = 0.1;
const ZFAR: f32 = 100.0;
const CHECKER_DARK: u32 = color::pack(0x30, 0x60, 0xC0, 0xFF);

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebRenderer {
    renderer: Renderer,
    mesh: Mesh,
    texture: Texture,
    camera: Camera,
    light: Light,
    settings: RenderSettings,
    spin: Vector3<f32>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Creates a renderer for a `width` x `height` canvas showing the
    /// built-in cube.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Result<WebRenderer, JsValue> {
        let projection = Projection::new(width, height, FOV_DEGREES.to_radians(), ZNEAR, ZFAR);
        let renderer = Renderer::new(width, height, projection).map_err(js_error)?;
        let mut mesh = Mesh::cube(2.0);
        mesh.transform.translate(0.0, 0.0, MESH_DISTANCE);

        Ok(WebRenderer {
            renderer,
            mesh,
            texture: Texture::checkerboard(64, 64, 8, color::WHITE, CHECKER_DARK),
            camera: Camera::default(),
            light: Light::default(),
            settings: RenderSettings::default(),
            spin: Vector3::new(-0.3, -0.3, -0.3),
        })
    }

    pub fn width(&self) -> u32 {
        self.renderer.width()
    }

    pub fn height(&self) -> u32 {
        self.renderer.height()
    }

    /// Selects a render mode by its number key (1 to 6).
    pub fn set_render_mode(&mut self, mode: u8) -> Result<(), JsValue> {
        let mode = RenderMode::from_digit(mode)
            .ok_or_else(|| JsValue::from_str(&format!("unknown render mode {}", mode)))?;
        log::debug!("render mode: {}", mode.label());
        self.settings = self.settings.with_render_mode(mode);
        Ok(())
    }

    pub fn set_backface_culling(&mut self, enabled: bool) {
        let cull = if enabled { CullMode::Backface } else { CullMode::None };
        self.settings = self.settings.with_cull_mode(cull);
    }

    pub fn set_grid(&mut self, enabled: bool) {
        self.settings = self.settings.with_grid(enabled);
    }

    /// Sets the spin in radians per second around each axis.
    pub fn set_spin(&mut self, x: f32, y: f32, z: f32) {
        self.spin = Vector3::new(x, y, z);
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.renderer.resize(width, height).map_err(js_error)
    }

    /// Advances the animation by `dt` seconds and renders a frame.
    ///
    /// Returns the number of triangles drawn.
    pub fn tick(&mut self, dt: f32) -> Result<usize, JsValue> {
        let spin = self.spin * dt;
        self.mesh.transform.rotate(spin.x, spin.y, spin.z);

        let scene =
            Scene::new(&self.mesh, &self.camera, &self.light).with_texture(&self.texture);
        let stats = self
            .renderer
            .render_frame(&scene, &self.settings)
            .map_err(js_error)?;
        Ok(stats.drawn)
    }

    /// The current frame as RGBA bytes.
    pub fn pixels(&self) -> Vec<u8> {
        self.renderer.framebuffer().to_rgba8()
    }

    /// Copies the current frame into the canvas with id `canvas_id`,
    /// resizing the canvas to match.
    pub fn present(&self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id `{}`", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("`{}` is not a canvas", canvas_id)))?;

        let (width, height) = (self.width(), self.height());
        if canvas.width() != width || canvas.height() != height {
            canvas.set_width(width);
            canvas.set_height(height);
        }

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("unexpected context type"))?;

        let bytes = self.pixels();
        let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&bytes), width, height)?;
        context.put_image_data(&image, 0.0, 0.0)
    }
}
