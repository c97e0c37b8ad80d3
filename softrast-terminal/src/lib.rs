/// Terminal front end: drives the software rasterizer and shows each frame
/// with 24-bit color half-block cells.
use crossterm::{
    cursor,
    event::{self, Event, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use softrast_core::{Camera, FrameStats, Light, Mesh, RenderSettings, Renderer, Scene, Texture};

pub mod assets;
pub mod config;
pub mod error;
pub mod input;
pub mod present;

pub use config::{AppConfig, CommandLine};
pub use error::AppError;
pub use input::Action;

/// Main application struct for terminal rendering
pub struct TerminalApp {
    config: AppConfig,
    mesh: Mesh,
    texture: Option<Texture>,
    camera: Camera,
    light: Light,
    settings: RenderSettings,
    renderer: Renderer,
    stats: FrameStats,
    status_row: u16,
    columns: u16,
    running: bool,
    last_update: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, texture: Option<Texture>, config: AppConfig) -> Result<Self, AppError> {
        let (columns, rows) = terminal::size()?;
        Self::with_size(mesh, texture, config, columns, rows)
    }

    /// Builds the app for a terminal of `columns` x `rows` cells without
    /// touching the terminal itself.
    pub fn with_size(
        mut mesh: Mesh,
        texture: Option<Texture>,
        config: AppConfig,
        columns: u16,
        rows: u16,
    ) -> Result<Self, AppError> {
        let (width, height) = present::viewport_for(columns, rows);
        let renderer = Renderer::new(width, height, config.projection(width, height))?;
        mesh.transform.translation.z = config.mesh_distance;

        Ok(Self {
            camera: Camera::default(),
            light: Light::new(config.light_direction()),
            settings: config.render,
            renderer,
            mesh,
            texture,
            config,
            stats: FrameStats::default(),
            status_row: rows.saturating_sub(1),
            columns,
            running: true,
            last_update: Instant::now(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        let target_frame_time = self.config.frame_interval();
        self.last_update = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }

            let dt = frame_start.duration_since(self.last_update).as_secs_f32();
            self.last_update = frame_start;
            self.update(dt);

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => {
                if let Some(action) = input::action_for(code) {
                    self.apply(action);
                }
            }
            Event::Resize(columns, rows) => self.resize(columns, rows),
            _ => {}
        }
    }

    /// Applies one input action. Camera steps cover one frame interval.
    pub fn apply(&mut self, action: Action) {
        let step = self.config.frame_interval().as_secs_f32();
        match action {
            Action::Quit => self.running = false,
            Action::SetRenderMode(mode) => {
                self.settings = self.settings.with_render_mode(mode);
            }
            Action::SetCullMode(cull) => self.settings = self.settings.with_cull_mode(cull),
            Action::ToggleGrid => {
                self.settings = self.settings.with_grid(!self.settings.draw_grid);
            }
            Action::Move(sign) => self.camera.move_forward(sign * self.config.camera_speed * step),
            Action::Turn(sign) => self.camera.turn(sign * self.config.camera_turn_speed * step),
        }
    }

    /// Resizes the frame buffer to a new terminal size.
    ///
    /// If the new buffer cannot be allocated the old one is kept.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        let (width, height) = present::viewport_for(columns, rows);
        match self.renderer.resize(width, height) {
            Ok(()) => {
                self.columns = columns;
                self.status_row = rows.saturating_sub(1);
            }
            Err(err) => log::warn!(
                "keeping {}x{} frame buffer: {}",
                self.renderer.width(),
                self.renderer.height(),
                err
            ),
        }
    }

    /// Advances the mesh spin by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let spin = self.config.spin() * dt;
        self.mesh.transform.rotate(spin.x, spin.y, spin.z);
    }

    /// Renders the scene into the frame buffer. A failed frame leaves the
    /// previous one in place.
    pub fn render_frame(&mut self) {
        let mut scene = Scene::new(&self.mesh, &self.camera, &self.light);
        if let Some(texture) = &self.texture {
            scene = scene.with_texture(texture);
        }
        if let Ok(stats) = self.renderer.render_frame(&scene, &self.settings) {
            self.stats = stats;
        }
    }

    pub fn status_line(&self) -> String {
        let line = format!(
            "softrast | FPS: {:.1} | {} | cull: {:?} | {} faces, {} culled, {} drawn | 1-6 mode, c/d cull, g grid, arrows move, q quit",
            self.fps,
            self.settings.render_mode.label(),
            self.settings.cull_mode,
            self.stats.faces,
            self.stats.culled,
            self.stats.drawn,
        );
        line.chars().take(usize::from(self.columns)).collect()
    }

    fn render(&mut self) -> io::Result<()> {
        self.render_frame();

        let mut stdout = stdout();
        present::draw(&mut stdout, self.renderer.framebuffer())?;

        // Status line below the image
        queue!(
            stdout,
            cursor::MoveTo(0, self.status_row),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            terminal::Clear(ClearType::UntilNewLine),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use softrast_core::{color, CullMode, RenderMode};

    fn app(columns: u16, rows: u16) -> TerminalApp {
        TerminalApp::with_size(
            Mesh::cube(2.0),
            Some(assets::default_texture()),
            AppConfig::default(),
            columns,
            rows,
        )
        .unwrap()
    }

    #[test]
    fn test_framebuffer_matches_terminal() {
        let app = app(80, 25);
        assert_eq!(app.renderer().width(), 80);
        assert_eq!(app.renderer().height(), 48);
        assert_eq!(app.mesh().transform.translation.z, 5.0);
    }

    #[test]
    fn test_actions_update_settings() {
        let mut app = app(40, 20);
        app.apply(Action::SetRenderMode(RenderMode::Textured));
        app.apply(Action::SetCullMode(CullMode::None));
        app.apply(Action::ToggleGrid);
        assert_eq!(app.settings().render_mode, RenderMode::Textured);
        assert_eq!(app.settings().cull_mode, CullMode::None);
        assert!(!app.settings().draw_grid);

        app.apply(Action::Quit);
        assert!(!app.is_running());
    }

    #[test]
    fn test_camera_actions() {
        let mut app = app(40, 20);
        app.apply(Action::Move(1.0));
        assert!(app.camera().position.z > 0.0);
        app.apply(Action::Turn(1.0));
        assert!(app.camera().yaw > 0.0);
        app.apply(Action::Turn(-1.0));
        app.apply(Action::Move(-1.0));
        assert!(app.camera().position.norm() < 1e-5);
    }

    #[test]
    fn test_update_spins_mesh() {
        let mut app = app(40, 20);
        app.update(0.5);
        let rotation = app.mesh().transform.rotation;
        assert!((rotation.x + 0.15).abs() < 1e-6);
        assert!((rotation.z + 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_render_frame_records_stats() {
        let mut app = app(60, 31);
        app.apply(Action::SetRenderMode(RenderMode::Filled));
        app.render_frame();
        let stats = app.stats();
        assert_eq!(stats.faces, 12);
        assert_eq!(stats.culled + stats.drawn, 12);
        assert!(stats.drawn > 0);

        let framebuffer = app.renderer().framebuffer();
        let center = framebuffer.get_pixel(30, 30).unwrap();
        assert_ne!(center, color::BLACK);
    }

    #[test]
    fn test_resize() {
        let mut app = app(40, 20);
        app.resize(100, 30);
        assert_eq!((app.renderer().width(), app.renderer().height()), (100, 58));
    }

    #[test]
    fn test_status_line_fits_width() {
        let app = app(20, 10);
        assert_eq!(app.status_line().chars().count(), 20);
        assert!(app.status_line().starts_with("softrast | FPS"));
    }
}
