/// Runtime configuration and command line.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use softrast_core::{Projection, RenderSettings};

use crate::error::AppError;

/// Settings for the terminal viewer, read from an optional TOML file.
///
/// Missing keys take their default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Target frames per second.
    pub fps: u32,
    /// Vertical field of view.
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Distance along +z at which the mesh is placed.
    pub mesh_distance: f32,
    /// Mesh rotation per second around x, y, z (radians).
    pub spin: [f32; 3],
    /// Light direction in camera space.
    pub light_direction: [f32; 3],
    /// Units moved per second while an arrow key is held.
    pub camera_speed: f32,
    /// Radians turned per second while an arrow key is held.
    pub camera_turn_speed: f32,
    pub render: RenderSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            fov_degrees: 100.0,
            znear: 0.1,
            zfar: 100.0,
            mesh_distance: 5.0,
            spin: [-0.3, -0.3, -0.3],
            light_direction: [0.0, 0.0, 1.0],
            camera_speed: 5.0,
            camera_turn_speed: 1.5,
            render: RenderSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml(&source)?;
        log::info!("loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(source)?)
    }

    pub fn to_toml(&self) -> Result<String, AppError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Time budget of one frame. A zero `fps` is treated as 1.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }

    pub fn projection(&self, width: u32, height: u32) -> Projection {
        Projection::new(
            width,
            height,
            self.fov_degrees.to_radians(),
            self.znear,
            self.zfar,
        )
    }

    pub fn spin(&self) -> Vector3<f32> {
        Vector3::from(self.spin)
    }

    pub fn light_direction(&self) -> Vector3<f32> {
        Vector3::from(self.light_direction)
    }
}

/// Parsed command line arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandLine {
    pub config: Option<PathBuf>,
    pub print_config: bool,
    pub mesh: Option<PathBuf>,
    pub texture: Option<PathBuf>,
}

impl CommandLine {
    /// Parses arguments, not including the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut command_line = Self::default();
        let mut positional = Vec::new();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args
                        .next()
                        .ok_or_else(|| AppError::Usage(format!("{} needs a file argument", arg)))?;
                    command_line.config = Some(PathBuf::from(path));
                }
                "--print-config" => command_line.print_config = true,
                flag if flag.starts_with('-') => {
                    return Err(AppError::Usage(format!("unknown option `{}`", flag)));
                }
                _ => positional.push(PathBuf::from(arg)),
            }
        }

        let mut positional = positional.into_iter();
        command_line.mesh = positional.next();
        command_line.texture = positional.next();
        if let Some(extra) = positional.next() {
            return Err(AppError::Usage(format!("unexpected argument {:?}", extra)));
        }
        Ok(command_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use softrast_core::{CullMode, RenderMode};

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = AppConfig::from_toml(
            r#"
fps = 60
spin = [0.0, 1.0, 0.0]

[render]
render_mode = "textured_wireframe"
cull_mode = "none"
background = 0xFF102030
"#,
        )
        .unwrap();
        assert_eq!(config.fps, 60);
        assert_eq!(config.spin, [0.0, 1.0, 0.0]);
        assert_eq!(config.zfar, 100.0);
        assert_eq!(config.render.render_mode, RenderMode::TexturedWireframe);
        assert_eq!(config.render.cull_mode, CullMode::None);
        assert_eq!(config.render.background, 0xFF10_2030);
        assert!(config.render.draw_grid);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            AppConfig::from_toml("fps = \"fast\""),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[render]\nrender_mode = \"pointcloud\""),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_written_config_reads_back() {
        let mut config = AppConfig::default();
        config.fov_degrees = 75.0;
        config.render = config.render.with_render_mode(RenderMode::Filled);
        let text = config.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_frame_interval() {
        let config = AppConfig::default();
        assert_eq!(config.frame_interval().as_millis(), 33);
        let stalled = AppConfig { fps: 0, ..AppConfig::default() };
        assert_eq!(stalled.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_projection_uses_degrees() {
        let projection = AppConfig::default().projection(80, 40);
        assert!((projection.fov - 100f32.to_radians()).abs() < 1e-6);
        assert!((projection.aspect - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_command_line() {
        let args = CommandLine::parse(["--config", "view.toml", "ship.obj", "hull.png"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("view.toml")));
        assert_eq!(args.mesh, Some(PathBuf::from("ship.obj")));
        assert_eq!(args.texture, Some(PathBuf::from("hull.png")));
        assert!(!args.print_config);

        assert_eq!(CommandLine::parse(Vec::<String>::new()).unwrap(), CommandLine::default());
        assert!(CommandLine::parse(["--print-config"]).unwrap().print_config);
    }

    #[test]
    fn test_command_line_errors() {
        assert!(matches!(CommandLine::parse(["--config"]), Err(AppError::Usage(_))));
        assert!(matches!(CommandLine::parse(["--verbose"]), Err(AppError::Usage(_))));
        assert!(matches!(
            CommandLine::parse(["a.obj", "b.png", "c"]),
            Err(AppError::Usage(_))
        ));
    }
}
