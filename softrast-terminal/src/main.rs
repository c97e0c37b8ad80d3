/// softrast terminal viewer
///
/// Usage: softrast-terminal [--config FILE] [--print-config] [MESH.obj] [TEXTURE.png]
///
/// Controls:
///   - 1-6: render mode
///   - C/D: backface culling on/off
///   - G: reference grid
///   - Arrow keys: move and turn the camera
///   - Q/ESC: Quit
use std::process::ExitCode;

use softrast_terminal::{assets, AppConfig, AppError, CommandLine, TerminalApp};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("softrast-terminal: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let args = CommandLine::parse(std::env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let mesh = assets::load_mesh(args.mesh.as_deref())?;
    let texture = match &args.texture {
        Some(path) => assets::load_texture(path)?,
        None => assets::default_texture(),
    };

    println!(
        "Starting softrast ({} vertices, {} faces), press Q to quit...",
        mesh.vertices.len(),
        mesh.faces.len()
    );
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(mesh, Some(texture), config)?;
    app.run()
}
