mod input;
mod loader;
mod viewer;

use std::path::PathBuf;

use clap::Parser;
use eframe::{NativeOptions, egui, run_native};
use heightmap::ViewerConfig;
use tracing_subscriber::EnvFilter;

use crate::viewer::ViewerApp;

#[derive(Parser, Debug)]
#[command(name = "heightmap-viewer", about = "Render an image as a 3D heightmap")]
struct Args {
    /// Image to load on startup
    #[arg(long)]
    image: Option<PathBuf>,

    /// TOML file overriding camera and input settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial window width
    #[arg(long, default_value_t = 1024.0)]
    width: f32,

    /// Initial window height
    #[arg(long, default_value_t = 768.0)]
    height: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let opts = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height])
            .with_min_inner_size([400.0, 300.0]),
        renderer: eframe::Renderer::Glow,
        // the 3D view depth-tests inside egui's framebuffer
        depth_buffer: 24,
        ..Default::default()
    };
    let initial_image = args.image;
    run_native(
        "Heightmap Viewer",
        opts,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, config, initial_image)?))),
    )?;
    Ok(())
}
