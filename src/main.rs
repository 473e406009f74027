use clap::Parser;
use dual_rasterizer::app::{run_cli, run_gui};
use dual_rasterizer::io::config::Config;
use log::info;

#[derive(Parser, Debug)]
#[command(name = "dual_rasterizer")]
#[command(version, about = "CPU triangle rasterizer with Lambert/Phong shading and normal mapping")]
struct Cli {
    /// TOML scene configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Render without a window and save the last frame
    #[arg(long)]
    headless: bool,

    /// Use the built-in demo scene instead of the configured meshes
    #[arg(long)]
    demo: bool,

    /// Number of frames to render in headless mode
    #[arg(long, value_name = "N")]
    frames: Option<usize>,

    /// Output image path in headless mode
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .filter_module("minifb", log::LevelFilter::Warn)
        .format_timestamp(None)
        .format_level(true)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config from '{}'", path);
            Config::load(path)?
        }
        None => Config::default(),
    };
    if let Some(frames) = cli.frames {
        config.render.frames = frames;
    }
    if let Some(output) = cli.output {
        config.render.output = output;
    }

    if cli.headless {
        run_cli(&config, cli.demo).map(|_| ())
    } else {
        run_gui(config, cli.config.as_deref(), cli.demo)
    }
}
