mod animate;
mod config;
mod renderer;
mod settings;
mod terminal;

use clap::Parser;
use config::{AnimConfig, RenderConfig};
use settings::Settings;
use std::io;

#[derive(Parser)]
#[command(name = "termdonut")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.2.0")]
#[command(about = "Terminal-based rotating donut: a software-rasterized torus in ascii", long_about = None)]
struct Cli {
    /// Print frames to stdout instead of animating in the terminal
    #[arg(short, long)]
    print: bool,

    /// Number of frames to print in print mode
    #[arg(short = 'n', long, default_value = "1")]
    frames: u32,

    /// Grid width in print mode (interactive mode uses the terminal size)
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Grid height in print mode
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Animation step delay in seconds
    #[arg(short, long)]
    time: Option<f32>,

    /// Per-frame rotation rate about the x axis (radians)
    #[arg(long)]
    rate_a: Option<f32>,

    /// Per-frame rotation rate about the z axis (radians)
    #[arg(long)]
    rate_b: Option<f32>,

    /// Starting rotation about the x axis (radians)
    #[arg(short = 'A', long)]
    angle_a: Option<f32>,

    /// Starting rotation about the z axis (radians)
    #[arg(short = 'B', long)]
    angle_b: Option<f32>,

    /// Shading characters from dimmest to brightest
    #[arg(long)]
    palette: Option<String>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let mut render_cfg = RenderConfig::default();
    let mut anim_cfg = AnimConfig::default();
    Settings::load().apply(&mut render_cfg, &mut anim_cfg);

    if let Some(w) = cli.width {
        render_cfg.width = w;
    }
    if let Some(h) = cli.height {
        render_cfg.height = h;
    }
    if let Some(palette) = &cli.palette {
        render_cfg.palette = palette.chars().collect();
    }
    if let Some(t) = cli.time {
        anim_cfg.time_step = t;
    }
    if let Some(r) = cli.rate_a {
        anim_cfg.rate_a = r;
    }
    if let Some(r) = cli.rate_b {
        anim_cfg.rate_b = r;
    }
    if let Some(a) = cli.angle_a {
        anim_cfg.start_a = a;
    }
    if let Some(b) = cli.angle_b {
        anim_cfg.start_b = b;
    }

    if let Err(msg) = render_cfg.validate() {
        eprintln!("invalid configuration: {}", msg);
        return Err(io::Error::new(io::ErrorKind::InvalidInput, msg));
    }

    if cli.print {
        animate::print_frames(&render_cfg, &anim_cfg, cli.frames)
    } else {
        animate::run(&render_cfg, &anim_cfg)
    }
}
