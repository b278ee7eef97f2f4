//! wave-plot - render 1D wave snapshots to PNG frames
//!
//! Usage:
//!   wave-plot render [DIR]     # DIR/CSV_data/time_<k>.csv -> DIR/Images/time_<k>.png
//!   wave-plot simulate [DIR]   # write DIR/CSV_data from DIR/simulation_Parameters.txt
//!   wave-plot info [DIR]       # print parameters and derived discretization
//!
//! Log level follows RUST_LOG (default: info).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use wave_plot::io::{PlotStyle, read_parameter_file};
use wave_plot::layout::DEFAULT_DATA_DIR;
use wave_plot::{
    DataLayout, Discretization, FrameRenderer, RenderConfig, SimulationConfig, WaveSimulation,
};

#[derive(Parser, Debug)]
#[command(name = "wave-plot")]
#[command(about = "Render 1D wave simulation snapshots to PNG frames")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render every snapshot to a PNG frame
    Render(RenderArgs),
    /// Run the finite-difference solver and write snapshots
    Simulate(SimulateArgs),
    /// Show parameters and the derived discretization
    Info(DirArg),
}

#[derive(Args, Debug)]
struct DirArg {
    /// Working directory holding simulation_Parameters.txt
    #[arg(default_value = DEFAULT_DATA_DIR)]
    dir: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    dir: DirArg,

    /// Render every N-th step
    #[arg(long, default_value = "1")]
    stride: usize,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<usize>,

    /// Frame width in pixels
    #[arg(long, default_value = "1920")]
    width: u32,

    /// Frame height in pixels
    #[arg(long, default_value = "1500")]
    height: u32,

    /// Snapshot rows have no leading label cell
    #[arg(long)]
    no_label_column: bool,

    /// Curve and boundary markers only, no text
    #[arg(long)]
    bare: bool,

    /// Read snapshots from this directory instead of DIR/CSV_data
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Write frames to this directory instead of DIR/Images
    #[arg(long)]
    image_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    dir: DirArg,

    /// Stop after this many steps
    #[arg(long)]
    max_steps: Option<usize>,

    /// Write rows without the leading time cell
    #[arg(long)]
    no_label_column: bool,
}

fn layout_for(args: &RenderArgs) -> DataLayout {
    let mut layout = DataLayout::new(&args.dir.dir);
    if let Some(ref csv_dir) = args.csv_dir {
        layout = layout.with_csv_dir(csv_dir);
    }
    if let Some(ref image_dir) = args.image_dir {
        layout = layout.with_image_dir(image_dir);
    }
    layout
}

fn render(args: RenderArgs) -> Result<()> {
    let layout = layout_for(&args);

    let style = if args.bare {
        PlotStyle::bare()
    } else {
        PlotStyle::default()
    }
    .with_size(args.width, args.height);

    let mut config = RenderConfig::default()
        .with_stride(args.stride)
        .with_label_column(!args.no_label_column)
        .with_style(style);
    if let Some(max) = args.max_frames {
        config = config.with_max_frames(max);
    }

    let renderer = FrameRenderer::from_layout(&layout)
        .with_context(|| format!("loading run in {}", layout.root().display()))?
        .with_config(config);
    let result = renderer.run().context("rendering frames")?;

    info!(
        "{} frames in {} ({:.2}s)",
        result.n_frames,
        layout.image_dir().display(),
        result.wall_time
    );
    Ok(())
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let layout = DataLayout::new(&args.dir.dir);

    let mut config = SimulationConfig::default().with_label_column(!args.no_label_column);
    if let Some(max) = args.max_steps {
        config = config.with_max_steps(max);
    }

    let sim = WaveSimulation::from_layout(&layout)
        .with_context(|| format!("loading parameters in {}", layout.root().display()))?
        .with_config(config);
    let result = sim.run().context("running simulation")?;

    info!(
        "{} snapshots in {} ({:.2}s)",
        result.n_steps,
        layout.csv_dir().display(),
        result.wall_time
    );
    Ok(())
}

fn show_info(args: DirArg) -> Result<()> {
    let layout = DataLayout::new(&args.dir);
    let path = layout.parameter_file();
    let params =
        read_parameter_file(&path).with_context(|| format!("reading {}", path.display()))?;
    let grid = Discretization::from_parameters(&params);

    info!("------- Simulation Parameters -------");
    info!("Domain Length : {}", params.length);
    info!("Wavelength    : {}", params.wavelength);
    info!("Wave Speed    : {}", params.wave_speed);
    info!("CFL Condition : {}", params.cfl);
    info!("Total Time (T): {}", params.total_time);
    info!("-------------------------------------");
    info!("dx = {:.6e}, dt = {:.6e}", grid.dx, grid.dt);
    info!("{} grid points, {} steps", grid.n_points(), grid.n_steps);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => render(args),
        Commands::Simulate(args) => simulate(args),
        Commands::Info(args) => show_info(args),
    }
}
