//! CLI for qunet — heatmaps and key-rate figures from quantum network
//! simulation output.

mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use qunet_core::config::{
    REFERENCE_BINS, REFERENCE_DEPTH, REFERENCE_KDE_RESOLUTION, REFERENCE_P0,
    REFERENCE_RESOLUTION, REFERENCE_SWEEP_STEP,
};

#[derive(Parser)]
#[command(name = "qunet")]
#[command(about = "qunet — density heatmaps and key-rate figures for quantum network simulations")]
#[command(version = qunet_core::VERSION)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Binned (efficiency, fidelity) density of one sample file,
    /// optionally overlaid with key-rate contours and repeater curves
    Heatmap {
        /// CSV with Efficiency and Fidelity columns
        input: PathBuf,

        /// Image to write (.png, .bmp, .jpg or .svg)
        #[arg(long, short)]
        output: PathBuf,

        /// Bins per axis
        #[arg(long, default_value_t = REFERENCE_BINS)]
        bins: usize,

        /// Log-scale the colours; empty cells stay blank
        #[arg(long)]
        log: bool,

        /// Colour map: hot, plasma or cool
        #[arg(long, default_value = "hot")]
        colormap: String,

        /// Draw a colour bar
        #[arg(long)]
        colorbar: bool,

        /// Overlay key-rate iso-contours
        #[arg(long)]
        contours: bool,

        /// End-to-end failure rate for the key-rate bound
        #[arg(long, default_value_t = REFERENCE_P0)]
        p0: f64,

        /// Comma-separated contour levels (default: 0.01,0.05,0.1,...,0.6)
        #[arg(long)]
        levels: Option<String>,

        /// Key-rate grid step
        #[arg(long, default_value_t = REFERENCE_RESOLUTION)]
        resolution: f64,

        /// Overlay the analytic repeater curve family
        #[arg(long)]
        curves: bool,

        /// Number of curve stages
        #[arg(long, default_value_t = REFERENCE_DEPTH)]
        depth: usize,

        /// Efficiency step of the curve sweep
        #[arg(long, default_value_t = REFERENCE_SWEEP_STEP)]
        sweep_step: f64,
    },

    /// Gaussian kernel density estimate of one sample file
    Kde {
        input: PathBuf,

        #[arg(long, short)]
        output: PathBuf,

        /// Grid points per axis
        #[arg(long, default_value_t = REFERENCE_KDE_RESOLUTION)]
        resolution: usize,

        /// Bandwidth rule (scott, silverman) or a numeric factor
        #[arg(long, default_value = "scott")]
        bandwidth: String,

        #[arg(long, default_value = "hot")]
        colormap: String,
    },

    /// Counts along the diagonal of the density grid
    Diagonal {
        input: PathBuf,

        #[arg(long, short)]
        output: PathBuf,

        #[arg(long, default_value_t = REFERENCE_BINS)]
        bins: usize,
    },

    /// Log-scaled heatmaps of several files on one shared colour scale
    Grid {
        /// One CSV per panel, laid out row by row
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(long, short)]
        output: PathBuf,

        /// Panels per row
        #[arg(long, default_value = "3")]
        columns: usize,

        /// Comma-separated panel titles (default: file stems)
        #[arg(long)]
        titles: Option<String>,

        #[arg(long, default_value = "100")]
        bins: usize,

        #[arg(long, default_value = "plasma")]
        colormap: String,
    },

    /// Print the repeater curve family as a table
    Curves {
        #[arg(long, default_value_t = REFERENCE_DEPTH)]
        depth: usize,

        #[arg(long, default_value_t = REFERENCE_SWEEP_STEP)]
        sweep_step: f64,
    },

    /// Render every figure listed in a JSON batch file
    Batch {
        #[arg(long, short)]
        config: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Heatmap {
            input,
            output,
            bins,
            log,
            colormap,
            colorbar,
            contours,
            p0,
            levels,
            resolution,
            curves,
            depth,
            sweep_step,
        } => commands::heatmap::run(commands::heatmap::HeatmapCommandConfig {
            input: &input,
            output: &output,
            bins,
            log_scale: log,
            colormap: &colormap,
            colorbar,
            contours,
            p0,
            levels: levels.as_deref(),
            resolution,
            curves,
            depth,
            sweep_step,
        }),
        Commands::Kde {
            input,
            output,
            resolution,
            bandwidth,
            colormap,
        } => commands::kde::run(&input, &output, resolution, &bandwidth, &colormap),
        Commands::Diagonal {
            input,
            output,
            bins,
        } => commands::diagonal::run(&input, &output, bins),
        Commands::Grid {
            inputs,
            output,
            columns,
            titles,
            bins,
            colormap,
        } => commands::grid::run(
            &inputs,
            &output,
            columns,
            titles.as_deref(),
            bins,
            &colormap,
        ),
        Commands::Curves { depth, sweep_step } => commands::curves::run(depth, sweep_step),
        Commands::Batch { config } => commands::batch::run(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
