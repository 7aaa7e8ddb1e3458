//! pterosphera CLI - keyboard case part generator
//!
//! Builds case halves and their fit-test parts from a TOML configuration
//! and writes them as binary STL.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use pterosphera::{
    build_btu_ring, build_case, build_socket, build_trackball_socket, layout_hand, LogObserver,
    SocketKind, TrackballOptions,
};
use pterosphera_export::export_stl;
use pterosphera_kernel::{SdfKernel, Solid};

mod config;

use config::ConfigFile;

#[derive(Parser)]
#[command(name = "pterosphera")]
#[command(about = "Parametric curved-column keyboard case generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a complete case half
    Case {
        /// Configuration file (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output STL file
        #[arg(short, long, default_value = "out/case.stl")]
        output: PathBuf,
    },
    /// Build the trackball socket on its own
    Trackball {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = "out/trackball.stl")]
        output: PathBuf,
        /// Include the ball, for previews
        #[arg(long)]
        with_ball: bool,
    },
    /// Build a single switch socket
    Switch {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = "out/switch.stl")]
        output: PathBuf,
        /// Export the opening die instead of the socket
        #[arg(long)]
        hole: bool,
    },
    /// Build a ball transfer unit, or the whole ring of them
    Btu {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = "out/btu.stl")]
        output: PathBuf,
        /// Place every unit around the ball
        #[arg(long)]
        ring: bool,
    },
    /// Build the trackball sensor mount
    Sensor {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = "out/sensor.stl")]
        output: PathBuf,
    },
    /// Print the computed column layout as JSON
    Layout {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write the default configuration
    InitConfig {
        /// Destination file
        #[arg(default_value = "pterosphera.toml")]
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let cli = Cli::parse();
    let kernel = SdfKernel::new();

    match cli.command {
        Commands::Case { config, output } => {
            let file = ConfigFile::load(config.as_deref())?;
            let model = build_case(&kernel, &file.model, &LogObserver)?;
            info!(
                "{} columns, {} elements, {} bridges, floor at z={:.2}",
                model.column_count, model.element_count, model.bridge_count, model.floor_z
            );
            write_part(&model.solid, &file, &output)?;
        }
        Commands::Trackball {
            config,
            output,
            with_ball,
        } => {
            let file = ConfigFile::load(config.as_deref())?;
            let options = TrackballOptions {
                include_trackball: with_ball,
            };
            let solid = build_trackball_socket(
                &kernel,
                &file.model.trackball,
                options,
                file.model.case.weld_shift,
            )?;
            write_part(&solid, &file, &output)?;
        }
        Commands::Switch {
            config,
            output,
            hole,
        } => {
            let file = ConfigFile::load(config.as_deref())?;
            let kind = if hole {
                SocketKind::SwitchHole(file.model.switch)
            } else {
                SocketKind::SwitchSocket(file.model.switch)
            };
            let solid = build_socket(&kernel, &kind, file.model.case.weld_shift)?;
            write_part(&solid, &file, &output)?;
        }
        Commands::Btu {
            config,
            output,
            ring,
        } => {
            let file = ConfigFile::load(config.as_deref())?;
            let weld = file.model.case.weld_shift;
            let solid = if ring {
                build_btu_ring(&kernel, &file.model.trackball, weld)?
            } else {
                build_socket(&kernel, &SocketKind::BtuPeg(file.model.trackball.btu), weld)?
            };
            write_part(&solid, &file, &output)?;
        }
        Commands::Sensor { config, output } => {
            let file = ConfigFile::load(config.as_deref())?;
            let kind = SocketKind::SensorMount {
                mount: file.model.trackball.sensor.mount,
                for_cut: false,
            };
            let solid = build_socket(&kernel, &kind, file.model.case.weld_shift)?;
            write_part(&solid, &file, &output)?;
        }
        Commands::Layout { config } => {
            let file = ConfigFile::load(config.as_deref())?;
            print_layout(&file)?;
        }
        Commands::InitConfig { output, force } => {
            init_config(&output, force)?;
        }
    }

    Ok(())
}

fn write_part(solid: &Solid, file: &ConfigFile, output: &Path) -> Result<()> {
    let summary = export_stl(solid, &file.export, output)
        .with_context(|| format!("exporting {}", output.display()))?;
    println!(
        "Exported {} triangles to {} (scale {:.4})",
        summary.triangles,
        summary.path.display(),
        summary.scale
    );
    Ok(())
}

fn print_layout(file: &ConfigFile) -> Result<()> {
    let settings = &file.model.case;
    let mut columns = layout_hand(&file.model.hand, settings)?;
    if settings.include_thumb {
        columns.extend(file.model.thumb.columns(settings)?);
    }
    println!("{}", serde_json::to_string_pretty(&columns)?);
    Ok(())
}

fn init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, ConfigFile::default().to_toml_string()?)?;
    println!("Wrote default configuration to {}", output.display());
    Ok(())
}
