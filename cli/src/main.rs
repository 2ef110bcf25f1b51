use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use reducer::{export_state, reconstruct, stats};
use renderer::{PngRasterizer, Rasterizer, RenderConfig, MAX_SIDE};
use snapshotter::{PublisherConfig, ServiceConfig, SnapshotPublisher, SnapshotService};

mod input;
mod storage;

use crate::storage::{DirectoryUploader, ManifestCommitter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Pack a CSV change log (artist,x,y,color,timestamp) into MessagePack
    Pack { in_file: PathBuf, out_file: PathBuf },
    /// Render the final canvas of a change log to a PNG
    Render {
        changes: PathBuf,
        out_file: PathBuf,
        #[command(flatten)]
        canvas: CanvasArgs,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Render a small grid-less preview
    Preview {
        changes: PathBuf,
        out_file: PathBuf,
        #[command(flatten)]
        canvas: CanvasArgs,
        #[clap(short, long, default_value = "128")]
        size: u32,
    },
    /// Print participation, color and coverage statistics as JSON
    Stats {
        changes: PathBuf,
        #[command(flatten)]
        canvas: CanvasArgs,
    },
    /// Write the reconstructed canvas state as JSON
    Export {
        changes: PathBuf,
        out_file: PathBuf,
        #[command(flatten)]
        canvas: CanvasArgs,
    },
    /// Generate a snapshot, store it in a directory and record it in a manifest
    Snapshot {
        changes: PathBuf,
        #[clap(long)]
        id: u64,
        #[clap(long)]
        out_dir: PathBuf,
        #[clap(long)]
        /// base of the per-snapshot page linked from the metadata
        external_url: Option<String>,
        #[command(flatten)]
        canvas: CanvasArgs,
        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(Args, Debug)]
struct CanvasArgs {
    /// side of the square canvas, at most one raster side
    #[clap(
        long,
        default_value = "16",
        value_parser = clap::value_parser!(u32).range(1..=MAX_SIDE as i64)
    )]
    canvas_size: u32,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[clap(long, default_value = "32")]
    pixel_size: u32,
    #[clap(long, default_value = "1.0")]
    quality: f32,
    #[clap(long)]
    no_grid: bool,
    #[clap(long)]
    /// only honored together with --no-grid
    transparent: bool,
}

impl From<&RenderArgs> for RenderConfig {
    fn from(args: &RenderArgs) -> Self {
        RenderConfig {
            pixel_size: args.pixel_size,
            quality: args.quality.clamp(0.0, 1.0),
            include_grid: !args.no_grid,
            background_transparent: args.transparent,
        }
    }
}

impl CanvasArgs {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            canvas_size: self.canvas_size,
            ..ServiceConfig::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pack { in_file, out_file } => {
            let count = input::pack(&in_file, &out_file)?;
            log::info!("packed {} changes into {}", count, out_file.display());
        }
        Commands::Render {
            changes,
            out_file,
            canvas,
            render,
        } => {
            let changes = input::load_changes(&changes)?;
            let config = canvas.service_config();
            let state = reconstruct(&changes, config.canvas_size);

            let rasterizer = PngRasterizer::new(&config.palette)?;
            let image = rasterizer.render(&state, &RenderConfig::from(&render))?;

            fs::write(&out_file, &image.bytes)
                .with_context(|| format!("could not write {}", out_file.display()))?;
        }
        Commands::Preview {
            changes,
            out_file,
            canvas,
            size,
        } => {
            let changes = input::load_changes(&changes)?;
            let service = SnapshotService::new(canvas.service_config())?;

            let image = service.preview(&changes, size)?;

            fs::write(&out_file, &image.bytes)
                .with_context(|| format!("could not write {}", out_file.display()))?;
        }
        Commands::Stats { changes, canvas } => {
            let changes = input::load_changes(&changes)?;
            let state = reconstruct(&changes, canvas.canvas_size);

            println!("{}", serde_json::to_string_pretty(&stats(&state))?);
        }
        Commands::Export {
            changes,
            out_file,
            canvas,
        } => {
            let changes = input::load_changes(&changes)?;
            let state = reconstruct(&changes, canvas.canvas_size);

            fs::write(&out_file, export_state(&state)?)
                .with_context(|| format!("could not write {}", out_file.display()))?;
        }
        Commands::Snapshot {
            changes,
            id,
            out_dir,
            external_url,
            canvas,
            render,
        } => {
            let changes = input::load_changes(&changes)?;
            let service = SnapshotService::new(canvas.service_config())?;
            let subscription = service.subscribe(|status| {
                log::info!("[{:>3}%] {:?}: {}", status.progress, status.status, status.message);
            });

            let publisher = SnapshotPublisher::new(
                DirectoryUploader::new(&out_dir),
                ManifestCommitter::new(out_dir.join("commits.csv")),
                PublisherConfig {
                    external_url_base: external_url,
                    ..PublisherConfig::default()
                },
            );

            let published = pollster::block_on(publisher.generate_and_publish(
                &service,
                id,
                &changes,
                &RenderConfig::from(&render),
            ))?;
            subscription.unsubscribe();

            println!("image: {}", published.image.url);
            println!("metadata: {}", published.metadata.url);
        }
    }

    Ok(())
}
