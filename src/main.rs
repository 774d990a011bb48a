use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reel_composer::{
    config::Config,
    export::{export_photo, passthrough_clips, AspectPreset, ExportFormat, ExportOrchestrator, QualityTier},
    filters,
    storage::ProjectStore,
    timeline::Slide,
    transitions::{TransitionCatalog, TransitionSelector, AUTO_MIX},
    CancelToken, ReelEngine, Timeline,
};

#[derive(Parser)]
#[command(
    name = "reel-composer",
    version,
    about = "Compose still images into transition-animated reels",
    long_about = "Reel-Composer turns a sequence of photos, each with its own color adjustments, into a timed reel with animated transitions and exports it as video or image."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render images into a reel
    Export {
        /// Images in display order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// high, medium or low
        #[arg(short, long)]
        quality: Option<QualityTier>,

        /// video, animated-image or still-image
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// square, portrait or landscape
        #[arg(short, long)]
        aspect: Option<AspectPreset>,

        #[arg(long)]
        fps: Option<u32>,

        /// Time per slide (ms)
        #[arg(short, long)]
        duration: Option<u64>,

        /// Total reel length (ms), split evenly across slides
        #[arg(long)]
        total_duration: Option<u64>,

        /// Transition id or auto-mix
        #[arg(short, long)]
        transition: Option<String>,

        /// Filter preset applied to every slide
        #[arg(short, long)]
        preset: Option<String>,

        /// Derive filters from each image's content
        #[arg(long)]
        auto_enhance: bool,

        /// Seed for auto-mix transition choice
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Export one filtered photo at full resolution
    Still {
        image: PathBuf,

        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Filter preset
        #[arg(short, long)]
        preset: Option<String>,
    },

    /// Copy video clips out as individual segments
    Clips {
        #[arg(required = true)]
        videos: Vec<PathBuf>,

        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// List available transitions
    Transitions,

    /// Manage saved projects
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },
}

#[derive(Subcommand)]
enum ProjectsAction {
    /// List saved projects
    List,

    /// Write one project as JSON
    Export {
        id: String,

        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Write every project and setting to a snapshot file
    Backup { file: PathBuf },

    /// Replace the store with a snapshot file
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    info!("Starting Reel-Composer v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };
    config.validate()?;

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(config.render.threads)
        .build_global()
    {
        warn!("Could not size render thread pool: {}", e);
    }

    match cli.command {
        Command::Export {
            images,
            output,
            quality,
            format,
            aspect,
            fps,
            duration,
            total_duration,
            transition,
            preset,
            auto_enhance,
            seed,
        } => {
            let mut export = config.export.clone();
            export.quality = quality.unwrap_or(export.quality);
            export.format = format.unwrap_or(export.format);
            export.aspect = aspect.unwrap_or(export.aspect);
            export.fps = fps.unwrap_or(export.fps);

            let mut options = export.options();
            options.total_duration_ms = total_duration;

            let preset = match preset {
                Some(name) => Some(
                    filters::find_preset(&name).ok_or_else(|| anyhow::anyhow!("Unknown preset: {}", name))?,
                ),
                None => None,
            };

            let mode = transition.unwrap_or_else(|| config.playback.transition.clone());
            if !TransitionCatalog::standard().is_known_mode(&mode) {
                warn!("Unknown transition '{}', falling back to fade", mode);
            }

            let mut timeline = Timeline::new(duration.unwrap_or(config.playback.slide_duration_ms)).with_transition(mode);
            for path in images {
                let slide = Slide::from_path(path);
                timeline.push(match preset {
                    Some(p) => slide.with_filters(p.params),
                    None => slide,
                });
            }

            if auto_enhance {
                let enhanced = ReelEngine::default().auto_enhance_timeline(&mut timeline).await?;
                info!("Auto-enhanced {} slides", enhanced);
            }

            let selector = match seed {
                Some(seed) => TransitionSelector::seeded(seed),
                None => TransitionSelector::new(),
            };
            let mut orchestrator = ExportOrchestrator::new(export.ffmpeg_settings()).with_selector(selector);

            let cancel = CancelToken::new();
            let interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, cancelling export");
                    interrupt.cancel();
                }
            });

            let artifact = orchestrator
                .export_reel(&timeline, &options, &cancel, |p| info!("Progress: {:.0}%", p * 100.0))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            let path = artifact.save_to(&output).await?;
            info!("Reel saved to: {:?}", path);
        }

        Command::Still { image, output, preset } => {
            let mut slide = Slide::from_path(image);
            if let Some(name) = preset {
                let preset = filters::find_preset(&name).ok_or_else(|| anyhow::anyhow!("Unknown preset: {}", name))?;
                slide = slide.with_filters(preset.params);
            }

            let artifact = export_photo(&slide).await?;
            let path = artifact.save_to(&output).await?;
            info!("Photo saved to: {:?}", path);
        }

        Command::Clips { videos, output } => {
            let artifacts = passthrough_clips(&videos, |p| info!("Progress: {:.0}%", p * 100.0)).await?;
            for artifact in artifacts {
                artifact.save_to(&output).await?;
            }
        }

        Command::Transitions => {
            let catalog = TransitionCatalog::standard();
            for descriptor in catalog.entries() {
                println!(
                    "{:<16} {:<16} {:>5} ms  {}",
                    descriptor.id, descriptor.display_name, descriptor.duration_ms, descriptor.description
                );
            }
            println!("{:<16} {:<16} {:>8}  Random transition at each slide", AUTO_MIX, "Auto Mix", "");
        }

        Command::Projects { action } => {
            let mut store = ProjectStore::open(&config.storage.path).await?;
            match action {
                ProjectsAction::List => {
                    for project in store.list() {
                        println!(
                            "{}  {:<24} {:>3} slides  updated {}",
                            project.id,
                            project.name,
                            project.slides.len(),
                            project.updated_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
                ProjectsAction::Export { id, output } => {
                    let artifact = store
                        .export_project(&id)?
                        .ok_or_else(|| anyhow::anyhow!("No project with id {}", id))?;
                    let path = artifact.save_to(&output).await?;
                    info!("Project saved to: {:?}", path);
                }
                ProjectsAction::Backup { file } => {
                    tokio::fs::write(&file, store.export_snapshot()?)
                        .await
                        .with_context(|| format!("writing {}", file.display()))?;
                    info!("Snapshot written to: {:?}", file);
                }
                ProjectsAction::Import { file } => {
                    let data = tokio::fs::read_to_string(&file)
                        .await
                        .with_context(|| format!("reading {}", file.display()))?;
                    if !store.import_snapshot(&data).await {
                        anyhow::bail!("{} is not a valid project snapshot", file.display());
                    }
                    info!("Imported {} projects", store.list().len());
                }
            }
        }
    }

    Ok(())
}
