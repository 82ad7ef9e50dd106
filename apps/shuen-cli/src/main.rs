use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use shuen_render::{DebugTextRenderer, RenderConfig, Renderer};
use tracing_subscriber::EnvFilter;

mod manifest;

use manifest::SceneManifest;

#[derive(Parser)]
#[command(name = "shuen-cli", about = "CLI tool for shuen scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Render a scene manifest to a PNG file
    Render {
        /// Scene manifest (YAML, or JSON with a .json extension)
        manifest: PathBuf,
        /// Output image path
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,
        /// Override the manifest's output width
        #[arg(long)]
        width: Option<u32>,
        /// Override the manifest's output height
        #[arg(long)]
        height: Option<u32>,
        /// Skip malformed entities instead of failing
        #[arg(long)]
        lenient: bool,
    },
    /// Print the back-to-front draw order of a scene manifest
    Order {
        /// Scene manifest (YAML, or JSON with a .json extension)
        manifest: PathBuf,
    },
}

fn base_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("shuen-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", shuen_common::crate_info());
            println!("texture: {}", shuen_texture::crate_info());
            println!("assets: {}", shuen_assets::crate_info());
            println!("render: {}", shuen_render::crate_info());
            println!("scene: {}", shuen_scene::crate_info());
        }
        Commands::Render {
            manifest,
            output,
            width,
            height,
            lenient,
        } => {
            let description = SceneManifest::load(&manifest)?;
            let mut scene = description.build(base_dir(&manifest))?;
            if width.is_some() || height.is_some() {
                let w = width.unwrap_or(scene.width());
                let h = height.unwrap_or(scene.height());
                scene.set_size(w, h)?;
            }
            if lenient {
                scene.set_config(RenderConfig::lenient());
            }

            let frame = scene.render()?;
            frame
                .borrow()
                .as_image()
                .save(&output)
                .with_context(|| format!("writing {}", output.display()))?;

            let stats = scene.last_frame();
            tracing::info!(
                drawn = stats.drawn,
                skipped = stats.skipped,
                unresolved = stats.unresolved,
                "frame written"
            );
            println!(
                "Rendered {} entities ({}x{}) to {}",
                scene.entity_count(),
                scene.width(),
                scene.height(),
                output.display()
            );
        }
        Commands::Order { manifest } => {
            let description = SceneManifest::load(&manifest)?;
            let scene = description.build(base_dir(&manifest))?;
            print!("{}", DebugTextRenderer::new().render(&scene.view()));
        }
    }

    Ok(())
}
