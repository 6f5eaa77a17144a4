use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swatch_extract::{
    extract_swatches_from_pdf, DocumentContent, ExtractOptions, GeometryOptions, Taxonomy,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "swatchextract",
    about = "Extracts labeled per-color swatch images from catalog PDFs",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract swatch images into a labeled directory tree
    Extract {
        /// Input catalog PDF
        input: PathBuf,

        /// Output directory for confidently labeled swatches
        #[arg(short, long, default_value = "swatches")]
        output_dir: PathBuf,

        /// Output directory for unlabeled fallback images
        #[arg(long, default_value = "swatches_raw")]
        raw_dir: PathBuf,

        /// Taxonomy JSON file (series name -> color list); defaults
        /// to the builtin shingle catalog taxonomy
        #[arg(short, long)]
        taxonomy: Option<PathBuf>,

        /// Minimum swatch side length in pixels
        #[arg(long, default_value_t = 180)]
        min_side: u32,

        /// Lower aspect-ratio bound (inclusive)
        #[arg(long, default_value_t = 0.85)]
        min_aspect: f32,

        /// Upper aspect-ratio bound (inclusive)
        #[arg(long, default_value_t = 1.18)]
        max_aspect: f32,

        /// Color label proximity bound in page units
        #[arg(long, default_value_t = 260.0)]
        proximity: f32,
    },

    /// Show which product series each page is attributed to
    Detect {
        /// Input catalog PDF
        input: PathBuf,

        /// Taxonomy JSON file; defaults to the builtin taxonomy
        #[arg(short, long)]
        taxonomy: Option<PathBuf>,
    },
}

fn load_taxonomy(path: Option<&PathBuf>) -> Result<Taxonomy> {
    match path {
        Some(path) => Taxonomy::from_json_file(path)
            .with_context(|| format!("failed to load taxonomy from {}", path.display())),
        None => Ok(Taxonomy::builtin()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            output_dir,
            raw_dir,
            taxonomy,
            min_side,
            min_aspect,
            max_aspect,
            proximity,
        } => {
            let taxonomy = load_taxonomy(taxonomy.as_ref())?;
            let output_root = output_dir.clone();
            let raw_root = raw_dir.clone();
            let options = ExtractOptions {
                output_dir,
                raw_dir,
                geometry: GeometryOptions {
                    min_side,
                    min_aspect,
                    max_aspect,
                },
                proximity,
                create_dirs: true,
            };

            let summary = extract_swatches_from_pdf(&input, taxonomy, options)?;

            println!(
                "Done. Matched swatches: {}, unlabeled ({}): {}",
                summary.matched,
                raw_root.display(),
                summary.unlabeled
            );
            println!(
                "If any color is mis-labeled, rename the file under {}/<series>/ to the exact color text your catalog expects.",
                output_root.display()
            );
        }

        Commands::Detect { input, taxonomy } => {
            let taxonomy = load_taxonomy(taxonomy.as_ref())?;
            let content = DocumentContent::open(&input)?;
            for (index, page) in content.pages.iter().enumerate() {
                match taxonomy.detect_series(&page.text) {
                    Some(series) => println!("page {index:02}: {series}"),
                    None => println!("page {index:02}: (no series detected)"),
                }
            }
        }
    }

    Ok(())
}
