//! The extraction driver.
//!
//! Walks every placement of every embedded image object, filters to
//! plausible swatch tiles, attributes a series to the page and a
//! color label to the tile, and writes each placement out as a PNG:
//! confidently labeled tiles under `swatches/<series>/<color>.png`,
//! everything else under `swatches_raw/` with a deterministic
//! filename for later human review.

use crate::document::DocumentContent;
use crate::error::Result;
use crate::geometry::GeometryOptions;
use crate::locator::{nearest_color_label, DEFAULT_PROXIMITY};
use crate::taxonomy::Taxonomy;
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for swatch extraction
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Output directory for confidently labeled swatches
    pub output_dir: PathBuf,
    /// Output directory for unlabeled fallback images
    pub raw_dir: PathBuf,
    /// Swatch plausibility thresholds
    pub geometry: GeometryOptions,
    /// Center-to-center proximity bound for color labels, page units
    pub proximity: f32,
    /// Whether to create output directories if they don't exist
    pub create_dirs: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("swatches"),
            raw_dir: PathBuf::from("swatches_raw"),
            geometry: GeometryOptions::default(),
            proximity: DEFAULT_PROXIMITY,
            create_dirs: true,
        }
    }
}

/// Counts reported at the end of a run. Each counter equals the
/// number of files written down that path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Placements attributed to both a series and a color
    pub matched: usize,
    /// Placements routed to the raw fallback bucket
    pub unlabeled: usize,
}

impl ExtractSummary {
    /// Total number of files written
    pub fn total(&self) -> usize {
        self.matched + self.unlabeled
    }
}

/// Swatch extractor
pub struct SwatchExtractor {
    content: DocumentContent,
    taxonomy: Taxonomy,
    options: ExtractOptions,
}

impl SwatchExtractor {
    /// Create a new extractor over loaded document content
    pub fn new(content: DocumentContent, taxonomy: Taxonomy, options: ExtractOptions) -> Self {
        Self {
            content,
            taxonomy,
            options,
        }
    }

    /// Process every placement of every image object and write the
    /// resulting files.
    ///
    /// A placement is a *confident* match only when its page has a
    /// detected series and a color label was located nearby; there is
    /// no partial-credit path. Repeated confident labels overwrite
    /// the same output file, last placement wins.
    pub fn extract_all(&self) -> Result<ExtractSummary> {
        let mut summary = ExtractSummary::default();
        // Series detection memoized per page; every placement on one
        // page shares the same hint.
        let mut series_by_page: Vec<Option<Option<&str>>> = vec![None; self.content.pages.len()];

        for image in &self.content.images {
            let width = image.pixels.width();
            let height = image.pixels.height();

            for placement in &image.placements {
                if !self.options.geometry.is_plausible_swatch(width, height) {
                    continue;
                }
                let Some(page) = self.content.pages.get(placement.page_index) else {
                    continue;
                };

                let series = *series_by_page[placement.page_index]
                    .get_or_insert_with(|| self.taxonomy.detect_series(&page.text));
                let vocabulary = self.taxonomy.color_vocabulary(series);
                let color = nearest_color_label(
                    &page.words,
                    &placement.rect,
                    vocabulary,
                    self.options.proximity,
                );

                let out_path = match (series, color) {
                    (Some(series), Some(color)) => {
                        summary.matched += 1;
                        self.options
                            .output_dir
                            .join(series)
                            .join(format!("{color}.png"))
                    }
                    _ => {
                        summary.unlabeled += 1;
                        self.options.raw_dir.join(format!(
                            "page{:02}_xref{}_w{}_h{}.png",
                            placement.page_index, image.id, width, height
                        ))
                    }
                };

                tracing::debug!(
                    page = placement.page_index,
                    id = image.id,
                    path = %out_path.display(),
                    "writing swatch"
                );
                save_png(&image.pixels, &out_path, self.options.create_dirs)?;
            }
        }

        Ok(summary)
    }
}

/// Write pixels as a PNG, converting any layout with four or more
/// channels to plain RGB first (alpha is dropped).
fn save_png(pixels: &DynamicImage, path: &Path, create_dirs: bool) -> Result<()> {
    if create_dirs {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
    }
    if pixels.color().channel_count() >= 4 {
        DynamicImage::ImageRgb8(pixels.to_rgb8()).save(path)?;
    } else {
        pixels.save(path)?;
    }
    Ok(())
}

/// Extract all swatches from a catalog PDF in one call.
///
/// A missing input document fails immediately with
/// [`crate::SwatchError::DocumentNotFound`]; no output is produced.
pub fn extract_swatches_from_pdf<P: AsRef<Path>>(
    input_path: P,
    taxonomy: Taxonomy,
    options: ExtractOptions,
) -> Result<ExtractSummary> {
    let content = DocumentContent::open(input_path)?;
    SwatchExtractor::new(content, taxonomy, options).extract_all()
}
