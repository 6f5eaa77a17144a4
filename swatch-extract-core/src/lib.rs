//! # swatch-extract
//!
//! Extracts per-color product swatch images embedded in a multi-page
//! catalog PDF and organizes them into a directory tree keyed by
//! product series and color name.
//!
//! The pipeline enumerates every embedded raster image, keeps the
//! ones that look like square swatch tiles, attributes each page to a
//! product series by text matching, pairs each tile with the nearest
//! color label from the series' vocabulary, and writes PNGs to
//! `swatches/<series>/<color>.png`. Tiles that cannot be labeled
//! confidently are preserved under `swatches_raw/` for human review.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use swatch_extract::{extract_swatches_from_pdf, ExtractOptions, Taxonomy};
//!
//! # fn main() -> swatch_extract::Result<()> {
//! let summary = extract_swatches_from_pdf(
//!     "assets/brochure.pdf",
//!     Taxonomy::builtin(),
//!     ExtractOptions::default(),
//! )?;
//! println!(
//!     "Matched swatches: {}, unlabeled: {}",
//!     summary.matched, summary.unlabeled
//! );
//! # Ok(())
//! # }
//! ```
//!
//! The taxonomy is the sole configuration: swap [`Taxonomy::builtin`]
//! for [`Taxonomy::from_json_file`] to target a different catalog.

pub mod document;
pub mod error;
pub mod extractor;
pub mod geometry;
pub mod locator;
pub mod page;
mod reader;
pub mod taxonomy;

pub use document::{DocumentContent, ImageObject, Placement};
pub use error::{Result, SwatchError};
pub use extractor::{extract_swatches_from_pdf, ExtractOptions, ExtractSummary, SwatchExtractor};
pub use geometry::{GeometryOptions, Point, Rect};
pub use locator::{nearest_color_label, DEFAULT_PROXIMITY};
pub use page::{PageContent, Word};
pub use taxonomy::{normalize, SeriesEntry, Taxonomy};
