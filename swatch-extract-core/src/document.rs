//! In-memory model of the catalog document.
//!
//! [`DocumentContent::open`] reads the PDF once and caches everything
//! the extraction driver needs: per-page text and word positions, and
//! each embedded image object with its decoded pixels and every
//! rectangle where it is placed. Nothing is re-parsed afterwards.

use crate::error::{Result, SwatchError};
use crate::geometry::Rect;
use crate::page::PageContent;
use crate::reader;
use image::DynamicImage;
use pdf::file::FileOptions;
use pdf::object::XObject;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// One occurrence of an image object rendered on a page
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    /// Zero-based page index
    pub page_index: usize,
    /// Placement rectangle in page coordinates
    pub rect: Rect,
}

/// An embedded raster image and everywhere it appears
pub struct ImageObject {
    /// The document-internal reference id of the image object
    pub id: u64,
    /// Decoded pixel data, shared by all placements
    pub pixels: DynamicImage,
    /// Every page/rectangle where the object is rendered
    pub placements: Vec<Placement>,
}

/// A fully loaded document: page caches plus image objects
pub struct DocumentContent {
    /// Cached page content, indexed by page number
    pub pages: Vec<PageContent>,
    /// Image objects with at least one placement, ordered by id
    pub images: Vec<ImageObject>,
}

impl DocumentContent {
    /// Load and cache a catalog document.
    ///
    /// Image objects that never appear on a page are dropped. An
    /// object whose metadata or pixel data cannot be read is skipped
    /// with a warning; the rest of the document still loads.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SwatchError::DocumentNotFound(path.to_path_buf()));
        }

        let file = FileOptions::cached().open(path)?;
        let resolver = file.resolver();
        let page_count = file.num_pages();

        let mut pages = Vec::with_capacity(page_count as usize);
        let mut pending: HashMap<u64, ImageObject> = HashMap::new();
        let mut undecodable: HashSet<u64> = HashSet::new();

        for page_index in 0..page_count {
            let page = file.get_page(page_index)?;
            let ops = match &page.contents {
                Some(content) => match content.operations(&resolver) {
                    Ok(ops) => ops,
                    Err(err) => {
                        tracing::warn!(page = page_index, %err, "skipping unparsable page content");
                        pages.push(PageContent::default());
                        continue;
                    }
                },
                None => {
                    pages.push(PageContent::default());
                    continue;
                }
            };

            let fonts = reader::text::collect_fonts(&page, &resolver);
            let words = reader::text::collect_words(&ops, &fonts);
            let text = reader::text::join_page_text(&words);

            let resources = page.resources().ok();
            for placed in reader::image::collect_image_placements(&ops, resources, &resolver) {
                let placement = Placement {
                    page_index: page_index as usize,
                    rect: placed.rect,
                };
                if undecodable.contains(&placed.id) {
                    continue;
                }
                if let Some(existing) = pending.get_mut(&placed.id) {
                    existing.placements.push(placement);
                    continue;
                }
                // Decode once, on first sight of the object
                let XObject::Image(ref image) = *placed.xobject else {
                    continue;
                };
                match reader::image::decode_pixels(image, &resolver) {
                    Ok(pixels) => {
                        pending.insert(
                            placed.id,
                            ImageObject {
                                id: placed.id,
                                pixels,
                                placements: vec![placement],
                            },
                        );
                    }
                    Err(err) => {
                        tracing::warn!(id = placed.id, %err, "skipping undecodable image object");
                        undecodable.insert(placed.id);
                    }
                }
            }

            pages.push(PageContent { text, words });
        }

        let mut images: Vec<ImageObject> = pending.into_values().collect();
        images.sort_by_key(|image| image.id);

        tracing::debug!(
            pages = pages.len(),
            images = images.len(),
            "document loaded"
        );
        Ok(Self { pages, images })
    }
}
