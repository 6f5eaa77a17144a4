use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwatchError {
    /// The input catalog document does not exist. Fatal: no partial
    /// processing is attempted.
    #[error("Input document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf::error::PdfError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Sample data that cannot be interpreted as a raster image.
    /// Recoverable: the offending image object is skipped.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid taxonomy: {0}")]
    InvalidTaxonomy(String),

    #[error("Taxonomy parse error: {0}")]
    TaxonomyFormat(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SwatchError>;
