//! Adapter over the `pdf` crate.
//!
//! Everything that touches raw PDF structures lives here: word and
//! position reconstruction from content streams, image placement
//! discovery, and pixel decoding. The rest of the crate only sees the
//! cached model in [`crate::document`].

pub(crate) mod image;
pub(crate) mod text;
