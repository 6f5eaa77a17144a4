//! Image placement discovery and pixel decoding.
//!
//! Placements come from replaying the graphics state: the current
//! transformation matrix is tracked across `q`/`Q`/`cm`, and every
//! `Do` of an image XObject records the transformed unit square as
//! the placement rectangle. Pixel data is decoded once per image
//! object into an [`image::DynamicImage`].

use super::text::apply_matrix;
use crate::error::{Result, SwatchError};
use crate::geometry::Rect;
use image::{DynamicImage, GrayImage, RgbImage};
use pdf::content::{Matrix, Op};
use pdf::enc::StreamFilter;
use pdf::object::{ImageXObject, MaybeRef, RcRef, Resolve, Resources, XObject};

/// One rendering of an image XObject on a page
pub(crate) struct PlacedImage {
    /// Object number of the XObject, used as the stable reference id
    pub id: u64,
    /// Resolved XObject, kept for the one-time pixel decode
    pub xobject: RcRef<XObject>,
    /// Placement rectangle in page coordinates
    pub rect: Rect,
}

fn matrix_concat(current: &Matrix, next: &Matrix) -> Matrix {
    Matrix {
        a: current.a * next.a + current.b * next.c,
        b: current.a * next.b + current.b * next.d,
        c: current.c * next.a + current.d * next.c,
        d: current.c * next.b + current.d * next.d,
        e: current.a * next.e + current.c * next.f + current.e,
        f: current.b * next.e + current.d * next.f + current.f,
    }
}

/// Axis-aligned bounds of the CTM-transformed unit square
fn unit_square_bounds(matrix: &Matrix) -> Rect {
    let corners = [
        apply_matrix(matrix, (0.0, 0.0)),
        apply_matrix(matrix, (1.0, 0.0)),
        apply_matrix(matrix, (0.0, 1.0)),
        apply_matrix(matrix, (1.0, 1.0)),
    ];
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for (x, y) in corners {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    Rect::new(min_x, min_y, max_x, max_y)
}

/// Walk the content stream and record a [`PlacedImage`] for every
/// image XObject invocation. Inline images are not simple raster
/// references and are skipped; an XObject that fails to resolve skips
/// only that invocation.
pub(crate) fn collect_image_placements(
    ops: &[Op],
    resources: Option<&MaybeRef<Resources>>,
    resolver: &impl Resolve,
) -> Vec<PlacedImage> {
    let mut ctm = Matrix::default();
    let mut stack: Vec<Matrix> = Vec::new();
    let mut placed = Vec::new();

    for op in ops {
        match op {
            Op::Save => stack.push(ctm),
            Op::Restore => ctm = stack.pop().unwrap_or_default(),
            Op::Transform { matrix } => ctm = matrix_concat(&ctm, matrix),
            Op::XObject { name } => {
                let Some(resources) = resources else { continue };
                let Some(xobject_ref) = resources.xobjects.get(name) else {
                    continue;
                };
                let xobject = match resolver.get(*xobject_ref) {
                    Ok(xobject) => xobject,
                    Err(err) => {
                        tracing::warn!(name = name.as_str(), %err, "skipping unresolvable XObject");
                        continue;
                    }
                };
                if matches!(&*xobject, XObject::Image(_)) {
                    placed.push(PlacedImage {
                        id: xobject_ref.get_inner().id,
                        xobject,
                        rect: unit_square_bounds(&ctm),
                    });
                }
            }
            _ => {}
        }
    }
    placed
}

/// Decode an image XObject's pixel data.
///
/// JPEG/JPEG2000 streams go through the `image` crate's decoders;
/// everything else is interpreted from the decoded sample buffer by
/// channel count. Four-channel (CMYK) data is converted to RGB, with
/// a best-effort channel-drop fallback when the buffer does not
/// convert cleanly.
pub(crate) fn decode_pixels(image: &ImageXObject, resolver: &impl Resolve) -> Result<DynamicImage> {
    let (raw, filter) = image.raw_image_data(resolver)?;
    if matches!(
        filter,
        Some(StreamFilter::DCTDecode(_)) | Some(StreamFilter::JPXDecode)
    ) {
        return Ok(image::load_from_memory(&raw)?);
    }

    let width = image.width;
    let height = image.height;
    let samples = image.image_data(resolver)?;
    let pixel_count = width as usize * height as usize;

    if samples.len() == pixel_count * 3 {
        RgbImage::from_raw(width, height, samples.to_vec())
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| SwatchError::InvalidImage("RGB buffer size mismatch".to_string()))
    } else if samples.len() == pixel_count {
        GrayImage::from_raw(width, height, samples.to_vec())
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(|| SwatchError::InvalidImage("gray buffer size mismatch".to_string()))
    } else if samples.len() == pixel_count * 4 {
        Ok(DynamicImage::ImageRgb8(cmyk_to_rgb(
            &samples, width, height,
        )))
    } else {
        Err(SwatchError::InvalidImage(format!(
            "unsupported sample layout: {} bytes for {}x{}",
            samples.len(),
            width,
            height
        )))
    }
}

/// Convert CMYK samples to RGB. Falls back to dropping the K channel
/// and reading CMY as inverted RGB if the converted buffer cannot be
/// assembled.
fn cmyk_to_rgb(samples: &[u8], width: u32, height: u32) -> RgbImage {
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for px in samples.chunks_exact(4) {
        let (c, m, y, k) = (px[0] as u32, px[1] as u32, px[2] as u32, px[3] as u32);
        rgb.push(((255 - c) * (255 - k) / 255) as u8);
        rgb.push(((255 - m) * (255 - k) / 255) as u8);
        rgb.push(((255 - y) * (255 - k) / 255) as u8);
    }
    match RgbImage::from_raw(width, height, rgb) {
        Some(image) => image,
        None => {
            tracing::warn!("CMYK conversion failed, dropping the K channel");
            let mut dropped = Vec::with_capacity(width as usize * height as usize * 3);
            for px in samples.chunks_exact(4) {
                dropped.push(255 - px[0]);
                dropped.push(255 - px[1]);
                dropped.push(255 - px[2]);
            }
            RgbImage::from_raw(width, height, dropped)
                .unwrap_or_else(|| RgbImage::new(width, height))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(sx: f32, sy: f32, tx: f32, ty: f32) -> Matrix {
        Matrix {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            e: tx,
            f: ty,
        }
    }

    #[test]
    fn test_unit_square_bounds_scale_and_translate() {
        let rect = unit_square_bounds(&scale(120.0, 120.0, 40.0, 300.0));
        assert_eq!(rect.x0, 40.0);
        assert_eq!(rect.y0, 300.0);
        assert_eq!(rect.x1, 160.0);
        assert_eq!(rect.y1, 420.0);
    }

    #[test]
    fn test_unit_square_bounds_negative_scale() {
        // A flipped placement still yields a normalized rectangle
        let rect = unit_square_bounds(&scale(100.0, -100.0, 0.0, 100.0));
        assert_eq!(rect.y0, 0.0);
        assert_eq!(rect.y1, 100.0);
    }

    #[test]
    fn test_matrix_concat_applies_in_sequence() {
        let combined = matrix_concat(&scale(2.0, 2.0, 0.0, 0.0), &scale(1.0, 1.0, 5.0, 5.0));
        let rect = unit_square_bounds(&combined);
        assert_eq!(rect.width(), 2.0);
        assert_eq!(rect.x0, 10.0);
    }

    #[test]
    fn test_cmyk_to_rgb_pure_black() {
        // K=255 → black regardless of CMY
        let image = cmyk_to_rgb(&[0, 0, 0, 255], 1, 1);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_cmyk_to_rgb_no_ink_is_white() {
        let image = cmyk_to_rgb(&[0, 0, 0, 0], 1, 1);
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_cmyk_to_rgb_cyan() {
        let image = cmyk_to_rgb(&[255, 0, 0, 0], 1, 1);
        assert_eq!(image.get_pixel(0, 0).0, [0, 255, 255]);
    }
}
