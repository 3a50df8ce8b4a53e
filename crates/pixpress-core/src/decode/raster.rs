//! JPEG and PNG decoding with EXIF orientation and alpha flattening.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};

use super::{DecodeError, DecodedImage, ImageInput, Orientation, SourceImage};

/// Decode a JPEG or PNG image from bytes into an RGB pixel buffer.
///
/// EXIF orientation is applied so the buffer is in display orientation.
/// Pixels with an alpha channel are composited over `background`.
///
/// # Errors
///
/// Returns `DecodeError::EmptyInput` for an empty slice,
/// `DecodeError::InvalidFormat` if the format cannot be recognized,
/// `DecodeError::UnsupportedFormat` for recognized formats other than JPEG/PNG,
/// and `DecodeError::CorruptedFile` if decoding the full stream fails.
pub fn decode_image(bytes: &[u8], background: [u8; 3]) -> Result<DecodedImage, DecodeError> {
    let format = detect_format(bytes)?;
    let orientation = extract_orientation(bytes);

    let img = ImageReader::with_format(Cursor::new(bytes), format)
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::ZeroDimensions {
            width: img.width(),
            height: img.height(),
        });
    }

    let oriented = apply_orientation(img, orientation);
    Ok(DecodedImage::from_rgb_image(flatten_alpha(oriented, background)))
}

/// Decode a user-selected input into a [`SourceImage`].
pub fn decode_source(input: &ImageInput, background: [u8; 3]) -> Result<SourceImage, DecodeError> {
    let image = decode_image(&input.bytes, background)?;
    tracing::debug!(
        name = %input.name,
        width = image.width,
        height = image.height,
        original_size = input.byte_size(),
        "decoded source image"
    );
    Ok(SourceImage::new(image, input.byte_size(), input.name.clone()))
}

/// Identify the container format from magic bytes.
///
/// Only JPEG and PNG are accepted.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    match image::guess_format(bytes) {
        Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png)) => Ok(format),
        Ok(other) => Err(DecodeError::UnsupportedFormat(format!("{other:?}"))),
        Err(_) => Err(DecodeError::InvalidFormat),
    }
}

/// EXIF orientation from JPEG or PNG bytes, `Orientation::Normal` if absent.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

/// Drop the alpha channel by compositing over a solid background.
fn flatten_alpha(img: DynamicImage, background: [u8; 3]) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = Vec::with_capacity(DecodedImage::expected_len(width, height));

    for px in rgba.pixels() {
        let alpha = u32::from(px[3]);
        let inv_alpha = 255 - alpha;
        for c in 0..3 {
            let blended = u32::from(px[c]) * alpha + u32::from(background[c]) * inv_alpha;
            // Rounded divide by 255
            out.push(((blended + 127) / 255) as u8);
        }
    }

    // Length matches width * height * 3 by construction
    RgbImage::from_raw(width, height, out).unwrap_or_else(|| RgbImage::new(width, height))
}
