//! PNG decoding into packed pixels and encoding of dithered output.

use std::io::Cursor;
use std::path::Path;

use frame_dither::DitheredFrame;

use crate::error::AppError;

/// A decoded image as packed `0xAARRGGBB` pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

/// Decode a PNG into packed pixels.
///
/// Palette and low bit depth images are expanded and 16-bit samples are
/// stripped to 8 bits, so every color type the format allows is accepted.
pub fn decode_png(data: &[u8]) -> Result<DecodedImage, AppError> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| AppError::PngDecode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| AppError::PngDecode(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];

    if info.width == 0 || info.height == 0 {
        return Err(AppError::UnsupportedDimensions {
            width: info.width,
            height: info.height,
        });
    }
    if info.bit_depth != png::BitDepth::Eight {
        return Err(AppError::UnsupportedFormat {
            color_type: format!("{:?}", info.color_type),
            bit_depth: info.bit_depth as u8,
        });
    }

    let pixels: Vec<u32> = match info.color_type {
        png::ColorType::Rgba => bytes
            .chunks_exact(4)
            .map(|p| pack(p[3], p[0], p[1], p[2]))
            .collect(),
        png::ColorType::Rgb => bytes
            .chunks_exact(3)
            .map(|p| pack(0xFF, p[0], p[1], p[2]))
            .collect(),
        png::ColorType::GrayscaleAlpha => bytes
            .chunks_exact(2)
            .map(|p| pack(p[1], p[0], p[0], p[0]))
            .collect(),
        png::ColorType::Grayscale => bytes.iter().map(|&v| pack(0xFF, v, v, v)).collect(),
        png::ColorType::Indexed => {
            return Err(AppError::UnsupportedFormat {
                color_type: "Indexed".to_string(),
                bit_depth: 8,
            })
        }
    };

    tracing::debug!(
        width = info.width,
        height = info.height,
        color_type = ?info.color_type,
        "Decoded PNG"
    );

    Ok(DecodedImage {
        width: info.width as usize,
        height: info.height as usize,
        pixels,
    })
}

/// Read and decode a PNG file.
pub fn read_png(path: &Path) -> Result<DecodedImage, AppError> {
    decode_png(&std::fs::read(path)?)
}

#[inline]
fn pack(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Encode dithered indices as an indexed PNG.
///
/// The bit depth is the smallest one that addresses every palette entry:
/// 1 bit for two colors, 2 for four, 4 for sixteen, 8 beyond.
pub fn encode_indexed(frame: &DitheredFrame) -> Result<Vec<u8>, AppError> {
    let palette = frame.palette();
    let (depth, bits) = match palette.len() {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    };
    let plte: Vec<u8> = palette.colors().iter().flat_map(|c| c.to_array()).collect();
    let packed = if bits == 8 {
        frame.indices().to_vec()
    } else {
        pack_nbits(frame.indices(), frame.width(), bits)
    };

    encode_png(
        frame.width(),
        frame.height(),
        png::ColorType::Indexed,
        depth,
        Some(&plte),
        &packed,
    )
}

/// Encode packed pixels as an 8-bit RGB PNG, dropping the alpha byte.
pub fn encode_rgb(pixels: &[u32], width: usize, height: usize) -> Result<Vec<u8>, AppError> {
    let data: Vec<u8> = pixels
        .iter()
        .flat_map(|&p| [(p >> 16) as u8, (p >> 8) as u8, p as u8])
        .collect();
    encode_png(
        width,
        height,
        png::ColorType::Rgb,
        png::BitDepth::Eight,
        None,
        &data,
    )
}

/// Re-compress a PNG with oxipng (zopfli + adaptive filter selection).
///
/// Falls back to the input when optimization fails.
pub fn optimize_png(png_bytes: Vec<u8>) -> Vec<u8> {
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => {
            tracing::debug!(
                before = png_bytes.len(),
                after = optimized.len(),
                "Optimized PNG"
            );
            optimized
        }
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, keeping original");
            png_bytes
        }
    }
}

/// Encode packed pixel data as a PNG.
fn encode_png(
    width: usize,
    height: usize,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    plte: Option<&[u8]>,
    packed: &[u8],
) -> Result<Vec<u8>, AppError> {
    let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(AppError::UnsupportedDimensions {
                width: width.min(u32::MAX as usize) as u32,
                height: height.min(u32::MAX as usize) as u32,
            })
        }
    };

    let mut buf = Cursor::new(Vec::new());
    {
        // Fast settings; optimize_png re-compresses when asked to.
        let mut encoder = png::Encoder::new(&mut buf, w, h);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| AppError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(packed)
            .map_err(|e| AppError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack palette indices into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: usize, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = width.div_ceil(pixels_per_byte);
    let height = indices.len() / width;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}
