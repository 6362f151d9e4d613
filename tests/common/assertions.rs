//! Assertion helpers for tests.

use std::collections::HashSet;
use std::io::Cursor;

use pretty_assertions::assert_eq;

use super::app::CliResponse;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Assert the CLI exited successfully
pub fn assert_success(response: &CliResponse) {
    assert!(
        response.success,
        "Expected success. stdout: {} stderr: {}",
        response.stdout, response.stderr
    );
}

/// Assert the CLI failed and its stderr mentions `needle`
pub fn assert_failure_mentions(response: &CliResponse, needle: &str) {
    assert!(
        !response.success,
        "Expected failure, got success. stdout: {}",
        response.stdout
    );
    assert!(
        response.stderr.contains(needle),
        "Expected stderr to mention {:?}, got: {}",
        needle,
        response.stderr
    );
}

/// Assert bytes are a PNG
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&PNG_SIGNATURE),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Assert bytes are an indexed PNG with the given bit depth and palette size
pub fn assert_indexed_png(bytes: &[u8], bit_depth: png::BitDepth, colors: usize) {
    assert_png(bytes);
    let reader = png::Decoder::new(Cursor::new(bytes))
        .read_info()
        .expect("Failed to read PNG header");
    let info = reader.info();
    assert_eq!(info.color_type, png::ColorType::Indexed);
    assert_eq!(info.bit_depth, bit_depth);
    let plte = info.palette.as_ref().expect("Indexed PNG without PLTE");
    assert_eq!(plte.len(), colors * 3, "PLTE size");
}

/// Assert every pixel is one of `allowed`
pub fn assert_only_colors(pixels: &[u32], allowed: &[u32]) {
    let allowed: HashSet<u32> = allowed.iter().copied().collect();
    let stray: HashSet<u32> = pixels
        .iter()
        .copied()
        .filter(|p| !allowed.contains(p))
        .collect();
    assert_eq!(stray, HashSet::new(), "Pixels outside the palette");
}
