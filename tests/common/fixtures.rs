//! Test fixtures: synthesized images and configs.

use std::io::Cursor;

/// Palette colors used by the fixture configs
pub mod colors {
    pub const BLACK: u32 = 0xFF00_0000;
    pub const WHITE: u32 = 0xFFFF_FFFF;
    pub const RED: u32 = 0xFFFF_0000;
}

/// Two-color config in YAML
pub const BLACK_WHITE_CONFIG: &str = r##"
palette: ["#000000", "#FFFFFF"]
algorithm: floyd-steinberg
"##;

/// Three-color config with strip-parallel temporal dithering
pub const PARALLEL_CONFIG: &str = r##"
palette: ["#000000", "#FFFFFF", "#FF0000"]
algorithm: filter-lite
parallel: true
temporal:
  strips: 3
"##;

/// Encode RGBA bytes as an 8-bit RGBA PNG
pub fn rgba_png(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("Failed to write PNG header");
        writer
            .write_image_data(rgba)
            .expect("Failed to write PNG data");
    }
    buf.into_inner()
}

/// Uniform gray PNG
pub fn gray_png(level: u8, width: u32, height: u32) -> Vec<u8> {
    let rgba: Vec<u8> = (0..width * height)
        .flat_map(|_| [level, level, level, 0xFF])
        .collect();
    rgba_png(width, height, &rgba)
}

/// Horizontal red-to-blue ramp with a vertical green ramp
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            rgba.extend_from_slice(&[r, g, 255 - r, 0xFF]);
        }
    }
    rgba_png(width, height, &rgba)
}
