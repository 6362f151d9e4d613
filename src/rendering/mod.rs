pub mod png_io;

pub use png_io::{decode_png, encode_indexed, encode_rgb, optimize_png, read_png, DecodedImage};
