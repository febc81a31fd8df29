mod pixel_pos;
mod matrix2d;
mod image_buffer;
mod renderable;
pub mod import;

pub use pixel_pos::PixelPos;
pub use matrix2d::Matrix2D;
pub use image_buffer::{ImageBuffer, Metadata};
pub use renderable::Renderable;

/// Entries in every colour lookup table.
pub const PIXEL_VALUES_COUNT: usize = 256_usize;
