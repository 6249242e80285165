//! Program loading: text validation and image files.

pub mod parse;
pub mod image;

pub use parse::{parse_program, LoadError, SENTINEL};
pub use image::{export_image, load_image, save_image, ImageError};
