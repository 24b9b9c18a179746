use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Pixel data too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("Row pitch {pitch} is smaller than one row of {row_bytes} bytes")]
    PitchTooSmall { pitch: usize, row_bytes: usize },
}

pub type Result<T> = std::result::Result<T, ViewerError>;
