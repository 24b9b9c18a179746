use image::{DynamicImage, GenericImageView};
use std::path::Path;

use crate::error::{Result, ViewerError};
use crate::pixel::{PixelBuffer, PixelFormat};

/// Source of decoded images for the viewer.
pub trait ImageLoader {
    fn load(&self, path: &Path) -> Result<PixelBuffer>;
}

/// Decodes files from disk with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskLoader;

impl ImageLoader for DiskLoader {
    fn load(&self, path: &Path) -> Result<PixelBuffer> {
        if !path.is_file() {
            return Err(ViewerError::NotAFile(path.to_path_buf()));
        }
        let img = image::open(path)?;
        let (width, height) = img.dimensions();
        log::info!(
            "Loaded {} ({}x{}, {:?})",
            path.display(),
            width,
            height,
            img.color()
        );
        into_pixel_buffer(img)
    }
}

/// Keep 8-bit gray and RGB images in their own layouts; everything else is
/// widened to RGBA.
pub fn into_pixel_buffer(img: DynamicImage) -> Result<PixelBuffer> {
    let (width, height) = img.dimensions();
    match img {
        DynamicImage::ImageLuma8(buf) => {
            PixelBuffer::from_pixels(width, height, PixelFormat::gray8(), buf.into_raw())
        }
        DynamicImage::ImageRgb8(buf) => {
            PixelBuffer::from_pixels(width, height, PixelFormat::rgb24(), buf.into_raw())
        }
        DynamicImage::ImageRgba8(buf) => {
            PixelBuffer::from_pixels(width, height, PixelFormat::rgba32(), buf.into_raw())
        }
        other => {
            PixelBuffer::from_pixels(width, height, PixelFormat::rgba32(), other.to_rgba8().into_raw())
        }
    }
}
