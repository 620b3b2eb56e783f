//! Image codec seam — decode, resize, encode.
//!
//! The [`ImageCodec`] trait is the boundary between the cache logic and the
//! pixel work. The production implementation is [`RustCodec`], built on the
//! `image` crate (pure Rust decoders, Lanczos3 resampling). Tests swap in a
//! recording mock so cache behavior can be asserted without real encoding.
//!
//! Pixel buffers are always [`RgbImage`]: sources with an alpha channel are
//! truncated to RGB on decode.
//!
//! Resizing stretches to the exact requested dimensions. It is **not**
//! aspect-preserving: if the requested ratio differs from the source's, the
//! output is deformed. Callers that care about aspect ratio gate before
//! resizing (see [`cache`](crate::cache)).

use image::imageops::FilterType;
use image::{ImageReader, RgbImage, imageops};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("failed to encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },
}

/// Decode, resize, and encode capability used by the variant cache.
pub trait ImageCodec {
    /// Read an image into an RGB pixel buffer. Alpha, if present, is dropped.
    fn decode(&self, path: &Path) -> Result<RgbImage, CodecError>;

    /// Write a pixel buffer to disk, format inferred from the extension.
    fn encode(&self, path: &Path, pixels: &RgbImage) -> Result<(), CodecError>;

    /// Resize to exactly `width`×`height`, stretching if ratios differ.
    fn resize(&self, pixels: &RgbImage, width: u32, height: u32) -> RgbImage;
}

/// Production codec over the `image` crate.
///
/// Compiled-in formats match the allowed source extensions: JPEG, PNG, GIF.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCodec for RustCodec {
    fn decode(&self, path: &Path) -> Result<RgbImage, CodecError> {
        let img = ImageReader::open(path)
            .map_err(CodecError::Io)?
            .decode()
            .map_err(|e| CodecError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(img.to_rgb8())
    }

    fn encode(&self, path: &Path, pixels: &RgbImage) -> Result<(), CodecError> {
        pixels.save(path).map_err(|e| CodecError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn resize(&self, pixels: &RgbImage, width: u32, height: u32) -> RgbImage {
        imageops::resize(pixels, width, height, FilterType::Lanczos3)
    }
}
