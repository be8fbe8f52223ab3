// SPDX-License-Identifier: MPL-2.0
//! Camera capture port.

use crate::error::Result;
use crate::media::{decode_bytes, decode_file, DecodeOptions, RasterImage};
use std::path::PathBuf;

/// A photo handed over by the camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedImage {
    /// Written to disk by the camera.
    Path(PathBuf),
    /// Delivered in memory, still encoded.
    Bytes(Vec<u8>),
}

impl CapturedImage {
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Load`] if the capture is unreadable.
    pub fn decode(&self, options: &DecodeOptions) -> Result<RasterImage> {
        match self {
            CapturedImage::Path(path) => decode_file(path, options),
            CapturedImage::Bytes(bytes) => decode_bytes(bytes, options),
        }
    }
}

/// Takes a photo.
pub trait CameraCapture: Send + Sync {
    /// # Errors
    ///
    /// Returns [`crate::error::Error::PermissionDenied`] without camera
    /// access, or [`crate::error::Error::Io`] if capture fails.
    fn capture(&self) -> Result<CapturedImage>;
}
