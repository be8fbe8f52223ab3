// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The source image could not be read or decoded. No session exists.
    Load(String),
    /// An operation was rejected before touching any state.
    Validation(ValidationError),
    /// Encoding or writing the exported image failed. Retry is allowed.
    Resource(String),
    /// A platform permission was refused.
    PermissionDenied(Permission),
    /// The background task slot is already occupied.
    Busy,
    /// A background task was cancelled before it produced output.
    Cancelled,
    Config(String),
    Io(String),
    /// Overlay content (text, sticker SVG) could not be rasterized.
    Render(String),
}

/// Reasons an edit operation is refused without mutating the session.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The operation is not allowed while cropping.
    NotInViewingMode,
    /// `apply_crop` or `cancel_crop` called outside crop mode.
    NotInCropMode,
    /// Crop mode is active but no rectangle has been set.
    NoCropRect,
    /// The crop rectangle does not overlap the image.
    EmptyCropRect,
    /// Aspect ratio must be finite and positive.
    InvalidRatio,
    /// No layer with this id exists in the session.
    UnknownLayer(u64),
    /// Text overlays must contain at least one visible character.
    EmptyText,
    /// The sticker name is not part of the catalog.
    UnknownSticker(String),
    /// The viewport has zero width or height.
    EmptyViewport,
    /// An edit aimed at a text layer was sent to a sticker, or vice versa.
    LayerKindMismatch,
    /// A background result was computed from a raster that has since changed.
    StaleResult,
}

impl ValidationError {
    /// Returns the i18n message key for this validation failure.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ValidationError::NotInViewingMode => "error-validation-not-viewing",
            ValidationError::NotInCropMode => "error-validation-not-cropping",
            ValidationError::NoCropRect => "error-validation-no-crop-rect",
            ValidationError::EmptyCropRect => "error-validation-empty-crop",
            ValidationError::InvalidRatio => "error-validation-invalid-ratio",
            ValidationError::UnknownLayer(_) => "error-validation-unknown-layer",
            ValidationError::EmptyText => "error-validation-empty-text",
            ValidationError::UnknownSticker(_) => "error-validation-unknown-sticker",
            ValidationError::EmptyViewport => "error-validation-empty-viewport",
            ValidationError::LayerKindMismatch => "error-validation-layer-kind",
            ValidationError::StaleResult => "error-validation-stale-result",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotInViewingMode => write!(f, "operation not allowed while cropping"),
            ValidationError::NotInCropMode => write!(f, "crop mode is not active"),
            ValidationError::NoCropRect => write!(f, "no crop rectangle selected"),
            ValidationError::EmptyCropRect => write!(f, "crop rectangle is outside the image"),
            ValidationError::InvalidRatio => write!(f, "aspect ratio must be positive"),
            ValidationError::UnknownLayer(id) => write!(f, "unknown layer {}", id),
            ValidationError::EmptyText => write!(f, "text is empty"),
            ValidationError::UnknownSticker(name) => write!(f, "unknown sticker: {}", name),
            ValidationError::EmptyViewport => write!(f, "viewport has no area"),
            ValidationError::LayerKindMismatch => write!(f, "edit does not match layer kind"),
            ValidationError::StaleResult => write!(f, "image changed while the task was running"),
        }
    }
}

/// Platform permissions the capture and export flows depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Camera,
    ReadImages,
    WriteImages,
}

impl Permission {
    /// Returns a stable identifier used in i18n arguments and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Camera => "camera",
            Permission::ReadImages => "read-images",
            Permission::WriteImages => "write-images",
        }
    }
}

impl Error {
    /// Returns the i18n message key for this error.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Error::Load(_) => "error-load-image",
            Error::Validation(err) => err.i18n_key(),
            Error::Resource(_) => "error-export-failed",
            Error::PermissionDenied(_) => "error-permission-denied",
            Error::Busy => "error-task-busy",
            Error::Cancelled => "error-task-cancelled",
            Error::Config(_) => "error-config",
            Error::Io(_) => "error-io",
            Error::Render(_) => "error-render",
        }
    }

    /// Returns whether the session is still usable after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Load(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Load(e) => write!(f, "Load Error: {}", e),
            Error::Validation(e) => write!(f, "Validation Error: {}", e),
            Error::Resource(e) => write!(f, "Resource Error: {}", e),
            Error::PermissionDenied(p) => write!(f, "Permission Denied: {}", p.as_str()),
            Error::Busy => write!(f, "A background task is already running"),
            Error::Cancelled => write!(f, "Task cancelled"),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Render(e) => write!(f, "Render Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Load(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn image_error_maps_to_load() {
        let err: Error = image_rs::ImageError::IoError(std::io::Error::other("truncated")).into();
        assert!(matches!(err, Error::Load(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn validation_error_wraps_and_keeps_key() {
        let err: Error = ValidationError::NoCropRect.into();
        assert_eq!(err.i18n_key(), "error-validation-no-crop-rect");
        assert!(err.is_recoverable());
    }

    #[test]
    fn permission_denied_names_permission() {
        let err = Error::PermissionDenied(Permission::WriteImages);
        assert!(format!("{}", err).contains("write-images"));
        assert_eq!(err.i18n_key(), "error-permission-denied");
    }

    #[test]
    fn task_outcomes_have_distinct_keys() {
        assert_ne!(Error::Busy.i18n_key(), Error::Cancelled.i18n_key());
    }
}
