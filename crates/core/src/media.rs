//! Image formats that can be embedded in a slide.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Raster formats PowerPoint renders natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 5] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Bmp,
        ImageFormat::Tiff,
    ];

    /// Recognise a MIME type such as `image/png`. Parameters are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/bmp" | "image/x-bmp" | "image/x-ms-bmp" => Some(Self::Bmp),
            "image/tiff" | "image/tif" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" | "jpe" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
            Some(Self::Tiff)
        } else if bytes.len() >= 14 && bytes.starts_with(b"BM") {
            Some(Self::Bmp)
        } else {
            None
        }
    }

    /// Resolve the format of an upload.
    ///
    /// A recognised declared content type wins; otherwise the bytes are sniffed.
    pub fn detect(declared: Option<&str>, bytes: &[u8]) -> Result<Self> {
        if let Some(format) = declared.and_then(Self::from_mime) {
            return Ok(format);
        }

        Self::from_magic(bytes).ok_or_else(|| {
            Error::UnsupportedImage(format!(
                "content type {} and contents do not match a supported image format",
                declared.unwrap_or("(none)")
            ))
        })
    }

    /// File extension used for the media part name.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// Canonical MIME type, as registered in `[Content_Types].xml`.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }
}

/// Image bytes together with their format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub format: ImageFormat,

    #[serde(skip)]
    pub data: Vec<u8>,
}

impl Media {
    pub fn new(format: ImageFormat, data: Vec<u8>) -> Self {
        Self { format, data }
    }

    /// Wrap upload bytes, resolving the format from the declared type or contents.
    pub fn detect(declared: Option<&str>, data: Vec<u8>) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::UnsupportedImage("image is empty".to_string()));
        }
        let format = ImageFormat::detect(declared, &data)?;
        Ok(Self::new(format, data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn test_from_mime_ignores_case_and_parameters() {
        assert_eq!(ImageFormat::from_mime("image/PNG"), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::from_mime("image/jpeg; charset=binary"),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_mime("image/svg+xml"), None);
        assert_eq!(ImageFormat::from_mime("application/octet-stream"), None);
    }

    #[test]
    fn test_from_magic() {
        assert_eq!(ImageFormat::from_magic(PNG_HEADER), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_magic(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_magic(b"II*\0...."), Some(ImageFormat::Tiff));
        assert_eq!(ImageFormat::from_magic(b"BM short"), None);
        assert_eq!(ImageFormat::from_magic(b"plain text"), None);
    }

    #[test]
    fn test_detect_prefers_declared_type() {
        let format = ImageFormat::detect(Some("image/gif"), PNG_HEADER).unwrap();
        assert_eq!(format, ImageFormat::Gif);
    }

    #[test]
    fn test_detect_falls_back_to_magic() {
        let format = ImageFormat::detect(Some("application/octet-stream"), PNG_HEADER).unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert!(ImageFormat::detect(None, b"not an image").is_err());
    }

    #[test]
    fn test_media_rejects_empty_data() {
        assert!(matches!(
            Media::detect(Some("image/png"), Vec::new()),
            Err(Error::UnsupportedImage(_))
        ));
    }

    #[test]
    fn test_extension_round_trips() {
        for format in ImageFormat::ALL {
            assert_eq!(ImageFormat::from_extension(format.extension()), Some(format));
            assert_eq!(ImageFormat::from_mime(format.mime_type()), Some(format));
        }
    }
}
