/// Image formats recognized by their leading signature bytes.
///
/// Only the header is inspected; this is format sniffing, not decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    WebP,
    Tiff,
}

/// Buffers shorter than this are never recognized
const MIN_HEADER_LEN: usize = 4;

impl ImageFormat {
    /// Classify a buffer by its magic bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < MIN_HEADER_LEN {
            return None;
        }

        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
            [0x89, 0x50, 0x4E, 0x47, ..] if bytes.len() >= 8 => Some(ImageFormat::Png),
            [b'G', b'I', b'F', ..] if bytes.len() >= 6 => Some(ImageFormat::Gif),
            [b'B', b'M', ..] => Some(ImageFormat::Bmp),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => {
                Some(ImageFormat::WebP)
            }
            [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => {
                Some(ImageFormat::Tiff)
            }
            _ => None,
        }
    }

    /// MIME type stored alongside uploaded objects
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Tiff => "image/tiff",
        }
    }
}

/// Whether `bytes` starts with a recognized image signature
pub fn is_recognized_image(bytes: &[u8]) -> bool {
    ImageFormat::sniff(bytes).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(header: &[u8]) -> Vec<u8> {
        let mut bytes = header.to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        bytes
    }

    #[test]
    fn test_recognized_signatures() {
        assert_eq!(ImageFormat::sniff(&padded(&[0xFF, 0xD8, 0xFF])), Some(ImageFormat::Jpeg));
        assert_eq!(
            ImageFormat::sniff(&padded(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::sniff(&padded(b"GIF89a")), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(&padded(b"BM")), Some(ImageFormat::Bmp));
        assert_eq!(
            ImageFormat::sniff(&padded(b"RIFF\x24\x00\x00\x00WEBPVP8 ")),
            Some(ImageFormat::WebP)
        );
        assert_eq!(
            ImageFormat::sniff(&padded(&[0x49, 0x49, 0x2A, 0x00])),
            Some(ImageFormat::Tiff)
        );
        assert_eq!(
            ImageFormat::sniff(&padded(&[0x4D, 0x4D, 0x00, 0x2A])),
            Some(ImageFormat::Tiff)
        );
    }

    #[test]
    fn test_short_buffers_are_rejected() {
        assert!(!is_recognized_image(&[]));
        assert!(!is_recognized_image(&[0xFF, 0xD8, 0xFF]));
        assert!(!is_recognized_image(b"BM"));
        // minimal JPEG header plus one byte is enough
        assert!(is_recognized_image(&[0xFF, 0xD8, 0xFF, 0xE0]));
    }

    #[test]
    fn test_truncated_headers_are_rejected() {
        // PNG needs the full 8-byte header, GIF six bytes, WebP twelve
        assert!(!is_recognized_image(&[0x89, 0x50, 0x4E, 0x47, 0x0D]));
        assert!(!is_recognized_image(b"GIF8"));
        assert!(!is_recognized_image(b"RIFF\x00\x00\x00\x00WEB"));
    }

    #[test]
    fn test_unrecognized_content() {
        assert!(!is_recognized_image(b"%PDF-1.7 trailer"));
        assert!(!is_recognized_image(b"RIFF\x00\x00\x00\x00WAVEfmt "));
        assert!(!is_recognized_image(&[0x00, 0x01, 0x02, 0x03, 0x04]));
        assert!(!is_recognized_image(b"hello world"));
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(ImageFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageFormat::WebP.mime_type(), "image/webp");
    }
}
