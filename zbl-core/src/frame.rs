//! Captured frame pixels and PNG encoding.
//!
//! Frames arrive from the capture backend as tightly packed BGRA rows
//! (`DXGI_FORMAT_B8G8R8A8_UNORM` layout).  The [`image`] crate works in
//! RGBA, so encoding swizzles the channels first.

use std::path::Path;

use crate::errors::ZblError;

/// Raw BGRA pixel data for a single captured frame.
///
/// Pixels are stored row-major, left-to-right, top-to-bottom, with no
/// row padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Width of the frame in pixels.
    pub width: u32,
    /// Height of the frame in pixels.
    pub height: u32,
    /// Raw pixel bytes in BGRA order; length == `width * height * 4`.
    pub data: Vec<u8>,
}

impl Frame {
    /// Wrap a packed BGRA buffer, checking its length.
    pub fn from_bgra(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ZblError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ZblError::BackendFailure(format!(
                "frame buffer size mismatch: {width}x{height} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert BGRA -> RGBA.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .flat_map(|px| [px[2], px[1], px[0], px[3]])
            .collect()
    }

    /// Encode the frame as an in-memory PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, ZblError> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba())
            .ok_or_else(|| {
                ZblError::BackendFailure(
                    "image::RgbaImage::from_raw failed: buffer size mismatch".into(),
                )
            })?;

        let mut buf: Vec<u8> = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| ZblError::BackendFailure(format!("PNG encoding failed: {e}")))?;

        Ok(buf)
    }

    /// Encode as PNG and write to `path`.
    pub fn save_png(&self, path: &Path) -> Result<(), ZblError> {
        let png = self.encode_png()?;
        std::fs::write(path, png).map_err(|e| {
            ZblError::BackendFailure(format!("failed to write {}: {e}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn two_by_one() -> Frame {
        // blue pixel, then red pixel (BGRA)
        Frame::from_bgra(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 128]).unwrap()
    }

    #[test]
    fn test_from_bgra_rejects_wrong_length() {
        let err = Frame::from_bgra(2, 2, vec![0; 15]).unwrap_err();
        assert!(err.to_string().contains("needs 16 bytes, got 15"));
    }

    #[test]
    fn test_from_bgra_empty_frame() {
        let f = Frame::from_bgra(0, 0, Vec::new()).unwrap();
        assert!(f.to_rgba().is_empty());
    }

    #[test]
    fn test_to_rgba_swaps_red_and_blue() {
        let rgba = two_by_one().to_rgba();
        assert_eq!(rgba, vec![0, 0, 255, 255, 255, 0, 0, 128]);
    }

    #[test]
    fn test_encode_png_signature() {
        let png = two_by_one().encode_png().unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        two_by_one().save_png(&path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(1, 0).0, [255, 0, 0, 128]);
    }

    #[test]
    fn test_save_png_bad_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.png");
        let err = two_by_one().save_png(&path).unwrap_err();
        assert!(matches!(err, ZblError::BackendFailure(_)));
    }
}
