//! Image decoding and tensor layout.

use image::imageops::FilterType;
use serde::ser::{Serialize, SerializeSeq, Serializer};

use leafscan_types::DiagnosisError;

/// A single decoded image laid out as `[1, H, W, 3]`, RGB channel values as
/// `f32` in `0.0..=255.0`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    size: usize,
    data: Vec<f32>,
}

impl ImageTensor {
    /// Decode JPEG/PNG bytes and resize to a `size` x `size` RGB tensor.
    pub fn from_image_bytes(bytes: &[u8], size: u32) -> Result<Self, DiagnosisError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| DiagnosisError::ImageDecode { message: e.to_string() })?;
        let rgb = decoded.resize_exact(size, size, FilterType::Triangle).to_rgb8();
        let data = rgb.as_raw().iter().map(|&channel| f32::from(channel)).collect();
        Ok(Self { size: size as usize, data })
    }

    /// Build directly from pixel data; `data.len()` must be `size * size * 3`.
    pub fn from_raw(size: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == size * size * 3).then_some(Self { size, data })
    }

    pub fn shape(&self) -> [usize; 4] {
        [1, self.size, self.size, 3]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// The batch entry without its leading dimension, serializable as a
    /// nested `H x W x 3` array.
    pub fn instance(&self) -> TensorInstance<'_> {
        TensorInstance { tensor: self }
    }
}

/// Borrowed `H x W x 3` view used for JSON request bodies.
pub struct TensorInstance<'a> {
    tensor: &'a ImageTensor,
}

struct Row<'a> {
    pixels: &'a [f32],
}

impl Serialize for TensorInstance<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let row_len = self.tensor.size * 3;
        let mut seq = serializer.serialize_seq(Some(self.tensor.size))?;
        if row_len > 0 {
            for pixels in self.tensor.data.chunks(row_len) {
                seq.serialize_element(&Row { pixels })?;
            }
        }
        seq.end()
    }
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.pixels.len() / 3))?;
        for pixel in self.pixels.chunks(3) {
            seq.serialize_element(pixel)?;
        }
        seq.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_resizes_to_square() {
        let tensor = ImageTensor::from_image_bytes(&png_bytes(40, 17), 32).unwrap();
        assert_eq!(tensor.shape(), [1, 32, 32, 3]);
        assert_eq!(tensor.data().len(), 32 * 32 * 3);
        assert_eq!(&tensor.data()[..3], &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_garbage_bytes_fail_decode() {
        let err = ImageTensor::from_image_bytes(b"definitely not an image", 32).unwrap_err();
        assert!(matches!(err, DiagnosisError::ImageDecode { .. }));
    }

    #[test]
    fn test_instance_serializes_nested() {
        let tensor = ImageTensor::from_raw(2, (0..12).map(|v| v as f32).collect()).unwrap();
        let value = serde_json::to_value(tensor.instance()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                [[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]],
                [[6.0, 7.0, 8.0], [9.0, 10.0, 11.0]]
            ])
        );
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(ImageTensor::from_raw(2, vec![0.0; 11]).is_none());
    }
}
