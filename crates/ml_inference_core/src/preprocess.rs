//! Image decoding and tensor layout for ImageNet-style classifiers.

use image::imageops::FilterType;
use image::RgbImage;
use ndarray::Array4;

pub const INPUT_SIZE: u32 = 224;
pub const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("input image is empty")]
    Empty,
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, PreprocessError> {
    if bytes.is_empty() {
        return Err(PreprocessError::Empty);
    }
    Ok(image::load_from_memory(bytes)?.to_rgb8())
}

/// Resizes to `INPUT_SIZE` square, scales to `[0, 1]`, normalises per channel
/// and lays the pixels out as `(1, 3, H, W)`.
pub fn to_input_tensor(image: &RgbImage) -> Array4<f32> {
    let side = INPUT_SIZE as usize;
    let resized = image::imageops::resize(image, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    Array4::from_shape_fn((1, 3, side, side), |(_, channel, y, x)| {
        let pixel = resized.get_pixel(x as u32, y as u32);
        let value = f32::from(pixel[channel]) / 255.0;
        (value - CHANNEL_MEAN[channel]) / CHANNEL_STD[channel]
    })
}

pub fn prepare_input(bytes: &[u8]) -> Result<Array4<f32>, PreprocessError> {
    decode_image(bytes).map(|image| to_input_tensor(&image))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgb};

    use super::*;

    fn encoded_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb(color));
        let mut bytes = Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, ImageFormat::Png)
            .expect("png should encode");
        bytes.into_inner()
    }

    #[test]
    fn tensor_is_channel_first_with_batch_dimension() {
        let tensor = prepare_input(&encoded_png(640, 480, [10, 20, 30])).expect("decodes");
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn tensor_is_normalised_per_channel() {
        let tensor = prepare_input(&encoded_png(32, 32, [255, 0, 128])).expect("decodes");

        let red = tensor[[0, 0, 100, 100]];
        let green = tensor[[0, 1, 100, 100]];
        let blue = tensor[[0, 2, 5, 7]];

        assert!((red - (1.0 - 0.485) / 0.229).abs() < 1e-4);
        assert!((green - (0.0 - 0.456) / 0.224).abs() < 1e-4);
        assert!((blue - (128.0 / 255.0 - 0.406) / 0.225).abs() < 1e-4);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(decode_image(&[]), Err(PreprocessError::Empty)));
    }

    #[test]
    fn rejects_corrupt_bytes() {
        let error = decode_image(b"definitely not an image").expect_err("should fail");
        assert!(matches!(error, PreprocessError::Decode(_)));
    }
}
