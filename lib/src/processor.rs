use crate::composite::composite_frame;
use crate::config::StyleConfig;
use crate::edges::edge_mask;
use crate::error::{StyleError, StyleResult, ensure_frame};
use crate::quantize::quantize_colors;
use crate::smooth::smooth_frame;
use image::RgbImage;
use log::debug;
use rayon::prelude::*;

/// Stylize one frame into the cartoon rendering
///
/// The full fixed pipeline:
/// 1. Edge-preserving smoothing (iterated bilateral filter)
/// 2. Color quantization of the smoothed frame (seeded k-means)
/// 3. Line-art mask from the ORIGINAL frame (the smoother would erase the
///    fine structure the strokes trace)
/// 4. Compositing: hue/saturation grade, edge masking, glow blend
///
/// The transform is pure and deterministic: the same frame and configuration
/// always produce a bit-identical result.
///
/// # Arguments
/// * `input` - The decoded RGB frame to stylize
/// * `config` - Pipeline configuration
///
/// # Returns
/// A new frame of identical dimensions
pub fn stylize_frame(input: &RgbImage, config: &StyleConfig) -> StyleResult<RgbImage> {
    config.validate()?;
    ensure_frame(input, "pipeline")?;

    let (width, height) = input.dimensions();
    debug!("stylizing {width}x{height} frame");

    // Step 1: flatten texture while keeping color boundaries
    let smoothed = smooth_frame(input, config)?;

    // Step 2: collapse the smoothed colors onto a small palette
    let (quantized, _palette) = quantize_colors(&smoothed, config.quant_colors)?;

    // Step 3: extract line art from the unsmoothed original
    let mask = edge_mask(input, config)?;

    // Step 4: grade, ink the strokes, blend the glow
    composite_frame(&quantized, &mask, config)
}

/// Stylize a batch of frames in parallel
///
/// Frames are independent, so they are mapped across worker threads; the
/// output vector keeps the input order, which is all the surrounding video
/// reassembly needs. The configuration is validated once up front: a bad
/// bundle fails before any frame is touched.
///
/// # Arguments
/// * `frames` - Decoded frames, in presentation order
/// * `config` - Pipeline configuration shared by every frame
///
/// # Returns
/// Stylized frames, index-aligned with the input
pub fn stylize_frames(frames: &[RgbImage], config: &StyleConfig) -> StyleResult<Vec<RgbImage>> {
    config.validate()?;
    frames
        .par_iter()
        .map(|frame| stylize_frame(frame, config))
        .collect()
}

/// Build a frame from the dense pixel grid an external decoder hands over
///
/// # Arguments
/// * `width` - Frame width in pixels
/// * `height` - Frame height in pixels
/// * `channels` - Samples per pixel; only 3 (RGB) is accepted
/// * `data` - Row-major interleaved samples, exactly `width * height * 3` bytes
///
/// # Returns
/// The owned frame, or `InvalidFrame` describing what was malformed
pub fn frame_from_raw(
    width: u32,
    height: u32,
    channels: u32,
    data: Vec<u8>,
) -> StyleResult<RgbImage> {
    if width == 0 || height == 0 || channels != 3 {
        return Err(StyleError::InvalidFrame {
            stage: "decoder handoff",
            width,
            height,
            channels,
        });
    }
    let expected = width as usize * height as usize * 3;
    if data.len() != expected {
        return Err(StyleError::InvalidFrame {
            stage: "decoder handoff",
            width,
            height,
            channels,
        });
    }
    Ok(RgbImage::from_raw(width, height, data).expect("length checked above"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn test_frame(width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                img.put_pixel(
                    x,
                    y,
                    Rgb([
                        ((x * 7 + y * 13) % 256) as u8,
                        ((x * 3 + y * 5) % 256) as u8,
                        ((x * 11 + y * 2) % 256) as u8,
                    ]),
                );
            }
        }
        img
    }

    #[test]
    fn test_pipeline_preserves_dimensions() {
        let img = test_frame(16, 12);
        let out = stylize_frame(&img, &StyleConfig::default()).unwrap();
        assert_eq!(out.dimensions(), (16, 12));
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let img = test_frame(16, 16);
        let config = StyleConfig::default();
        let a = stylize_frame(&img, &config).unwrap();
        let b = stylize_frame(&img, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_flat_black_frame_stays_black() {
        // No edges to ink, nothing bright enough to glow
        let img = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        let out = stylize_frame(&img, &StyleConfig::default()).unwrap();
        for p in out.pixels() {
            assert_eq!(p.0, [0, 0, 0]);
        }
    }

    #[test]
    fn test_pipeline_rejects_empty_frame() {
        let img = RgbImage::new(0, 10);
        assert!(matches!(
            stylize_frame(&img, &StyleConfig::default()),
            Err(StyleError::InvalidFrame { .. })
        ));
    }

    #[test]
    fn test_pipeline_rejects_bad_config_before_work() {
        let mut config = StyleConfig::default();
        config.quant_colors = 0;
        let img = test_frame(8, 8);
        assert!(matches!(
            stylize_frame(&img, &config),
            Err(StyleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_batch_keeps_order_and_length() {
        let frames = vec![
            RgbImage::from_pixel(6, 6, Rgb([10, 10, 10])),
            RgbImage::from_pixel(6, 6, Rgb([60, 60, 60])),
            RgbImage::from_pixel(6, 6, Rgb([120, 120, 120])),
        ];
        let config = StyleConfig::default();

        let out = stylize_frames(&frames, &config).unwrap();
        assert_eq!(out.len(), 3);
        for (frame, styled) in frames.iter().zip(out.iter()) {
            assert_eq!(*styled, stylize_frame(frame, &config).unwrap());
        }
    }

    #[test]
    fn test_batch_fails_fast_on_bad_config() {
        let mut config = StyleConfig::default();
        config.glow_strength = -1.0;
        let frames = vec![RgbImage::new(4, 4)];
        assert!(stylize_frames(&frames, &config).is_err());
    }

    #[test]
    fn test_frame_from_raw_accepts_rgb() {
        let data = vec![0u8; 4 * 3 * 3];
        let frame = frame_from_raw(4, 3, 3, data).unwrap();
        assert_eq!(frame.dimensions(), (4, 3));
    }

    #[test]
    fn test_frame_from_raw_rejects_wrong_channels() {
        let data = vec![0u8; 4 * 3 * 4];
        assert!(matches!(
            frame_from_raw(4, 3, 4, data),
            Err(StyleError::InvalidFrame { channels: 4, .. })
        ));
    }

    #[test]
    fn test_frame_from_raw_rejects_short_buffer() {
        let data = vec![0u8; 5];
        assert!(frame_from_raw(4, 3, 3, data).is_err());
    }
}
