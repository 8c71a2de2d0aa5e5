use crate::config::StyleConfig;
use crate::error::{StyleError, StyleResult, ensure_frame};
use crate::filters::{calculate_luminance, hsv_to_rgb, rgb_to_hsv, threshold_binary};
use image::{GrayImage, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use rayon::prelude::*;

/// Luminance cutoff above which a pixel feeds the glow layer
const GLOW_CUTOFF: u8 = 200;

/// Blur sigma of the glow layer
const GLOW_SIGMA: f32 = 15.0;

/// Shift hue and boost saturation across a frame
///
/// Hue moves by `hue_shift / 2` on the 180-unit wheel (wrapping, never out of
/// range); saturation multiplies by `saturation_boost` and clamps to its
/// valid range. Value is untouched.
///
/// # Arguments
/// * `img` - Input RGB frame
/// * `hue_shift` - Hue offset; the applied shift is half of this
/// * `saturation_boost` - Saturation multiplier
///
/// # Returns
/// Color-graded frame of identical dimensions
pub fn adjust_hue_saturation(img: &RgbImage, hue_shift: f32, saturation_boost: f32) -> RgbImage {
    let (width, height) = img.dimensions();
    let mut buf = img.as_raw().clone();

    buf.par_chunks_mut(3).for_each(|px| {
        let [h, s, v] = rgb_to_hsv([px[0], px[1], px[2]]);
        let h = (h + hue_shift / 2.0).rem_euclid(180.0);
        let s = (s * saturation_boost).clamp(0.0, 255.0);
        px.copy_from_slice(&hsv_to_rgb([h, s, v]));
    });

    RgbImage::from_raw(width, height, buf).expect("buffer sized to dimensions")
}

/// Darken a frame at edge locations
///
/// Multiplies every channel by `mask / 255`, so mask value 0 paints a black
/// stroke, 255 leaves the color untouched, and softened in-between values
/// feather the stroke.
///
/// # Arguments
/// * `img` - Input RGB frame
/// * `mask` - Single-channel mask of identical dimensions
///
/// # Returns
/// Masked frame, or `MaskMismatch` if the dimensions differ
pub fn apply_edge_mask(img: &RgbImage, mask: &GrayImage) -> StyleResult<RgbImage> {
    let (width, height) = img.dimensions();
    if mask.dimensions() != (width, height) {
        let (mask_width, mask_height) = mask.dimensions();
        return Err(StyleError::MaskMismatch {
            stage: "compositor",
            frame_width: width,
            frame_height: height,
            mask_width,
            mask_height,
        });
    }

    let mut output = RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let factor = mask.get_pixel(x, y)[0] as f32 / 255.0;
            let px = img.get_pixel(x, y);
            let mut out = [0u8; 3];
            for c in 0..3 {
                out[c] = (px[c] as f32 * factor).round() as u8;
            }
            output.put_pixel(x, y, image::Rgb(out));
        }
    }
    Ok(output)
}

/// Build the glow layer: bright regions of the frame, heavily blurred
///
/// Luminance >= `GLOW_CUTOFF` selects the highlight pixels; everything else
/// is zeroed before a wide Gaussian blur smears the highlights outward.
fn glow_layer(img: &RgbImage) -> RgbImage {
    let lum = calculate_luminance(img);
    let bright = threshold_binary(&lum, GLOW_CUTOFF);

    let (width, height) = img.dimensions();
    let mut gated = RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if bright.get_pixel(x, y)[0] == 255 {
                gated.put_pixel(x, y, *img.get_pixel(x, y));
            }
        }
    }

    gaussian_blur_f32(&gated, GLOW_SIGMA)
}

/// Merge quantized colors and the edge mask into the final stylized frame
///
/// Order is fixed: hue/saturation grade, edge masking, glow extraction, glow
/// blend. The blend runs in f32 and clamps into [0, 255] before rounding, so
/// strong glow can never wrap a channel.
///
/// # Arguments
/// * `quantized` - Output of the quantizer
/// * `mask` - Output of the edge extractor
/// * `config` - Pipeline configuration (hue shift, saturation boost, glow strength)
///
/// # Returns
/// The final frame, same dimensions as the inputs
pub fn composite_frame(
    quantized: &RgbImage,
    mask: &GrayImage,
    config: &StyleConfig,
) -> StyleResult<RgbImage> {
    ensure_frame(quantized, "compositor")?;

    let graded = adjust_hue_saturation(quantized, config.hue_shift, config.saturation_boost);
    let combined = apply_edge_mask(&graded, mask)?;
    let glow = glow_layer(&combined);

    let (width, height) = combined.dimensions();
    let mut buf = Vec::with_capacity((width * height * 3) as usize);
    for (base, halo) in combined.pixels().zip(glow.pixels()) {
        for c in 0..3 {
            let v = base[c] as f32 + halo[c] as f32 * config.glow_strength;
            buf.push(v.clamp(0.0, 255.0).round() as u8);
        }
    }
    let output = RgbImage::from_raw(width, height, buf).expect("buffer sized to dimensions");

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::rgb_to_hsv;
    use image::{Luma, Rgb};

    fn full_mask(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([255]))
    }

    #[test]
    fn test_grade_identity() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(0, 1, Rgb([200, 120, 40]));
        img.put_pixel(1, 1, Rgb([0, 0, 0]));

        let out = adjust_hue_saturation(&img, 0.0, 1.0);
        assert_eq!(out, img);
    }

    #[test]
    fn test_grade_hue_stays_in_range() {
        let mut img = RgbImage::new(3, 1);
        img.put_pixel(0, 0, Rgb([255, 10, 10]));
        img.put_pixel(1, 0, Rgb([10, 255, 10]));
        img.put_pixel(2, 0, Rgb([10, 10, 255]));

        // Far beyond one full wrap in either direction
        for shift in [-400.0, 400.0, -20.0] {
            let out = adjust_hue_saturation(&img, shift, 1.15);
            for p in out.pixels() {
                let h = rgb_to_hsv(p.0)[0];
                assert!((0.0..180.0).contains(&h), "hue {} out of range", h);
            }
        }
    }

    #[test]
    fn test_grade_saturation_clamps() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]));
        let out = adjust_hue_saturation(&img, 0.0, 4.0);
        // Already fully saturated: boosting cannot push it out of range
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_mask_multiplication() {
        let img = RgbImage::from_pixel(4, 4, Rgb([200, 100, 50]));

        let untouched = apply_edge_mask(&img, &full_mask(4, 4)).unwrap();
        assert_eq!(untouched, img);

        let zero_mask = GrayImage::from_pixel(4, 4, Luma([0]));
        let blacked = apply_edge_mask(&img, &zero_mask).unwrap();
        for p in blacked.pixels() {
            assert_eq!(p.0, [0, 0, 0]);
        }
    }

    #[test]
    fn test_mask_mismatch_is_rejected() {
        let img = RgbImage::new(4, 4);
        let mask = GrayImage::new(2, 4);
        assert!(matches!(
            apply_edge_mask(&img, &mask),
            Err(StyleError::MaskMismatch { .. })
        ));
    }

    #[test]
    fn test_glow_never_overflows() {
        // Saturated white everywhere: blend must clamp, not wrap
        let img = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
        let out = composite_frame(&img, &full_mask(8, 8), &StyleConfig::default()).unwrap();
        for p in out.pixels() {
            assert_eq!(p.0, [255, 255, 255]);
        }
    }

    #[test]
    fn test_glow_spills_past_bright_region() {
        // White square on black: the halo reaches pixels outside the square
        let mut img = RgbImage::new(20, 20);
        for y in 7..13 {
            for x in 7..13 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }

        let mut config = StyleConfig::default();
        config.hue_shift = 0.0;
        config.saturation_boost = 1.0;
        let out = composite_frame(&img, &full_mask(20, 20), &config).unwrap();
        assert!(out.get_pixel(4, 10)[0] > 0);
    }

    #[test]
    fn test_dark_frame_gets_no_glow() {
        let img = RgbImage::from_pixel(10, 10, Rgb([30, 30, 30]));
        let mut config = StyleConfig::default();
        config.hue_shift = 0.0;
        config.saturation_boost = 1.0;

        let out = composite_frame(&img, &full_mask(10, 10), &config).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_preserves_dimensions() {
        let img = RgbImage::new(13, 7);
        let out = composite_frame(&img, &full_mask(13, 7), &StyleConfig::default()).unwrap();
        assert_eq!(out.dimensions(), (13, 7));
    }

    #[test]
    fn test_rejects_empty_frame() {
        let img = RgbImage::new(0, 0);
        assert!(composite_frame(&img, &full_mask(0, 0), &StyleConfig::default()).is_err());
    }
}
