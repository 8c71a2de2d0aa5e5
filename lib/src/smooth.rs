use crate::config::StyleConfig;
use crate::error::{StyleResult, ensure_frame};
use image::RgbImage;
use rayon::prelude::*;

/// Apply the configured number of edge-preserving smoothing passes
///
/// Each pass consumes the output of the previous one (sequential composition),
/// so N passes flatten texture progressively while color boundaries survive.
///
/// # Arguments
/// * `img` - Input RGB frame
/// * `config` - Pipeline configuration (diameter, sigmas, iteration count)
///
/// # Returns
/// A new frame of identical dimensions
pub fn smooth_frame(img: &RgbImage, config: &StyleConfig) -> StyleResult<RgbImage> {
    ensure_frame(img, "smoother")?;

    let mut smoothed = img.clone();
    for _ in 0..config.smooth_iterations {
        smoothed = bilateral_filter(
            &smoothed,
            config.smooth_diameter,
            config.smooth_sigma_color,
            config.smooth_sigma_space,
        );
    }
    Ok(smoothed)
}

/// Single bilateral filter pass over an RGB image
///
/// Every output pixel is a normalized weighted average of the pixels inside a
/// circular window of radius `diameter / 2`. The weight of a neighbor is the
/// product of a spatial Gaussian, exp(-r^2 / 2*sigma_space^2), and a color
/// Gaussian over the L1 distance of the two colors,
/// exp(-d^2 / 2*sigma_color^2). Neighbors across a color boundary contribute
/// almost nothing, which is what preserves edges.
///
/// Sample coordinates are clamped at the borders. Rows are processed in
/// parallel; each row depends only on the input image, so the result is
/// deterministic.
///
/// # Arguments
/// * `img` - Input RGB image
/// * `diameter` - Window diameter in pixels
/// * `sigma_color` - Color-difference sigma (values <= 0 fall back to 1)
/// * `sigma_space` - Spatial sigma (values <= 0 fall back to 1)
///
/// # Returns
/// Filtered image of identical dimensions
pub fn bilateral_filter(
    img: &RgbImage,
    diameter: u32,
    sigma_color: f32,
    sigma_space: f32,
) -> RgbImage {
    let (width, height) = img.dimensions();
    let radius = (diameter / 2) as i32;

    let sigma_color = if sigma_color <= 0.0 { 1.0 } else { sigma_color };
    let sigma_space = if sigma_space <= 0.0 { 1.0 } else { sigma_space };
    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    // One weight per possible L1 color distance between two RGB pixels
    let color_weight: Vec<f32> = (0..=3 * 255)
        .map(|d| ((d * d) as f32 * color_coeff).exp())
        .collect();

    // Offsets inside the circular window, with their spatial weights
    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dx * dx + dy * dy) as f32;
            if r2 > (radius * radius) as f32 {
                continue;
            }
            offsets.push((dx, dy, (r2 * space_coeff).exp()));
        }
    }

    let row_len = width as usize * 3;
    let mut buf = vec![0u8; row_len * height as usize];

    buf.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        let y = y as u32;
        for x in 0..width {
            let center = img.get_pixel(x, y);
            let mut sum = [0.0f32; 3];
            let mut weight_sum = 0.0f32;

            for &(dx, dy, space_w) in &offsets {
                let sx = (x as i32 + dx).clamp(0, width as i32 - 1) as u32;
                let sy = (y as i32 + dy).clamp(0, height as i32 - 1) as u32;
                let sample = img.get_pixel(sx, sy);

                let d = sample[0].abs_diff(center[0]) as usize
                    + sample[1].abs_diff(center[1]) as usize
                    + sample[2].abs_diff(center[2]) as usize;
                let weight = space_w * color_weight[d];

                sum[0] += sample[0] as f32 * weight;
                sum[1] += sample[1] as f32 * weight;
                sum[2] += sample[2] as f32 * weight;
                weight_sum += weight;
            }

            let base = x as usize * 3;
            for c in 0..3 {
                row[base + c] = (sum[c] / weight_sum).round().clamp(0.0, 255.0) as u8;
            }
        }
    });

    RgbImage::from_raw(width, height, buf).expect("buffer sized to dimensions")
}
