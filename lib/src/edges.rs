use crate::config::StyleConfig;
use crate::error::{StyleResult, ensure_frame};
use crate::filters::{calculate_luminance, threshold_binary};
use image::{GrayImage, Luma, RgbImage};
use imageproc::filter::{gaussian_blur_f32, median_filter};

/// Reflect an index at the image border (dcb|abcdefg|fed)
#[inline]
fn reflect101(idx: i32, size: i32) -> i32 {
    if size == 1 {
        return 0;
    }
    if idx < 0 {
        -idx
    } else if idx >= size {
        2 * (size - 1) - idx
    } else {
        idx
    }
}

/// Saturating 3x3 Laplacian
///
/// Kernel:
/// [ 2  0  2]
/// [ 0 -8  0]
/// [ 2  0  2]
///
/// The response saturates into [0, 255]: negative sums clamp to zero, so only
/// the dark side of a discontinuity fires. A flat field produces exactly zero
/// everywhere (the kernel sums to zero).
///
/// # Arguments
/// * `img` - Input grayscale image
///
/// # Returns
/// Edge-strength map of identical dimensions
pub fn laplacian(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let w = width as i32;
    let h = height as i32;
    let mut output = GrayImage::new(width, height);

    for y in 0..h {
        for x in 0..w {
            let ym1 = reflect101(y - 1, h);
            let yp1 = reflect101(y + 1, h);
            let xm1 = reflect101(x - 1, w);
            let xp1 = reflect101(x + 1, w);

            let nw = img.get_pixel(xm1 as u32, ym1 as u32)[0] as i32;
            let ne = img.get_pixel(xp1 as u32, ym1 as u32)[0] as i32;
            let sw = img.get_pixel(xm1 as u32, yp1 as u32)[0] as i32;
            let se = img.get_pixel(xp1 as u32, yp1 as u32)[0] as i32;
            let center = img.get_pixel(x as u32, y as u32)[0] as i32;

            let sum = 2 * (nw + ne + sw + se) - 8 * center;
            let response = sum.clamp(0, 255) as u8;
            output.put_pixel(x as u32, y as u32, Luma([response]));
        }
    }

    output
}

/// Grayscale dilation with a 3x3 elliptical (cross) structuring element
///
/// Each pass replaces a pixel with the maximum over itself and its four
/// direct neighbors; `iterations` passes thicken strokes by that many pixels.
/// Works on softened (non-binary) edge maps as well as binary ones.
///
/// # Arguments
/// * `img` - Input grayscale image
/// * `iterations` - Number of dilation passes
///
/// # Returns
/// Dilated image of identical dimensions
pub fn dilate(img: &GrayImage, iterations: u32) -> GrayImage {
    let (width, height) = img.dimensions();
    let w = width as i32;
    let h = height as i32;

    let mut current = img.clone();
    for _ in 0..iterations {
        let mut output = GrayImage::new(width, height);
        for y in 0..h {
            for x in 0..w {
                let mut max = current.get_pixel(x as u32, y as u32)[0];
                for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                    let nx = x + dx;
                    let ny = y + dy;
                    if nx >= 0 && nx < w && ny >= 0 && ny < h {
                        max = max.max(current.get_pixel(nx as u32, ny as u32)[0]);
                    }
                }
                output.put_pixel(x as u32, y as u32, Luma([max]));
            }
        }
        current = output;
    }

    current
}

/// Extract the line-art mask from the original (pre-smoothing) frame
///
/// Pipeline: luminance → 5x5 median filter → saturating Laplacian → binary
/// threshold → optional Gaussian soften → dilation → inversion. The result
/// has edges dark (0) and background bright (255); the compositor multiplies
/// it against the quantized colors to draw the strokes.
///
/// Edges are computed from the unsmoothed frame on purpose: the smoother
/// erases exactly the fine structure the strokes should trace.
///
/// # Arguments
/// * `img` - Original RGB frame
/// * `config` - Pipeline configuration (threshold, softening sigma, stroke weight)
///
/// # Returns
/// Single-channel mask of identical dimensions
pub fn edge_mask(img: &RgbImage, config: &StyleConfig) -> StyleResult<GrayImage> {
    ensure_frame(img, "edge extractor")?;

    let gray = calculate_luminance(img);
    let denoised = median_filter(&gray, 2, 2);
    let response = laplacian(&denoised);
    let mut edges = threshold_binary(&response, config.edge_threshold);

    if config.edge_blur > 0.0 {
        edges = gaussian_blur_f32(&edges, config.edge_blur);
    }

    let thick = dilate(&edges, config.stroke_iterations());

    let mut mask = thick;
    for p in mask.pixels_mut() {
        p[0] = 255 - p[0];
    }
    Ok(mask)
}
