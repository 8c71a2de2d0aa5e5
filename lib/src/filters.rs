use image::{GrayImage, Luma, RgbImage};

/// Calculate luminance from an RGB image
///
/// Formula: L = 0.299*R + 0.587*G + 0.114*B (Rec.601), the same weighting the
/// rest of the pipeline assumes for edge detection and glow extraction.
///
/// # Arguments
/// * `img` - Input RGB image
///
/// # Returns
/// Grayscale image with luminance values
pub fn calculate_luminance(img: &RgbImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let pixel = img.get_pixel(x, y);
            let r = pixel[0] as f32 / 255.0;
            let g = pixel[1] as f32 / 255.0;
            let b = pixel[2] as f32 / 255.0;

            // Rec.601 luminance coefficients
            let luminance = 0.299 * r + 0.587 * g + 0.114 * b;

            let lum_u8 = (luminance * 255.0).round().clamp(0.0, 255.0) as u8;
            output.put_pixel(x, y, Luma([lum_u8]));
        }
    }

    output
}

/// Binarize a grayscale image at a fixed cutoff
///
/// Pixels >= `cutoff` become 255, everything else 0.
///
/// # Arguments
/// * `img` - Input grayscale image
/// * `cutoff` - Threshold value
///
/// # Returns
/// Binary image containing only 0 and 255
pub fn threshold_binary(img: &GrayImage, cutoff: u8) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let v = img.get_pixel(x, y)[0];
            let result = if v >= cutoff { 255 } else { 0 };
            output.put_pixel(x, y, Luma([result]));
        }
    }

    output
}

/// Convert one RGB pixel to HSV
///
/// Hue is carried in half-degrees, `[0, 180)`, so a full color circle fits in
/// a byte; saturation and value are in `[0, 255]`. All components are f32 so
/// callers can shift and scale before converting back.
///
/// # Arguments
/// * `pixel` - RGB components, 0-255
///
/// # Returns
/// `[h, s, v]` with h in `[0, 180)` and s, v in `[0, 255]`
pub fn rgb_to_hsv(pixel: [u8; 3]) -> [f32; 3] {
    let r = pixel[0] as f32;
    let g = pixel[1] as f32;
    let b = pixel[2] as f32;

    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = v - min;

    let s = if v == 0.0 { 0.0 } else { chroma / v * 255.0 };

    let h_deg = if chroma == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / chroma
    } else if v == g {
        60.0 * (b - r) / chroma + 120.0
    } else {
        60.0 * (r - g) / chroma + 240.0
    };

    // Half-degree hue, wrapped into [0, 180)
    let h = h_deg.rem_euclid(360.0) / 2.0;

    [h, s, v]
}

/// Convert one HSV pixel (as produced by `rgb_to_hsv`) back to RGB
///
/// # Arguments
/// * `hsv` - `[h, s, v]` with h in `[0, 180)` and s, v in `[0, 255]`
///
/// # Returns
/// RGB components, rounded and clamped to 0-255
pub fn hsv_to_rgb(hsv: [f32; 3]) -> [u8; 3] {
    let h_deg = hsv[0].rem_euclid(180.0) * 2.0;
    let s = (hsv[1] / 255.0).clamp(0.0, 1.0);
    let v = hsv[2].clamp(0.0, 255.0);

    let chroma = v * s;
    let h6 = h_deg / 60.0;
    let x = chroma * (1.0 - (h6 % 2.0 - 1.0).abs());

    let (r1, g1, b1) = match h6.floor() as i32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let m = v - chroma;
    [
        (r1 + m).round().clamp(0.0, 255.0) as u8,
        (g1 + m).round().clamp(0.0, 255.0) as u8,
        (b1 + m).round().clamp(0.0, 255.0) as u8,
    ]
}
