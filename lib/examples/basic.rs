/// Basic example: stylize a simple synthetic frame
///
/// This creates a test image with some basic shapes and runs the cartoon
/// pipeline over it
use image::{Rgb, RgbImage};
use toon_rendr::{StyleConfig, stylize_frame};

fn main() {
    println!("Toon Renderer - Basic Example");
    println!("=============================\n");

    // Create a simple 160x160 test frame
    let width = 160;
    let height = 160;
    let mut img = RgbImage::new(width, height);

    // Fill with a muted blue background
    for y in 0..height {
        for x in 0..width {
            img.put_pixel(x, y, Rgb([60, 80, 140]));
        }
    }

    // Draw a bright circle in the center (this one will glow)
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let radius = 50.0;

    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - center_x;
            let dy = y as f32 - center_y;
            let dist = (dx * dx + dy * dy).sqrt();

            if dist < radius {
                // Bright yellow disc
                img.put_pixel(x, y, Rgb([250, 230, 120]));
            } else if (dist - radius).abs() < 5.0 {
                // Dark rim
                img.put_pixel(x, y, Rgb([20, 20, 30]));
            }
        }
    }

    // Draw a diagonal red stripe
    for i in 0..width {
        img.put_pixel(i, i, Rgb([200, 40, 40]));
        if i > 0 {
            img.put_pixel(i - 1, i, Rgb([200, 40, 40]));
            img.put_pixel(i, i - 1, Rgb([200, 40, 40]));
        }
    }

    println!("Created test frame: {}x{}", width, height);

    // Configure the stylization
    let config = StyleConfig {
        smooth_iterations: 3,
        smooth_diameter: 9,
        smooth_sigma_color: 75.0,
        smooth_sigma_space: 75.0,
        quant_colors: 6,
        edge_threshold: 45,
        edge_blur: 1.0,
        stroke_weight: 1.0,
        hue_shift: -20.0,
        saturation_boost: 1.15,
        glow_strength: 0.35,
    };

    println!("Processing with config:");
    println!("  - Palette colors: {}", config.quant_colors);
    println!("  - Smoothing passes: {}", config.smooth_iterations);
    println!("  - Edge threshold: {}", config.edge_threshold);
    println!("  - Glow strength: {}", config.glow_strength);
    println!();

    // Run the pipeline
    let output = stylize_frame(&img, &config).expect("stylization failed");

    // Save both images
    img.save("basic_input.png").expect("Failed to save input");
    output
        .save("basic_output.png")
        .expect("Failed to save output");

    println!("✓ Saved input to:  basic_input.png");
    println!("✓ Saved output to: basic_output.png");
    println!("\nCartoon stylization complete!");
}
