/// Batch example: stylize a short synthetic frame sequence in parallel
use image::{Rgb, RgbImage};
use toon_rendr::{StyleConfig, stylize_frames};

fn main() {
    println!("Toon Renderer - Batch Demo");
    println!("==========================\n");

    // A tiny "clip": a bright square sliding across a dark background
    let frames: Vec<RgbImage> = (0..8)
        .map(|i| {
            let mut img = RgbImage::from_pixel(120, 80, Rgb([30, 30, 50]));
            let left = i * 12;
            for y in 28..52 {
                for x in left..left + 24 {
                    img.put_pixel(x, y, Rgb([240, 220, 140]));
                }
            }
            img
        })
        .collect();

    println!("Generated {} frames", frames.len());

    let config = StyleConfig::default();
    let styled = stylize_frames(&frames, &config).expect("stylization failed");

    for (i, frame) in styled.iter().enumerate() {
        let path = format!("frame_{:03}.png", i);
        frame.save(&path).expect("Failed to save frame");
        println!("✓ Saved {}", path);
    }

    println!("\nBatch stylization complete!");
}
