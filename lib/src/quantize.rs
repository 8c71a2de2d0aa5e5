//! Palette reduction via seeded k-means
//!
//! Pixels are clustered as points in [0,1]^3 and replaced by their centroid
//! color. Runs are reproducible: initialization draws from a fixed-seed RNG
//! and every floating-point reduction happens sequentially in pixel order, so
//! output is bit-identical across runs for the same input and color count.

use crate::error::{StyleError, StyleResult, ensure_frame};
use image::RgbImage;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Fixed seed driving centroid initialization
const KMEANS_SEED: u64 = 0;

/// Independent initialization attempts; the lowest-inertia run wins
const KMEANS_ATTEMPTS: u32 = 4;

/// Iteration cap per attempt
const KMEANS_MAX_ITERS: u32 = 100;

/// Convergence cutoff on summed squared centroid movement
const KMEANS_TOL: f32 = 1e-4;

/// The K centroid colors of one quantized frame, in cluster order
pub type Palette = Vec<[u8; 3]>;

/// Reduce a frame to at most `k` colors
///
/// Clusters all pixels in normalized color space with k-means (k-means++
/// seeding, `KMEANS_ATTEMPTS` restarts, best inertia kept) and paints every
/// pixel with its centroid color rescaled to 8-bit. A cluster that ends up
/// empty keeps its seed color; the palette always has exactly `k` entries.
///
/// # Arguments
/// * `img` - Input RGB frame
/// * `k` - Number of palette colors, >= 1
///
/// # Returns
/// The quantized frame and the palette that produced it
pub fn quantize_colors(img: &RgbImage, k: usize) -> StyleResult<(RgbImage, Palette)> {
    ensure_frame(img, "quantizer")?;
    if k < 1 {
        return Err(StyleError::invalid_config(
            "quantization color count must be at least 1".to_string(),
        ));
    }

    let (width, height) = img.dimensions();
    let samples: Vec<[f32; 3]> = img
        .pixels()
        .map(|p| {
            [
                p[0] as f32 / 255.0,
                p[1] as f32 / 255.0,
                p[2] as f32 / 255.0,
            ]
        })
        .collect();

    // One RNG stream across all attempts keeps the whole procedure a pure
    // function of the input pixels.
    let mut rng = StdRng::seed_from_u64(KMEANS_SEED);

    let mut best: Option<(f32, Vec<[f32; 3]>, Vec<u32>)> = None;
    for attempt in 0..KMEANS_ATTEMPTS {
        let (centroids, labels, inertia) = lloyd(&samples, k, &mut rng);
        debug!("k-means attempt {attempt}: inertia {inertia:.6}");
        if best.as_ref().is_none_or(|(b, _, _)| inertia < *b) {
            best = Some((inertia, centroids, labels));
        }
    }
    let (_, centroids, labels) = best.expect("at least one k-means attempt runs");

    let palette: Palette = centroids
        .iter()
        .map(|c| {
            [
                (c[0] * 255.0).round().clamp(0.0, 255.0) as u8,
                (c[1] * 255.0).round().clamp(0.0, 255.0) as u8,
                (c[2] * 255.0).round().clamp(0.0, 255.0) as u8,
            ]
        })
        .collect();

    let mut buf = Vec::with_capacity(samples.len() * 3);
    for &label in &labels {
        buf.extend_from_slice(&palette[label as usize]);
    }
    let quantized = RgbImage::from_raw(width, height, buf).expect("buffer sized to dimensions");

    Ok((quantized, palette))
}

fn squared_distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Index of the closest centroid; ties go to the lowest index
fn nearest(sample: &[f32; 3], centroids: &[[f32; 3]]) -> u32 {
    let mut best_idx = 0u32;
    let mut best_dist = f32::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = squared_distance(sample, c);
        if d < best_dist {
            best_dist = d;
            best_idx = i as u32;
        }
    }
    best_idx
}

/// k-means++ seeding: first center uniform, later centers sampled with
/// probability proportional to squared distance from the nearest chosen one
fn kmeans_pp_init(samples: &[[f32; 3]], k: usize, rng: &mut StdRng) -> Vec<[f32; 3]> {
    let n = samples.len();
    let mut centroids = Vec::with_capacity(k);

    let first = samples[rng.random_range(0..n)];
    let mut dist2: Vec<f32> = samples
        .iter()
        .map(|s| squared_distance(s, &first))
        .collect();
    centroids.push(first);

    while centroids.len() < k {
        let total: f32 = dist2.iter().sum();
        let chosen = if total <= 0.0 {
            // Every sample already coincides with a center (solid-color frame)
            samples[rng.random_range(0..n)]
        } else {
            let mut target = rng.random::<f32>() * total;
            let mut idx = n - 1;
            for (i, &d) in dist2.iter().enumerate() {
                if target <= d {
                    idx = i;
                    break;
                }
                target -= d;
            }
            samples[idx]
        };

        for (d, s) in dist2.iter_mut().zip(samples.iter()) {
            let nd = squared_distance(s, &chosen);
            if nd < *d {
                *d = nd;
            }
        }
        centroids.push(chosen);
    }

    centroids
}

/// One full k-means attempt: seed, iterate to convergence, score
///
/// The assignment step is a parallel pure map; centroid sums and the inertia
/// run sequentially in pixel order so the result does not depend on thread
/// scheduling.
fn lloyd(samples: &[[f32; 3]], k: usize, rng: &mut StdRng) -> (Vec<[f32; 3]>, Vec<u32>, f32) {
    let mut centroids = kmeans_pp_init(samples, k, rng);
    let mut labels: Vec<u32> = vec![0; samples.len()];
    let mut counts = vec![0usize; k];

    for _ in 0..KMEANS_MAX_ITERS {
        samples
            .par_iter()
            .map(|s| nearest(s, &centroids))
            .collect_into_vec(&mut labels);

        let mut sums = vec![[0.0f64; 3]; k];
        counts.fill(0);
        for (s, &label) in samples.iter().zip(labels.iter()) {
            let sum = &mut sums[label as usize];
            sum[0] += s[0] as f64;
            sum[1] += s[1] as f64;
            sum[2] += s[2] as f64;
            counts[label as usize] += 1;
        }

        let mut shift = 0.0f32;
        for i in 0..k {
            if counts[i] == 0 {
                // Degenerate cluster: keep the seed color rather than fail
                continue;
            }
            let inv = 1.0 / counts[i] as f64;
            let new = [
                (sums[i][0] * inv) as f32,
                (sums[i][1] * inv) as f32,
                (sums[i][2] * inv) as f32,
            ];
            shift += squared_distance(&new, &centroids[i]);
            centroids[i] = new;
        }

        if shift <= KMEANS_TOL {
            break;
        }
    }

    for (i, &count) in counts.iter().enumerate() {
        if count == 0 {
            warn!("k-means cluster {i} is empty after convergence, keeping its seed color");
        }
    }

    samples
        .par_iter()
        .map(|s| nearest(s, &centroids))
        .collect_into_vec(&mut labels);

    let mut inertia = 0.0f64;
    for (s, &label) in samples.iter().zip(labels.iter()) {
        inertia += squared_distance(s, &centroids[label as usize]) as f64;
    }

    (centroids, labels, inertia as f32)
}
