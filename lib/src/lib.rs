//! Toon Renderer - CPU-based cartoon stylizer for video frames
//!
//! This library implements a deterministic per-frame cartoon transform:
//! edge-preserving smoothing, seeded k-means color quantization, line-art
//! extraction and a glow compositing pass. Frames are independent, so whole
//! batches can be stylized in parallel with `stylize_frames`.
//!
//! # Example
//! ```no_run
//! use toon_rendr::{StyleConfig, stylize_frame};
//!
//! let input = image::open("frame.png").unwrap().to_rgb8();
//! let config = StyleConfig::default();
//! let output = stylize_frame(&input, &config).unwrap();
//! output.save("frame_toon.png").unwrap();
//! ```

pub mod composite;
pub mod config;
pub mod edges;
pub mod error;
pub mod filters;
pub mod processor;
pub mod quantize;
pub mod smooth;

// Re-export main types for convenience
pub use config::StyleConfig;
pub use error::{StyleError, StyleResult};
pub use processor::{frame_from_raw, stylize_frame, stylize_frames};
pub use quantize::Palette;
