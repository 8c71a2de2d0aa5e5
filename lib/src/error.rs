use image::RgbImage;

pub type StyleResult<T> = Result<T, StyleError>;

/// Errors surfaced by the stylization pipeline.
///
/// Configuration problems are fatal before any frame is processed; frame
/// problems abort that frame only. Everything else (degenerate clusters,
/// out-of-range compositing intermediates) is recovered locally and never
/// reaches this type.
#[derive(thiserror::Error, Debug)]
pub enum StyleError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid frame in {stage}: expected a non-empty 3-channel image, got {width}x{height}x{channels}")]
    InvalidFrame {
        stage: &'static str,
        width: u32,
        height: u32,
        channels: u32,
    },

    #[error("mask mismatch in {stage}: frame is {frame_width}x{frame_height}, mask is {mask_width}x{mask_height}")]
    MaskMismatch {
        stage: &'static str,
        frame_width: u32,
        frame_height: u32,
        mask_width: u32,
        mask_height: u32,
    },
}

impl StyleError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Rejects zero-area frames, naming the stage that received them.
///
/// The channel count is fixed at 3 by the buffer type, so only the spatial
/// dimensions can be malformed here; raw buffers with a wrong channel count
/// are caught earlier by `processor::frame_from_raw`.
pub(crate) fn ensure_frame(img: &RgbImage, stage: &'static str) -> StyleResult<()> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(StyleError::InvalidFrame {
            stage,
            width,
            height,
            channels: 3,
        });
    }
    Ok(())
}
