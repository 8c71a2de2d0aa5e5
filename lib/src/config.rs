use crate::error::{StyleError, StyleResult};

/// Configuration for the cartoon stylization pipeline
///
/// One immutable bundle fixes every tunable; it is validated once before any
/// frame is processed and never changes mid-run.
#[derive(Debug, Clone)]
pub struct StyleConfig {
    /// Edge-preserving smoothing
    pub smooth_iterations: u32,   // 0-16, default 3
    pub smooth_diameter: u32,     // odd, 1-25, default 9
    pub smooth_sigma_color: f32,  // 0.0-500.0, default 75.0
    pub smooth_sigma_space: f32,  // 0.0-500.0, default 75.0

    /// Color quantization
    pub quant_colors: usize,      // 1-256, default 6

    /// Line-art extraction
    pub edge_threshold: u8,       // Laplacian cutoff, default 45
    pub edge_blur: f32,           // softening sigma, 0 disables, default 1.0
    pub stroke_weight: f32,       // dilation iterations = max(1, round), default 1.0

    /// Color grade
    pub hue_shift: f32,           // applied as hue_shift / 2 on the 180 hue wheel, default -20.0
    pub saturation_boost: f32,    // 0.0-4.0, default 1.15

    /// Glow
    pub glow_strength: f32,       // 0.0-2.0, default 0.35
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            // Edge-preserving smoothing
            smooth_iterations: 3,
            smooth_diameter: 9,
            smooth_sigma_color: 75.0,
            smooth_sigma_space: 75.0,

            // Color quantization
            quant_colors: 6,

            // Line-art extraction
            edge_threshold: 45,
            edge_blur: 1.0,
            stroke_weight: 1.0,

            // Color grade
            hue_shift: -20.0,
            saturation_boost: 1.15,

            // Glow
            glow_strength: 0.35,
        }
    }
}

impl StyleConfig {
    /// Validates the configuration parameters
    pub fn validate(&self) -> StyleResult<()> {
        if self.smooth_iterations > 16 {
            return Err(StyleError::invalid_config(format!(
                "smooth_iterations must be <= 16, got {}",
                self.smooth_iterations
            )));
        }
        if self.smooth_diameter < 1 || self.smooth_diameter > 25 {
            return Err(StyleError::invalid_config(format!(
                "smooth_diameter must be between 1 and 25, got {}",
                self.smooth_diameter
            )));
        }
        if self.smooth_diameter % 2 == 0 {
            return Err(StyleError::invalid_config(format!(
                "smooth_diameter must be odd, got {}",
                self.smooth_diameter
            )));
        }
        if !(0.0..=500.0).contains(&self.smooth_sigma_color) {
            return Err(StyleError::invalid_config(format!(
                "smooth_sigma_color must be between 0.0 and 500.0, got {}",
                self.smooth_sigma_color
            )));
        }
        if !(0.0..=500.0).contains(&self.smooth_sigma_space) {
            return Err(StyleError::invalid_config(format!(
                "smooth_sigma_space must be between 0.0 and 500.0, got {}",
                self.smooth_sigma_space
            )));
        }
        if self.quant_colors < 1 {
            return Err(StyleError::invalid_config(
                "quant_colors must be at least 1".to_string(),
            ));
        }
        if self.quant_colors > 256 {
            return Err(StyleError::invalid_config(format!(
                "quant_colors must be <= 256, got {}",
                self.quant_colors
            )));
        }
        if !(0.0..=10.0).contains(&self.edge_blur) {
            return Err(StyleError::invalid_config(format!(
                "edge_blur must be between 0.0 and 10.0, got {}",
                self.edge_blur
            )));
        }
        if !(0.0..=10.0).contains(&self.stroke_weight) {
            return Err(StyleError::invalid_config(format!(
                "stroke_weight must be between 0.0 and 10.0, got {}",
                self.stroke_weight
            )));
        }
        if !self.hue_shift.is_finite() {
            return Err(StyleError::invalid_config(format!(
                "hue_shift must be finite, got {}",
                self.hue_shift
            )));
        }
        if !(0.0..=4.0).contains(&self.saturation_boost) {
            return Err(StyleError::invalid_config(format!(
                "saturation_boost must be between 0.0 and 4.0, got {}",
                self.saturation_boost
            )));
        }
        if !(0.0..=2.0).contains(&self.glow_strength) {
            return Err(StyleError::invalid_config(format!(
                "glow_strength must be between 0.0 and 2.0, got {}",
                self.glow_strength
            )));
        }
        Ok(())
    }

    /// Dilation pass count derived from the stroke weight, never below 1
    pub fn stroke_iterations(&self) -> u32 {
        self.stroke_weight.round().max(1.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = StyleConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_palette_is_invalid() {
        let mut config = StyleConfig::default();
        config.quant_colors = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_diameter() {
        let mut config = StyleConfig::default();
        config.smooth_diameter = 0;
        assert!(config.validate().is_err());

        config.smooth_diameter = 8; // even
        assert!(config.validate().is_err());

        config.smooth_diameter = 27;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_sigma() {
        let mut config = StyleConfig::default();
        config.smooth_sigma_color = -1.0;
        assert!(config.validate().is_err());

        config = StyleConfig::default();
        config.smooth_sigma_space = 501.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_grade_and_glow() {
        let mut config = StyleConfig::default();
        config.saturation_boost = -0.1;
        assert!(config.validate().is_err());

        config = StyleConfig::default();
        config.glow_strength = 2.5;
        assert!(config.validate().is_err());

        config = StyleConfig::default();
        config.hue_shift = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stroke_iterations_floor() {
        let mut config = StyleConfig::default();
        config.stroke_weight = 0.0;
        assert_eq!(config.stroke_iterations(), 1);

        config.stroke_weight = 2.4;
        assert_eq!(config.stroke_iterations(), 2);

        config.stroke_weight = 2.5;
        assert_eq!(config.stroke_iterations(), 3);
    }
}
