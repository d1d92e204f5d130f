//! Cascade configuration.

use crate::error::{Error, Result};

/// Maximum number of cascading rounds before the loop gives up on the
/// remaining unmatched rows.
pub const MAX_ROUNDS: usize = 100;

/// Unmatched sets smaller than this are clustered directly, without
/// sub-sampling.
pub const SAMPLE_FLOOR: usize = 1000;

/// Options recognized by the cascade controller.
#[derive(Debug, Clone)]
pub struct CascadeConfig {
    /// Distance cutoff, used both for the dendrogram cut and for accepting a
    /// nearest-representative match.
    pub threshold: f64,
    /// Sub-sampling stride: every `sample_rate`-th unmatched row is kept when
    /// the unmatched set is large. 100 means a 1% sample.
    pub sample_rate: usize,
    /// Persist matched clusters through the injected sink.
    pub save_file: bool,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            sample_rate: 100,
            save_file: false,
        }
    }
}

impl CascadeConfig {
    /// Set the distance threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the sub-sampling stride.
    pub fn with_sample_rate(mut self, sample_rate: usize) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Enable or disable cluster persistence.
    pub fn with_save_file(mut self, save_file: bool) -> Self {
        self.save_file = save_file;
        self
    }

    /// Validate the option values.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidParameter {
                name: "sample_rate",
                message: "must be at least 1",
            });
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(Error::InvalidParameter {
                name: "threshold",
                message: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CascadeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_rate, 100);
        assert!((config.threshold - 0.3).abs() < f64::EPSILON);
        assert!(!config.save_file);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let config = CascadeConfig::default().with_sample_rate(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = CascadeConfig::default().with_threshold(-0.1);
        assert!(config.validate().is_err());

        let config = CascadeConfig::default().with_threshold(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_threshold_allowed() {
        // A zero threshold is degenerate (nothing ever matches) but legal.
        let config = CascadeConfig::default().with_threshold(0.0);
        assert!(config.validate().is_ok());
    }
}
