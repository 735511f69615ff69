//! Per-request analysis configuration.
//!
//! One `AnalysisConfig` value is constructed per request and passed into
//! the pipeline; there is no process-wide default state. Validation runs
//! before any processing begins; a configuration error is the only fault
//! in the system that is surfaced to the caller rather than degraded
//! around.

use launch_map_elevation::ElevationConfig;
use launch_map_geometry::MorphologyParams;
use thiserror::Error;

/// Smallest supported search radius in meters.
pub const MIN_RADIUS_M: f64 = 100.0;

/// Largest supported search radius in meters.
pub const MAX_RADIUS_M: f64 = 5000.0;

/// Errors from configuration validation. Always fatal to the request.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Search radius outside the supported [100, 5000] m range.
    #[error("search radius {0} m outside supported bounds [100, 5000]")]
    RadiusOutOfBounds(f64),

    /// Erosion must be positive and dilation strictly larger than
    /// erosion.
    #[error("morphology offsets invalid: erosion {erosion} m, dilation {dilation} m")]
    InvalidOffsets { erosion: f64, dilation: f64 },

    /// Area filter bounds must be positive and ordered.
    #[error("area bounds invalid for {family} candidates: [{min} m2, {max} m2]")]
    InvalidAreaBounds {
        family: &'static str,
        min: f64,
        max: f64,
    },

    /// Zone thresholds must be positive and ordered.
    #[error("security zone thresholds invalid: near {near} m, monitored {monitored} m")]
    InvalidZoneThresholds { near: f64, monitored: f64 },

    /// Drone speed must be positive.
    #[error("drone speed must be positive, got {0} m/s")]
    InvalidDroneSpeed(f64),

    /// Elevation batching parameters out of range.
    #[error("elevation batching invalid: batch size {batch_size}, attempts {attempts}")]
    InvalidElevationBatching { batch_size: usize, attempts: u32 },

    /// Factor weights out of range.
    #[error("factor weights invalid: {reason}")]
    InvalidWeights { reason: String },
}

/// The seven AHP factor weights.
///
/// The documented defaults reproduce the published model digit-for-digit.
/// Their nominal sum is 1.0749; the ×20 ordinal rescale plus the
/// 100-point clamp absorbs the excess, so validation bounds the sum
/// rather than pinning it to exactly 1.0.
#[derive(Debug, Clone, Copy)]
pub struct FactorWeights {
    pub dist_to_target: f64,
    pub building_structure: f64,
    pub road_class: f64,
    pub elevation_profile: f64,
    pub land_cover: f64,
    pub visual_exposure: f64,
    pub terrain: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            dist_to_target: 0.3629,
            building_structure: 0.2924,
            road_class: 0.1368,
            elevation_profile: 0.1057,
            land_cover: 0.1057,
            visual_exposure: 0.0460,
            terrain: 0.0254,
        }
    }
}

impl FactorWeights {
    /// Sum of all seven weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.dist_to_target
            + self.building_structure
            + self.road_class
            + self.elevation_profile
            + self.land_cover
            + self.visual_exposure
            + self.terrain
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let all = [
            self.dist_to_target,
            self.building_structure,
            self.road_class,
            self.elevation_profile,
            self.land_cover,
            self.visual_exposure,
            self.terrain,
        ];
        if all.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(ConfigError::InvalidWeights {
                reason: "every weight must be a positive finite number".to_string(),
            });
        }
        let sum = self.sum();
        if !(0.95..=1.10).contains(&sum) {
            return Err(ConfigError::InvalidWeights {
                reason: format!("weight sum {sum} outside tolerated range [0.95, 1.10]"),
            });
        }
        Ok(())
    }
}

/// Admissible area range for a candidate family, in square meters.
#[derive(Debug, Clone, Copy)]
pub struct AreaBounds {
    pub min_m2: f64,
    pub max_m2: f64,
}

impl AreaBounds {
    /// Returns `true` if `area` lies within the bounds (inclusive).
    #[must_use]
    pub fn contains(&self, area_m2: f64) -> bool {
        (self.min_m2..=self.max_m2).contains(&area_m2)
    }
}

/// Security-proximity zone thresholds. Statistics only.
#[derive(Debug, Clone, Copy)]
pub struct SecurityZones {
    /// "Near security" threshold in meters.
    pub near_m: f64,
    /// "Monitored" threshold in meters.
    pub monitored_m: f64,
}

impl Default for SecurityZones {
    fn default() -> Self {
        Self {
            near_m: 150.0,
            monitored_m: 300.0,
        }
    }
}

/// Full configuration for one analysis request.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Search radius the layers were retrieved with, in meters.
    pub search_radius_m: f64,
    /// Erosion/dilation offsets for corridor extraction.
    pub morphology: MorphologyParams,
    /// Corridor candidate area filter.
    pub corridor_area: AreaBounds,
    /// Rooftop candidate area filter.
    pub rooftop_area: AreaBounds,
    /// Security zone thresholds.
    pub security_zones: SecurityZones,
    /// Drone speed used for flight-time estimates, in m/s.
    pub drone_speed_mps: f64,
    /// AHP factor weights.
    pub weights: FactorWeights,
    /// Elevation client configuration.
    pub elevation: ElevationConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            search_radius_m: 1000.0,
            morphology: MorphologyParams::default(),
            corridor_area: AreaBounds {
                min_m2: 25.0,
                max_m2: 2000.0,
            },
            rooftop_area: AreaBounds {
                min_m2: 50.0,
                max_m2: 5000.0,
            },
            security_zones: SecurityZones::default(),
            drone_speed_mps: 15.0,
            weights: FactorWeights::default(),
            elevation: ElevationConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Validates the configuration before any processing begins.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first out-of-bounds value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_RADIUS_M..=MAX_RADIUS_M).contains(&self.search_radius_m) {
            return Err(ConfigError::RadiusOutOfBounds(self.search_radius_m));
        }
        if self.morphology.erosion_m <= 0.0
            || self.morphology.dilation_m <= self.morphology.erosion_m
            || self.morphology.sliver_tolerance_m < 0.0
        {
            return Err(ConfigError::InvalidOffsets {
                erosion: self.morphology.erosion_m,
                dilation: self.morphology.dilation_m,
            });
        }
        for (family, bounds) in [("corridor", self.corridor_area), ("rooftop", self.rooftop_area)] {
            if bounds.min_m2 <= 0.0 || bounds.max_m2 <= bounds.min_m2 {
                return Err(ConfigError::InvalidAreaBounds {
                    family,
                    min: bounds.min_m2,
                    max: bounds.max_m2,
                });
            }
        }
        if self.security_zones.near_m <= 0.0
            || self.security_zones.monitored_m <= self.security_zones.near_m
        {
            return Err(ConfigError::InvalidZoneThresholds {
                near: self.security_zones.near_m,
                monitored: self.security_zones.monitored_m,
            });
        }
        if self.drone_speed_mps <= 0.0 {
            return Err(ConfigError::InvalidDroneSpeed(self.drone_speed_mps));
        }
        if self.elevation.batch_size == 0 || self.elevation.max_attempts == 0 {
            return Err(ConfigError::InvalidElevationBatching {
                batch_size: self.elevation.batch_size,
                attempts: self.elevation.max_attempts,
            });
        }
        self.weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        AnalysisConfig::default().validate().unwrap();
    }

    #[test]
    fn default_weights_are_positive_and_within_tolerance() {
        let weights = FactorWeights::default();
        assert!(weights.dist_to_target > 0.0);
        let sum = weights.sum();
        assert!((0.95..=1.10).contains(&sum), "sum {sum}");
        // Documented set sums to 1.0749; the score clamp absorbs the
        // excess over 1.0.
        assert!((sum - 1.0749).abs() < 1e-9);
    }

    #[test]
    fn radius_bounds_are_fatal() {
        let mut config = AnalysisConfig::default();
        config.search_radius_m = 50.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RadiusOutOfBounds(_))
        ));
        config.search_radius_m = 6000.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn dilation_must_exceed_erosion() {
        let mut config = AnalysisConfig::default();
        config.morphology.dilation_m = config.morphology.erosion_m;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOffsets { .. })
        ));
    }

    #[test]
    fn zero_weight_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.weights.terrain = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn inverted_area_bounds_are_rejected() {
        let mut config = AnalysisConfig::default();
        config.corridor_area = AreaBounds {
            min_m2: 2000.0,
            max_m2: 25.0,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAreaBounds { .. })
        ));
    }
}
