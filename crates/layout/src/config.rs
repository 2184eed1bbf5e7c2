use crate::LayoutError;
use crate::block::Severity;
use pagefit_traits::SizeStrategy;
use serde::{Deserialize, Serialize};

/// Hard cap on analysis passes. A block processed in one pass is never
/// revisited, so the loop always terminates.
pub const MAX_PASSES: u8 = 2;

/// Tunable heuristics of the fitting engine.
///
/// The defaults are empirically tuned values. Every field can be overridden
/// from configuration; [`FitPolicy::validate`] rejects values the engine
/// cannot work with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FitPolicy {
    /// Overflow ratio above which an overflow counts as severe.
    ///
    /// Defaults to `1.3`.
    pub severe_ratio: f32,
    /// Smallest scale applied to a moderately overflowing figure.
    ///
    /// Defaults to `0.15`.
    pub moderate_floor: f32,
    /// Smallest scale applied to a severely overflowing figure.
    ///
    /// Defaults to `0.10`.
    pub severe_floor: f32,
    /// Fraction of the available height a scaled moderate block (heading plus
    /// figure) may occupy before a page break is forced.
    ///
    /// Defaults to `0.75`.
    pub moderate_break_threshold: f32,
    /// Same as `moderate_break_threshold`, for severe blocks.
    ///
    /// Defaults to `0.65`.
    pub severe_break_threshold: f32,
    /// Exponent of the extra shrink applied to severe overflow:
    /// `raw * (severe_ratio / ratio) ^ severe_damping`. Zero disables it.
    ///
    /// Defaults to `2.0`.
    pub severe_damping: f32,
    /// Fixed height (px) reserved for measurement and rendering imprecision.
    ///
    /// Defaults to `5.0`.
    pub safety_buffer: f32,
    /// How many siblings after a heading are searched for a graphic.
    ///
    /// Defaults to `5`.
    pub scan_window: usize,
    /// Deepest heading level that opens a block.
    ///
    /// Defaults to `3`.
    pub max_heading_level: u8,
    /// Added to the container's bottom margin after scaling (px).
    ///
    /// Defaults to `24.0`.
    pub trailing_margin: f32,
    pub strategy: SizeStrategy,
}

impl Default for FitPolicy {
    fn default() -> Self {
        Self {
            severe_ratio: 1.3,
            moderate_floor: 0.15,
            severe_floor: 0.10,
            moderate_break_threshold: 0.75,
            severe_break_threshold: 0.65,
            severe_damping: 2.0,
            safety_buffer: 5.0,
            scan_window: 5,
            max_heading_level: 3,
            trailing_margin: 24.0,
            strategy: SizeStrategy::ExplicitSize,
        }
    }
}

fn check_fraction(name: &str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidPolicy(format!(
            "{} must be in (0, 1], got {}",
            name, value
        )))
    }
}

fn check_non_negative(name: &str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidPolicy(format!(
            "{} must be a finite, non-negative number, got {}",
            name, value
        )))
    }
}

impl FitPolicy {
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_fraction("moderateFloor", self.moderate_floor)?;
        check_fraction("severeFloor", self.severe_floor)?;
        check_fraction("moderateBreakThreshold", self.moderate_break_threshold)?;
        check_fraction("severeBreakThreshold", self.severe_break_threshold)?;
        check_non_negative("severeDamping", self.severe_damping)?;
        check_non_negative("safetyBuffer", self.safety_buffer)?;
        check_non_negative("trailingMargin", self.trailing_margin)?;
        if !self.severe_ratio.is_finite() || self.severe_ratio < 1.0 {
            return Err(LayoutError::InvalidPolicy(format!(
                "severeRatio must be at least 1.0, got {}",
                self.severe_ratio
            )));
        }
        if self.scan_window == 0 {
            return Err(LayoutError::InvalidPolicy(
                "scanWindow must be at least 1".to_string(),
            ));
        }
        if !(1..=6).contains(&self.max_heading_level) {
            return Err(LayoutError::InvalidPolicy(format!(
                "maxHeadingLevel must be between 1 and 6, got {}",
                self.max_heading_level
            )));
        }
        Ok(())
    }

    pub fn classify(&self, ratio: f32) -> Severity {
        if ratio <= 1.0 {
            Severity::None
        } else if ratio <= self.severe_ratio {
            Severity::Moderate
        } else {
            Severity::Severe
        }
    }

    pub fn floor_for(&self, severity: Severity) -> f32 {
        match severity {
            Severity::None => 1.0,
            Severity::Moderate => self.moderate_floor,
            Severity::Severe => self.severe_floor,
        }
    }

    pub fn break_threshold_for(&self, severity: Severity) -> f32 {
        match severity {
            Severity::None => 1.0,
            Severity::Moderate => self.moderate_break_threshold,
            Severity::Severe => self.severe_break_threshold,
        }
    }

    /// The lowest floor any block can be clamped to.
    pub fn min_floor(&self) -> f32 {
        self.moderate_floor.min(self.severe_floor)
    }
}
