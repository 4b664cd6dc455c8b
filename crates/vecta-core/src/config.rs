//! Editor configuration.
//!
//! Every field has a sensible default; hosts typically deserialize a partial
//! JSON object and let the rest fall back.

use crate::error::SceneError;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Configuration shared by the camera, gesture controller, store, and
/// renderer contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Logical width of the view-space canvas. Default: **1024**.
    pub reference_width: f64,

    /// Logical height of the view-space canvas. Default: **768**.
    pub reference_height: f64,

    /// Lowest camera `z` (most zoomed in). Default: **10**.
    pub min_zoom: f64,

    /// Highest camera `z` (most zoomed out). Default: **1000**.
    pub max_zoom: f64,

    /// Multiplier applied to wheel deltas before zooming. Default: **0.2**.
    pub wheel_sensitivity: f64,

    /// Pointer-space distance (px) a two-finger gesture must travel before
    /// it commits to zoom or pan. Default: **10**.
    pub gesture_threshold: f64,

    /// Quiet period before a scheduled save is written. Default: **1000 ms**.
    pub save_debounce_ms: u64,

    /// Handle radius in screen pixels, independent of content zoom. Default: **6**.
    pub handle_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            reference_width: 1024.0,
            reference_height: 768.0,
            min_zoom: 10.0,
            max_zoom: 1000.0,
            wheel_sensitivity: 0.2,
            gesture_threshold: 10.0,
            save_debounce_ms: 1000,
            handle_size: 6.0,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON configuration.
    ///
    /// # Errors
    /// Returns `SceneError::Json` if the input is not a valid config object,
    /// and `SceneError::InvalidConfig` if a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every numeric field against its allowed range.
    ///
    /// # Errors
    /// Names the first offending field.
    pub fn validate(&self) -> Result<(), SceneError> {
        let invalid = |msg: String| Err(SceneError::InvalidConfig(msg));
        if !valid_reference(self.reference_width, self.reference_height) {
            return invalid(format!(
                "reference size must be finite and positive, got {}×{}",
                self.reference_width, self.reference_height
            ));
        }
        if !valid_zoom(self.min_zoom, self.max_zoom) {
            return invalid(format!(
                "zoom bounds must satisfy 0 < minZoom <= maxZoom, got {}..{}",
                self.min_zoom, self.max_zoom
            ));
        }
        if !(self.gesture_threshold.is_finite() && self.gesture_threshold >= 0.0) {
            let threshold = self.gesture_threshold;
            return invalid(format!("gestureThreshold must be >= 0, got {threshold}"));
        }
        if !(self.handle_size.is_finite() && self.handle_size >= 0.0) {
            return invalid(format!("handleSize must be >= 0, got {}", self.handle_size));
        }
        if !self.wheel_sensitivity.is_finite() {
            let sensitivity = self.wheel_sensitivity;
            return invalid(format!("wheelSensitivity must be finite, got {sensitivity}"));
        }
        Ok(())
    }

    /// Reference canvas size. Falls back to the default when the configured
    /// size is not finite and positive.
    pub fn reference_size(&self) -> Size {
        if valid_reference(self.reference_width, self.reference_height) {
            Size::new(self.reference_width, self.reference_height)
        } else {
            log::warn!("invalid reference size, using the default");
            Self::default().reference_size()
        }
    }

    /// `(min, max)` camera `z`. Falls back to the defaults when the
    /// configured pair is out of order, non-finite, or not positive.
    pub fn zoom_bounds(&self) -> (f64, f64) {
        if valid_zoom(self.min_zoom, self.max_zoom) {
            (self.min_zoom, self.max_zoom)
        } else {
            let (min, max) = (self.min_zoom, self.max_zoom);
            log::warn!("invalid zoom bounds {min}..{max}, using the defaults");
            let defaults = Self::default();
            (defaults.min_zoom, defaults.max_zoom)
        }
    }
}

fn valid_reference(width: f64, height: f64) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

fn valid_zoom(min: f64, max: f64) -> bool {
    min.is_finite() && max.is_finite() && min > 0.0 && min <= max
}
