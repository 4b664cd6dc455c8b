//! Viewport camera: position, zoom, rotation.
//!
//! Zoom is stored as `z`, where `z = 200` is 100% and the content scale is
//! `200 / z` (smaller `z` = zoomed in). Pan is unconstrained here; the
//! gesture layer clamps the view window while a pan is active.

use crate::config::EditorConfig;
use crate::model::Vec3;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom value that renders content at 100%.
pub const REFERENCE_ZOOM: f64 = 200.0;

/// Snapshot of the camera, cheap to copy into gesture contexts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Point,
    pub z: f64,
    pub rotation: Vec3,
}

impl CameraState {
    pub fn scale(&self) -> f64 {
        REFERENCE_ZOOM / self.z
    }

    /// Size of the visible window in world units.
    pub fn view_size(&self, reference: Size) -> Size {
        reference / self.scale()
    }

    /// Top-left of the visible window in world units.
    pub fn view_origin(&self) -> Point {
        Point::new(-self.position.x, -self.position.y)
    }

    /// Whether the visible window is narrower than the reference canvas.
    pub fn is_zoomed_in(&self, reference: Size) -> bool {
        self.view_size(reference).width < reference.width
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point,
    z: f64,
    pub rotation: Vec3,
    min_zoom: f64,
    max_zoom: f64,
    pub wheel_sensitivity: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Camera {
    pub fn new(config: &EditorConfig) -> Self {
        let (min_zoom, max_zoom) = config.zoom_bounds();
        let wheel_sensitivity = if config.wheel_sensitivity.is_finite() {
            config.wheel_sensitivity
        } else {
            EditorConfig::default().wheel_sensitivity
        };
        Self {
            position: Point::ORIGIN,
            z: REFERENCE_ZOOM.clamp(min_zoom, max_zoom),
            rotation: Vec3::ZERO,
            min_zoom,
            max_zoom,
            wheel_sensitivity,
        }
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn zoom_bounds(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn scale(&self) -> f64 {
        REFERENCE_ZOOM / self.z
    }

    pub fn state(&self) -> CameraState {
        CameraState {
            position: self.position,
            z: self.z,
            rotation: self.rotation,
        }
    }

    // ─── Pan ─────────────────────────────────────────────────────────────

    pub fn pan(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.position += Vec2::new(dx, dy);
        }
    }

    pub fn view_origin(&self) -> Point {
        self.state().view_origin()
    }

    pub fn set_view_origin(&mut self, origin: Point) {
        if origin.is_finite() {
            self.position = Point::new(-origin.x, -origin.y);
        }
    }

    // ─── Zoom ────────────────────────────────────────────────────────────

    /// Set `z`, clamped into `[min_zoom, max_zoom]`. Returns the applied value.
    pub fn set_zoom(&mut self, z: f64) -> f64 {
        if z.is_finite() {
            self.z = z.clamp(self.min_zoom, self.max_zoom);
        }
        self.z
    }

    pub fn zoom_by(&mut self, step: f64) -> f64 {
        self.set_zoom(self.z + step)
    }

    /// Lower `z` by `step` (content grows).
    pub fn zoom_in(&mut self, step: f64) -> f64 {
        self.zoom_by(-step)
    }

    pub fn zoom_out(&mut self, step: f64) -> f64 {
        self.zoom_by(step)
    }

    /// Apply a wheel delta scaled by the configured sensitivity.
    pub fn wheel_zoom(&mut self, delta: f64) -> f64 {
        self.zoom_by(delta * self.wheel_sensitivity)
    }

    /// Zoom so the world point under `pivot` (view space) stays under it.
    pub fn zoom_about(&mut self, z: f64, pivot: Point) -> f64 {
        if !pivot.is_finite() {
            return self.set_zoom(z);
        }
        let before = self.scale();
        self.set_zoom(z);
        let after = self.scale();
        self.position += pivot.to_vec2() / after - pivot.to_vec2() / before;
        self.z
    }

    // ─── Space mapping ───────────────────────────────────────────────────

    /// World-space delta → view-space delta.
    pub fn world_to_view_delta(&self, delta: Vec2) -> Vec2 {
        delta * self.scale()
    }

    /// View-space delta → world-space delta.
    pub fn view_to_world_delta(&self, delta: Vec2) -> Vec2 {
        delta / self.scale()
    }
}
