//! Coordinate spaces.
//!
//! - **Pointer space**: raw device coordinates on the host surface.
//! - **View space**: the fixed reference canvas (`reference` size), drawn
//!   into the container with "meet" fitting, so it may be letterboxed or
//!   pillarboxed.
//! - **World space**: node-local coordinates before the camera applies.
//!
//! Pointer→view uses one uniform factor so aspect ratio is preserved, and is
//! measured against the fitted content rect, not the whole container.

use kurbo::{Point, Rect, Size, Vec2};

/// The host surface and the reference canvas shown inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// View-space canvas size.
    pub reference: Size,
    /// On-screen rect the reference canvas is fitted into, in pointer space.
    /// Either the whole host surface or the content rect a renderer reports.
    pub container: Rect,
}

impl Viewport {
    pub fn new(reference: Size, container: Rect) -> Self {
        Self {
            reference,
            container,
        }
    }

    /// Container sized exactly like the reference canvas at the origin.
    pub fn unscaled(reference: Size) -> Self {
        Self::new(reference, reference.to_rect())
    }

    /// Screen pixels per view unit.
    pub fn fit_scale(&self) -> f64 {
        let sx = self.container.width() / self.reference.width;
        let sy = self.container.height() / self.reference.height;
        let scale = sx.min(sy);
        if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        }
    }

    /// The on-screen rect the reference canvas actually occupies, centred
    /// inside the container.
    pub fn content_rect(&self) -> Rect {
        let size = self.reference * self.fit_scale();
        let origin = self.container.center() - size.to_vec2() / 2.0;
        Rect::from_origin_size(origin, size)
    }

    pub fn pointer_to_view(&self, pointer: Point) -> Point {
        let content = self.content_rect();
        ((pointer - content.origin()) / self.fit_scale()).to_point()
    }

    pub fn view_to_pointer(&self, view: Point) -> Point {
        self.content_rect().origin() + view.to_vec2() * self.fit_scale()
    }

    pub fn pointer_delta_to_view(&self, delta: Vec2) -> Vec2 {
        delta / self.fit_scale()
    }

    /// Reference width ÷ on-screen content width.
    ///
    /// Multiplying a screen-pixel size by this yields view units, which keeps
    /// handles a constant on-screen size. Unrelated to the camera scale.
    pub fn handle_zoom_scale(&self) -> f64 {
        self.reference.width / self.content_rect().width()
    }
}
