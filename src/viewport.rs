//! Zoom/pan transform state for the viewer canvas.
//!
//! The canvas keeps the image centered; this struct tracks the uniform scale
//! and the panning offset away from that center. It is reset on every new
//! image and adjusted incrementally by zoom and drag gestures.

use crate::config;

#[derive(Debug, Clone)]
pub struct Viewport {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    content: Option<(u32, u32)>,
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            content: None,
        }
    }

    /// The uniform scale that fits `content_w x content_h` into the target
    /// box while preserving aspect ratio.
    pub fn fit_scale(content_w: u32, content_h: u32, box_w: f32, box_h: f32) -> f32 {
        if content_w == 0 || content_h == 0 {
            return 1.0;
        }
        (box_w / content_w as f32).min(box_h / content_h as f32)
    }

    /// Installs a new image: resets the transform and fits it into the box.
    pub fn set_content(&mut self, width: u32, height: u32, box_w: f32, box_h: f32) {
        self.content = Some((width, height));
        self.refit(box_w, box_h);
    }

    /// Drops the current image and resets the transform.
    pub fn clear_content(&mut self) {
        self.content = None;
        self.scale = 1.0;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    /// Re-fits the current image into a new box, re-centering it.
    pub fn refit(&mut self, box_w: f32, box_h: f32) {
        if let Some((w, h)) = self.content {
            self.scale = Self::fit_scale(w, h, box_w, box_h);
        }
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    pub fn zoom_in(&mut self) {
        self.scale *= config::ZOOM_STEP_IN;
    }

    pub fn zoom_out(&mut self) {
        self.scale *= config::ZOOM_STEP_OUT;
    }

    /// Continuous zoom from a wheel or trackpad gesture; the delta sign
    /// picks the direction.
    pub fn wheel_zoom(&mut self, delta: f32) {
        if delta > 0.0 {
            self.scale *= config::WHEEL_STEP_IN;
        } else if delta < 0.0 {
            self.scale *= config::WHEEL_STEP_OUT;
        }
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    pub fn content(&self) -> Option<(u32, u32)> {
        self.content
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_scale_picks_the_limiting_axis() {
        // Wide image limited by width.
        assert_eq!(Viewport::fit_scale(2000, 1000, 1000.0, 1000.0), 0.5);
        // Tall image limited by height.
        assert_eq!(Viewport::fit_scale(1000, 2000, 1000.0, 1000.0), 0.5);
        // Exact fit.
        assert_eq!(Viewport::fit_scale(800, 600, 800.0, 600.0), 1.0);
    }

    #[test]
    fn fit_scale_survives_zero_sized_content() {
        assert_eq!(Viewport::fit_scale(0, 0, 800.0, 600.0), 1.0);
    }

    #[test]
    fn set_content_resets_pan_and_fits() {
        let mut vp = Viewport::new();
        vp.pan(40.0, -10.0);
        vp.set_content(400, 200, 200.0, 200.0);

        assert_eq!(vp.scale(), 0.5);
        assert_eq!(vp.offset(), (0.0, 0.0));
    }

    #[test]
    fn discrete_zoom_round_trip_is_not_exact() {
        let mut vp = Viewport::new();
        vp.set_content(100, 100, 100.0, 100.0);
        vp.zoom_in();
        vp.zoom_out();

        // 1.2 * 0.8 = 0.96, deliberately not an exact inverse pair.
        assert!((vp.scale() - 0.96).abs() < 1e-6);
    }

    #[test]
    fn wheel_zoom_round_trip_is_not_exact() {
        let mut vp = Viewport::new();
        vp.set_content(100, 100, 100.0, 100.0);
        vp.wheel_zoom(120.0);
        vp.wheel_zoom(-120.0);

        // 1.05 * 0.95 = 0.9975.
        assert!((vp.scale() - 0.9975).abs() < 1e-6);
    }

    #[test]
    fn zero_wheel_delta_does_nothing() {
        let mut vp = Viewport::new();
        vp.set_content(100, 100, 100.0, 100.0);
        vp.wheel_zoom(0.0);
        assert_eq!(vp.scale(), 1.0);
    }

    #[test]
    fn pan_accumulates_until_refit() {
        let mut vp = Viewport::new();
        vp.set_content(100, 100, 100.0, 100.0);
        vp.pan(10.0, 5.0);
        vp.pan(-4.0, 1.0);
        assert_eq!(vp.offset(), (6.0, 6.0));

        vp.refit(100.0, 100.0);
        assert_eq!(vp.offset(), (0.0, 0.0));
    }

    #[test]
    fn clear_content_goes_back_to_identity() {
        let mut vp = Viewport::new();
        vp.set_content(400, 200, 200.0, 200.0);
        vp.zoom_in();
        vp.clear_content();

        assert_eq!(vp.scale(), 1.0);
        assert!(vp.content().is_none());
    }
}
