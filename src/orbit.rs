//! Orbit camera controls: drag to rotate around the target, wheel to dolly.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3};

use crate::frame::Viewport;

const POLAR_EPS: f32 = 1e-6;
const DELTA_EPS: f32 = 1e-6;

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    /// Distance multiplier applied per wheel step towards the target.
    pub zoom_step: f32,
    /// Fraction of the pending rotation applied per update, `None` applies it at once.
    pub damping: Option<f32>,

    azimuth_delta: f32,
    polar_delta: f32,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_step: 0.95,
            damping: Some(0.05),
            azimuth_delta: 0.0,
            polar_delta: 0.0,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn new(rotate_speed: f32, damping: Option<f32>) -> Self {
        Self {
            rotate_speed,
            damping,
            ..Self::default()
        }
    }

    /// A drag of `height` pixels turns the camera a full circle.
    pub fn rotate_by_pixels(&mut self, dx: f64, dy: f64, height: u32) {
        if height == 0 {
            return;
        }
        let angle = 2.0 * PI * self.rotate_speed / height as f32;
        self.azimuth_delta -= dx as f32 * angle;
        self.polar_delta -= dy as f32 * angle;
    }

    /// Positive `delta_y` moves towards the target.
    pub fn dolly(&mut self, delta_y: f64) {
        if delta_y > 0.0 {
            self.scale *= self.zoom_step;
        } else if delta_y < 0.0 {
            self.scale /= self.zoom_step;
        }
    }

    #[inline]
    fn is_idle(&self) -> bool {
        self.azimuth_delta == 0.0 && self.polar_delta == 0.0 && self.scale == 1.0
    }

    /// Applies pending input to `viewport`. Returns whether the camera moved.
    pub fn update(&mut self, viewport: &mut Viewport) -> bool {
        if self.is_idle() {
            return false;
        }

        let offset = viewport.position - viewport.target;
        let radius = offset.magnitude();
        if radius <= f32::EPSILON {
            self.stop();
            return false;
        }

        let (d_azimuth, d_polar) = match self.damping {
            Some(factor) => (self.azimuth_delta * factor, self.polar_delta * factor),
            None => (self.azimuth_delta, self.polar_delta),
        };

        let theta = offset.x.atan2(offset.z) + d_azimuth;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() + d_polar)
            .clamp(POLAR_EPS, PI - POLAR_EPS);
        let radius = radius * self.scale;

        let offset = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let previous = viewport.position;
        viewport.position = viewport.target + offset;

        match self.damping {
            Some(factor) => {
                self.azimuth_delta *= 1.0 - factor;
                self.polar_delta *= 1.0 - factor;
                if self.azimuth_delta.abs() < DELTA_EPS {
                    self.azimuth_delta = 0.0;
                }
                if self.polar_delta.abs() < DELTA_EPS {
                    self.polar_delta = 0.0;
                }
            }
            None => {
                self.azimuth_delta = 0.0;
                self.polar_delta = 0.0;
            }
        }
        self.scale = 1.0;

        (viewport.position - previous).magnitude2() > f32::EPSILON
    }

    /// Drops any pending motion.
    pub fn stop(&mut self) {
        self.azimuth_delta = 0.0;
        self.polar_delta = 0.0;
        self.scale = 1.0;
    }
}
