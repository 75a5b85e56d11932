use cgmath::{Deg, Point3, Vector3};

use crate::fallback::FallbackStyle;
use crate::frame::{Framing, Viewport};
use crate::orbit::OrbitControls;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Light shines from this position towards the origin.
    pub position: Vector3<f32>,
    pub intensity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub fov: Deg<f32>,
    pub near: f32,
    pub far: f32,
    pub initial_position: Point3<f32>,
    pub background: u32,

    pub framing: Framing,

    pub ambient_intensity: f32,
    pub key_light: DirectionalLight,
    pub fill_light: DirectionalLight,

    pub rotate_speed: f32,
    pub damping: Option<f32>,

    pub conversion_delay_ms: u32,
    pub placeholder_size: f64,
    pub placeholder_color: u32,

    pub fallback_style: FallbackStyle,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov: Deg(75.0),
            near: 0.1,
            far: 2000.0,
            initial_position: Point3::new(10.0, 10.0, 10.0),
            background: 0x282c34,

            framing: Framing::default(),

            ambient_intensity: 0.7,
            key_light: DirectionalLight {
                position: Vector3::new(5.0, 10.0, 7.5),
                intensity: 0.6,
            },
            fill_light: DirectionalLight {
                position: Vector3::new(-5.0, -10.0, -7.5),
                intensity: 0.3,
            },

            rotate_speed: 1.0,
            damping: Some(0.05),

            conversion_delay_ms: 1500,
            placeholder_size: 5.0,
            placeholder_color: 0x00ff00,

            fallback_style: FallbackStyle::Text,
        }
    }
}

impl ViewerConfig {
    /// Applies overrides read from the page's query string.
    pub fn with_query(mut self, query: &str) -> Self {
        if let Some(style) = FallbackStyle::from_query(query) {
            self.fallback_style = style;
        }
        self
    }

    /// Camera before anything is loaded, looking at the origin.
    pub fn initial_viewport(&self) -> Viewport {
        Viewport {
            fov: self.fov.into(),
            position: self.initial_position,
            target: Point3::new(0.0, 0.0, 0.0),
            far: self.far,
        }
    }

    pub fn orbit_controls(&self) -> OrbitControls {
        OrbitControls::new(self.rotate_speed, self.damping)
    }
}

/// `0xRRGGBB` to `[r, g, b]` in `0.0..=1.0`.
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
