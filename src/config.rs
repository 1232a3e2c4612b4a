/// Geometry, camera and output-grid configuration for the renderer.
///
/// Contract (checked once by `validate()`, never per frame):
/// `0 < r1 < r2` and `k2 > r1 + r2`, so every sampled point ends up with a
/// strictly positive camera-space z.
#[derive(Clone)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Tube (minor) radius of the torus.
    pub r1: f32,
    /// Distance from the torus center to the tube center (major radius).
    pub r2: f32,
    /// Eye-to-donut-center distance along the view axis.
    pub k2: f32,
    /// Projection scale. `None` derives the reference value from the width
    /// so the donut fills most of the grid.
    pub k1: Option<f32>,
    /// Step of the cross-section sweep, radians.
    pub theta_spacing: f32,
    /// Step of the revolution sweep, radians. Denser than theta because
    /// projected arc length per step is larger near the screen center.
    pub phi_spacing: f32,
    /// Vertical projection factor. 1.0 for square cells; the terminal
    /// driver passes 0.5 since character cells are roughly twice as tall
    /// as they are wide.
    pub y_scale: f32,
    /// Shading glyphs ordered dimmest to brightest.
    pub palette: Vec<char>,
}

/// Reference palette from dark to bright.
pub const DEFAULT_PALETTE: &str = ".:-=+£#%@";

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            r1: 1.0,
            r2: 2.0,
            k2: 5.0,
            k1: None,
            theta_spacing: 0.02,
            phi_spacing: 0.01,
            y_scale: 1.0,
            palette: DEFAULT_PALETTE.chars().collect(),
        }
    }
}

impl RenderConfig {
    /// Effective projection scale: the explicit override, or
    /// `width * k2 * 3 / (8 * (r1 + r2))`.
    pub fn k1(&self) -> f32 {
        self.k1
            .unwrap_or(self.width as f32 * self.k2 * 3.0 / (8.0 * (self.r1 + self.r2)))
    }

    /// Check the constructor-time contract. The renderer assumes a valid
    /// config and performs no per-sample guards.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("screen size must be nonzero".into());
        }
        if !(self.r1 > 0.0 && self.r2 > self.r1) {
            return Err(format!(
                "torus radii must satisfy 0 < r1 < r2 (got r1={}, r2={})",
                self.r1, self.r2
            ));
        }
        if self.k2 <= self.r1 + self.r2 {
            return Err(format!(
                "camera distance k2={} must exceed r1+r2={}",
                self.k2,
                self.r1 + self.r2
            ));
        }
        if !(self.theta_spacing > 0.0 && self.phi_spacing > 0.0) {
            return Err("theta/phi spacing must be positive".into());
        }
        if self.palette.is_empty() {
            return Err("palette must contain at least one glyph".into());
        }
        Ok(())
    }
}

/// Driver-side animation parameters. The renderer never sees these; it is a
/// pure function of the two angles the driver accumulates.
#[derive(Clone, Copy)]
pub struct AnimConfig {
    /// Seconds per frame.
    pub time_step: f32,
    /// Per-frame increment of the rotation about the x axis.
    pub rate_a: f32,
    /// Per-frame increment of the rotation about the z axis.
    pub rate_b: f32,
    pub start_a: f32,
    pub start_b: f32,
}

impl Default for AnimConfig {
    fn default() -> Self {
        Self {
            time_step: 0.03,
            rate_a: 0.01,
            rate_b: 0.003,
            start_a: std::f32::consts::FRAC_PI_2,
            start_b: 0.0,
        }
    }
}
