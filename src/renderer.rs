//! Software rasterizer for the rotating torus.
//!
//! One tight pipeline per frame: sample the torus surface over (theta, phi),
//! rotate the solid about the x axis by `a` and the z axis by `b`, project
//! with perspective onto the character grid, z-buffer with inverse depth,
//! and quantize luminance into the shading palette.
//!
//! See https://www.a1k0n.net/2011/07/20/donut-math.html for the derivation
//! of the expanded rotation products.

use crate::config::RenderConfig;
use std::f32::consts::{FRAC_1_SQRT_2, TAU};

/// Renders frames of the spinning donut into a pair of reusable buffers.
///
/// `render_frame` is a pure function of the two rotation angles apart from
/// the scratch buffers it owns, which it fully resets on entry. One instance
/// per caller; the buffers must not be shared across concurrent renders.
pub struct FrameRenderer {
    width: usize,
    height: usize,
    r1: f32,
    r2: f32,
    k2: f32,
    k1: f32,
    y_scale: f32,
    palette: Vec<char>,
    // (cos, sin) lookup tables for the two sweeps, fixed for the lifetime
    // of the renderer.
    theta_trig: Vec<(f32, f32)>,
    phi_trig: Vec<(f32, f32)>,
    // Row-major scratch buffers, width * height each.
    chars: Vec<char>,
    z_inv: Vec<f32>,
    lum: Vec<f32>,
}

/// (cos, sin) at every multiple of `step` below 2π.
fn trig_table(step: f32) -> Vec<(f32, f32)> {
    let mut table = Vec::with_capacity((TAU / step) as usize + 1);
    let mut angle: f32 = 0.0;
    while angle < TAU {
        table.push((angle.cos(), angle.sin()));
        angle += step;
    }
    table
}

impl FrameRenderer {
    pub fn new(cfg: &RenderConfig) -> Self {
        let cells = cfg.width * cfg.height;
        Self {
            width: cfg.width,
            height: cfg.height,
            r1: cfg.r1,
            r2: cfg.r2,
            k2: cfg.k2,
            k1: cfg.k1(),
            y_scale: cfg.y_scale,
            palette: cfg.palette.clone(),
            theta_trig: trig_table(cfg.theta_spacing),
            phi_trig: trig_table(cfg.phi_spacing),
            chars: vec![' '; cells],
            z_inv: vec![0.0; cells],
            lum: vec![0.0; cells],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Render the torus rotated by `a` about the x axis and `b` about the
    /// z axis. Any real angles are valid; the trig is periodic.
    pub fn render_frame(&mut self, a: f32, b: f32) {
        self.chars.fill(' ');
        self.z_inv.fill(0.0);
        self.lum.fill(0.0);

        let (cos_a, sin_a) = (a.cos(), a.sin());
        let (cos_b, sin_b) = (b.cos(), b.sin());
        let cos_a_sin_b = cos_a * sin_b;
        let cos_a_cos_b = cos_a * cos_b;
        let sin_a_sin_b = sin_a * sin_b;
        let sin_a_cos_b = sin_a * cos_b;

        let half_w = 0.5 * self.width as f32;
        let half_h = 0.5 * self.height as f32;
        let k1 = self.k1;

        for ti in 0..self.theta_trig.len() {
            let (cos_theta, sin_theta) = self.theta_trig[ti];
            // Cross-section circle before revolving about the central axis.
            let circle_x = self.r2 + self.r1 * cos_theta;
            let circle_y = self.r1 * sin_theta;

            for pi in 0..self.phi_trig.len() {
                let (cos_phi, sin_phi) = self.phi_trig[pi];

                // Revolve by phi, rotate by a then b, push out to the camera
                // distance. Expanded products of the three rotations; the
                // sign conventions here are load-bearing and verified against
                // the reference frame in the tests.
                let x = circle_x * (cos_b * cos_phi + sin_a_sin_b * sin_phi)
                    - circle_y * cos_a_sin_b;
                let y = circle_x * (sin_b * cos_phi - sin_a_cos_b * sin_phi)
                    + circle_y * cos_a_cos_b;
                let z = self.k2 + cos_a * circle_x * sin_phi + circle_y * sin_a;
                let z_inv = 1.0 / z;

                // Truncation toward zero, not rounding: it decides which cell
                // boundary samples land in and must match the reference.
                let xp = (half_w + k1 * z_inv * x) as i32;
                let yp = (half_h - k1 * z_inv * y * self.y_scale) as i32;

                // Same two rotations applied to the surface normal (no phi
                // translation, normals are directions), dotted with the light
                // direction (0, 1, -1) / sqrt(2).
                let lum = FRAC_1_SQRT_2
                    * (cos_phi * cos_theta * sin_b - cos_a * cos_theta * sin_phi
                        - sin_a * sin_theta
                        + cos_b * (cos_a * sin_theta - cos_theta * sin_a * sin_phi));

                self.plot(xp, yp, z_inv, lum);
            }
        }
    }

    /// Try to place one sample. Rejects out-of-grid coordinates, back-facing
    /// samples (negative luminance) and samples at or behind whatever the
    /// cell already holds. Returns whether the cell was written.
    fn plot(&mut self, xp: i32, yp: i32, z_inv: f32, lum: f32) -> bool {
        if xp < 0 || xp >= self.width as i32 || yp < 0 || yp >= self.height as i32 {
            return false;
        }
        if lum < 0.0 {
            return false;
        }
        let idx = yp as usize * self.width + xp as usize;
        if z_inv <= self.z_inv[idx] {
            return false;
        }
        self.z_inv[idx] = z_inv;
        self.lum[idx] = lum;
        self.chars[idx] = self.shade(lum);
        true
    }

    /// Quantize a luminance in [0, 1] into a palette glyph. Truncating
    /// index; clamped so exactly 1.0 still maps to the brightest glyph.
    fn shade(&self, lum: f32) -> char {
        let idx = (lum * self.palette.len() as f32) as usize;
        self.palette[idx.min(self.palette.len() - 1)]
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.chars[y * self.width + x]
    }

    /// Luminance stored at a cell, 0.0 where nothing was drawn. The driver
    /// uses this to pick colors without re-deriving shading.
    pub fn lum_at(&self, x: usize, y: usize) -> f32 {
        self.lum[y * self.width + x]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.chars.chunks(self.width)
    }

    /// Serialize the frame row-major as newline-terminated text.
    pub fn frame_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.rows() {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn renderer() -> FrameRenderer {
        FrameRenderer::new(&RenderConfig::default())
    }

    #[test]
    fn frame_is_exactly_grid_sized_palette_glyphs() {
        let mut r = renderer();
        r.render_frame(1.0, 0.5);
        let text = r.frame_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), r.height());
        let palette: Vec<char> = RenderConfig::default().palette;
        for line in lines {
            assert_eq!(line.chars().count(), r.width());
            for ch in line.chars() {
                assert!(ch == ' ' || palette.contains(&ch), "stray glyph {:?}", ch);
            }
        }
    }

    #[test]
    fn identical_angles_render_identical_frames() {
        let mut r1 = renderer();
        let mut r2 = renderer();
        r1.render_frame(2.7, -4.1);
        r2.render_frame(2.7, -4.1);
        assert_eq!(r1.frame_text(), r2.frame_text());
    }

    #[test]
    fn buffers_fully_reset_between_frames() {
        let mut reused = renderer();
        reused.render_frame(0.3, 0.8);
        reused.render_frame(FRAC_PI_2, 0.0);

        let mut fresh = renderer();
        fresh.render_frame(FRAC_PI_2, 0.0);
        assert_eq!(reused.frame_text(), fresh.frame_text());
    }

    #[test]
    fn nearer_sample_wins_regardless_of_order() {
        let palette: Vec<char> = RenderConfig::default().palette;

        // Far then near: near overwrites.
        let mut r = renderer();
        assert!(r.plot(10, 10, 0.2, 0.1));
        assert!(r.plot(10, 10, 0.3, 0.9));
        assert_eq!(r.char_at(10, 10), palette[(0.9 * palette.len() as f32) as usize]);

        // Near then far: far is rejected.
        let mut r = renderer();
        assert!(r.plot(10, 10, 0.3, 0.9));
        assert!(!r.plot(10, 10, 0.2, 0.1));
        assert_eq!(r.char_at(10, 10), palette[(0.9 * palette.len() as f32) as usize]);
    }

    #[test]
    fn equal_depth_keeps_the_incumbent() {
        let mut r = renderer();
        assert!(r.plot(5, 5, 0.25, 0.9));
        assert!(!r.plot(5, 5, 0.25, 0.1));
        let palette: Vec<char> = RenderConfig::default().palette;
        assert_eq!(r.char_at(5, 5), palette[(0.9 * palette.len() as f32) as usize]);
    }

    #[test]
    fn back_facing_sample_never_writes() {
        let mut r = renderer();
        assert!(!r.plot(20, 20, 0.5, -0.4));
        assert_eq!(r.char_at(20, 20), ' ');
        assert_eq!(r.lum_at(20, 20), 0.0);

        // Even when it would win the depth test over a front-facing sample.
        assert!(r.plot(20, 20, 0.2, 0.5));
        let kept = r.char_at(20, 20);
        assert!(!r.plot(20, 20, 0.9, -0.01));
        assert_eq!(r.char_at(20, 20), kept);
    }

    #[test]
    fn shade_index_is_monotonic_over_luminance() {
        let r = renderer();
        let palette: Vec<char> = RenderConfig::default().palette;
        let index_of = |ch: char| palette.iter().position(|&p| p == ch).unwrap();

        let mut prev = 0;
        for step in 0..1000 {
            let lum = step as f32 / 1000.0;
            let idx = index_of(r.shade(lum));
            assert!(idx >= prev, "palette index regressed at lum={}", lum);
            prev = idx;
        }
    }

    #[test]
    fn full_luminance_stays_inside_palette() {
        let r = renderer();
        let palette: Vec<char> = RenderConfig::default().palette;
        assert_eq!(r.shade(1.0), *palette.last().unwrap());
    }

    #[test]
    fn edge_and_outside_samples_are_rejected() {
        let mut r = renderer();
        let w = r.width() as i32;
        let h = r.height() as i32;
        assert!(!r.plot(w, 0, 0.5, 0.5));
        assert!(!r.plot(-1, 0, 0.5, 0.5));
        assert!(!r.plot(0, h, 0.5, 0.5));
        assert!(!r.plot(0, -1, 0.5, 0.5));
        assert!(r.frame_text().chars().all(|c| c == ' ' || c == '\n'));
    }

    #[test]
    fn reference_orientation_renders_centered_donut() {
        let mut r = renderer();
        r.render_frame(FRAC_PI_2, 0.0);

        let mut min_x = usize::MAX;
        let mut max_x = 0;
        let mut min_y = usize::MAX;
        let mut max_y = 0;
        let mut drawn = 0usize;
        for (y, row) in r.rows().enumerate() {
            for (x, &ch) in row.iter().enumerate() {
                if ch != ' ' {
                    drawn += 1;
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }
        assert!(drawn > 0, "reference frame came out empty");

        let cx = (min_x + max_x) as f32 / 2.0;
        let cy = (min_y + max_y) as f32 / 2.0;
        assert!((cx - 49.5).abs() < 3.0, "bounding box off-center in x: {}", cx);
        assert!((cy - 49.5).abs() < 3.0, "bounding box off-center in y: {}", cy);
    }

    #[test]
    fn trig_tables_cover_the_full_sweep_exclusively() {
        let table = trig_table(0.02);
        // Strictly below 2π: last entry at 314 * 0.02, next step would pass TAU.
        let n = table.len();
        assert!((n as f32 - 1.0) * 0.02 < TAU);
        assert!(n as f32 * 0.02 >= TAU - 0.02);
    }
}
