//! Animation driver: owns the angles, frame pacing and keyboard control.
//!
//! The renderer itself knows nothing about terminals or timing; this module
//! advances (a, b) each frame, hands them to `FrameRenderer`, and blits the
//! result. Interactive mode takes over the terminal; print mode writes plain
//! frames to stdout.

use crate::config::{AnimConfig, RenderConfig};
use crate::renderer::FrameRenderer;
use crate::terminal::Terminal;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::style::Color;
use std::io::{self, Write};

/// Runtime state for interactive controls.
struct RunState {
    speed: f32, // seconds per frame
    color_scheme: u8,
    paused: bool,
}

impl RunState {
    fn new(initial_speed: f32) -> Self {
        Self {
            speed: initial_speed,
            color_scheme: 0,
            paused: false,
        }
    }

    /// Handle keypress, returns true if should quit.
    fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(' ') => self.paused = !self.paused,
            // Number keys: speed (1=fastest, 9=slowest, 0=very slow)
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let n = c.to_digit(10).unwrap() as u8;
                self.speed = match n {
                    1 => 0.005,
                    2 => 0.01,
                    3 => 0.02,
                    4 => 0.03,
                    5 => 0.05,
                    6 => 0.07,
                    7 => 0.1,
                    8 => 0.15,
                    _ => 0.2,
                };
            }
            // Shift+number symbols switch color scheme
            KeyCode::Char('!') => self.color_scheme = 1, // fire
            KeyCode::Char('@') => self.color_scheme = 2, // ice
            KeyCode::Char('#') => self.color_scheme = 3, // gold
            KeyCode::Char(')') => self.color_scheme = 0, // mono
            _ => {}
        }
        false
    }
}

/// Color for a luminance band under the active scheme.
fn scheme_color(scheme: u8, intensity: u8) -> (Color, bool) {
    match scheme {
        1 => match intensity {
            0 => (Color::DarkRed, false),
            1 => (Color::Red, false),
            2 => (Color::DarkYellow, false),
            _ => (Color::Yellow, true),
        },
        2 => match intensity {
            0 => (Color::DarkBlue, false),
            1 => (Color::Blue, false),
            2 => (Color::DarkCyan, false),
            _ => (Color::Cyan, true),
        },
        3 => match intensity {
            0 => (Color::DarkYellow, false),
            1 => (Color::Yellow, false),
            2 => (Color::White, false),
            _ => (Color::White, true),
        },
        _ => match intensity {
            0 => (Color::DarkGrey, false),
            1 => (Color::Grey, false),
            2 => (Color::White, false),
            _ => (Color::White, true),
        },
    }
}

/// Renderer config fitted to a terminal of the given size: grid matches the
/// cell count, y is squashed for the ~2:1 cell aspect, and k1 is derived so
/// the donut fills the limiting dimension.
fn fit_to_terminal(base: &RenderConfig, width: u16, height: u16) -> RenderConfig {
    let mut cfg = base.clone();
    cfg.width = width as usize;
    cfg.height = height as usize;
    cfg.y_scale = 0.5;
    let limit = (width as f32).min(2.0 * height as f32);
    cfg.k1 = Some(limit * cfg.k2 * 3.0 / (8.0 * (cfg.r1 + cfg.r2)));
    cfg
}

/// Run the interactive animation until the user quits.
pub fn run(render_cfg: &RenderConfig, anim: &AnimConfig) -> io::Result<()> {
    let mut term = Terminal::new()?;
    term.clear_screen()?;

    let mut state = RunState::new(anim.time_step);
    let mut a = anim.start_a;
    let mut b = anim.start_b;

    let (init_w, init_h) = term.size();
    let mut prev_w = init_w;
    let mut prev_h = init_h;
    let mut renderer = FrameRenderer::new(&fit_to_terminal(render_cfg, init_w, init_h));

    loop {
        let (width, height) = crossterm::terminal::size().unwrap_or(term.size());

        if width != prev_w || height != prev_h {
            term.resize(width, height);
            term.clear_screen()?;
            prev_w = width;
            prev_h = height;
            renderer = FrameRenderer::new(&fit_to_terminal(render_cfg, width, height));
        }

        if let Some((code, mods)) = term.check_key()? {
            if state.handle_key(code, mods) {
                break;
            }
        }

        if state.paused {
            term.sleep(0.1);
            continue;
        }

        renderer.render_frame(a, b);

        term.clear();
        for (y, row) in renderer.rows().enumerate() {
            for (x, &ch) in row.iter().enumerate() {
                if ch == ' ' {
                    continue;
                }
                let l = renderer.lum_at(x, y);
                let intensity = if l > 0.6 {
                    3
                } else if l > 0.3 {
                    2
                } else if l > 0.1 {
                    1
                } else {
                    0
                };
                let (color, bold) = scheme_color(state.color_scheme, intensity);
                term.set(x as i32, y as i32, ch, Some(color), bold);
            }
        }
        term.present()?;

        // Keep the apparent rotation rate steady across speed settings.
        let scale = state.speed / anim.time_step;
        a += anim.rate_a * scale;
        b += anim.rate_b * scale;

        term.sleep(state.speed);
    }

    Ok(())
}

/// Render `frames` frames at the configured grid size straight to stdout.
/// No terminal takeover; the output is the plain newline-terminated grid.
pub fn print_frames(render_cfg: &RenderConfig, anim: &AnimConfig, frames: u32) -> io::Result<()> {
    let mut renderer = FrameRenderer::new(render_cfg);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut a = anim.start_a;
    let mut b = anim.start_b;
    for _ in 0..frames {
        renderer.render_frame(a, b);
        out.write_all(renderer.frame_text().as_bytes())?;
        a += anim.rate_a;
        b += anim.rate_b;
    }
    out.flush()
}
