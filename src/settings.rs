use crate::config::{AnimConfig, RenderConfig};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Optional settings file. Every key is optional; anything absent keeps the
/// built-in default, and an unreadable or malformed file is treated as empty.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub donut: DonutSettings,
    #[serde(default)]
    pub animation: AnimationSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct DonutSettings {
    pub r1: Option<f32>,
    pub r2: Option<f32>,
    pub k2: Option<f32>,
    pub theta_spacing: Option<f32>,
    pub phi_spacing: Option<f32>,
    pub palette: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnimationSettings {
    pub time_step: Option<f32>,
    pub rate_a: Option<f32>,
    pub rate_b: Option<f32>,
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termdonut")
            .join("config.toml")
    }

    /// Overlay these settings onto the built-in defaults.
    pub fn apply(&self, render: &mut RenderConfig, anim: &mut AnimConfig) {
        if let Some(r1) = self.donut.r1 {
            render.r1 = r1;
        }
        if let Some(r2) = self.donut.r2 {
            render.r2 = r2;
        }
        if let Some(k2) = self.donut.k2 {
            render.k2 = k2;
        }
        if let Some(step) = self.donut.theta_spacing {
            render.theta_spacing = step;
        }
        if let Some(step) = self.donut.phi_spacing {
            render.phi_spacing = step;
        }
        if let Some(palette) = &self.donut.palette {
            render.palette = palette.chars().collect();
        }
        if let Some(t) = self.animation.time_step {
            anim.time_step = t;
        }
        if let Some(r) = self.animation.rate_a {
            anim.rate_a = r;
        }
        if let Some(r) = self.animation.rate_b {
            anim.rate_b = r;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let settings: Settings = toml::from_str(
            r#"
            [donut]
            r2 = 2.5
            palette = ".,~@"

            [animation]
            rate_b = 0.02
            "#,
        )
        .unwrap();

        let mut render = RenderConfig::default();
        let mut anim = AnimConfig::default();
        settings.apply(&mut render, &mut anim);

        assert_eq!(render.r2, 2.5);
        assert_eq!(render.r1, 1.0);
        assert_eq!(render.palette, vec!['.', ',', '~', '@']);
        assert_eq!(anim.rate_b, 0.02);
        assert_eq!(anim.rate_a, 0.01);
    }

    #[test]
    fn empty_toml_changes_nothing() {
        let settings: Settings = toml::from_str("").unwrap();
        let mut render = RenderConfig::default();
        let mut anim = AnimConfig::default();
        settings.apply(&mut render, &mut anim);
        assert_eq!(render.k2, 5.0);
        assert_eq!(anim.time_step, 0.03);
    }
}
