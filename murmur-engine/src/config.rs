//! Mood/preset file: scale and pattern tokens plus default parameter values.
//!
//! An embedded default is always present; a user file, when given, overrides
//! it field-wise. Malformed user files are logged and ignored rather than
//! failing startup.

use std::path::Path;

use serde::Deserialize;

use murmur_types::{AmbientParams, MelodicParams, Pattern, Scale};

const DEFAULT_MOOD: &str = include_str!("../mood.toml");

#[derive(Deserialize, Default)]
struct MoodFile {
    #[serde(default)]
    mood: MoodSection,
    #[serde(default)]
    params: ParamsSection,
}

#[derive(Deserialize, Default)]
struct MoodSection {
    scale: Option<Vec<String>>,
    pattern: Option<Vec<String>>,
}

#[derive(Deserialize, Default)]
struct ParamsSection {
    melodic_frequency: Option<u8>,
    density: Option<f32>,
    reverb: Option<f32>,
    volume: Option<f32>,
}

/// Resolved mood: validated scale/pattern plus generator parameters.
#[derive(Debug, Clone)]
pub struct MoodConfig {
    pub scale: Scale,
    pub pattern: Pattern,
    pub melodic: MelodicParams,
    pub ambient: AmbientParams,
}

impl MoodConfig {
    /// Load the embedded default, merged with `user_path` when it exists.
    pub fn load(user_path: Option<&Path>) -> Self {
        let mut base: MoodFile =
            toml::from_str(DEFAULT_MOOD).expect("Failed to parse embedded mood.toml");

        if let Some(path) = user_path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<MoodFile>(&contents) {
                        Ok(user) => {
                            merge_mood(&mut base.mood, user.mood);
                            merge_params(&mut base.params, user.params);
                        }
                        Err(e) => {
                            log::warn!(target: "murmur", "ignoring malformed mood {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "murmur", "cannot read mood {}: {}", path.display(), e)
                    }
                }
            }
        }

        Self::resolve(base)
    }

    fn resolve(file: MoodFile) -> Self {
        // The embedded default is known-good, so token failures here can
        // only come from user overrides; fall back and keep going.
        let (scale, pattern) = match build_scale_pattern(&file.mood) {
            Ok(pair) => pair,
            Err(e) => {
                log::warn!(target: "murmur", "ignoring invalid mood override: {}", e);
                let embedded: MoodFile =
                    toml::from_str(DEFAULT_MOOD).expect("Failed to parse embedded mood.toml");
                build_scale_pattern(&embedded.mood).expect("embedded mood must be valid")
            }
        };

        let mut melodic = MelodicParams::default();
        if let Some(f) = file.params.melodic_frequency {
            melodic.set_frequency(f);
        }
        if let Some(r) = file.params.reverb {
            melodic.reverb_amount = r.clamp(0.0, 1.0);
        }
        let mut ambient = AmbientParams::default();
        if let Some(d) = file.params.density {
            ambient.set_density(d);
        }
        if let Some(r) = file.params.reverb {
            ambient.set_reverb_wet(r);
        }
        if let Some(v) = file.params.volume {
            let v = v.clamp(0.0, 1.0);
            melodic.volume = v;
            ambient.volume = v;
        }

        Self {
            scale,
            pattern,
            melodic,
            ambient,
        }
    }
}

fn build_scale_pattern(mood: &MoodSection) -> Result<(Scale, Pattern), String> {
    let scale_tokens: Vec<&str> = mood
        .scale
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .collect();
    let pattern_tokens: Vec<&str> = mood
        .pattern
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .collect();

    let scale = Scale::parse(&scale_tokens)?;
    let pattern = Pattern::parse(&pattern_tokens)?;
    if !pattern.is_subset_of(&scale) {
        return Err("pattern contains notes outside the scale".to_string());
    }
    Ok((scale, pattern))
}

fn merge_mood(base: &mut MoodSection, user: MoodSection) {
    if user.scale.is_some() {
        base.scale = user.scale;
    }
    if user.pattern.is_some() {
        base.pattern = user.pattern;
    }
}

fn merge_params(base: &mut ParamsSection, user: ParamsSection) {
    if user.melodic_frequency.is_some() {
        base.melodic_frequency = user.melodic_frequency;
    }
    if user.density.is_some() {
        base.density = user.density;
    }
    if user.reverb.is_some() {
        base.reverb = user.reverb;
    }
    if user.volume.is_some() {
        base.volume = user.volume;
    }
}
