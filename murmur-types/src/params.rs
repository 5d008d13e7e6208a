//! Control-surface parameter state for the generators.
//!
//! External UI controls mutate these through setters; generators read them
//! at each scheduling decision. Concurrent mutation is last-writer-wins by
//! design (the command channel serializes UI-driven calls in practice).

use serde::{Deserialize, Serialize};

/// Default melodic frequency used when the external control is absent.
pub const DEFAULT_MELODIC_FREQUENCY: u8 = 5;

/// Parameters read by the melodic phrase generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MelodicParams {
    /// Externally owned "melodic frequency" control, 1..=10. `None` when
    /// the control is unavailable; readers substitute the default.
    pub frequency: Option<u8>,
    /// Send level toward the shared reverb bus, 0.0..=1.0.
    pub reverb_amount: f32,
    /// Trigger velocity scale, 0.0..=1.0.
    pub volume: f32,
}

impl Default for MelodicParams {
    fn default() -> Self {
        Self {
            frequency: None,
            reverb_amount: 0.5,
            volume: 0.8,
        }
    }
}

impl MelodicParams {
    /// Frequency with the documented default substituted and the 1..=10
    /// range enforced.
    pub fn frequency_or_default(&self) -> u8 {
        self.frequency
            .unwrap_or(DEFAULT_MELODIC_FREQUENCY)
            .clamp(1, 10)
    }

    pub fn set_frequency(&mut self, value: u8) {
        self.frequency = Some(value.clamp(1, 10));
    }
}

/// Parameters read by the ambient pattern scheduler and its strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientParams {
    /// Texture density, 0.0..=1.0. Strategies shorten their rescheduling
    /// windows as this rises.
    pub density: f32,
    /// Wet-mix pushed into owned reverberation-type effects.
    pub reverb_wet: f32,
    /// Trigger velocity scale, 0.0..=1.0.
    pub volume: f32,
}

impl Default for AmbientParams {
    fn default() -> Self {
        Self {
            density: 0.5,
            reverb_wet: 0.4,
            volume: 0.7,
        }
    }
}

impl AmbientParams {
    pub fn set_density(&mut self, value: f32) {
        self.density = value.clamp(0.0, 1.0);
    }

    pub fn set_reverb_wet(&mut self, value: f32) {
        self.reverb_wet = value.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_defaults_and_clamps() {
        let mut params = MelodicParams::default();
        assert_eq!(params.frequency_or_default(), 5);
        params.set_frequency(12);
        assert_eq!(params.frequency_or_default(), 10);
        params.set_frequency(0);
        assert_eq!(params.frequency_or_default(), 1);
    }

    #[test]
    fn ambient_setters_clamp() {
        let mut params = AmbientParams::default();
        params.set_density(1.5);
        assert_eq!(params.density, 1.0);
        params.set_reverb_wet(-0.2);
        assert_eq!(params.reverb_wet, 0.0);
    }
}
