//! Seam toward the external audio graph.
//!
//! The concrete synthesis/effect implementations live outside this crate and
//! are handed in as boxed trait objects. A generator owns its voices, effects
//! and modulators exclusively; the output buses are shared and never owned.

use std::time::Duration;

use murmur_types::{BusId, Note};

/// Externally owned output endpoints a generator routes its voices into.
/// The engine never disposes these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputRouting {
    pub master: BusId,
    pub reverb: BusId,
    pub delay: Option<BusId>,
    pub filter: Option<BusId>,
}

impl OutputRouting {
    /// Melodic routing: master + shared reverb only.
    pub fn new(master: BusId, reverb: BusId) -> Self {
        Self {
            master,
            reverb,
            delay: None,
            filter: None,
        }
    }

    pub fn with_delay(mut self, delay: BusId) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_filter(mut self, filter: BusId) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// One owned synthesis voice.
pub trait Voice {
    /// Route this voice's output into the shared buses. Called once from
    /// `initialize`.
    fn connect(&mut self, outs: &OutputRouting);

    /// Trigger a note at `at` on the engine clock. Must not block; called
    /// every generation cycle.
    fn trigger(&mut self, note: Note, velocity: f32, at: Duration);

    /// Gracefully release everything currently sounding. The default is a
    /// no-op: a voice with no release capability is simply skipped.
    fn release_all(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Free the underlying audio resource. Called once, at finalize.
    fn dispose(&mut self) -> Result<(), String>;
}

/// One owned effect in a generator's chain.
pub trait Effect {
    /// True when the effect exposes a wet-mix control.
    fn has_wet_control(&self) -> bool {
        false
    }

    /// Set the wet mix, 0.0..=1.0. Only called when `has_wet_control`.
    fn set_wet(&mut self, _wet: f32) {}

    /// Tail length when this is a decay-style reverberation effect.
    fn decay_secs(&self) -> Option<f32> {
        None
    }

    /// Room size when this is a room-model reverberation effect.
    fn room_size(&self) -> Option<f32> {
        None
    }

    /// Free the underlying audio resource. Called once, at finalize.
    fn dispose(&mut self) -> Result<(), String>;
}

impl dyn Effect {
    /// Reverberation-type effects advertise a decay or room-size attribute
    /// alongside a wet control; only those receive `update_reverb` pushes.
    pub fn is_reverb(&self) -> bool {
        self.has_wet_control() && (self.decay_secs().is_some() || self.room_size().is_some())
    }
}

/// Low-frequency modulation source owned by the ambient scheduler. Voices
/// may reference these during their own release tails, so modulators are
/// only freed at finalize, after the grace window.
pub trait Modulator {
    /// Free the underlying resource. Called once, at finalize.
    fn dispose(&mut self) -> Result<(), String>;
}
