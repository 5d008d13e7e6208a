//! # murmur-types
//!
//! Shared data types for the murmur generative ambient engine: pitch tokens,
//! scales, seed patterns, and control-surface parameters. Pure data with
//! serde derives; no scheduling or audio code lives here.

pub mod note;
pub mod params;
pub mod scale;

pub use note::Note;
pub use params::{AmbientParams, MelodicParams, DEFAULT_MELODIC_FREQUENCY};
pub use scale::{Pattern, Phrase, Scale};

/// Identifier for an externally owned output bus endpoint (master volume,
/// shared reverb/delay/filter). The engine routes voices into these but
/// never owns or disposes them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct BusId(u32);

impl BusId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
