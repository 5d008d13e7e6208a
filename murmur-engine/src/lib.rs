//! # murmur-engine
//!
//! Generative ambient music engine: a timer-driven scheduler that keeps
//! producing short melodic phrases and layered ambient textures, with a
//! lifecycle discipline guaranteeing that stop and dispose never leave
//! dangling timers or leaked audio resources.
//!
//! Everything runs on one thread: the owner calls [`Engine::tick`] (or the
//! per-generator `tick` methods) with the elapsed time, which advances a
//! virtual clock and fires due timers. The concrete synthesis lives behind
//! the [`voice`] traits and is supplied externally; UI threads talk to the
//! engine through [`EngineHandle`].

pub mod ambient;
pub mod commands;
pub mod config;
pub mod engine;
pub mod lifecycle;
pub mod melodic;
pub mod rng;
pub mod strategies;
pub mod timers;
pub mod voice;

pub use ambient::{AmbientScheduler, AmbientStrategy, PatternCtx, StreamTag};
pub use commands::{EngineCmd, EngineHandle};
pub use config::MoodConfig;
pub use engine::Engine;
pub use lifecycle::LifecycleState;
pub use melodic::{MelodicGenerator, PhraseRenderer};
pub use rng::{Lcg, RandomSource};
pub use strategies::{DriftStrategy, SpacedPhraseRenderer};
pub use timers::{TimerId, TimerSet};
pub use voice::{Effect, Modulator, OutputRouting, Voice};
