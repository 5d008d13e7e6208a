//! Ambient pattern scheduler.
//!
//! Owns voices plus modulation sources and layers an arbitrary number of
//! independent self-renewing callback streams, each implemented by the
//! strategy behind [`AmbientStrategy`]. `schedule_next` is the only
//! mechanism by which a strategy creates recurring behavior.

use std::time::Duration;

use murmur_types::{AmbientParams, Note, Scale};

use crate::lifecycle::{Lifecycle, LifecycleState};
use crate::rng::RandomSource;
use crate::timers::{TimerId, TimerSet};
use crate::voice::{Effect, Modulator, OutputRouting, Voice};

/// Grace window between dispose and resource finalization.
const DISPOSE_GRACE: Duration = Duration::from_secs(1);

/// Fallback pitch for sampling helpers when the scale is empty (A3).
const FALLBACK_MIDI: u8 = 57;

/// Identifies one self-renewing stream; chosen by the strategy when arming.
pub type StreamTag = u32;

/// What a strategy sees while its hooks run: the scheduling primitive, the
/// sampling helpers, the owned voices, and the current parameters.
pub struct PatternCtx<'a> {
    now: Duration,
    timers: &'a mut TimerSet<StreamTag>,
    rng: &'a mut dyn RandomSource,
    scale: Option<&'a Scale>,
    params: &'a AmbientParams,
    voices: &'a mut [Box<dyn Voice>],
}

impl PatternCtx<'_> {
    /// The generic self-rescheduling primitive: arm one timer for `tag`
    /// with a uniform delay in `[min, max)`. When it fires while the
    /// scheduler is Active, the strategy's `stream_fired` runs and the
    /// handle is already removed from the arena; when inactive, the handle
    /// is dropped without a callback.
    pub fn schedule_next(&mut self, tag: StreamTag, min: Duration, max: Duration) -> TimerId {
        let delay = self.rng.range_f64(min.as_secs_f64(), max.as_secs_f64());
        self.timers.arm(self.now, Duration::from_secs_f64(delay), tag)
    }

    /// Uniform draw (with replacement) from the current scale; a fixed
    /// fallback pitch when the scale is empty.
    pub fn random_note(&mut self) -> Note {
        match self.scale {
            Some(scale) if !scale.is_empty() => {
                let idx = self.rng.pick_index(scale.len());
                scale.notes()[idx]
            }
            _ => Note::from_midi_lossy(FALLBACK_MIDI),
        }
    }

    /// `size` independent samples, duplicates permitted.
    pub fn random_chord(&mut self, size: usize) -> Vec<Note> {
        (0..size).map(|_| self.random_note()).collect()
    }

    /// Trigger a note on the voice at `index`, scaled by the volume
    /// parameter. Out-of-range indices are ignored.
    pub fn trigger(&mut self, index: usize, note: Note, velocity: f32) {
        let at = self.now;
        let scaled = velocity * self.params.volume;
        if let Some(voice) = self.voices.get_mut(index) {
            voice.trigger(note, scaled, at);
        }
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn params(&self) -> &AmbientParams {
        self.params
    }

    pub fn density(&self) -> f32 {
        self.params.density
    }
}

/// Strategy seam for concrete ambient textures. Selected at construction;
/// hooks run synchronously on the engine thread and must not block.
pub trait AmbientStrategy {
    /// Runs once on start. Expected to arm one or more streams via
    /// [`PatternCtx::schedule_next`].
    fn initiate(&mut self, ctx: &mut PatternCtx<'_>);

    /// Runs when a stream's timer fires while Active. Typically does its
    /// work and re-arms the same tag.
    fn stream_fired(&mut self, tag: StreamTag, ctx: &mut PatternCtx<'_>);

    /// Runs synchronously when the scale is replaced while Active, so
    /// in-flight patterns can re-seed without a restart.
    fn scale_changed(&mut self, _ctx: &mut PatternCtx<'_>) {}
}

pub struct AmbientScheduler {
    lifecycle: Lifecycle,
    timers: TimerSet<StreamTag>,
    now: Duration,
    scale: Option<Scale>,
    params: AmbientParams,
    voices: Vec<Box<dyn Voice>>,
    effects: Vec<Box<dyn Effect>>,
    modulators: Vec<Box<dyn Modulator>>,
    strategy: Box<dyn AmbientStrategy>,
    rng: Box<dyn RandomSource>,
    outs: Option<OutputRouting>,
}

impl AmbientScheduler {
    pub fn new(
        strategy: Box<dyn AmbientStrategy>,
        voices: Vec<Box<dyn Voice>>,
        effects: Vec<Box<dyn Effect>>,
        modulators: Vec<Box<dyn Modulator>>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            lifecycle: Lifecycle::new("ambient", DISPOSE_GRACE),
            timers: TimerSet::new(),
            now: Duration::ZERO,
            scale: None,
            params: AmbientParams::default(),
            voices,
            effects,
            modulators,
            strategy,
            rng,
            outs: None,
        }
    }

    /// Bind the externally owned output endpoints and route every voice
    /// into them. Allocates nothing.
    pub fn initialize(&mut self, outs: OutputRouting) {
        for voice in self.voices.iter_mut() {
            voice.connect(&outs);
        }
        self.outs = Some(outs);
    }

    /// Replace the scale. While Active, the strategy's scale-changed hook
    /// runs synchronously so streams can re-seed in place.
    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = Some(scale);
        if self.lifecycle.is_active() {
            let mut ctx = PatternCtx {
                now: self.now,
                timers: &mut self.timers,
                rng: self.rng.as_mut(),
                scale: self.scale.as_ref(),
                params: &self.params,
                voices: &mut self.voices,
            };
            self.strategy.scale_changed(&mut ctx);
        }
    }

    /// Transition to Active and let the strategy arm its streams. No-op
    /// while already Active (or disposed).
    pub fn start(&mut self) {
        if !self.lifecycle.try_start() {
            return;
        }
        let mut ctx = PatternCtx {
            now: self.now,
            timers: &mut self.timers,
            rng: self.rng.as_mut(),
            scale: self.scale.as_ref(),
            params: &self.params,
            voices: &mut self.voices,
        };
        self.strategy.initiate(&mut ctx);
    }

    /// Synchronously cancel every outstanding stream timer, go Idle, and
    /// request a graceful release on every voice. No-op unless Active.
    pub fn stop(&mut self) {
        if !self.lifecycle.try_stop() {
            return;
        }
        self.timers.cancel_all();
        for voice in self.voices.iter_mut() {
            if let Err(e) = voice.release_all() {
                log::warn!(target: "murmur", "ambient: voice release failed: {}", e);
            }
        }
    }

    /// Stop, then finalize after the grace window: modulators first (voices
    /// may reference them during their release tails, which are done by
    /// then), then voices, then effects. No-op once already quiescing or
    /// finalized.
    pub fn dispose(&mut self) {
        self.stop();
        self.lifecycle.begin_quiesce(self.now);
    }

    pub fn update_density(&mut self, value: f32) {
        self.params.set_density(value);
    }

    /// Update the wet mix and push it into every owned reverberation-type
    /// effect (wet control plus decay or room-size attribute). Last-writer
    /// wins under concurrent callers.
    pub fn update_reverb(&mut self, value: f32) {
        self.params.set_reverb_wet(value);
        let wet = self.params.reverb_wet;
        for effect in self.effects.iter_mut() {
            if effect.as_ref().is_reverb() {
                effect.set_wet(wet);
            }
        }
    }

    pub fn set_volume(&mut self, value: f32) {
        self.params.volume = value.clamp(0.0, 1.0);
    }

    /// Advance the virtual clock, dispatch due streams to the strategy, and
    /// finalize if the dispose grace window has elapsed.
    pub fn tick(&mut self, elapsed: Duration) {
        self.now += elapsed;
        for (_id, tag) in self.timers.fire_due(self.now) {
            // Liveness re-check on fire is the cancellation contract; an
            // inactive scheduler drops the callback with its handle.
            if !self.lifecycle.is_active() {
                continue;
            }
            let mut ctx = PatternCtx {
                now: self.now,
                timers: &mut self.timers,
                rng: self.rng.as_mut(),
                scale: self.scale.as_ref(),
                params: &self.params,
                voices: &mut self.voices,
            };
            self.strategy.stream_fired(tag, &mut ctx);
        }
        if self.lifecycle.finalize_due(self.now) {
            self.finalize();
        }
    }

    fn finalize(&mut self) {
        for mut modulator in self.modulators.drain(..) {
            if let Err(e) = modulator.dispose() {
                log::warn!(target: "murmur", "ambient: modulator dispose failed: {}", e);
            }
        }
        for mut voice in self.voices.drain(..) {
            if let Err(e) = voice.dispose() {
                log::warn!(target: "murmur", "ambient: voice dispose failed: {}", e);
            }
        }
        for mut effect in self.effects.drain(..) {
            if let Err(e) = effect.dispose() {
                log::warn!(target: "murmur", "ambient: effect dispose failed: {}", e);
            }
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn params(&self) -> &AmbientParams {
        &self.params
    }

    /// Number of armed stream timers. Idle means zero.
    pub fn outstanding_timers(&self) -> usize {
        self.timers.outstanding()
    }
}
