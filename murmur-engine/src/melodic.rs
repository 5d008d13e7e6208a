//! Melodic phrase generator.
//!
//! Owns one instrument voice; each cycle produces one short random-walk
//! melody over the active scale, anchored to a seed pitch drawn from the
//! active pattern, hands it to the renderer, then arms its own successor.

use std::time::Duration;

use murmur_types::{MelodicParams, Note, Pattern, Phrase, Scale};

use crate::lifecycle::{Lifecycle, LifecycleState};
use crate::rng::RandomSource;
use crate::timers::TimerSet;
use crate::voice::{Effect, OutputRouting, Voice};

/// Grace window between dispose and resource finalization, leaving room for
/// in-flight release tails.
const DISPOSE_GRACE: Duration = Duration::from_millis(500);

/// Delay range for the first phrase after start, seconds.
const FIRST_PHRASE_MIN_SECS: f64 = 10.0;
const FIRST_PHRASE_MAX_SECS: f64 = 15.0;

/// Random slack added on top of the frequency-derived base delay, seconds.
const RESCHEDULE_JITTER_SECS: f64 = 10.0;

/// Renders one generated phrase onto the owned voice. Implementations must
/// not block; they run on every cycle.
pub trait PhraseRenderer {
    fn render_phrase(&mut self, phrase: &[Note], voice: &mut dyn Voice, volume: f32, now: Duration);
}

pub struct MelodicGenerator {
    lifecycle: Lifecycle,
    timers: TimerSet<()>,
    now: Duration,
    scale: Option<Scale>,
    pattern: Option<Pattern>,
    params: MelodicParams,
    voice: Option<Box<dyn Voice>>,
    effects: Vec<Box<dyn Effect>>,
    renderer: Box<dyn PhraseRenderer>,
    rng: Box<dyn RandomSource>,
    outs: Option<OutputRouting>,
}

impl MelodicGenerator {
    pub fn new(
        voice: Box<dyn Voice>,
        effects: Vec<Box<dyn Effect>>,
        renderer: Box<dyn PhraseRenderer>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            lifecycle: Lifecycle::new("melodic", DISPOSE_GRACE),
            timers: TimerSet::new(),
            now: Duration::ZERO,
            scale: None,
            pattern: None,
            params: MelodicParams::default(),
            voice: Some(voice),
            effects,
            renderer,
            rng,
            outs: None,
        }
    }

    /// Bind the externally owned output endpoints and route the voice into
    /// them. Allocates nothing.
    pub fn initialize(&mut self, outs: OutputRouting) {
        if let Some(voice) = self.voice.as_mut() {
            voice.connect(&outs);
        }
        self.outs = Some(outs);
    }

    /// Transition to Active and arm the first phrase timer. No-op while
    /// already Active (or disposed).
    pub fn start(&mut self, scale: Scale, pattern: Pattern) {
        if !self.lifecycle.try_start() {
            return;
        }
        self.scale = Some(scale);
        self.pattern = Some(pattern);
        let delay = self
            .rng
            .range_f64(FIRST_PHRASE_MIN_SECS, FIRST_PHRASE_MAX_SECS);
        self.timers
            .arm(self.now, Duration::from_secs_f64(delay), ());
    }

    /// Cancel the outstanding timer, go Idle, and ask the voice for a
    /// graceful release. No-op unless Active.
    pub fn stop(&mut self) {
        if !self.lifecycle.try_stop() {
            return;
        }
        self.timers.cancel_all();
        if let Some(voice) = self.voice.as_mut() {
            if let Err(e) = voice.release_all() {
                log::warn!(target: "murmur", "melodic: voice release failed: {}", e);
            }
        }
    }

    /// Stop, then finalize resources once the grace window has passed on a
    /// later tick. No-op once already quiescing or finalized.
    pub fn dispose(&mut self) {
        self.stop();
        self.lifecycle.begin_quiesce(self.now);
    }

    /// Replace the scale. Takes effect on the next cycle; an in-flight timer
    /// is never disturbed.
    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = Some(scale);
    }

    /// Replace the seed pattern. Takes effect on the next cycle.
    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.pattern = Some(pattern);
    }

    /// Externally owned melodic-frequency control, 1..=10.
    pub fn set_frequency(&mut self, value: u8) {
        self.params.set_frequency(value);
    }

    /// Send level toward the shared reverb, pushed into every owned effect
    /// with a wet control. Last-writer-wins under concurrent callers.
    pub fn update_reverb_amount(&mut self, value: f32) {
        let wet = value.clamp(0.0, 1.0);
        self.params.reverb_amount = wet;
        for effect in self.effects.iter_mut() {
            if effect.has_wet_control() {
                effect.set_wet(wet);
            }
        }
    }

    pub fn set_volume(&mut self, value: f32) {
        self.params.volume = value.clamp(0.0, 1.0);
    }

    /// Advance the virtual clock, fire due timers, and finalize if the
    /// dispose grace window has elapsed. The sole driver of this generator.
    pub fn tick(&mut self, elapsed: Duration) {
        self.now += elapsed;
        for _fired in self.timers.fire_due(self.now) {
            // Liveness re-check: a timer must never do audible work after
            // stop, even if one slipped past cancellation.
            if self.lifecycle.is_active() {
                self.on_phrase_timer();
            }
        }
        if self.lifecycle.finalize_due(self.now) {
            self.finalize();
        }
    }

    fn on_phrase_timer(&mut self) {
        if let (Some(scale), Some(pattern)) = (&self.scale, &self.pattern) {
            // A seed absent from the scale skips this cycle's phrase; the
            // chain still reschedules below.
            if let Some(phrase) = random_walk_phrase(scale, pattern, self.rng.as_mut()) {
                if let Some(voice) = self.voice.as_mut() {
                    self.renderer
                        .render_phrase(&phrase, voice.as_mut(), self.params.volume, self.now);
                }
            }
        }
        if self.lifecycle.is_active() {
            let base = base_delay_secs(&self.params);
            let delay = base + self.rng.range_f64(0.0, RESCHEDULE_JITTER_SECS);
            self.timers
                .arm(self.now, Duration::from_secs_f64(delay), ());
        }
    }

    fn finalize(&mut self) {
        if let Some(mut voice) = self.voice.take() {
            if let Err(e) = voice.dispose() {
                log::warn!(target: "murmur", "melodic: voice dispose failed: {}", e);
            }
        }
        for mut effect in self.effects.drain(..) {
            if let Err(e) = effect.dispose() {
                log::warn!(target: "murmur", "melodic: effect dispose failed: {}", e);
            }
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn params(&self) -> &MelodicParams {
        &self.params
    }

    /// Number of armed timers. Active means exactly one; Idle means zero.
    pub fn outstanding_timers(&self) -> usize {
        self.timers.outstanding()
    }
}

/// Base reschedule time from the melodic-frequency control: `(11 - f) * 6`
/// seconds, with the documented default of 5 when the control is absent.
pub(crate) fn base_delay_secs(params: &MelodicParams) -> f64 {
    (11 - u32::from(params.frequency_or_default())) as f64 * 6.0
}

/// One random-walk phrase: length uniform in [3,7], seeded from the pattern,
/// stepping by delta in {-2..2} with index clamping. Returns `None` when the seed
/// pitch is absent from the scale (that cycle is skipped, not an error).
///
/// Draw order: length, seed index, then one delta per remaining note.
pub(crate) fn random_walk_phrase(
    scale: &Scale,
    pattern: &Pattern,
    rng: &mut dyn RandomSource,
) -> Option<Phrase> {
    let length = rng.range_u32(3, 8) as usize;
    let seed = pattern.notes()[rng.pick_index(pattern.len())];
    let start = scale.index_of(seed)?;

    let mut phrase = Vec::with_capacity(length);
    phrase.push(scale.notes()[start]);
    let mut idx = start as isize;
    for _ in 1..length {
        let step = rng.range_u32(0, 5) as isize - 2;
        idx = (idx + step).clamp(0, scale.len() as isize - 1);
        phrase.push(scale.at_clamped(idx));
    }
    Some(phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_with(frequency: Option<u8>) -> MelodicParams {
        MelodicParams {
            frequency,
            ..MelodicParams::default()
        }
    }

    #[test]
    fn base_delay_boundaries() {
        assert_eq!(base_delay_secs(&params_with(Some(10))), 6.0);
        assert_eq!(base_delay_secs(&params_with(Some(1))), 60.0);
        assert_eq!(base_delay_secs(&params_with(None)), 36.0);
    }

    #[test]
    fn base_delay_clamps_out_of_range_controls() {
        // Direct field writes (e.g. deserialized config) can bypass the
        // setter's clamp; the read side clamps again.
        assert_eq!(base_delay_secs(&params_with(Some(0))), 60.0);
        assert_eq!(base_delay_secs(&params_with(Some(99))), 6.0);
    }

    #[test]
    fn absent_seed_skips_the_cycle() {
        let scale = Scale::parse(&["C4", "D4", "E4"]).unwrap();
        let pattern = Pattern::parse(&["A5"]).unwrap();
        let mut rng = crate::rng::Lcg::new(42);
        assert!(random_walk_phrase(&scale, &pattern, &mut rng).is_none());
    }

    #[test]
    fn walk_stays_inside_the_scale() {
        let scale = Scale::parse(&["C4", "D4", "E4", "F4", "G4", "A4", "B4"]).unwrap();
        let pattern = Pattern::parse(&["C4", "E4", "G4"]).unwrap();
        let mut rng = crate::rng::Lcg::new(7);
        for _ in 0..200 {
            let phrase = random_walk_phrase(&scale, &pattern, &mut rng).unwrap();
            assert!((3..=7).contains(&phrase.len()));
            let indices: Vec<usize> = phrase
                .iter()
                .map(|&n| scale.index_of(n).expect("phrase note outside scale"))
                .collect();
            for w in indices.windows(2) {
                assert!(w[0].abs_diff(w[1]) <= 2, "step wider than 2: {:?}", indices);
            }
        }
    }
}
