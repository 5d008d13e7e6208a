//! Shipped renderer and ambient strategies.
//!
//! These exercise the strategy seams end to end over the abstract voice
//! traits; the actual synthesis behind those traits stays external.

use std::time::Duration;

use murmur_types::Note;

use crate::ambient::{AmbientStrategy, PatternCtx, StreamTag};
use crate::melodic::PhraseRenderer;
use crate::voice::Voice;

/// Renders a phrase by spacing its notes evenly onto the voice, soonest
/// first. Only issues trigger calls; never blocks.
pub struct SpacedPhraseRenderer {
    pub note_spacing: Duration,
}

impl Default for SpacedPhraseRenderer {
    fn default() -> Self {
        Self {
            note_spacing: Duration::from_millis(450),
        }
    }
}

impl PhraseRenderer for SpacedPhraseRenderer {
    fn render_phrase(
        &mut self,
        phrase: &[Note],
        voice: &mut dyn Voice,
        volume: f32,
        now: Duration,
    ) {
        for (i, &note) in phrase.iter().enumerate() {
            voice.trigger(note, volume, now + self.note_spacing * i as u32);
        }
    }
}

/// Stream tags used by [`DriftStrategy`].
pub const PAD_STREAM: StreamTag = 0;
pub const SPARKLE_STREAM: StreamTag = 1;

/// Two-layer ambient texture: slow pad chord swells on voice 0 and sparse
/// single sparkle notes on voice 1 (or voice 0 when only one voice exists).
/// Higher density shortens both rescheduling windows.
pub struct DriftStrategy {
    chord_size: usize,
    /// Pad chord held across swells; cleared when the scale changes so the
    /// next swell re-seeds from the new scale.
    current_chord: Option<Vec<Note>>,
}

impl DriftStrategy {
    pub fn new(chord_size: usize) -> Self {
        Self {
            chord_size: chord_size.max(1),
            current_chord: None,
        }
    }

    fn pad_window(density: f32) -> (Duration, Duration) {
        let min = 25.0 - 17.0 * density as f64;
        let max = 40.0 - 24.0 * density as f64;
        (Duration::from_secs_f64(min), Duration::from_secs_f64(max))
    }

    fn sparkle_window(density: f32) -> (Duration, Duration) {
        let min = 12.0 - 9.0 * density as f64;
        let max = 20.0 - 14.0 * density as f64;
        (Duration::from_secs_f64(min), Duration::from_secs_f64(max))
    }
}

impl Default for DriftStrategy {
    fn default() -> Self {
        Self::new(3)
    }
}

impl AmbientStrategy for DriftStrategy {
    fn initiate(&mut self, ctx: &mut PatternCtx<'_>) {
        let (pad_min, pad_max) = Self::pad_window(ctx.density());
        ctx.schedule_next(PAD_STREAM, pad_min, pad_max);
        let (sp_min, sp_max) = Self::sparkle_window(ctx.density());
        ctx.schedule_next(SPARKLE_STREAM, sp_min, sp_max);
    }

    fn stream_fired(&mut self, tag: StreamTag, ctx: &mut PatternCtx<'_>) {
        match tag {
            PAD_STREAM => {
                let chord = match self.current_chord.take() {
                    Some(chord) => chord,
                    None => ctx.random_chord(self.chord_size),
                };
                for &note in &chord {
                    ctx.trigger(0, note, 0.8);
                }
                self.current_chord = Some(chord);
                let (min, max) = Self::pad_window(ctx.density());
                ctx.schedule_next(PAD_STREAM, min, max);
            }
            SPARKLE_STREAM => {
                let note = ctx.random_note();
                let voice = if ctx.voice_count() > 1 { 1 } else { 0 };
                ctx.trigger(voice, note, 0.5);
                let (min, max) = Self::sparkle_window(ctx.density());
                ctx.schedule_next(SPARKLE_STREAM, min, max);
            }
            other => {
                log::warn!(target: "murmur", "drift: unknown stream tag {}", other);
            }
        }
    }

    fn scale_changed(&mut self, _ctx: &mut PatternCtx<'_>) {
        self.current_chord = None;
    }
}
