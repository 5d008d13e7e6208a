#![allow(dead_code)]
//! Test harness utilities for murmur-engine integration tests: recording
//! mock voices/effects/modulators and a scripted random source.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use murmur_engine::melodic::PhraseRenderer;
use murmur_engine::rng::RandomSource;
use murmur_engine::voice::{Effect, Modulator, OutputRouting, Voice};
use murmur_types::Note;

/// One trigger observed by a mock voice.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub voice: &'static str,
    pub note: Note,
    pub velocity: f32,
    pub at: Duration,
}

/// Shared, ordered log of lifecycle events across all mocks.
pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Count of log entries equal to `entry`.
pub fn count(log: &EventLog, entry: &str) -> usize {
    log.borrow().iter().filter(|e| e.as_str() == entry).count()
}

/// Index of the first log entry equal to `entry`, panicking when absent.
pub fn position(log: &EventLog, entry: &str) -> usize {
    log.borrow()
        .iter()
        .position(|e| e == entry)
        .unwrap_or_else(|| panic!("missing log entry {:?} in {:?}", entry, log.borrow()))
}

pub struct MockVoice {
    pub name: &'static str,
    pub log: EventLog,
    pub triggers: Rc<RefCell<Vec<Trigger>>>,
    pub fail_dispose: bool,
}

impl MockVoice {
    pub fn new(name: &'static str, log: &EventLog) -> (Self, Rc<RefCell<Vec<Trigger>>>) {
        let triggers = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                name,
                log: log.clone(),
                triggers: triggers.clone(),
                fail_dispose: false,
            },
            triggers,
        )
    }

    pub fn failing(mut self) -> Self {
        self.fail_dispose = true;
        self
    }
}

impl Voice for MockVoice {
    fn connect(&mut self, _outs: &OutputRouting) {
        self.log.borrow_mut().push(format!("connect:{}", self.name));
    }

    fn trigger(&mut self, note: Note, velocity: f32, at: Duration) {
        self.triggers.borrow_mut().push(Trigger {
            voice: self.name,
            note,
            velocity,
            at,
        });
        self.log
            .borrow_mut()
            .push(format!("trigger:{}:{}", self.name, note));
    }

    fn release_all(&mut self) -> Result<(), String> {
        self.log.borrow_mut().push(format!("release:{}", self.name));
        Ok(())
    }

    fn dispose(&mut self) -> Result<(), String> {
        self.log.borrow_mut().push(format!("dispose:{}", self.name));
        if self.fail_dispose {
            Err(format!("{} refused to dispose", self.name))
        } else {
            Ok(())
        }
    }
}

pub struct MockEffect {
    pub name: &'static str,
    pub log: EventLog,
    pub wet: Rc<RefCell<Option<f32>>>,
    pub has_wet: bool,
    pub decay: Option<f32>,
    pub fail_dispose: bool,
}

impl MockEffect {
    /// Reverb-like: wet control plus a decay attribute.
    pub fn reverb(name: &'static str, log: &EventLog) -> (Self, Rc<RefCell<Option<f32>>>) {
        let wet = Rc::new(RefCell::new(None));
        (
            Self {
                name,
                log: log.clone(),
                wet: wet.clone(),
                has_wet: true,
                decay: Some(4.0),
                fail_dispose: false,
            },
            wet,
        )
    }

    /// Wet control but no reverb capacity (e.g. a chorus).
    pub fn wet_only(name: &'static str, log: &EventLog) -> (Self, Rc<RefCell<Option<f32>>>) {
        let wet = Rc::new(RefCell::new(None));
        (
            Self {
                name,
                log: log.clone(),
                wet: wet.clone(),
                has_wet: true,
                decay: None,
                fail_dispose: false,
            },
            wet,
        )
    }

    /// No controls at all.
    pub fn plain(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: log.clone(),
            wet: Rc::new(RefCell::new(None)),
            has_wet: false,
            decay: None,
            fail_dispose: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail_dispose = true;
        self
    }
}

impl Effect for MockEffect {
    fn has_wet_control(&self) -> bool {
        self.has_wet
    }

    fn set_wet(&mut self, wet: f32) {
        *self.wet.borrow_mut() = Some(wet);
    }

    fn decay_secs(&self) -> Option<f32> {
        self.decay
    }

    fn dispose(&mut self) -> Result<(), String> {
        self.log.borrow_mut().push(format!("dispose:{}", self.name));
        if self.fail_dispose {
            Err(format!("{} refused to dispose", self.name))
        } else {
            Ok(())
        }
    }
}

pub struct MockModulator {
    pub name: &'static str,
    pub log: EventLog,
    pub fail_dispose: bool,
}

impl MockModulator {
    pub fn new(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: log.clone(),
            fail_dispose: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail_dispose = true;
        self
    }
}

impl Modulator for MockModulator {
    fn dispose(&mut self) -> Result<(), String> {
        self.log.borrow_mut().push(format!("dispose:{}", self.name));
        if self.fail_dispose {
            Err(format!("{} refused to dispose", self.name))
        } else {
            Ok(())
        }
    }
}

/// Renderer that records every phrase it is asked to render and forwards
/// the notes to the voice with zero spacing.
pub struct RecordingRenderer {
    pub phrases: Rc<RefCell<Vec<Vec<Note>>>>,
}

impl RecordingRenderer {
    pub fn new() -> (Self, Rc<RefCell<Vec<Vec<Note>>>>) {
        let phrases = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                phrases: phrases.clone(),
            },
            phrases,
        )
    }
}

impl PhraseRenderer for RecordingRenderer {
    fn render_phrase(
        &mut self,
        phrase: &[Note],
        voice: &mut dyn Voice,
        volume: f32,
        now: Duration,
    ) {
        self.phrases.borrow_mut().push(phrase.to_vec());
        for &note in phrase {
            voice.trigger(note, volume, now);
        }
    }
}

/// Random source that replays a scripted list of raw draws, then a fixed
/// fallback value once exhausted.
pub struct ScriptRng {
    values: VecDeque<u32>,
    fallback: u32,
}

impl ScriptRng {
    pub fn new(values: &[u32]) -> Self {
        Self {
            values: values.iter().copied().collect(),
            fallback: 0,
        }
    }

    pub fn with_fallback(values: &[u32], fallback: u32) -> Self {
        Self {
            values: values.iter().copied().collect(),
            fallback,
        }
    }
}

impl RandomSource for ScriptRng {
    fn next_u32(&mut self) -> u32 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}

pub fn note(token: &str) -> Note {
    token.parse().unwrap()
}

pub fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

pub fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
