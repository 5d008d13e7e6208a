//! Pitch tokens in scientific pitch notation ("C4", "F#3", "Bb2").

use serde::{Deserialize, Serialize};

/// A single pitch token. Ordered by MIDI note number, so a sorted
/// `Vec<Note>` is ascending by pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note {
    midi: u8,
}

impl Note {
    /// Construct from a raw MIDI note number (0..=127).
    pub fn from_midi(midi: u8) -> Option<Self> {
        if midi <= 127 {
            Some(Self { midi })
        } else {
            None
        }
    }

    /// Construct from a MIDI note number, clamping into the valid range.
    pub fn from_midi_lossy(midi: u8) -> Self {
        Self {
            midi: midi.min(127),
        }
    }

    /// MIDI note number of this pitch.
    pub fn midi(self) -> u8 {
        self.midi
    }

    /// Parse a token like "C4", "F#3", "Bb2". Octave range -1..=9,
    /// one optional accidental (# or b).
    pub fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let letter = chars.next()?;
        let base = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };
        let rest: String = chars.collect();
        let (accidental, octave_str) = match rest.chars().next() {
            Some('#') => (1, &rest[1..]),
            Some('b') => (-1, &rest[1..]),
            _ => (0, rest.as_str()),
        };
        let octave: i32 = octave_str.parse().ok()?;
        if !(-1..=9).contains(&octave) {
            return None;
        }
        let midi = (octave + 1) * 12 + base + accidental;
        if (0..=127).contains(&midi) {
            Some(Self { midi: midi as u8 })
        } else {
            None
        }
    }

    /// Token name, sharps for black keys ("C#4").
    pub fn name(self) -> String {
        const NAMES: [&str; 12] = [
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];
        let pc = (self.midi % 12) as usize;
        let octave = self.midi as i32 / 12 - 1;
        format!("{}{}", NAMES[pc], octave)
    }
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Note {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::parse(s).ok_or_else(|| format!("invalid pitch token: {}", s))
    }
}

impl Serialize for Note {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Note::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid pitch token: {}", s)))
    }
}
