//! Scale, Pattern, and Phrase containers for the generators.
//!
//! A Scale is the ordered pitch space a generator walks over; a Pattern is
//! the seed subset anchoring new phrases; a Phrase is one generated fragment,
//! produced fresh each cycle and never stored.

use serde::{Deserialize, Serialize};

use crate::note::Note;

/// Ordered set of usable pitches, ascending. Index order is what the
/// melodic random walk moves over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scale {
    notes: Vec<Note>,
}

impl Scale {
    /// Build a scale from an ascending, non-empty note list.
    pub fn new(notes: Vec<Note>) -> Result<Self, String> {
        if notes.is_empty() {
            return Err("scale must be non-empty".to_string());
        }
        if notes.windows(2).any(|w| w[0] >= w[1]) {
            return Err("scale notes must be strictly ascending".to_string());
        }
        Ok(Self { notes })
    }

    /// Parse from pitch tokens ("C4" etc.), preserving order.
    pub fn parse(tokens: &[&str]) -> Result<Self, String> {
        let notes = tokens
            .iter()
            .map(|t| t.parse::<Note>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(notes)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Index of a note within the scale, if present.
    pub fn index_of(&self, note: Note) -> Option<usize> {
        self.notes.iter().position(|&n| n == note)
    }

    /// Note at `index` clamped into the valid range.
    pub fn at_clamped(&self, index: isize) -> Note {
        let max = self.notes.len() as isize - 1;
        let idx = index.clamp(0, max) as usize;
        self.notes[idx]
    }
}

/// Seed subset of the active scale used to anchor new phrases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern {
    notes: Vec<Note>,
}

impl Pattern {
    pub fn new(notes: Vec<Note>) -> Result<Self, String> {
        if notes.is_empty() {
            return Err("pattern must be non-empty".to_string());
        }
        Ok(Self { notes })
    }

    pub fn parse(tokens: &[&str]) -> Result<Self, String> {
        let notes = tokens
            .iter()
            .map(|t| t.parse::<Note>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(notes)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// True when every pattern note appears in `scale`. Patterns that drift
    /// out of the scale are tolerated at runtime (the generator skips those
    /// cycles), but boundary callers should validate with this first.
    pub fn is_subset_of(&self, scale: &Scale) -> bool {
        self.notes.iter().all(|&n| scale.index_of(n).is_some())
    }
}

/// One generated melodic fragment, 3..=7 notes drawn from the active scale.
pub type Phrase = Vec<Note>;
