pub mod midi_event;

use serde::{Deserialize, Serialize};

use crate::object::midi_event::{MidiEventKind, NoteId, TimedEvent};

/// Default on-velocity for notes built without explicit velocity information.
pub const DEFAULT_VELOCITY: u8 = 100;

/// A note reconstructed from a note-on/note-off pair.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub channel: u8,
    pub note: u8,
    pub velocity: u8,
    pub off_velocity: u8,
    /// Tick of the note-on event.
    pub tick: u64,
    /// Distance in ticks between note-on and note-off.
    pub length: u64,
}

impl Note {
    pub const fn new(channel: u8, note: u8, tick: u64, length: u64) -> Self {
        Self {
            channel,
            note,
            velocity: DEFAULT_VELOCITY,
            off_velocity: 0,
            tick,
            length,
        }
    }

    pub const fn end_tick(&self) -> u64 {
        self.tick + self.length
    }

    pub const fn id(&self) -> NoteId {
        NoteId {
            channel: self.channel,
            note: self.note,
        }
    }

    /// Decompose back into the timed note-on/note-off pair the note was built from.
    pub fn to_events(&self) -> (TimedEvent, TimedEvent) {
        let on = TimedEvent::new_note_on(self.tick, self.channel, self.note, self.velocity);
        let off =
            TimedEvent::new_note_off(self.end_tick(), self.channel, self.note, self.off_velocity);
        (on, off)
    }

    /// Build a note from a matching note-on/note-off pair.
    ///
    /// Returns `None` if the events are not a matching pair or are not in
    /// chronological order.
    pub fn from_events(on: &TimedEvent, off: &TimedEvent) -> Option<Self> {
        let (channel, note, velocity) = match on.kind {
            MidiEventKind::NoteOn {
                channel,
                note,
                velocity,
            } => (channel, note, velocity),
            _ => return None,
        };
        let off_velocity = match off.kind {
            MidiEventKind::NoteOff {
                channel: off_channel,
                note: off_note,
                velocity,
            } if off_channel == channel && off_note == note => velocity,
            _ => return None,
        };
        let length = off.tick.checked_sub(on.tick)?;
        Some(Self {
            channel,
            note,
            velocity,
            off_velocity,
            tick: on.tick,
            length,
        })
    }
}

/// A set of notes whose starts lie within a tolerance window of each other.
///
/// All notes of a chord share one channel.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub notes: Vec<Note>,
}

impl Chord {
    pub const fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    /// Start of the earliest note, 0 for an empty chord.
    pub fn tick(&self) -> u64 {
        self.notes.iter().map(|n| n.tick).min().unwrap_or(0)
    }

    /// End of the latest note, 0 for an empty chord.
    pub fn end_tick(&self) -> u64 {
        self.notes.iter().map(Note::end_tick).max().unwrap_or(0)
    }

    pub fn length(&self) -> u64 {
        self.end_tick() - self.tick()
    }

    pub fn channel(&self) -> Option<u8> {
        self.notes.first().map(|n| n.channel)
    }
}

/// A synthesized silence interval between lengthed objects.
///
/// The channel and note tags reflect the separation bucket the rest was
/// computed for; fields absent from the bucket key are `None`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Rest {
    pub tick: u64,
    pub length: u64,
    pub channel: Option<u8>,
    pub note: Option<u8>,
}

impl Rest {
    pub const fn new(tick: u64, length: u64, channel: Option<u8>, note: Option<u8>) -> Self {
        Self {
            tick,
            length,
            channel,
            note,
        }
    }

    pub const fn end_tick(&self) -> u64 {
        self.tick + self.length
    }
}

/// Any unit flowing through the builder pipeline, raw or reconstructed.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum TimedObject {
    Event(TimedEvent),
    Note(Note),
    Chord(Chord),
    Rest(Rest),
}

impl TimedObject {
    /// Absolute start tick of the object.
    pub fn tick(&self) -> u64 {
        match self {
            Self::Event(event) => event.tick,
            Self::Note(note) => note.tick,
            Self::Chord(chord) => chord.tick(),
            Self::Rest(rest) => rest.tick,
        }
    }

    /// Duration in ticks, `None` for raw events.
    pub fn length(&self) -> Option<u64> {
        match self {
            Self::Event(_) => None,
            Self::Note(note) => Some(note.length),
            Self::Chord(chord) => Some(chord.length()),
            Self::Rest(rest) => Some(rest.length),
        }
    }

    pub const fn is_lengthed(&self) -> bool {
        !matches!(self, Self::Event(_))
    }
}
