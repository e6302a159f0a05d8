use serde::{Deserialize, Serialize};

/// A single decoded MIDI-like event with an absolute tick position.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// The tick at which the event occurs.
    pub tick: u64,
    /// The kind of the event.
    pub kind: MidiEventKind,
}

impl TimedEvent {
    pub const fn new(tick: u64, kind: MidiEventKind) -> Self {
        Self { tick, kind }
    }

    pub const fn new_note_on(tick: u64, channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(
            tick,
            MidiEventKind::NoteOn {
                channel,
                note,
                velocity,
            },
        )
    }

    pub const fn new_note_off(tick: u64, channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(
            tick,
            MidiEventKind::NoteOff {
                channel,
                note,
                velocity,
            },
        )
    }

    pub const fn note_id(&self) -> Option<NoteId> {
        self.kind.note_id()
    }
}

/// Kinds of events flowing through the builder pipeline.
///
/// Only `NoteOn` and `NoteOff` participate in structural pairing;
/// every other kind is opaque to the builders and passed through.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MidiEventKind {
    NoteOn {
        channel: u8,
        note: u8,
        velocity: u8,
    },
    NoteOff {
        channel: u8,
        note: u8,
        velocity: u8,
    },
    TempoChange {
        bpm: u32,
    },
    Controller {
        channel: u8,
        controller: u8,
        value: u8,
    },
    PitchBend {
        channel: u8,
        value: u16,
    },
    Text(String),
    Marker(String),
}

impl MidiEventKind {
    pub const fn is_note_on(&self) -> bool {
        matches!(self, Self::NoteOn { .. })
    }

    pub const fn is_note_off(&self) -> bool {
        matches!(self, Self::NoteOff { .. })
    }

    /// Pairing identity for note events, `None` for everything else.
    pub const fn note_id(&self) -> Option<NoteId> {
        match self {
            Self::NoteOn { channel, note, .. } | Self::NoteOff { channel, note, .. } => {
                Some(NoteId {
                    channel: *channel,
                    note: *note,
                })
            }
            _ => None,
        }
    }

    /// Channel of channel-bound events, `None` for meta events.
    pub const fn channel(&self) -> Option<u8> {
        match self {
            Self::NoteOn { channel, .. }
            | Self::NoteOff { channel, .. }
            | Self::Controller { channel, .. }
            | Self::PitchBend { channel, .. } => Some(*channel),
            Self::TempoChange { .. } | Self::Text(_) | Self::Marker(_) => None,
        }
    }
}

/// Identity used to pair a note-on with its note-off.
///
/// Two note events correspond iff their identities are equal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct NoteId {
    pub channel: u8,
    pub note: u8,
}
