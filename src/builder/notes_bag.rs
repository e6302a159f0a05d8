use crate::builder::bag::ObjectsBag;
use crate::object::midi_event::{NoteId, TimedEvent};
use crate::object::{Chord, Note, TimedObject};
use crate::settings::ObjectsBuildingSettings;

/// Pairs one note-on event with its corresponding note-off event.
///
/// An already-built `Note` (or the notes of a `Chord`) is admitted directly
/// while the bag is empty and completes it immediately.
#[derive(Default)]
pub struct NotesBag {
    /// Reconstructed notes (one from pairing, or pre-built passthrough).
    objects: Vec<Note>,
    note_on: Option<TimedEvent>,
    note_off: Option<TimedEvent>,
    note_id: Option<NoteId>,
}

impl NotesBag {
    /// Resolved start tick of the bag's content.
    ///
    /// Used by the chords bag to place the note inside the tolerance window.
    pub fn tick(&self) -> u64 {
        self.note_on
            .as_ref()
            .map(|on| on.tick)
            .or_else(|| self.objects.first().map(|note| note.tick))
            .unwrap_or(0)
    }

    pub fn notes(&self) -> &[Note] {
        &self.objects
    }

    fn is_empty(&self) -> bool {
        self.note_on.is_none() && self.note_off.is_none() && self.objects.is_empty()
    }

    fn try_add_event(&mut self, event: &TimedEvent) -> bool {
        if event.kind.is_note_on() {
            if self.note_on.is_some() {
                return false;
            }
            self.note_id = event.note_id();
            self.note_on = Some(event.clone());
            return true;
        }
        if event.kind.is_note_off() {
            if self.note_on.is_none() || self.note_off.is_some() {
                return false;
            }
            if event.note_id() != self.note_id {
                return false;
            }
            self.note_off = Some(event.clone());
            if let (Some(on), Some(off)) = (&self.note_on, &self.note_off) {
                if let Some(note) = Note::from_events(on, off) {
                    self.objects.push(note);
                }
            }
            return true;
        }
        false
    }

    fn try_add_note(&mut self, note: &Note) -> bool {
        // pre-built notes are only admitted into a pristine bag
        if !self.is_empty() {
            return false;
        }
        self.objects.push(note.clone());
        true
    }

    fn try_add_chord(&mut self, chord: &Chord) -> bool {
        // no rollback on partial acceptance, the caller observes the
        // outcome through is_completed/raw_objects
        let mut result = true;
        for note in &chord.notes {
            result &= self.try_add_note(note);
        }
        result
    }
}

impl ObjectsBag for NotesBag {
    fn is_completed(&self) -> bool {
        if self.note_on.is_none() && self.note_off.is_none() {
            return !self.objects.is_empty();
        }
        self.note_on.is_some() && self.note_off.is_some()
    }

    fn try_add(&mut self, object: &TimedObject, _settings: &ObjectsBuildingSettings) -> bool {
        if self.is_completed() {
            return false;
        }
        match object {
            TimedObject::Event(event) => self.try_add_event(event),
            TimedObject::Note(note) => self.try_add_note(note),
            TimedObject::Chord(chord) => self.try_add_chord(chord),
            TimedObject::Rest(_) => false,
        }
    }

    fn built_objects(&self) -> Vec<TimedObject> {
        self.objects.iter().cloned().map(TimedObject::Note).collect()
    }

    fn raw_objects(&self) -> Vec<TimedObject> {
        if self.note_on.is_some() && self.note_off.is_some() {
            return Vec::new();
        }
        [self.note_on.as_ref(), self.note_off.as_ref()]
            .into_iter()
            .flatten()
            .cloned()
            .map(TimedObject::Event)
            .collect()
    }
}
