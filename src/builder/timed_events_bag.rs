use crate::builder::bag::ObjectsBag;
use crate::object::{Note, TimedObject};
use crate::settings::ObjectsBuildingSettings;

/// Terminal fallback bag: wraps whatever could not be structurally
/// reconstructed as raw pass-through.
///
/// Each bag holds exactly one accepted unit and is completed as soon as it
/// holds it. Decomposition is total, so this stage never has a raw
/// remainder; it is the base case of the pipeline recursion.
#[derive(Default)]
pub struct TimedEventsBag {
    objects: Vec<TimedObject>,
}

impl TimedEventsBag {
    fn add_note_events(&mut self, note: &Note) {
        let (on, off) = note.to_events();
        self.objects.push(TimedObject::Event(on));
        self.objects.push(TimedObject::Event(off));
    }
}

impl ObjectsBag for TimedEventsBag {
    fn is_completed(&self) -> bool {
        !self.objects.is_empty()
    }

    fn try_add(&mut self, object: &TimedObject, _settings: &ObjectsBuildingSettings) -> bool {
        if self.is_completed() {
            return false;
        }
        match object {
            TimedObject::Event(_) | TimedObject::Rest(_) => {
                self.objects.push(object.clone());
            }
            TimedObject::Note(note) => self.add_note_events(note),
            TimedObject::Chord(chord) => {
                for note in &chord.notes {
                    self.add_note_events(note);
                }
            }
        }
        true
    }

    fn built_objects(&self) -> Vec<TimedObject> {
        self.objects.clone()
    }

    fn raw_objects(&self) -> Vec<TimedObject> {
        Vec::new()
    }
}
