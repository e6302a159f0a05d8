use crate::builder::bag::ObjectsBag;
use crate::builder::notes_bag::NotesBag;
use crate::object::{Chord, TimedObject};
use crate::settings::ObjectsBuildingSettings;

/// Groups notes whose start ticks fall within the configured tolerance
/// window of the first note admitted to the chord.
///
/// The window is anchored at the first note's start and never extended by
/// later notes. Notes on a different channel than the first never join,
/// whatever their tick.
#[derive(Default)]
pub struct ChordsBag {
    /// Finished chords admitted directly (pre-built passthrough).
    objects: Vec<Chord>,
    /// One internal bag per candidate note of the chord under construction.
    note_bags: Vec<NotesBag>,
    /// Unset until the first note is admitted.
    chord_start: Option<u64>,
    chord_channel: Option<u8>,
}

impl ChordsBag {
    fn try_add_to_new_note_bag(
        &mut self,
        object: &TimedObject,
        settings: &ObjectsBuildingSettings,
    ) -> bool {
        let mut bag = NotesBag::default();
        if !bag.try_add(object, settings) {
            return false;
        }

        let tick = bag.tick();
        let channel = object_channel(object);
        match self.chord_start {
            None => {
                // first note anchors the window
                self.chord_start = Some(tick);
                self.chord_channel = channel;
                self.note_bags.push(bag);
                true
            }
            Some(start) => {
                let in_window = match tick.checked_sub(start) {
                    Some(distance) => distance <= settings.chord_builder.notes_tolerance,
                    None => true,
                };
                if !in_window || channel != self.chord_channel {
                    // the chord has closed for new entrants
                    return false;
                }
                self.note_bags.push(bag);
                true
            }
        }
    }
}

/// Channel of the object a fresh internal note bag would be opened for.
const fn object_channel(object: &TimedObject) -> Option<u8> {
    match object {
        TimedObject::Event(event) => event.kind.channel(),
        TimedObject::Note(note) => Some(note.channel),
        TimedObject::Chord(_) | TimedObject::Rest(_) => None,
    }
}

impl ObjectsBag for ChordsBag {
    fn is_completed(&self) -> bool {
        if self.note_bags.is_empty() {
            return !self.objects.is_empty();
        }
        self.note_bags.iter().all(ObjectsBag::is_completed)
    }

    fn accepts_more(&self) -> bool {
        // a directly-admitted finished chord closes the bag; a chord under
        // construction stays open for entrants inside the tolerance window
        // until the pass is over
        self.objects.is_empty()
    }

    fn accepts_more_at(&self, tick: u64, settings: &ObjectsBuildingSettings) -> bool {
        if !self.accepts_more() {
            return false;
        }
        let Some(start) = self.chord_start else {
            return true;
        };
        // past the window end nothing joins as a new note; only a bag
        // still waiting on note-off events has use for later input
        tick <= start.saturating_add(settings.chord_builder.notes_tolerance)
            || !self.note_bags.iter().all(ObjectsBag::is_completed)
    }

    fn try_add(&mut self, object: &TimedObject, settings: &ObjectsBuildingSettings) -> bool {
        if !self.accepts_more() {
            return false;
        }
        match object {
            TimedObject::Event(_) => {
                // delegate to an open internal bag first, insertion order
                if self
                    .note_bags
                    .iter_mut()
                    .any(|bag| bag.try_add(object, settings))
                {
                    return true;
                }
                self.try_add_to_new_note_bag(object, settings)
            }
            TimedObject::Note(_) => self.try_add_to_new_note_bag(object, settings),
            TimedObject::Chord(chord) => {
                // a chord under construction never absorbs a finished
                // chord, a fresh bag takes it instead
                if !self.note_bags.is_empty() {
                    return false;
                }
                self.objects.push(chord.clone());
                true
            }
            TimedObject::Rest(_) => false,
        }
    }

    fn built_objects(&self) -> Vec<TimedObject> {
        let mut result: Vec<TimedObject> =
            self.objects.iter().cloned().map(TimedObject::Chord).collect();
        if !self.note_bags.is_empty() {
            let notes = self
                .note_bags
                .iter()
                .flat_map(|bag| bag.notes().iter().cloned())
                .collect();
            result.push(TimedObject::Chord(Chord::new(notes)));
        }
        result
    }

    fn raw_objects(&self) -> Vec<TimedObject> {
        if self.is_completed() {
            return Vec::new();
        }
        // completed internal bags degrade to plain notes so the next
        // priority level can still place them
        let mut result = Vec::new();
        for bag in &self.note_bags {
            if bag.is_completed() {
                result.extend(bag.built_objects());
            } else {
                result.extend(bag.raw_objects());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::midi_event::TimedEvent;
    use crate::object::Note;

    fn settings_with_tolerance(notes_tolerance: u64) -> ObjectsBuildingSettings {
        ObjectsBuildingSettings {
            chord_builder: crate::settings::ChordBuilderSettings { notes_tolerance },
            ..Default::default()
        }
    }

    #[test]
    fn test_groups_notes_within_tolerance() {
        let settings = settings_with_tolerance(10);
        let mut bag = ChordsBag::default();
        assert!(bag.try_add(&TimedObject::Note(Note::new(0, 60, 0, 50)), &settings));
        assert!(bag.try_add(&TimedObject::Note(Note::new(0, 64, 10, 50)), &settings));
        assert!(bag.is_completed());

        let built = bag.built_objects();
        assert_eq!(built.len(), 1);
        let TimedObject::Chord(chord) = &built[0] else {
            panic!("expected a chord, got {:?}", built[0]);
        };
        assert_eq!(chord.notes.len(), 2);
        assert_eq!(chord.tick(), 0);
        assert_eq!(chord.end_tick(), 60);
    }

    #[test]
    fn test_rejects_note_past_tolerance() {
        let settings = settings_with_tolerance(10);
        let mut bag = ChordsBag::default();
        assert!(bag.try_add(&TimedObject::Note(Note::new(0, 60, 0, 50)), &settings));
        assert!(!bag.try_add(&TimedObject::Note(Note::new(0, 64, 11, 50)), &settings));
        // window is anchored at the first note, not the latest
        assert!(bag.try_add(&TimedObject::Note(Note::new(0, 67, 10, 50)), &settings));
        assert!(!bag.try_add(&TimedObject::Note(Note::new(0, 69, 20, 50)), &settings));
    }

    #[test]
    fn test_rejects_note_on_other_channel() {
        let settings = settings_with_tolerance(10);
        let mut bag = ChordsBag::default();
        assert!(bag.try_add(&TimedObject::Note(Note::new(0, 60, 0, 50)), &settings));
        assert!(!bag.try_add(&TimedObject::Note(Note::new(1, 64, 0, 50)), &settings));
    }

    #[test]
    fn test_builds_chord_from_events() {
        let settings = settings_with_tolerance(5);
        let mut bag = ChordsBag::default();
        let events = [
            TimedEvent::new_note_on(0, 2, 60, 95),
            TimedEvent::new_note_on(3, 2, 64, 95),
            TimedEvent::new_note_off(40, 2, 60, 0),
            TimedEvent::new_note_off(45, 2, 64, 0),
        ];
        for event in events {
            assert!(bag.try_add(&TimedObject::Event(event), &settings));
        }
        assert!(bag.is_completed());

        let built = bag.built_objects();
        let TimedObject::Chord(chord) = &built[0] else {
            panic!("expected a chord, got {:?}", built[0]);
        };
        assert_eq!(chord.notes.len(), 2);
        assert_eq!(chord.length(), 45);
        assert!(bag.raw_objects().is_empty());
    }

    #[test]
    fn test_incomplete_chord_degrades_to_notes_and_events() {
        let settings = settings_with_tolerance(5);
        let mut bag = ChordsBag::default();
        let events = [
            TimedEvent::new_note_on(0, 2, 60, 95),
            TimedEvent::new_note_on(3, 2, 64, 95),
            TimedEvent::new_note_off(40, 2, 60, 0),
        ];
        for event in &events {
            assert!(bag.try_add(&TimedObject::Event(event.clone()), &settings));
        }
        assert!(!bag.is_completed());

        let raw = bag.raw_objects();
        assert_eq!(raw.len(), 2);
        // the paired half survives as a note
        assert!(matches!(&raw[0], TimedObject::Note(n) if n.note == 60 && n.length == 40));
        // the unpaired note-on falls through as a raw event
        assert_eq!(raw[1], TimedObject::Event(events[1].clone()));
    }

    #[test]
    fn test_chord_rejected_while_notes_under_construction() {
        let settings = settings_with_tolerance(5);
        let mut bag = ChordsBag::default();
        assert!(bag.try_add(
            &TimedObject::Event(TimedEvent::new_note_on(0, 2, 60, 95)),
            &settings
        ));

        let chord = TimedObject::Chord(Chord::new(vec![Note::new(2, 64, 1, 10)]));
        assert!(!bag.try_add(&chord, &settings));

        // the dangling note-on is the whole remainder, nothing else was
        // absorbed
        assert!(!bag.is_completed());
        assert_eq!(bag.raw_objects().len(), 1);
    }

    #[test]
    fn test_retired_once_window_closed_and_notes_paired() {
        let settings = settings_with_tolerance(10);
        let mut bag = ChordsBag::default();
        assert!(bag.try_add(&TimedObject::Note(Note::new(0, 60, 0, 50)), &settings));

        // inside the window the bag stays open
        assert!(bag.accepts_more_at(10, &settings));
        // past it, a bag with only paired notes has no use for later input
        assert!(!bag.accepts_more_at(11, &settings));

        let mut waiting = ChordsBag::default();
        assert!(waiting.try_add(
            &TimedObject::Event(TimedEvent::new_note_on(0, 0, 60, 95)),
            &settings
        ));
        // still waiting on the note-off, must not be retired
        assert!(waiting.accepts_more_at(11, &settings));
    }

    #[test]
    fn test_prebuilt_chord_passthrough() {
        let settings = settings_with_tolerance(0);
        let mut bag = ChordsBag::default();
        let chord = TimedObject::Chord(Chord::new(vec![Note::new(0, 60, 0, 10)]));
        assert!(bag.try_add(&chord, &settings));
        assert!(bag.is_completed());
        assert_eq!(bag.built_objects(), vec![chord]);
    }
}
