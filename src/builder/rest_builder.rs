use std::collections::BTreeMap;

use crate::object::{Rest, TimedObject};
use crate::settings::{RestBuildingSettings, RestSeparationPolicy};

/// Separation-bucket key: (channel, note number), absent fields per policy.
type BucketKey = (Option<u8>, Option<u8>);

/// Synthesize rests filling the silence between reconstructed lengthed
/// objects (notes and chords; raw events and rests are ignored).
///
/// Objects are grouped into buckets per the separation policy. Within each
/// bucket the intervals are walked in start order against a running maximum
/// end tick, so overlapping or touching objects produce no rest and an
/// object fully covered by an earlier, longer one never reopens a gap. A
/// bucket starting after tick 0 gets a leading rest from 0.
pub fn build_rests(objects: &[TimedObject], settings: &RestBuildingSettings) -> Vec<Rest> {
    let policy = settings.rest_separation_policy;
    let mut buckets: BTreeMap<BucketKey, Vec<(u64, u64)>> = BTreeMap::new();
    for object in objects {
        for (key, start, end) in object_intervals(object, policy) {
            buckets.entry(key).or_default().push((start, end));
        }
    }

    let mut rests = Vec::new();
    for ((channel, note), mut intervals) in buckets {
        intervals.sort_by_key(|&(start, _)| start);
        let mut max_end = 0;
        for (start, end) in intervals {
            if start > max_end {
                rests.push(Rest::new(max_end, start - max_end, channel, note));
            }
            max_end = max_end.max(end);
        }
    }
    rests.sort_by_key(|rest| rest.tick);
    rests
}

/// The silence-relevant intervals of one object under the given policy.
///
/// A chord contributes one interval per contained note when the policy keys
/// on note numbers, otherwise its whole span under its single channel.
fn object_intervals(object: &TimedObject, policy: RestSeparationPolicy) -> Vec<(BucketKey, u64, u64)> {
    match object {
        TimedObject::Note(note) => {
            vec![(
                bucket_key(policy, note.channel, note.note),
                note.tick,
                note.end_tick(),
            )]
        }
        TimedObject::Chord(chord) => match policy {
            RestSeparationPolicy::NoSeparation | RestSeparationPolicy::SeparateByChannel => chord
                .channel()
                .map(|channel| {
                    // note number is not part of the key under these policies
                    (bucket_key(policy, channel, 0), chord.tick(), chord.end_tick())
                })
                .into_iter()
                .collect(),
            RestSeparationPolicy::SeparateByNoteNumber
            | RestSeparationPolicy::SeparateByChannelAndNoteNumber => chord
                .notes
                .iter()
                .map(|note| {
                    (
                        bucket_key(policy, note.channel, note.note),
                        note.tick,
                        note.end_tick(),
                    )
                })
                .collect(),
        },
        TimedObject::Event(_) | TimedObject::Rest(_) => Vec::new(),
    }
}

const fn bucket_key(policy: RestSeparationPolicy, channel: u8, note: u8) -> BucketKey {
    match policy {
        RestSeparationPolicy::NoSeparation => (None, None),
        RestSeparationPolicy::SeparateByChannel => (Some(channel), None),
        RestSeparationPolicy::SeparateByNoteNumber => (None, Some(note)),
        RestSeparationPolicy::SeparateByChannelAndNoteNumber => (Some(channel), Some(note)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Chord, Note};

    fn note(channel: u8, note_number: u8, tick: u64, length: u64) -> TimedObject {
        TimedObject::Note(Note::new(channel, note_number, tick, length))
    }

    fn rests_for(policy: RestSeparationPolicy, objects: &[TimedObject]) -> Vec<Rest> {
        let settings = RestBuildingSettings {
            rest_separation_policy: policy,
        };
        let mut rests = build_rests(objects, &settings);
        rests.sort_by_key(|r| (r.tick, r.length, r.channel, r.note));
        rests
    }

    #[test]
    fn test_no_separation_with_overlaps() {
        let objects = vec![
            note(2, 50, 10, 100),
            note(10, 50, 30, 100),
            note(2, 100, 300, 50),
            note(10, 50, 1000, 500),
            note(2, 100, 1200, 150),
            note(10, 50, 1300, 1000),
            note(2, 100, 10000, 1000),
            note(10, 50, 100000, 1000),
            note(2, 100, 100100, 10),
            note(10, 50, 110000, 10),
        ];
        let rests = rests_for(RestSeparationPolicy::NoSeparation, &objects);
        assert_eq!(
            rests,
            vec![
                Rest::new(0, 10, None, None),
                Rest::new(130, 170, None, None),
                Rest::new(350, 650, None, None),
                Rest::new(2300, 7700, None, None),
                Rest::new(11000, 89000, None, None),
                Rest::new(101000, 9000, None, None),
            ]
        );
    }

    #[test]
    fn test_separate_by_channel() {
        let objects = vec![
            note(10, 50, 10, 100),
            note(2, 50, 30, 100),
            note(10, 100, 300, 50),
            note(2, 50, 1000, 500),
            note(10, 100, 1200, 150),
            note(2, 50, 1300, 1000),
        ];
        let rests = rests_for(RestSeparationPolicy::SeparateByChannel, &objects);
        assert_eq!(
            rests,
            vec![
                Rest::new(0, 10, Some(10), None),
                Rest::new(0, 30, Some(2), None),
                Rest::new(110, 190, Some(10), None),
                Rest::new(130, 870, Some(2), None),
                Rest::new(350, 850, Some(10), None),
            ]
        );
    }

    #[test]
    fn test_separate_by_note_number() {
        let objects = vec![
            note(5, 10, 0, 100),
            note(10, 100, 30, 100),
            note(5, 10, 300, 50),
            note(10, 100, 1000, 500),
        ];
        let rests = rests_for(RestSeparationPolicy::SeparateByNoteNumber, &objects);
        assert_eq!(
            rests,
            vec![
                Rest::new(0, 30, None, Some(100)),
                Rest::new(100, 200, None, Some(10)),
                Rest::new(130, 870, None, Some(100)),
            ]
        );
    }

    #[test]
    fn test_separate_by_channel_and_note_number() {
        let objects = vec![
            note(10, 10, 10, 100),
            note(10, 100, 30, 100),
            note(2, 10, 300, 50),
            note(2, 100, 1000, 500),
            note(10, 10, 1200, 150),
            note(10, 100, 1300, 1000),
        ];
        let rests = rests_for(
            RestSeparationPolicy::SeparateByChannelAndNoteNumber,
            &objects,
        );
        assert_eq!(
            rests,
            vec![
                Rest::new(0, 10, Some(10), Some(10)),
                Rest::new(0, 30, Some(10), Some(100)),
                Rest::new(0, 300, Some(2), Some(10)),
                Rest::new(0, 1000, Some(2), Some(100)),
                Rest::new(110, 1090, Some(10), Some(10)),
                Rest::new(130, 1170, Some(10), Some(100)),
            ]
        );
    }

    #[test]
    fn test_touching_objects_produce_no_rest() {
        let objects = vec![note(0, 60, 0, 100), note(0, 62, 100, 50)];
        let rests = rests_for(RestSeparationPolicy::NoSeparation, &objects);
        assert!(rests.is_empty());
    }

    #[test]
    fn test_covered_object_does_not_reopen_gap() {
        // the second note ends before the first one: the gap starts at the
        // first note's end
        let objects = vec![note(0, 60, 0, 1000), note(0, 62, 100, 10), note(0, 64, 1500, 10)];
        let rests = rests_for(RestSeparationPolicy::NoSeparation, &objects);
        assert_eq!(rests, vec![Rest::new(1000, 500, None, None)]);
    }

    #[test]
    fn test_chords_use_whole_span_without_note_separation() {
        let chord = Chord::new(vec![Note::new(3, 60, 100, 50), Note::new(3, 64, 105, 60)]);
        let objects = vec![TimedObject::Chord(chord)];
        let rests = rests_for(RestSeparationPolicy::SeparateByChannel, &objects);
        assert_eq!(rests, vec![Rest::new(0, 100, Some(3), None)]);
    }

    #[test]
    fn test_chords_flatten_per_note_under_note_separation() {
        let chord = Chord::new(vec![Note::new(3, 60, 100, 50), Note::new(3, 64, 105, 60)]);
        let objects = vec![TimedObject::Chord(chord)];
        let rests = rests_for(RestSeparationPolicy::SeparateByChannelAndNoteNumber, &objects);
        assert_eq!(
            rests,
            vec![
                Rest::new(0, 100, Some(3), Some(60)),
                Rest::new(0, 105, Some(3), Some(64)),
            ]
        );
    }

    #[test]
    fn test_raw_events_and_rests_are_ignored() {
        use crate::object::midi_event::TimedEvent;
        let objects = vec![
            TimedObject::Event(TimedEvent::new_note_on(500, 0, 60, 100)),
            TimedObject::Rest(Rest::new(200, 100, None, None)),
            note(0, 60, 1000, 10),
        ];
        let rests = rests_for(RestSeparationPolicy::NoSeparation, &objects);
        assert_eq!(rests, vec![Rest::new(0, 1000, None, None)]);
    }
}
