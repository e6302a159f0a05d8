use crate::builder::bag::ObjectsBag;
use crate::builder::chords_bag::ChordsBag;
use crate::builder::notes_bag::NotesBag;
use crate::builder::rest_builder::build_rests;
use crate::builder::timed_events_bag::TimedEventsBag;
use crate::object::TimedObject;
use crate::settings::ObjectsBuildingSettings;

/// The object kinds the pipeline can reconstruct, in priority order.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum BuilderKind {
    Chords,
    Notes,
    TimedEvents,
}

/// Reconstruct higher-level objects from a flat stream of timed objects.
///
/// The input does not need to be pre-sorted. The output is totally ordered
/// by tick, and its relative order for equal ticks is deterministic for
/// identical input. Every input event either becomes part of a reconstructed
/// object or is passed through verbatim.
pub fn build_objects<I: IntoIterator<Item = TimedObject>>(
    timed_objects: I,
    settings: &ObjectsBuildingSettings,
) -> Vec<TimedObject> {
    let mut input: Vec<TimedObject> = timed_objects.into_iter().collect();
    input.sort_by_key(TimedObject::tick);

    let builder_kinds = enabled_builder_kinds(settings);
    log::debug!(
        "building objects from {} input objects with builders {builder_kinds:?}",
        input.len()
    );
    let mut result = build_at_level(input, &builder_kinds, 0, settings);

    if settings.build_rests {
        let rests = build_rests(&result, &settings.rest_building);
        log::debug!("rest overlay produced {} rests", rests.len());
        result.extend(rests.into_iter().map(TimedObject::Rest));
        result.sort_by_key(TimedObject::tick);
    }

    result
}

fn enabled_builder_kinds(settings: &ObjectsBuildingSettings) -> Vec<BuilderKind> {
    let mut kinds = Vec::new();
    if settings.build_chords {
        kinds.push(BuilderKind::Chords);
    }
    if settings.build_notes {
        kinds.push(BuilderKind::Notes);
    }
    if settings.build_timed_events {
        kinds.push(BuilderKind::TimedEvents);
    }
    kinds
}

/// One priority pass plus the recursive re-processing of its remainder.
///
/// The level index strictly increases on every recursive call and is bounded
/// by the number of enabled builders, so termination is structural. Objects
/// left over past the last level are unrecoverable structural fragments and
/// are emitted unchanged.
fn build_at_level(
    objects: Vec<TimedObject>,
    builder_kinds: &[BuilderKind],
    level: usize,
    settings: &ObjectsBuildingSettings,
) -> Vec<TimedObject> {
    let Some(kind) = builder_kinds.get(level) else {
        return objects;
    };

    let (mut built, mut remainder) = match kind {
        BuilderKind::Chords => run_pass::<ChordsBag>(&objects, settings),
        BuilderKind::Notes => run_pass::<NotesBag>(&objects, settings),
        BuilderKind::TimedEvents => run_pass::<TimedEventsBag>(&objects, settings),
    };
    log::debug!(
        "priority level {level} ({kind:?}): {} objects built, {} re-processed",
        built.len(),
        remainder.len()
    );

    remainder.sort_by_key(TimedObject::tick);
    built.extend(build_at_level(remainder, builder_kinds, level + 1, settings));
    built.sort_by_key(TimedObject::tick);
    built
}

/// Run one builder over the whole input.
///
/// Returns the objects of every completed bag (in bag-creation order) and
/// the remainder: raw objects of incomplete bags plus the input objects no
/// bag accepted.
fn run_pass<B: ObjectsBag>(
    objects: &[TimedObject],
    settings: &ObjectsBuildingSettings,
) -> (Vec<TimedObject>, Vec<TimedObject>) {
    let mut builder = SequentialObjectsBuilder::<B>::default();
    let mut rejected = Vec::new();
    for object in objects {
        if !builder.try_add_object(object, settings) {
            rejected.push(object.clone());
        }
    }
    let (built, mut remainder) = builder.into_results();
    remainder.extend(rejected);
    (built, remainder)
}

/// Owns the bags of one object kind across one left-to-right pass.
struct SequentialObjectsBuilder<B> {
    /// Every bag opened during the pass, in creation order.
    bags: Vec<B>,
    /// Indices into `bags` of the bags still accepting input.
    open_bags: Vec<usize>,
}

impl<B> Default for SequentialObjectsBuilder<B> {
    fn default() -> Self {
        Self {
            bags: Vec::new(),
            open_bags: Vec::new(),
        }
    }
}

impl<B: ObjectsBag> SequentialObjectsBuilder<B> {
    /// Route one object to an existing open bag (first match wins) or open
    /// a new bag for it.
    fn try_add_object(&mut self, object: &TimedObject, settings: &ObjectsBuildingSettings) -> bool {
        let tick = object.tick();
        let bags = &self.bags;
        self.open_bags
            .retain(|&bag_index| bags[bag_index].accepts_more_at(tick, settings));

        for (position, &bag_index) in self.open_bags.iter().enumerate() {
            if self.bags[bag_index].try_add(object, settings) {
                if !self.bags[bag_index].accepts_more() {
                    self.open_bags.remove(position);
                }
                return true;
            }
        }

        let mut bag = B::default();
        if !bag.try_add(object, settings) {
            return false;
        }
        let bag_index = self.bags.len();
        if bag.accepts_more() {
            self.open_bags.push(bag_index);
        }
        self.bags.push(bag);
        true
    }

    /// Drain the pass: built objects of completed bags and the raw remainder
    /// of incomplete ones, both in bag-creation order.
    fn into_results(self) -> (Vec<TimedObject>, Vec<TimedObject>) {
        let mut built = Vec::new();
        let mut remainder = Vec::new();
        for bag in self.bags {
            if bag.is_completed() {
                built.extend(bag.built_objects());
            } else {
                remainder.extend(bag.raw_objects());
            }
        }
        (built, remainder)
    }
}
