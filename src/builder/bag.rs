use crate::object::TimedObject;
use crate::settings::ObjectsBuildingSettings;

/// A single-structural-unit accumulator within one build pass.
///
/// A bag is created by a builder on the first object no open bag accepts,
/// mutated by every subsequent matching object, and drained once the pass
/// is over: a completed bag yields its reconstructed objects, an incomplete
/// one yields its raw remainder for the next priority level.
pub trait ObjectsBag: Default {
    /// Whether the bag holds a complete structural unit.
    fn is_completed(&self) -> bool;

    /// Whether the bag may still accept input.
    ///
    /// For most bags this is simply the negation of `is_completed`; the
    /// chords bag stays open for further notes inside its tolerance window
    /// even though the notes admitted so far already form a complete chord.
    fn accepts_more(&self) -> bool {
        !self.is_completed()
    }

    /// Whether any object at or after `tick` could still be accepted.
    ///
    /// The builder feeds objects in tick order, so a bag whose acceptance
    /// window lies entirely in the past can be retired from the open set
    /// instead of being offered every later object.
    fn accepts_more_at(&self, _tick: u64, _settings: &ObjectsBuildingSettings) -> bool {
        self.accepts_more()
    }

    /// Try to consume one object.
    ///
    /// Returns `false` on a content mismatch without taking ownership;
    /// the caller then offers the object to another bag or opens a new one.
    fn try_add(&mut self, object: &TimedObject, settings: &ObjectsBuildingSettings) -> bool;

    /// Reconstructed objects of a completed bag.
    fn built_objects(&self) -> Vec<TimedObject>;

    /// Remainder of an incomplete bag, re-submitted to the next pipeline stage.
    fn raw_objects(&self) -> Vec<TimedObject>;
}
