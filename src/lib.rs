//! midi-objects - reconstruction of musical structures from flat MIDI event streams
//!
//! This library provides:
//! - Pairing of note-on/note-off events into [`Note`]s
//! - Time-tolerant grouping of notes into [`Chord`]s
//! - Synthesis of [`Rest`]s filling the silence between lengthed objects
//! - Verbatim pass-through of everything that cannot be structurally matched
//!
//! # Example
//!
//! ```
//! use midi_objects::{build_objects, ObjectsBuildingSettings, TimedEvent, TimedObject};
//!
//! let events = vec![
//!     TimedObject::Event(TimedEvent::new_note_on(10, 0, 60, 100)),
//!     TimedObject::Event(TimedEvent::new_note_off(40, 0, 60, 0)),
//! ];
//! let settings = ObjectsBuildingSettings {
//!     build_notes: true,
//!     build_timed_events: true,
//!     ..Default::default()
//! };
//! let objects = build_objects(events, &settings);
//! assert!(matches!(&objects[0], TimedObject::Note(n) if n.length == 30));
//! ```

pub mod builder;
pub mod error;
pub mod object;
pub mod settings;

// Re-export main types for convenience
pub use builder::{object_builder::build_objects, rest_builder::build_rests};
pub use error::ObjectsError;
pub use object::{
    midi_event::{MidiEventKind, NoteId, TimedEvent},
    Chord, Note, Rest, TimedObject, DEFAULT_VELOCITY,
};
pub use settings::{
    ChordBuilderSettings, ObjectsBuildingSettings, RestBuildingSettings, RestSeparationPolicy,
};
