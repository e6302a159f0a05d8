pub mod bag;
pub mod chords_bag;
pub mod notes_bag;
pub mod object_builder;
pub mod rest_builder;
pub mod timed_events_bag;
