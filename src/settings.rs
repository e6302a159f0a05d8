use std::io;

use serde::{Deserialize, Serialize};

use crate::ObjectsError;

/// Which object kinds to build and their tunable parameters.
///
/// The settings are read-only for the duration of one build.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectsBuildingSettings {
    pub build_timed_events: bool,
    pub build_notes: bool,
    pub build_chords: bool,
    pub build_rests: bool,
    pub chord_builder: ChordBuilderSettings,
    pub rest_building: RestBuildingSettings,
}

impl ObjectsBuildingSettings {
    /// Read settings from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ObjectsError> {
        serde_json::from_str(json)
            .map_err(|err| ObjectsError::ConfigError(format!("Could not read settings {err:}")))
    }

    /// Read settings from a JSON reader (e.g. a configuration file).
    pub fn from_json_reader(reader: impl io::Read) -> Result<Self, ObjectsError> {
        serde_json::from_reader(reader).map_err(|err| {
            if err.is_io() {
                ObjectsError::from(io::Error::from(err))
            } else {
                ObjectsError::ConfigError(format!("Could not read settings {err:}"))
            }
        })
    }

    pub fn to_json_string(&self) -> Result<String, ObjectsError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| ObjectsError::ConfigError(format!("Could not save settings {err:}")))
    }
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordBuilderSettings {
    /// Maximum distance in ticks from a chord's first note for another
    /// note to still join that chord.
    pub notes_tolerance: u64,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestBuildingSettings {
    pub rest_separation_policy: RestSeparationPolicy,
}

/// Grouping key used to compute independent rest timelines.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum RestSeparationPolicy {
    #[default]
    NoSeparation,
    SeparateByChannel,
    SeparateByNoteNumber,
    SeparateByChannelAndNoteNumber,
}
