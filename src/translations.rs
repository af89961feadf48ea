//! Translation strings and unit formatting.
//!
//! The host owns the string tables; the core only looks up the keys it
//! recognizes. A missing key is reported as `None` so callers can hold
//! back a step instead of showing a raw key.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};

/// Translation keys the heading resolver reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationKey {
    Walk,
    Drive,
    Bike,
    Park,
    At,
    TakeStaircaseToLevel,
    TakeLadderToLevel,
    TakeEscalatorToLevel,
    TakeWheelchairRampToLevel,
    TakeWheelchairLiftToLevel,
    TakeElevatorToLevel,
    Exit,
    Enter,
    Building,
    Venue,
    RideTheBus,
    Stops,
}

impl TranslationKey {
    pub fn as_str(self) -> &'static str {
        match self {
            TranslationKey::Walk => "walk",
            TranslationKey::Drive => "drive",
            TranslationKey::Bike => "bike",
            TranslationKey::Park => "park",
            TranslationKey::At => "at",
            TranslationKey::TakeStaircaseToLevel => "takeStaircaseToLevel",
            TranslationKey::TakeLadderToLevel => "takeLadderToLevel",
            TranslationKey::TakeEscalatorToLevel => "takeEscalatorToLevel",
            TranslationKey::TakeWheelchairRampToLevel => "takeWheelchairRampToLevel",
            TranslationKey::TakeWheelchairLiftToLevel => "takeWheelchairLiftToLevel",
            TranslationKey::TakeElevatorToLevel => "takeElevatorToLevel",
            TranslationKey::Exit => "exit",
            TranslationKey::Enter => "enter",
            TranslationKey::Building => "building",
            TranslationKey::Venue => "venue",
            TranslationKey::RideTheBus => "rideTheBus",
            TranslationKey::Stops => "stops",
        }
    }
}

/// Key to display string table supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationSet {
    entries: HashMap<String, String>,
}

impl TranslationSet {
    /// Parse a JSON object of key/string pairs.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| NavError::MalformedInput {
            what: "translations",
            source,
        })
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        TranslationSet {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, key: TranslationKey) -> Option<&str> {
        self.entries.get(key.as_str()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Unit system for distance text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

const FEET_PER_METER: f64 = 3.280_84;
const METERS_PER_MILE: f64 = 1_609.344;

/// Format a distance in meters for display.
pub fn format_distance(meters: f64, units: UnitSystem) -> String {
    match units {
        UnitSystem::Metric => {
            let rounded = (meters / 10.0).round() as i64 * 10;
            if rounded >= 1000 {
                format!("{:.1} km", meters / 1000.0)
            } else {
                format!("{rounded} m")
            }
        }
        UnitSystem::Imperial => {
            let miles = meters / METERS_PER_MILE;
            if miles >= 0.1 {
                format!("{miles:.1} mi")
            } else {
                let feet = meters * FEET_PER_METER;
                format!("{} ft", (feet / 10.0).round() as i64 * 10)
            }
        }
    }
}

/// Format a duration in seconds for display.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        return "< 1 min".to_string();
    }

    let minutes = (seconds / 60.0).round() as i64;
    if minutes >= 60 {
        format!("{} h {} min", minutes / 60, minutes % 60)
    } else {
        format!("{minutes} min")
    }
}
