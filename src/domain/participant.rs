use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The role a participant plays in a training flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantType {
    Student,
    Instructor,
    Aircraft,
}

impl ParticipantType {
    /// Upper-case wire name, e.g. `"STUDENT"`.
    pub fn name(&self) -> &'static str {
        match self {
            ParticipantType::Student => "STUDENT",
            ParticipantType::Instructor => "INSTRUCTOR",
            ParticipantType::Aircraft => "AIRCRAFT",
        }
    }
}

impl fmt::Display for ParticipantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown participant type or status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseEnumError {
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value: {}", self.value)
    }
}

impl std::error::Error for ParseEnumError {}

impl FromStr for ParticipantType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STUDENT" => Ok(ParticipantType::Student),
            "INSTRUCTOR" => Ok(ParticipantType::Instructor),
            "AIRCRAFT" => Ok(ParticipantType::Aircraft),
            _ => Err(ParseEnumError {
                value: s.to_string(),
            }),
        }
    }
}

/// A participant ID paired with its type: student, instructor, or aircraft.
///
/// Equality and hashing are by value, so `Participant` works directly as a
/// set member and map key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub participant_type: ParticipantType,
}

impl Participant {
    pub fn new(id: impl Into<String>, participant_type: ParticipantType) -> Self {
        Participant {
            id: id.into(),
            participant_type,
        }
    }
}

/// Current bookability of a participant within one timeslot.
///
/// "Absent" (no state recorded yet) is represented as `Option::None` at
/// the aggregate layer rather than as a variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityStatus {
    Available,
    Unavailable,
    Booked,
}

impl AvailabilityStatus {
    /// Lower-case wire value, e.g. `"available"`.
    pub fn value(&self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Unavailable => "unavailable",
            AvailabilityStatus::Booked => "booked",
        }
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for AvailabilityStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(AvailabilityStatus::Available),
            "unavailable" => Ok(AvailabilityStatus::Unavailable),
            "booked" => Ok(AvailabilityStatus::Booked),
            _ => Err(ParseEnumError {
                value: s.to_string(),
            }),
        }
    }
}
