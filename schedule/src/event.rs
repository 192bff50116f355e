use geom::{Duration, Time};
use serde::{Deserialize, Serialize};

use crate::{StationID, TrainID};

/// One train visiting one station.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub train_id: TrainID,
    pub station_id: StationID,
    pub direction: Direction,
    pub status: TrainStatus,
    pub arrival_time: Time,
    /// Never before `arrival_time`
    pub departure_time: Time,
    pub service_type: Option<ServiceType>,
    /// How long the train needs to reach this event's station from the depot. Only meaningful
    /// for insertions.
    pub travel_time: Option<Duration>,
}

impl ScheduleEvent {
    pub fn is_withdrawal(&self) -> bool {
        matches!(self.status, TrainStatus::Inactive | TrainStatus::Withdrawn)
    }

    /// The time span this event occupies. Departure and arrival are equal for pass-through
    /// events.
    pub fn interval(&self) -> (Time, Time) {
        (self.arrival_time, self.departure_time)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Northbound,
    Southbound,
}

impl Default for Direction {
    // Trains leave the depot end of the line heading south
    fn default() -> Self {
        Direction::Southbound
    }
}

impl Direction {
    pub fn parse(raw: &str) -> Option<Direction> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "NORTHBOUND" | "NB" | "N" | "NORTH" => Some(Direction::Northbound),
            "SOUTHBOUND" | "SB" | "S" | "SOUTH" => Some(Direction::Southbound),
            _ => None,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Northbound => Direction::Southbound,
            Direction::Southbound => Direction::Northbound,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Northbound => "NORTHBOUND",
            Direction::Southbound => "SOUTHBOUND",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Direction::Northbound => write!(f, "Northbound"),
            Direction::Southbound => write!(f, "Southbound"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainStatus {
    Active,
    Inactive,
    Withdrawn,
    Insertion,
}

impl Default for TrainStatus {
    fn default() -> Self {
        TrainStatus::Active
    }
}

impl TrainStatus {
    pub fn parse(raw: &str) -> Option<TrainStatus> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(TrainStatus::Active),
            "INACTIVE" => Some(TrainStatus::Inactive),
            "WITHDRAWN" => Some(TrainStatus::Withdrawn),
            "INSERTION" | "INSERTED" => Some(TrainStatus::Insertion),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrainStatus::Active => "ACTIVE",
            TrainStatus::Inactive => "INACTIVE",
            TrainStatus::Withdrawn => "WITHDRAWN",
            TrainStatus::Insertion => "INSERTION",
        }
    }
}

/// Skip-stop service class. Applies both to trains and to the stations they serve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    A,
    B,
    AB,
}

impl ServiceType {
    pub fn parse(raw: &str) -> Option<ServiceType> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Some(ServiceType::A),
            "B" => Some(ServiceType::B),
            "AB" | "A/B" | "A+B" => Some(ServiceType::AB),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::A => "A",
            ServiceType::B => "B",
            ServiceType::AB => "AB",
        }
    }

    /// Does a train of this class stop at a station tagged with `station`?
    pub fn stops_at(self, station: ServiceType) -> bool {
        match self {
            ServiceType::AB => true,
            ServiceType::A => matches!(station, ServiceType::A | ServiceType::AB),
            ServiceType::B => matches!(station, ServiceType::B | ServiceType::AB),
        }
    }
}

/// The operating pattern of a whole simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scheme {
    Regular,
    SkipStop,
}

impl Scheme {
    pub fn parse(raw: &str) -> Option<Scheme> {
        let normalized: String = raw
            .trim()
            .to_ascii_uppercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "REGULAR" => Some(Scheme::Regular),
            "SKIPSTOP" => Some(Scheme::SkipStop),
            _ => None,
        }
    }
}
