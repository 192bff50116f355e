use geom::Duration;
use serde::{Deserialize, Serialize};

use schedule::{Direction, Scheme, StationID};

/// Tuning for how states are projected and laid out. Every field has a default, so a partial
/// JSON file is fine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Overrides the scheme declared by the timetable
    pub scheme: Option<Scheme>,
    /// Where trains enter service from the depot. Defaults to the station with the smallest
    /// position.
    pub entry_terminus: Option<StationID>,
    /// The direction trains head when leaving the entry terminus
    pub outward_direction: Direction,
    /// Used for insertions that don't say how long they take
    pub default_insertion_lead_seconds: f64,
    /// If unset, a turnaround takes the whole scheduled gap between the two events
    pub turnaround_seconds: Option<f64>,
    /// Perpendicular distance of each direction's track from the line's center
    pub lane_offset: f64,
    /// How far past a terminus the U-turn arc is centered
    pub turnaround_arc_offset: f64,
    /// Perpendicular offset given to trains sharing a terminus while turning around
    pub stagger_offset: f64,
    /// How far past the entry terminus inserted trains appear
    pub staging_distance: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            scheme: None,
            entry_terminus: None,
            outward_direction: Direction::Southbound,
            default_insertion_lead_seconds: 60.0,
            turnaround_seconds: None,
            lane_offset: 10.0,
            turnaround_arc_offset: 25.0,
            stagger_offset: 6.0,
            staging_distance: 60.0,
        }
    }
}

impl ProjectionConfig {
    pub fn default_insertion_lead(&self) -> Duration {
        Duration::seconds(self.default_insertion_lead_seconds.max(0.0))
    }

    pub fn turnaround_duration(&self) -> Option<Duration> {
        self.turnaround_seconds
            .filter(|x| *x > 0.0)
            .map(Duration::seconds)
    }

    pub fn lane_offset(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Northbound => -self.lane_offset,
            Direction::Southbound => self.lane_offset,
        }
    }
}
