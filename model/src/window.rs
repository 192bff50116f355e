use std::collections::BTreeMap;

use geom::Time;
use serde::Serialize;

use schedule::{Schedule, ScheduleEvent, TrainID, TrainStatus};

use crate::{Line, ProjectionConfig};

/// When a train is out on the line. Outside of this, it's in the depot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OperationalWindow {
    pub first_event_time: Time,
    pub last_event_time: Time,
    /// True if `first_event_time` was pulled earlier to cover the trip from the depot
    pub has_insertion_ramp: bool,
}

impl OperationalWindow {
    /// Both ends are inclusive.
    pub fn contains(&self, time: Time) -> bool {
        time >= self.first_event_time && time <= self.last_event_time
    }
}

/// None for trains without any events.
pub fn calculate(
    events: &[ScheduleEvent],
    line: &Line,
    config: &ProjectionConfig,
) -> Option<OperationalWindow> {
    let first = events.first()?;
    let last = events.last()?;

    let mut first_event_time = first.arrival_time;
    let mut has_insertion_ramp = false;
    if first.status == TrainStatus::Insertion
        && first.station_id == line.entry_terminus()
        && first.direction == line.outward_direction()
    {
        let lead = first
            .travel_time
            .unwrap_or_else(|| config.default_insertion_lead());
        first_event_time = first_event_time.clamped_sub(lead);
        has_insertion_ramp = first_event_time < first.arrival_time;
    }

    Some(OperationalWindow {
        first_event_time,
        last_event_time: last.arrival_time.max(last.departure_time),
        has_insertion_ramp,
    })
}

pub fn calculate_all(
    schedule: &Schedule,
    line: &Line,
    config: &ProjectionConfig,
) -> BTreeMap<TrainID, OperationalWindow> {
    let mut windows = BTreeMap::new();
    for (train, events) in schedule.iter() {
        if let Some(window) = calculate(events, line, config) {
            windows.insert(train, window);
        }
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{event, line, t};
    use geom::Duration;
    use schedule::Direction;

    #[test]
    fn plain_window() {
        let events = vec![
            event(7, 3, Direction::Northbound, "07:00:00", "07:00:30"),
            event(7, 4, Direction::Northbound, "07:03:00", "07:03:30"),
        ];
        let window = calculate(&events, &line(), &ProjectionConfig::default()).unwrap();
        assert_eq!(window.first_event_time, t("07:00:00"));
        assert_eq!(window.last_event_time, t("07:03:30"));
        assert!(!window.has_insertion_ramp);
        assert!(window.contains(t("07:03:30")));
        assert!(!window.contains(t("06:59:59")));
    }

    #[test]
    fn insertion_lead_time() {
        let config = ProjectionConfig::default();
        let mut first = event(2, 1, Direction::Southbound, "05:30:00", "05:31:00");
        first.status = TrainStatus::Insertion;
        let events = vec![first];

        // Default lead
        let window = calculate(&events, &line(), &config).unwrap();
        assert_eq!(window.first_event_time, t("05:29:00"));
        assert!(window.has_insertion_ramp);

        // Explicit travel time
        let mut events = events;
        events[0].travel_time = Some(Duration::seconds(150.0));
        let window = calculate(&events, &line(), &config).unwrap();
        assert_eq!(window.first_event_time, t("05:27:30"));
    }

    #[test]
    fn insertion_elsewhere_has_no_lead() {
        let config = ProjectionConfig::default();
        // Heading the wrong way
        let mut wrong_direction = event(2, 1, Direction::Northbound, "05:30:00", "05:31:00");
        wrong_direction.status = TrainStatus::Insertion;
        // Not at the entry terminus
        let mut wrong_station = event(2, 3, Direction::Southbound, "05:30:00", "05:31:00");
        wrong_station.status = TrainStatus::Insertion;

        for ev in [wrong_direction, wrong_station] {
            let window = calculate(&[ev], &line(), &config).unwrap();
            assert_eq!(window.first_event_time, t("05:30:00"));
            assert!(!window.has_insertion_ramp);
        }
    }

    #[test]
    fn lead_clamps_at_midnight() {
        let mut first = event(2, 1, Direction::Southbound, "00:00:20", "00:01:00");
        first.status = TrainStatus::Insertion;
        let window = calculate(&[first], &line(), &ProjectionConfig::default()).unwrap();
        assert_eq!(window.first_event_time, Time::START_OF_DAY);
    }

    #[test]
    fn no_events_no_window() {
        assert!(calculate(&[], &line(), &ProjectionConfig::default()).is_none());
    }
}
