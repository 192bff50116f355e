//! Shared fixtures for unit tests.

use geom::Time;

use schedule::time::parse_time;
use schedule::{Direction, ScheduleEvent, ServiceType, Station, StationID, TrainID, TrainStatus};

use crate::{Line, ProjectionConfig};

pub fn t(x: &str) -> Time {
    parse_time(x).unwrap()
}

pub fn station(id: u32, x: f64, service: ServiceType) -> Station {
    Station {
        id: StationID(id),
        name: format!("Stop {id}"),
        x,
        service,
    }
}

/// Five stations 70 apart, starting at 160. Skip-stop tags alternate around AB stations.
pub fn five_stations() -> Vec<Station> {
    vec![
        station(1, 160.0, ServiceType::AB),
        station(2, 230.0, ServiceType::A),
        station(3, 300.0, ServiceType::AB),
        station(4, 370.0, ServiceType::B),
        station(5, 440.0, ServiceType::AB),
    ]
}

pub fn line() -> Line {
    Line::new(five_stations(), &ProjectionConfig::default()).unwrap()
}

pub fn event(
    train: u32,
    station: u32,
    direction: Direction,
    arrival: &str,
    departure: &str,
) -> ScheduleEvent {
    ScheduleEvent {
        train_id: TrainID(train),
        station_id: StationID(station),
        direction,
        status: TrainStatus::Active,
        arrival_time: t(arrival),
        departure_time: t(departure),
        service_type: None,
        travel_time: None,
    }
}
