//! Timetables have been exported with several different column naming schemes over time. This
//! maps all of them to `ScheduleEvent`.

use std::collections::BTreeMap;

use geom::Duration;
use serde::Serialize;

use crate::time::{parse_time, parse_time_or_midnight};
use crate::{
    parse_id, Direction, Scheme, ScheduleEvent, ServiceType, StationID, TrainID, TrainStatus,
};

/// One timetable row, keyed by whatever column names the export used.
pub type RawRow = BTreeMap<String, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    TrainID,
    StationID,
    Direction,
    Status,
    ArrivalTime,
    DepartureTime,
    ServiceType,
    TravelTime,
    Scheme,
}

/// For every field, the current column name comes first, then legacy names in the order they
/// should be tried.
pub const FIELD_NAMES: [(Field, &[&str]); 9] = [
    (Field::TrainID, &["TRAIN_ID", "Train ID", "train_id"]),
    (Field::StationID, &["STATION_ID", "Station ID", "station_id"]),
    (Field::Direction, &["DIRECTION", "Direction", "direction"]),
    (Field::Status, &["TRAIN_STATUS", "Status", "status"]),
    (
        Field::ArrivalTime,
        &["ARRIVAL_TIME", "Arrival Time", "arrival_time"],
    ),
    (
        Field::DepartureTime,
        &["DEPARTURE_TIME", "Departure Time", "departure_time"],
    ),
    (
        Field::ServiceType,
        &["SERVICE_TYPE", "Service Type", "service_type"],
    ),
    (
        Field::TravelTime,
        &["TRAVEL_TIME_SECONDS", "Travel Time (s)", "travel_time"],
    ),
    (Field::Scheme, &["SCHEME_TYPE", "Scheme", "scheme"]),
];

impl Field {
    fn names(self) -> &'static [&'static str] {
        for (field, names) in FIELD_NAMES {
            if field == self {
                return names;
            }
        }
        unreachable!()
    }

    pub fn current_name(self) -> &'static str {
        self.names()[0]
    }

    /// The first non-blank value among the field's names
    pub fn get(self, row: &RawRow) -> Option<&str> {
        self.names()
            .iter()
            .filter_map(|name| row.get(*name))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
    }
}

/// Everything dropped while normalizing. None of this is fatal.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NormalizeReport {
    pub total_rows: usize,
    pub skipped: Vec<SkippedRow>,
    pub overlapping_events: usize,
    pub scheme: Option<Scheme>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkippedRow {
    /// 0-based, not counting any header
    pub row: usize,
    pub reason: String,
}

impl NormalizeReport {
    pub fn num_skipped(&self) -> usize {
        self.skipped.len()
    }

    pub fn describe(&self) -> String {
        format!(
            "{} rows, {} skipped, {} overlapping events dropped",
            self.total_rows,
            self.skipped.len(),
            self.overlapping_events
        )
    }
}

/// Converts raw rows into events, in input order. Rows that can't become an event are recorded
/// in the report instead.
pub fn normalize_rows(rows: &[RawRow]) -> (Vec<ScheduleEvent>, NormalizeReport) {
    let mut report = NormalizeReport {
        total_rows: rows.len(),
        ..Default::default()
    };
    let mut events = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        if let Some(scheme) = Field::Scheme.get(row).and_then(Scheme::parse) {
            // Any skip-stop row makes the whole run skip-stop
            if report.scheme != Some(Scheme::SkipStop) {
                report.scheme = Some(scheme);
            }
        }

        match normalize_row(row) {
            Ok(ev) => events.push(ev),
            Err(reason) => {
                warn!("Skipping timetable row {idx}: {reason}");
                report.skipped.push(SkippedRow { row: idx, reason });
            }
        }
    }
    (events, report)
}

fn normalize_row(row: &RawRow) -> Result<ScheduleEvent, String> {
    let train_id = match Field::TrainID.get(row) {
        Some(raw) => parse_id(raw).ok_or_else(|| format!("bad train ID {raw:?}"))?,
        None => return Err("no train ID".to_string()),
    };
    let station_id = match Field::StationID.get(row) {
        Some(raw) => parse_id(raw).ok_or_else(|| format!("bad station ID {raw:?}"))?,
        None => return Err("no station ID".to_string()),
    };
    let arrival_time = match Field::ArrivalTime.get(row) {
        Some(raw) => parse_time(raw).ok_or_else(|| format!("bad arrival time {raw:?}"))?,
        None => return Err("no arrival time".to_string()),
    };
    let departure_time = match Field::DepartureTime.get(row) {
        Some(raw) => parse_time_or_midnight(raw).max(arrival_time),
        None => arrival_time,
    };

    let direction = match Field::Direction.get(row) {
        Some(raw) => Direction::parse(raw).unwrap_or_else(|| {
            warn!("Unknown direction {raw:?} for train {train_id}, using the default");
            Direction::default()
        }),
        None => Direction::default(),
    };
    let status = match Field::Status.get(row) {
        Some(raw) => TrainStatus::parse(raw).unwrap_or_else(|| {
            warn!("Unknown status {raw:?} for train {train_id}, using the default");
            TrainStatus::default()
        }),
        None => TrainStatus::default(),
    };
    let service_type = Field::ServiceType.get(row).and_then(ServiceType::parse);
    let travel_time = Field::TravelTime
        .get(row)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::seconds);

    Ok(ScheduleEvent {
        train_id: TrainID(train_id),
        station_id: StationID(station_id),
        direction,
        status,
        arrival_time,
        departure_time,
        service_type,
        travel_time,
    })
}

/// Applies the same invariants `normalize_rows` produces to events that are already canonical.
/// A no-op for anything that came out of `normalize_rows`.
pub fn normalize_events(events: Vec<ScheduleEvent>) -> Vec<ScheduleEvent> {
    events
        .into_iter()
        .map(|mut ev| {
            ev.departure_time = ev.departure_time.max(ev.arrival_time);
            ev
        })
        .collect()
}

impl ScheduleEvent {
    /// Expresses the event in the current column naming scheme.
    pub fn to_row(&self) -> RawRow {
        let mut row = RawRow::new();
        let mut set = |field: Field, value: String| {
            row.insert(field.current_name().to_string(), value);
        };
        set(Field::TrainID, self.train_id.0.to_string());
        set(Field::StationID, self.station_id.0.to_string());
        set(Field::Direction, self.direction.as_str().to_string());
        set(Field::Status, self.status.as_str().to_string());
        set(Field::ArrivalTime, format_time(self.arrival_time));
        set(Field::DepartureTime, format_time(self.departure_time));
        if let Some(service_type) = self.service_type {
            set(Field::ServiceType, service_type.as_str().to_string());
        }
        if let Some(travel_time) = self.travel_time {
            set(Field::TravelTime, travel_time.inner_seconds().to_string());
        }
        row
    }
}

/// "HH:MM:SS" with fractional seconds if there are any, so `parse_time` reproduces the exact
/// value.
pub fn format_time(time: geom::Time) -> String {
    let total = time.inner_seconds();
    let hours = (total / 3600.0).floor();
    let minutes = ((total - hours * 3600.0) / 60.0).floor();
    let seconds = total - hours * 3600.0 - minutes * 60.0;
    if seconds.fract() == 0.0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{}", hours, minutes, seconds)
    }
}
