#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod event;
mod ids;
mod normalize;
pub mod stations;
pub mod time;
mod timetable;

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

pub use event::{Direction, Scheme, ScheduleEvent, ServiceType, TrainStatus};
pub use ids::{parse_id, StationID, TrainID};
pub use normalize::{
    format_time, normalize_events, normalize_rows, Field, NormalizeReport, RawRow, SkippedRow,
    FIELD_NAMES,
};
pub use stations::Station;
pub use timetable::Timetable;

/// Every train's station visits, loaded once per simulation run and never modified. Only
/// `Schedule::new` builds one.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Schedule {
    // Sorted by (arrival, departure), non-overlapping per train
    trains: BTreeMap<TrainID, Vec<ScheduleEvent>>,
    scheme: Option<Scheme>,
}

impl Schedule {
    /// Groups events by train, sorts them, and drops any event that overlaps an earlier one for
    /// the same train. Returns how many were dropped.
    pub fn new(events: Vec<ScheduleEvent>, scheme: Option<Scheme>) -> (Self, usize) {
        let mut per_train: BTreeMap<TrainID, Timetable<ScheduleEvent>> = BTreeMap::new();
        let mut dropped = 0;
        for ev in normalize_events(events) {
            let timetable = per_train.entry(ev.train_id).or_insert_with(Timetable::new);
            if let Err(ev) = timetable.try_assign(ev.interval(), ev) {
                warn!(
                    "{} has overlapping visits; dropping the one at {:?} arriving {}",
                    ev.train_id, ev.station_id, ev.arrival_time
                );
                dropped += 1;
            }
        }
        let trains = per_train
            .into_iter()
            .map(|(id, timetable)| (id, timetable.into_values()))
            .collect();
        (Self { trains, scheme }, dropped)
    }

    pub fn from_rows(rows: &[RawRow]) -> (Self, NormalizeReport) {
        let (events, mut report) = normalize_rows(rows);
        let (schedule, dropped) = Self::new(events, report.scheme);
        report.overlapping_events = dropped;
        info!(
            "Loaded {} events for {} trains: {}",
            schedule.num_events(),
            schedule.num_trains(),
            report.describe()
        );
        (schedule, report)
    }

    /// Sorted by arrival time. Empty for unknown trains.
    pub fn events(&self, train: TrainID) -> &[ScheduleEvent] {
        self.trains.get(&train).map(|x| x.as_slice()).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrainID, &[ScheduleEvent])> {
        self.trains.iter().map(|(id, events)| (*id, events.as_slice()))
    }

    pub fn num_trains(&self) -> usize {
        self.trains.len()
    }

    pub fn num_events(&self) -> usize {
        self.trains.values().map(|x| x.len()).sum()
    }

    /// The scheme declared by the input rows, if any
    pub fn scheme(&self) -> Option<Scheme> {
        self.scheme
    }

    /// Does any event carry a service type at all?
    pub fn has_service_types(&self) -> bool {
        self.trains
            .values()
            .flatten()
            .any(|ev| ev.service_type.is_some())
    }
}

pub fn load_csv<R: std::io::Read>(reader: R) -> Result<(Schedule, NormalizeReport)> {
    let mut rows = Vec::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: RawRow = rec?;
        rows.push(rec);
    }
    Ok(Schedule::from_rows(&rows))
}

/// Expects an array of objects. Numbers and bools are stringified; nulls count as missing.
pub fn load_json<R: std::io::Read>(reader: R) -> Result<(Schedule, NormalizeReport)> {
    let raw: Vec<BTreeMap<String, serde_json::Value>> = serde_json::from_reader(reader)?;
    let mut rows = Vec::new();
    for obj in raw {
        let mut row = RawRow::new();
        for (key, value) in obj {
            let value = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::String(x) => x,
                serde_json::Value::Number(x) => x.to_string(),
                serde_json::Value::Bool(x) => x.to_string(),
                x => bail!("Unexpected value for {key}: {x}"),
            };
            row.insert(key, value);
        }
        rows.push(row);
    }
    Ok(Schedule::from_rows(&rows))
}
