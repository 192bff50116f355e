#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod classify;
mod config;
mod line;
mod locate;
pub mod service;
mod stagger;
mod summary;
#[cfg(test)]
mod testing;
pub mod window;

use std::collections::BTreeMap;

use abstutil::Counter;
use anyhow::Result;
use geom::Time;

use schedule::{Schedule, Scheme, StationID, Station, TrainID};

pub use classify::{fraction, TrainActivity, TrainState, Turnaround};
pub use config::ProjectionConfig;
pub use line::Line;
pub use locate::{locate, EventPair};
pub use stagger::stagger_turnarounds;
pub use summary::{StatusSummary, SummaryStatus};
pub use window::OperationalWindow;

/// Everything derived once when a timetable loads. Read-only afterwards; every query is a pure
/// function of this and a time.
pub struct Model {
    pub line: Line,
    pub schedule: Schedule,
    pub windows: BTreeMap<TrainID, OperationalWindow>,
    pub config: ProjectionConfig,
    scheme: Scheme,
}

impl Model {
    pub fn new(
        schedule: Schedule,
        stations: Vec<Station>,
        config: ProjectionConfig,
    ) -> Result<Self> {
        let line = Line::new(stations, &config)?;

        let mut unknown_stations: BTreeMap<StationID, usize> = BTreeMap::new();
        for (_, events) in schedule.iter() {
            for ev in events {
                if !line.contains(ev.station_id) {
                    *unknown_stations.entry(ev.station_id).or_insert(0) += 1;
                }
            }
        }
        for (station, count) in unknown_stations {
            warn!("{count} events reference unknown {station}; placing it at 0");
        }

        let scheme = config
            .scheme
            .or_else(|| schedule.scheme())
            .unwrap_or(Scheme::Regular);
        if scheme == Scheme::SkipStop && !schedule.has_service_types() {
            info!("Skip-stop timetable without service types; alternating A/B by train ID");
        }

        let windows = window::calculate_all(&schedule, &line, &config);
        info!(
            "Model has {} trains ({} with operational windows) over {} stations, {:?} scheme",
            schedule.num_trains(),
            windows.len(),
            line.stations().count(),
            scheme
        );

        Ok(Self {
            line,
            schedule,
            windows,
            config,
            scheme,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Projects every train at one moment.
    pub fn snapshot(&self, time: Time) -> Snapshot {
        let mut states = Vec::with_capacity(self.schedule.num_trains());
        let mut pairs = BTreeMap::new();
        for (train, events) in self.schedule.iter() {
            let pair = locate(events, time);
            let input = classify::Input {
                train,
                events,
                window: self.windows.get(&train),
                pair: pair.as_ref(),
                service_type: service::resolve(train, pair.as_ref(), events, self.scheme),
            };
            states.push(classify::classify(&input, time, &self.line, &self.config));
            if let Some(pair) = pair {
                pairs.insert(train, pair);
            }
        }
        stagger_turnarounds(&mut states, &self.config);

        Snapshot {
            time,
            states,
            pairs,
        }
    }

    pub fn train_states(&self, time: Time) -> Vec<TrainState> {
        self.snapshot(time).states
    }

    /// None for trains not in the schedule. Staggering needs every train, so this projects
    /// them all.
    pub fn describe_train(&self, train: TrainID, time: Time) -> Option<StatusSummary> {
        self.snapshot(time).describe(self, train)
    }

    /// The stations this train currently stops at
    pub fn stopping_pattern(&self, train: TrainID, time: Time) -> Vec<StationID> {
        let events = self.schedule.events(train);
        let pair = locate(events, time);
        let service_type = service::resolve(train, pair.as_ref(), events, self.scheme);
        self.line.stopping_pattern(service_type)
    }
}

/// Every train's state at one time. This is a copy; a newer snapshot just replaces it.
#[derive(Clone, Debug)]
pub struct Snapshot {
    time: Time,
    // Same order as the schedule's trains
    states: Vec<TrainState>,
    pairs: BTreeMap<TrainID, EventPair>,
}

impl Snapshot {
    pub fn time(&self) -> Time {
        self.time
    }

    pub fn train_states(&self) -> &[TrainState] {
        &self.states
    }

    pub fn event_pairs(&self) -> &BTreeMap<TrainID, EventPair> {
        &self.pairs
    }

    pub fn state(&self, train: TrainID) -> Option<&TrainState> {
        self.states.iter().find(|s| s.train == train)
    }

    pub fn describe(&self, model: &Model, train: TrainID) -> Option<StatusSummary> {
        let state = self.state(train)?;
        Some(StatusSummary::new(
            state,
            self.pairs.get(&train),
            model.schedule.events(train).first(),
            &model.line,
        ))
    }

    pub fn count_by_activity(&self) -> Counter<TrainActivity> {
        let mut cnt = Counter::new();
        for state in &self.states {
            cnt.inc(state.activity);
        }
        cnt
    }
}
