use geom::{Duration, Pt2D, Time};
use serde::Serialize;

use schedule::{Direction, ScheduleEvent, ServiceType, StationID, TrainID, TrainStatus};

use crate::{EventPair, Line, OperationalWindow, ProjectionConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainActivity {
    InDepot,
    Dwelling,
    InTransit,
    TurningAround,
    Inserting,
}

impl std::fmt::Display for TrainActivity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TrainActivity::InDepot => write!(f, "in depot"),
            TrainActivity::Dwelling => write!(f, "dwelling"),
            TrainActivity::InTransit => write!(f, "in transit"),
            TrainActivity::TurningAround => write!(f, "turning around"),
            TrainActivity::Inserting => write!(f, "inserting"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Turnaround {
    pub terminus: StationID,
    /// 0 to 1
    pub progress: f64,
    /// Arrival time of the event that started the turnaround. Orders trains sharing a terminus.
    pub triggered_at: Time,
}

/// Where a train is and what it's doing at one moment. Recalculated from scratch every time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrainState {
    pub train: TrainID,
    pub activity: TrainActivity,
    pub direction: Direction,
    /// Progress through the current movement (transit or insertion ramp), 0 to 1. 0 otherwise.
    pub position_fraction: f64,
    /// Position along the line. Meaningless in the depot.
    pub coordinate: f64,
    /// Perpendicular position, determined by direction except during staggered turnarounds
    pub lane_offset: f64,
    /// The station dwelt at or turned around at
    pub station: Option<StationID>,
    pub turnaround: Option<Turnaround>,
    pub service_type: ServiceType,
}

impl TrainState {
    fn in_depot(train: TrainID, direction: Direction, service_type: ServiceType) -> Self {
        Self {
            train,
            activity: TrainActivity::InDepot,
            direction,
            position_fraction: 0.0,
            coordinate: 0.0,
            lane_offset: 0.0,
            station: None,
            turnaround: None,
            service_type,
        }
    }

    /// None in the depot
    pub fn pos(&self) -> Option<Pt2D> {
        if self.activity == TrainActivity::InDepot {
            return None;
        }
        Some(Pt2D::new(self.coordinate, self.lane_offset))
    }

    pub fn turnaround_progress(&self) -> Option<f64> {
        self.turnaround.map(|x| x.progress)
    }
}

/// Everything about one train needed to classify it at some time.
pub struct Input<'a> {
    pub train: TrainID,
    pub events: &'a [ScheduleEvent],
    pub window: Option<&'a OperationalWindow>,
    pub pair: Option<&'a EventPair>,
    pub service_type: ServiceType,
}

pub fn classify(
    input: &Input,
    time: Time,
    line: &Line,
    config: &ProjectionConfig,
) -> TrainState {
    let train = input.train;
    let service_type = input.service_type;

    let window = match input.window {
        Some(w) if w.contains(time) => w,
        _ => {
            return TrainState::in_depot(
                train,
                last_known_direction(input.events, time),
                service_type,
            );
        }
    };

    if let Some(first) = input.events.first() {
        if first.status == TrainStatus::Insertion
            && time >= window.first_event_time
            && time < first.arrival_time
        {
            let pct = fraction(
                time - window.first_event_time,
                first.arrival_time - window.first_event_time,
            );
            let from = line.staging_coordinate(config);
            let to = line.coordinate(line.entry_terminus());
            return TrainState {
                train,
                activity: TrainActivity::Inserting,
                direction: first.direction,
                position_fraction: pct,
                coordinate: lerp(from, to, pct),
                lane_offset: config.lane_offset(first.direction),
                station: None,
                turnaround: None,
                service_type,
            };
        }
    }

    let pair = match input.pair {
        Some(pair) => pair,
        None => {
            warn!(
                "{} is inside its operational window at {}, but no event brackets that time",
                train, time
            );
            return TrainState::in_depot(
                train,
                last_known_direction(input.events, time),
                service_type,
            );
        }
    };
    let a = &pair.a;

    if a.is_withdrawal() {
        if time >= a.departure_time {
            return TrainState::in_depot(train, a.direction, service_type);
        }
        return dwelling(train, a, line, config, service_type);
    }

    let b = match pair.b {
        Some(ref b) => b,
        None => {
            return dwelling(train, a, line, config, service_type);
        }
    };

    if a.station_id == b.station_id && a.direction != b.direction && line.is_terminus(a.station_id)
    {
        let duration = config
            .turnaround_duration()
            .unwrap_or(b.arrival_time - a.departure_time);
        let progress = fraction(time - a.departure_time, duration);
        return TrainState {
            train,
            activity: TrainActivity::TurningAround,
            direction: b.direction,
            position_fraction: 0.0,
            coordinate: line.turnaround_coordinate(a.station_id, config),
            // On the arc's center line; only stagger_turnarounds moves it off
            lane_offset: 0.0,
            station: Some(a.station_id),
            turnaround: Some(Turnaround {
                terminus: a.station_id,
                progress,
                triggered_at: a.arrival_time,
            }),
            service_type,
        };
    }

    let pct = fraction(time - a.departure_time, b.arrival_time - a.departure_time);
    TrainState {
        train,
        activity: TrainActivity::InTransit,
        direction: a.direction,
        position_fraction: pct,
        coordinate: lerp(
            line.coordinate(a.station_id),
            line.coordinate(b.station_id),
            pct,
        ),
        lane_offset: config.lane_offset(a.direction),
        station: None,
        turnaround: None,
        service_type,
    }
}

fn dwelling(
    train: TrainID,
    ev: &ScheduleEvent,
    line: &Line,
    config: &ProjectionConfig,
    service_type: ServiceType,
) -> TrainState {
    TrainState {
        train,
        activity: TrainActivity::Dwelling,
        direction: ev.direction,
        position_fraction: 0.0,
        coordinate: line.coordinate(ev.station_id),
        lane_offset: config.lane_offset(ev.direction),
        station: Some(ev.station_id),
        turnaround: None,
        service_type,
    }
}

/// The direction of the latest event that's started by `time`, or the first event's if none
/// have.
fn last_known_direction(events: &[ScheduleEvent], time: Time) -> Direction {
    let idx = events.partition_point(|ev| ev.arrival_time <= time);
    if idx > 0 {
        events[idx - 1].direction
    } else {
        events
            .first()
            .map(|ev| ev.direction)
            .unwrap_or_default()
    }
}

/// Clamped to [0, 1]. An empty span counts as no progress.
pub fn fraction(elapsed: Duration, total: Duration) -> f64 {
    if total <= Duration::ZERO {
        return 0.0;
    }
    let pct = elapsed / total;
    if pct.is_finite() {
        pct.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn lerp(from: f64, to: f64, pct: f64) -> f64 {
    from + pct * (to - from)
}
