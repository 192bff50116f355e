use geom::Time;
use serde::Serialize;

use schedule::{Direction, ScheduleEvent, StationID, TrainID};

use crate::{EventPair, Line, TrainActivity, TrainState};

/// What gets shown after clicking on a train.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusSummary {
    pub id: TrainID,
    pub direction: Direction,
    pub status: SummaryStatus,
    pub relevant_station_name: Option<String>,
    pub scheduled_time: Option<Time>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SummaryStatus {
    #[serde(rename = "At Station")]
    AtStation,
    #[serde(rename = "In Transit")]
    InTransit,
    #[serde(rename = "Turning Around")]
    TurningAround,
    #[serde(rename = "Inactive")]
    Inactive,
}

impl SummaryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryStatus::AtStation => "At Station",
            SummaryStatus::InTransit => "In Transit",
            SummaryStatus::TurningAround => "Turning Around",
            SummaryStatus::Inactive => "Inactive",
        }
    }
}

impl std::fmt::Display for SummaryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StatusSummary {
    /// `first_event` is the train's first scheduled event, used while it's being inserted.
    pub fn new(
        state: &TrainState,
        pair: Option<&EventPair>,
        first_event: Option<&ScheduleEvent>,
        line: &Line,
    ) -> Self {
        let name = |id: StationID| Some(line.station_name(id));

        let (status, relevant_station_name, scheduled_time) = match state.activity {
            TrainActivity::Dwelling => match pair {
                Some(pair) => (
                    SummaryStatus::AtStation,
                    name(pair.a.station_id),
                    Some(pair.a.departure_time),
                ),
                None => (
                    SummaryStatus::AtStation,
                    state.station.and_then(name),
                    None,
                ),
            },
            TrainActivity::InTransit => match pair.and_then(|p| p.b) {
                Some(next) => (
                    SummaryStatus::InTransit,
                    name(next.station_id),
                    Some(next.arrival_time),
                ),
                None => (SummaryStatus::InTransit, None, None),
            },
            // Heading for the entry terminus
            TrainActivity::Inserting => (
                SummaryStatus::InTransit,
                name(line.entry_terminus()),
                first_event.map(|ev| ev.arrival_time),
            ),
            TrainActivity::TurningAround => (
                SummaryStatus::TurningAround,
                state.station.and_then(name),
                pair.and_then(|p| p.b).map(|b| b.arrival_time),
            ),
            TrainActivity::InDepot => (
                SummaryStatus::Inactive,
                pair.map(|p| p.a.station_id).and_then(name),
                None,
            ),
        };

        Self {
            id: state.train,
            direction: state.direction,
            status,
            relevant_station_name,
            scheduled_time,
        }
    }

    pub fn describe(&self) -> String {
        let mut out = format!("{} ({}): {}", self.id, self.direction, self.status);
        if let Some(ref station) = self.relevant_station_name {
            out.push_str(&format!(", {station}"));
        }
        if let Some(time) = self.scheduled_time {
            out.push_str(&format!(", scheduled {time}"));
        }
        out
    }
}
