use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use schedule::{Direction, ServiceType, Station, StationID};

use crate::ProjectionConfig;

/// The stations of one line, in order along it.
#[derive(Clone, Debug, Serialize)]
pub struct Line {
    stations: BTreeMap<StationID, Station>,
    // Sorted by position
    order: Vec<StationID>,
    termini: (StationID, StationID),
    entry_terminus: StationID,
    outward_direction: Direction,
}

impl Line {
    pub fn new(stations: Vec<Station>, config: &ProjectionConfig) -> Result<Self> {
        if stations.len() < 2 {
            bail!("A line needs at least 2 stations, but only got {}", stations.len());
        }
        let mut by_id = BTreeMap::new();
        for station in stations {
            if !station.x.is_finite() {
                bail!("{:?} has a bad position {}", station.id, station.x);
            }
            if let Some(prev) = by_id.insert(station.id, station) {
                bail!("Duplicate {:?}", prev.id);
            }
        }
        let mut order: Vec<StationID> = by_id.keys().cloned().collect();
        // Position first, ID to break ties
        order.sort_by(|a, b| by_id[a].x.total_cmp(&by_id[b].x).then(a.cmp(b)));

        let termini = (order[0], order[order.len() - 1]);
        let entry_terminus = config.entry_terminus.unwrap_or(termini.0);
        if entry_terminus != termini.0 && entry_terminus != termini.1 {
            bail!(
                "Entry terminus {:?} isn't at either end of the line",
                entry_terminus
            );
        }

        Ok(Self {
            stations: by_id,
            order,
            termini,
            entry_terminus,
            outward_direction: config.outward_direction,
        })
    }

    pub fn station(&self, id: StationID) -> Option<&Station> {
        self.stations.get(&id)
    }

    /// In order along the line
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.order.iter().map(move |id| &self.stations[id])
    }

    pub fn contains(&self, id: StationID) -> bool {
        self.stations.contains_key(&id)
    }

    /// Unknown stations are placed at 0, so one bad reference doesn't break everything else.
    pub fn coordinate(&self, id: StationID) -> f64 {
        self.station(id).map(|s| s.x).unwrap_or(0.0)
    }

    pub fn station_name(&self, id: StationID) -> String {
        match self.station(id) {
            Some(s) => s.name.clone(),
            None => id.to_string(),
        }
    }

    pub fn termini(&self) -> (StationID, StationID) {
        self.termini
    }

    pub fn is_terminus(&self, id: StationID) -> bool {
        let (first, last) = self.termini();
        id == first || id == last
    }

    pub fn entry_terminus(&self) -> StationID {
        self.entry_terminus
    }

    pub fn outward_direction(&self) -> Direction {
        self.outward_direction
    }

    /// Points from this terminus out past the end of the line: -1 at the low end, +1 at the
    /// high end. 0 for stations in the middle.
    fn outside_sign(&self, id: StationID) -> f64 {
        let (first, last) = self.termini();
        if id == first {
            -1.0
        } else if id == last {
            1.0
        } else {
            0.0
        }
    }

    /// Where a train starts its insertion ramp
    pub fn staging_coordinate(&self, config: &ProjectionConfig) -> f64 {
        self.coordinate(self.entry_terminus)
            + self.outside_sign(self.entry_terminus) * config.staging_distance
    }

    /// The center of the U-turn arc beyond a terminus
    pub fn turnaround_coordinate(&self, terminus: StationID, config: &ProjectionConfig) -> f64 {
        self.coordinate(terminus) + self.outside_sign(terminus) * config.turnaround_arc_offset
    }

    /// Does a train of this class stop at this station? Unknown stations are always served.
    pub fn serves(&self, id: StationID, train: ServiceType) -> bool {
        match self.station(id) {
            Some(station) => train.stops_at(station.service),
            None => true,
        }
    }

    /// The stations a train of this class stops at, in order along the line
    pub fn stopping_pattern(&self, train: ServiceType) -> Vec<StationID> {
        self.order
            .iter()
            .filter(|id| self.serves(**id, train))
            .cloned()
            .collect()
    }
}
