use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{ServiceType, StationID};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationID,
    pub name: String,
    /// Position along the line
    pub x: f64,
    /// Which skip-stop classes stop here
    pub service: ServiceType,
}

pub fn load<R: std::io::Read>(reader: R) -> Result<Vec<Station>> {
    let mut stations: BTreeMap<StationID, Station> = BTreeMap::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        let id = StationID(rec.station_id);
        if stations.contains_key(&id) {
            bail!("Duplicate {:?}", id);
        }
        if !rec.x.is_finite() {
            bail!("{:?} has a bad position {}", id, rec.x);
        }
        let service = match rec.scheme {
            Some(ref raw) if !raw.trim().is_empty() => match ServiceType::parse(raw) {
                Some(x) => x,
                None => bail!("{:?} has unknown scheme {raw:?}", id),
            },
            _ => ServiceType::AB,
        };
        stations.insert(
            id,
            Station {
                id,
                name: rec
                    .station_name
                    .filter(|x| !x.trim().is_empty())
                    .unwrap_or_else(|| id.to_string()),
                x: rec.x,
                service,
            },
        );
    }
    Ok(stations.into_values().collect())
}

#[derive(Deserialize)]
struct Record {
    #[serde(rename = "STATION_ID", alias = "Station ID")]
    station_id: u32,
    #[serde(rename = "STATION_NAME", alias = "Station Name")]
    station_name: Option<String>,
    #[serde(rename = "X", alias = "x")]
    x: f64,
    #[serde(rename = "SCHEME", alias = "Scheme")]
    scheme: Option<String>,
}
