use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrainID(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationID(pub u32);

impl TrainID {
    pub fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }
}

impl std::fmt::Display for TrainID {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Train {}", self.0)
    }
}

impl std::fmt::Display for StationID {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Station {}", self.0)
    }
}

/// Raw IDs show up as "7", " 7 ", or "7.0" depending on which tool exported the timetable.
pub fn parse_id(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(x) = raw.parse::<u32>() {
        return Some(x);
    }
    let x = raw.parse::<f64>().ok()?;
    if x >= 0.0 && x.fract() == 0.0 && x <= u32::MAX as f64 {
        Some(x as u32)
    } else {
        None
    }
}
