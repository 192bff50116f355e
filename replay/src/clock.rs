use geom::{Duration, Time};

/// Steps a virtual clock through a replay. Stands in for the playback timer / scrubber of an
/// interactive viewer.
pub struct Clock {
    time: Time,
    end: Time,
    step: Duration,
    done: bool,
}

impl Clock {
    /// Visits `start`, then every `step` until passing `end`. A single tick if `start == end`.
    pub fn new(start: Time, end: Time, step: Duration) -> Self {
        Self {
            time: start,
            end,
            step,
            done: start > end,
        }
    }
}

impl Iterator for Clock {
    type Item = Time;

    fn next(&mut self) -> Option<Time> {
        if self.done {
            return None;
        }
        let now = self.time;
        if self.step <= Duration::ZERO || now + self.step > self.end {
            self.done = true;
        } else {
            self.time = now + self.step;
        }
        Some(now)
    }
}
