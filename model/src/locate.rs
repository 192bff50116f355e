use geom::Time;
use serde::Serialize;

use schedule::ScheduleEvent;

/// The events surrounding some time for one train.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EventPair {
    /// The event being dwelt at, or the one most recently departed
    pub a: ScheduleEvent,
    /// Present while travelling from `a` to the next event
    pub b: Option<ScheduleEvent>,
}

impl EventPair {
    pub fn is_dwell(&self) -> bool {
        self.b.is_none()
    }
}

/// Finds the events bracketing `time`. `events` must be sorted by (arrival, departure) and must
/// not overlap, which `Schedule` guarantees.
///
/// The result matches a forward scan where the first satisfied case wins:
/// - `time` in `[arrival, departure)` of an event: that event alone
/// - `time` in `[departure(i), arrival(i + 1))`: the two events
/// - `time` at or after the last departure: the last event alone
///
/// None before the first arrival.
pub fn locate(events: &[ScheduleEvent], time: Time) -> Option<EventPair> {
    let first = events.first()?;
    if time < first.arrival_time {
        return None;
    }

    // Non-overlapping and sorted by arrival means departures are sorted too. Find the first event
    // that hasn't departed yet.
    let idx = events.partition_point(|ev| ev.departure_time <= time);
    if idx == events.len() {
        return Some(EventPair {
            a: events[idx - 1],
            b: None,
        });
    }
    if events[idx].arrival_time <= time {
        return Some(EventPair {
            a: events[idx],
            b: None,
        });
    }
    // idx can't be 0, since the first event has already arrived
    Some(EventPair {
        a: events[idx - 1],
        b: Some(events[idx]),
    })
}

/// The straightforward version of `locate`, kept to cross-check it.
#[cfg(test)]
fn locate_by_scan(events: &[ScheduleEvent], time: Time) -> Option<EventPair> {
    if events.is_empty() || time < events[0].arrival_time {
        return None;
    }
    for (idx, ev) in events.iter().enumerate() {
        if time >= ev.arrival_time && time < ev.departure_time {
            return Some(EventPair { a: *ev, b: None });
        }
        match events.get(idx + 1) {
            Some(next) => {
                if time >= ev.departure_time && time < next.arrival_time {
                    return Some(EventPair {
                        a: *ev,
                        b: Some(*next),
                    });
                }
            }
            None => {
                if time >= ev.departure_time {
                    return Some(EventPair { a: *ev, b: None });
                }
            }
        }
    }
    None
}
