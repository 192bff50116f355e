use schedule::{Scheme, ScheduleEvent, ServiceType, TrainID};

use crate::EventPair;

/// Which skip-stop class a train belongs to right now.
///
/// Trust the events nearest to `time`, then anything else in the train's schedule. Without any
/// service types in the data, everybody stops everywhere under the regular scheme, and skip-stop
/// just alternates by train ID.
pub fn resolve(
    train: TrainID,
    pair: Option<&EventPair>,
    events: &[ScheduleEvent],
    scheme: Scheme,
) -> ServiceType {
    if let Some(pair) = pair {
        if let Some(x) = pair
            .a
            .service_type
            .or_else(|| pair.b.and_then(|b| b.service_type))
        {
            return x;
        }
    }
    if let Some(x) = events.iter().find_map(|ev| ev.service_type) {
        return x;
    }
    match scheme {
        Scheme::Regular => ServiceType::AB,
        Scheme::SkipStop => fallback(train),
    }
}

/// Odd trains run A service, even trains B
pub fn fallback(train: TrainID) -> ServiceType {
    if train.is_odd() {
        ServiceType::A
    } else {
        ServiceType::B
    }
}
