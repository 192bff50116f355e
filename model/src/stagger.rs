use std::collections::BTreeMap;

use schedule::StationID;

use crate::{ProjectionConfig, TrainActivity, TrainState};

/// Trains turning around at the same terminus at the same time would be drawn on top of each
/// other. Spread them across alternating lanes, ordered by when they started turning around.
pub fn stagger_turnarounds(states: &mut [TrainState], config: &ProjectionConfig) {
    // Per terminus: (when the turnaround started, train, index into states)
    let mut per_terminus: BTreeMap<StationID, Vec<_>> = BTreeMap::new();
    for (idx, state) in states.iter().enumerate() {
        if state.activity != TrainActivity::TurningAround {
            continue;
        }
        if let Some(ref turnaround) = state.turnaround {
            per_terminus
                .entry(turnaround.terminus)
                .or_insert_with(Vec::new)
                .push((turnaround.triggered_at, state.train, idx));
        }
    }

    for (terminus, mut group) in per_terminus {
        if group.len() < 2 {
            continue;
        }
        debug!("Staggering {} trains turning around at {}", group.len(), terminus);
        group.sort();
        for (rank, (_, _, idx)) in group.into_iter().enumerate() {
            states[idx].lane_offset = if rank % 2 == 0 {
                config.stagger_offset
            } else {
                -config.stagger_offset
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::t;
    use crate::Turnaround;
    use schedule::{Direction, ServiceType, TrainID};

    fn turning(train: u32, terminus: u32, triggered_at: &str) -> TrainState {
        TrainState {
            train: TrainID(train),
            activity: TrainActivity::TurningAround,
            direction: Direction::Southbound,
            position_fraction: 0.0,
            coordinate: 465.0,
            lane_offset: 0.0,
            station: Some(StationID(terminus)),
            turnaround: Some(Turnaround {
                terminus: StationID(terminus),
                progress: 0.5,
                triggered_at: t(triggered_at),
            }),
            service_type: ServiceType::AB,
        }
    }

    fn offsets(states: &[TrainState]) -> Vec<(u32, f64)> {
        states.iter().map(|s| (s.train.0, s.lane_offset)).collect()
    }

    #[test]
    fn lone_turnarounds_are_untouched() {
        let config = ProjectionConfig::default();
        let mut states = vec![turning(1, 5, "08:00:00"), turning(2, 1, "08:00:00")];
        stagger_turnarounds(&mut states, &config);
        assert_eq!(offsets(&states), vec![(1, 0.0), (2, 0.0)]);
    }

    #[test]
    fn shared_terminus_alternates_by_arrival() {
        let config = ProjectionConfig::default();
        // Input order shouldn't matter
        let mut states = vec![
            turning(4, 5, "08:02:00"),
            turning(9, 5, "08:00:00"),
            turning(2, 5, "08:01:00"),
            turning(6, 1, "08:00:00"),
        ];
        stagger_turnarounds(&mut states, &config);
        assert_eq!(
            offsets(&states),
            vec![(4, 6.0), (9, 6.0), (2, -6.0), (6, 0.0)]
        );

        // Repeating gives the same answer
        let mut again = states.clone();
        again.reverse();
        stagger_turnarounds(&mut again, &config);
        again.reverse();
        assert_eq!(offsets(&again), offsets(&states));
    }

    #[test]
    fn ties_break_by_train() {
        let config = ProjectionConfig::default();
        let mut states = vec![turning(8, 5, "08:00:00"), turning(3, 5, "08:00:00")];
        stagger_turnarounds(&mut states, &config);
        assert_eq!(offsets(&states), vec![(8, -6.0), (3, 6.0)]);
    }
}
