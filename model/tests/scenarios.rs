use geom::{Duration, Time};

use model::{Model, ProjectionConfig, SummaryStatus, TrainActivity};
use schedule::time::parse_time;
use schedule::{Direction, Scheme, ServiceType, StationID, TrainID};

const STATIONS: &str = "STATION_ID,STATION_NAME,X,SCHEME\n\
                        1,North Avenue,160,AB\n\
                        2,Quezon Avenue,230,A\n\
                        3,GMA Kamuning,300,AB\n\
                        4,Cubao,370,B\n\
                        5,Santolan,440,AB\n";

// Train 7 is the simple case. Trains 1 and 3 are inserted from the depot near station 1, run to
// station 5, and turn around there at the same time. Train 4 is withdrawn after one dwell.
const TIMETABLE: &str = "TRAIN_ID,STATION_ID,DIRECTION,TRAIN_STATUS,ARRIVAL_TIME,DEPARTURE_TIME,TRAVEL_TIME_SECONDS\n\
                         7,3,NORTHBOUND,ACTIVE,07:00:00,07:00:30,\n\
                         7,4,NORTHBOUND,ACTIVE,07:03:00,07:03:30,\n\
                         1,1,SOUTHBOUND,INSERTION,08:00:00,08:01:00,120\n\
                         1,5,SOUTHBOUND,ACTIVE,08:10:00,08:11:00,\n\
                         1,5,NORTHBOUND,ACTIVE,08:15:00,08:16:00,\n\
                         3,1,SOUTHBOUND,INSERTION,08:02:00,08:03:00,\n\
                         3,5,SOUTHBOUND,ACTIVE,08:11:00,08:12:00,\n\
                         3,5,NORTHBOUND,ACTIVE,08:16:00,08:17:00,\n\
                         4,2,SOUTHBOUND,INACTIVE,20:00:00,20:01:00,\n";

fn t(x: &str) -> Time {
    parse_time(x).unwrap()
}

fn model_with(config: ProjectionConfig) -> Model {
    let (schedule, report) = schedule::load_csv(TIMETABLE.as_bytes()).unwrap();
    assert_eq!(report.num_skipped(), 0);
    let stations = schedule::stations::load(STATIONS.as_bytes()).unwrap();
    Model::new(schedule, stations, config).unwrap()
}

fn model() -> Model {
    model_with(ProjectionConfig::default())
}

#[test]
fn transit_example() {
    let model = model();
    let snapshot = model.snapshot(t("07:01:45"));
    let state = snapshot.state(TrainID(7)).unwrap();
    assert_eq!(state.activity, TrainActivity::InTransit);
    assert_eq!(state.position_fraction, 0.5);
    assert_eq!(state.coordinate, 335.0);
    assert_eq!(state.direction, Direction::Northbound);

    let pair = snapshot.event_pairs()[&TrainID(7)];
    assert_eq!(pair.a.station_id, StationID(3));
    assert_eq!(pair.b.unwrap().station_id, StationID(4));

    let before = model.snapshot(t("06:30:00"));
    assert_eq!(
        before.state(TrainID(7)).unwrap().activity,
        TrainActivity::InDepot
    );
}

#[test]
fn window_containment() {
    let model = model();
    let mut time = Time::START_OF_DAY;
    while time < t("23:00:00") {
        for state in model.train_states(time) {
            let window = model.windows[&state.train];
            if !window.contains(time) {
                assert_eq!(
                    state.activity,
                    TrainActivity::InDepot,
                    "{} at {}",
                    state.train,
                    time
                );
            } else {
                assert!(state.position_fraction >= 0.0 && state.position_fraction <= 1.0);
                if let Some(progress) = state.turnaround_progress() {
                    assert!((0.0..=1.0).contains(&progress));
                }
            }
        }
        time = time + Duration::seconds(15.0);
    }
}

#[test]
fn inserted_trains_ramp_in() {
    let model = model();
    assert_eq!(model.windows[&TrainID(1)].first_event_time, t("07:58:00"));
    // Train 3 has no travel time, so it gets the default minute
    assert_eq!(model.windows[&TrainID(3)].first_event_time, t("08:01:00"));

    let snapshot = model.snapshot(t("07:59:00"));
    let state = snapshot.state(TrainID(1)).unwrap();
    assert_eq!(state.activity, TrainActivity::Inserting);
    assert_eq!(state.position_fraction, 0.5);
    // Halfway from the staging point at 100 to station 1 at 160
    assert_eq!(state.coordinate, 130.0);

    let summary = snapshot.describe(&model, TrainID(1)).unwrap();
    assert_eq!(summary.status, SummaryStatus::InTransit);
    assert_eq!(summary.relevant_station_name.as_deref(), Some("North Avenue"));
    assert_eq!(summary.scheduled_time, Some(t("08:00:00")));
}

#[test]
fn simultaneous_turnarounds_are_staggered() {
    let model = model();
    let snapshot = model.snapshot(t("08:13:00"));
    let first = snapshot.state(TrainID(1)).unwrap();
    let second = snapshot.state(TrainID(3)).unwrap();
    for state in [first, second] {
        assert_eq!(state.activity, TrainActivity::TurningAround);
        assert_eq!(state.direction, Direction::Northbound);
        assert_eq!(state.station, Some(StationID(5)));
    }
    // Train 1 arrived first
    let offset = model.config.stagger_offset;
    assert_eq!(first.lane_offset, offset);
    assert_eq!(second.lane_offset, -offset);
    assert_eq!(first.turnaround_progress(), Some(0.5));

    // Once train 1 is back in service, train 3 turns around alone
    let snapshot = model.snapshot(t("08:15:30"));
    assert_eq!(
        snapshot.state(TrainID(1)).unwrap().activity,
        TrainActivity::Dwelling
    );
    let alone = snapshot.state(TrainID(3)).unwrap();
    assert_eq!(alone.activity, TrainActivity::TurningAround);
    assert_eq!(alone.lane_offset, 0.0);

    let summary = snapshot.describe(&model, TrainID(3)).unwrap();
    assert_eq!(summary.status, SummaryStatus::TurningAround);
    assert_eq!(summary.relevant_station_name.as_deref(), Some("Santolan"));
}

#[test]
fn staggering_is_repeatable() {
    let model = model();
    let first = model.train_states(t("08:13:00"));
    for _ in 0..5 {
        assert_eq!(model.train_states(t("08:13:00")), first);
    }
}

#[test]
fn withdrawn_train() {
    let model = model();
    let dwelling = model.snapshot(t("20:00:30"));
    assert_eq!(
        dwelling.state(TrainID(4)).unwrap().activity,
        TrainActivity::Dwelling
    );
    let summary = dwelling.describe(&model, TrainID(4)).unwrap();
    assert_eq!(summary.status, SummaryStatus::AtStation);
    assert_eq!(summary.relevant_station_name.as_deref(), Some("Quezon Avenue"));

    let gone = model.snapshot(t("20:02:00"));
    assert_eq!(
        gone.state(TrainID(4)).unwrap().activity,
        TrainActivity::InDepot
    );
    let summary = gone.describe(&model, TrainID(4)).unwrap();
    assert_eq!(summary.status, SummaryStatus::Inactive);
}

#[test]
fn service_types() {
    // The timetable doesn't declare a scheme, so everybody is AB
    let model = model();
    assert_eq!(model.scheme(), Scheme::Regular);
    for state in model.train_states(t("08:05:00")) {
        assert_eq!(state.service_type, ServiceType::AB);
    }

    let mut config = ProjectionConfig::default();
    config.scheme = Some(Scheme::SkipStop);
    let model = model_with(config);
    let snapshot = model.snapshot(t("08:05:00"));
    assert_eq!(
        snapshot.state(TrainID(1)).unwrap().service_type,
        ServiceType::A
    );
    assert_eq!(
        snapshot.state(TrainID(4)).unwrap().service_type,
        ServiceType::B
    );
    let ids: Vec<u32> = model
        .stopping_pattern(TrainID(4), t("08:05:00"))
        .into_iter()
        .map(|x| x.0)
        .collect();
    assert_eq!(ids, vec![1, 3, 4, 5]);
}

#[test]
fn unknown_trains() {
    let model = model();
    assert!(model.describe_train(TrainID(99), t("08:00:00")).is_none());
    assert_eq!(model.stopping_pattern(TrainID(99), t("08:00:00")).len(), 5);
}

#[test]
fn service_types_without_a_scheme_column() {
    let timetable = "TRAIN_ID,STATION_ID,DIRECTION,TRAIN_STATUS,ARRIVAL_TIME,DEPARTURE_TIME,SERVICE_TYPE\n\
                     2,1,SOUTHBOUND,ACTIVE,07:00:00,07:00:30,A\n\
                     2,3,SOUTHBOUND,ACTIVE,07:03:00,07:03:30,A\n\
                     5,5,NORTHBOUND,ACTIVE,07:00:00,07:00:30,\n\
                     5,3,NORTHBOUND,ACTIVE,07:03:00,07:03:30,\n";
    let (schedule, _) = schedule::load_csv(timetable.as_bytes()).unwrap();
    let stations = schedule::stations::load(STATIONS.as_bytes()).unwrap();
    let model = Model::new(schedule, stations, ProjectionConfig::default()).unwrap();
    assert_eq!(model.scheme(), Scheme::Regular);

    let snapshot = model.snapshot(t("07:01:00"));
    // The data says A, even though nothing declared a skip-stop run
    assert_eq!(
        snapshot.state(TrainID(2)).unwrap().service_type,
        ServiceType::A
    );
    let ids: Vec<u32> = model
        .stopping_pattern(TrainID(2), t("07:01:00"))
        .into_iter()
        .map(|x| x.0)
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 5]);

    // Untagged trains in a regular run stop everywhere
    assert_eq!(
        snapshot.state(TrainID(5)).unwrap().service_type,
        ServiceType::AB
    );
    assert_eq!(model.stopping_pattern(TrainID(5), t("07:01:00")).len(), 5);
}
