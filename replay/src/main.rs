#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod clock;

use abstutil::{prettyprint_usize, Timer};
use anyhow::Result;
use geom::{Duration, Time};
use serde::Serialize;
use structopt::StructOpt;

use model::{Model, ProjectionConfig, Snapshot, StatusSummary, TrainActivity, TrainState};
use schedule::time::parse_time;
use schedule::{NormalizeReport, Schedule, TrainID};

use self::clock::Clock;

#[derive(StructOpt)]
#[structopt(name = "replay", about = "Projects train states from a simulated timetable")]
struct Args {
    /// The path to a timetable, as .csv or .json
    #[structopt(long)]
    schedule: String,
    /// The path to a CSV file describing stations along the line
    #[structopt(long)]
    stations: String,
    /// The path to a JSON file with projection settings
    #[structopt(long)]
    config: Option<String>,
    /// Show a single moment, like 07:30:00
    #[structopt(long)]
    time: Option<String>,
    /// Start of a replay
    #[structopt(long)]
    start: Option<String>,
    /// End of a replay
    #[structopt(long)]
    end: Option<String>,
    /// Seconds between replay ticks
    #[structopt(long, default_value = "60")]
    step: f64,
    /// Describe this train at every tick
    #[structopt(long)]
    train: Option<u32>,
    /// Print every train's state as JSON lines instead of a summary
    #[structopt(long)]
    json: bool,
}

impl Args {
    fn load(&self, timer: &mut Timer) -> Result<Model> {
        let config = match self.config {
            Some(ref path) => serde_json::from_slice(&fs_err::read(path)?)?,
            None => ProjectionConfig::default(),
        };

        timer.start("load timetable");
        let (schedule, report) = load_schedule(&self.schedule)?;
        timer.stop("load timetable");
        if report.num_skipped() > 0 || report.overlapping_events > 0 {
            warn!("Timetable problems: {}", report.describe());
        }

        timer.start("load stations");
        let stations = schedule::stations::load(fs_err::File::open(&self.stations)?)?;
        timer.stop("load stations");

        timer.start("calculate operational windows");
        let model = Model::new(schedule, stations, config)?;
        timer.stop("calculate operational windows");
        Ok(model)
    }

    fn clock(&self, model: &Model) -> Result<Clock> {
        if let Some(ref time) = self.time {
            if self.start.is_some() || self.end.is_some() {
                bail!("--time can't be combined with --start or --end");
            }
            let time = parse_arg_time(time)?;
            return Ok(Clock::new(time, time, Duration::ZERO));
        }

        // Default to the whole span the timetable covers
        let (first, last) = model
            .windows
            .values()
            .fold(None, |acc: Option<(Time, Time)>, w| {
                Some(match acc {
                    Some((t1, t2)) => (t1.min(w.first_event_time), t2.max(w.last_event_time)),
                    None => (w.first_event_time, w.last_event_time),
                })
            })
            .unwrap_or((Time::START_OF_DAY, Time::START_OF_DAY));
        let start = match self.start {
            Some(ref x) => parse_arg_time(x)?,
            None => first,
        };
        let end = match self.end {
            Some(ref x) => parse_arg_time(x)?,
            None => last,
        };
        if !self.step.is_finite() || self.step <= 0.0 {
            bail!("--step must be positive");
        }
        Ok(Clock::new(start, end, Duration::seconds(self.step)))
    }
}

fn load_schedule(path: &str) -> Result<(Schedule, NormalizeReport)> {
    let file = fs_err::File::open(path)?;
    if path.ends_with(".json") {
        schedule::load_json(file)
    } else if path.ends_with(".csv") {
        schedule::load_csv(file)
    } else {
        bail!("Don't know how to read {path}; expecting .csv or .json")
    }
}

fn parse_arg_time(raw: &str) -> Result<Time> {
    parse_time(raw).ok_or_else(|| anyhow!("Can't parse time {raw:?}"))
}

fn main() {
    abstutil::logger::setup();

    let args = Args::from_iter(abstutil::cli_args());
    if let Err(err) = run(args) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut timer = Timer::new("load replay");
    let model = args.load(&mut timer)?;
    drop(timer);

    let train = args.train.map(TrainID);
    for time in args.clock(&model)? {
        // Each tick replaces the last snapshot entirely
        let snapshot = model.snapshot(time);
        if args.json {
            print_json(&snapshot)?;
        } else {
            print_tally(&snapshot);
        }

        if let Some(train) = train {
            match snapshot.describe(&model, train) {
                Some(summary) => print_summary(&summary, args.json)?,
                None => bail!("{train} isn't in the timetable"),
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonLine<'a> {
    time: Time,
    #[serde(flatten)]
    state: &'a TrainState,
}

fn print_json(snapshot: &Snapshot) -> Result<()> {
    for state in snapshot.train_states() {
        println!(
            "{}",
            serde_json::to_string(&JsonLine {
                time: snapshot.time(),
                state,
            })?
        );
    }
    Ok(())
}

fn print_tally(snapshot: &Snapshot) {
    let cnt = snapshot.count_by_activity();
    println!(
        "{}: {} in depot, {} dwelling, {} moving, {} turning around, {} inserting",
        snapshot.time(),
        prettyprint_usize(cnt.get(TrainActivity::InDepot)),
        prettyprint_usize(cnt.get(TrainActivity::Dwelling)),
        prettyprint_usize(cnt.get(TrainActivity::InTransit)),
        prettyprint_usize(cnt.get(TrainActivity::TurningAround)),
        prettyprint_usize(cnt.get(TrainActivity::Inserting)),
    );
}

fn print_summary(summary: &StatusSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(summary)?);
    } else {
        println!("  {}", summary.describe());
    }
    Ok(())
}
