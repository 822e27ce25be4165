use std::error::Error;
use std::fs::File;
use std::process;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use csv::{ReaderBuilder, Trim};
use log::warn;

use adaptive_scheduler::constants::{DEFAULT_SWITCH_THRESHOLD, DEFAULT_WINDOW_SIZE};
use adaptive_scheduler::scheduler::AdaptiveConfig;
use adaptive_scheduler::simulation::{compare, simulate};
use adaptive_scheduler::{
    write_timeline_csv, Mode, SimulationCode, SimulationReport, Task, TaskSet, TimeStep,
};

/// Upper bound on the run length picked when `--steps` is not given.
const MAX_DEFAULT_STEPS: TimeStep = 100_000;

/// Reads a task set file and returns a `TaskSet`.
///
/// One task per line: `period, exec_time[, deadline]`. Ids are assigned in
/// file order starting at 1.
pub fn read_task_file(file_path: &str) -> Result<TaskSet, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_path(file_path)?;
    let mut tasks = Vec::new();

    let mut id = 1;

    for result in rdr.records() {
        let record = result?;
        if record.len() < 2 || record.len() > 3 {
            return Err(format!("line {}: expected 'period, exec_time[, deadline]'", id).into());
        }

        let period: TimeStep = record[0].parse()?;
        let exec_time: TimeStep = record[1].parse()?;
        let deadline: Option<TimeStep> = match record.get(2) {
            Some(field) if !field.is_empty() => Some(field.parse()?),
            _ => None,
        };

        tasks.push(Task::new(id, period, exec_time, deadline)?);
        id += 1;
    }

    Ok(TaskSet::new(tasks)?)
}

pub fn build_cli_command() -> Command {
    Command::new("adaptive-scheduler")
        .version("0.1.0")
        .about("Simulates RM/EDF scheduling of periodic tasks on one processor, switching to EDF under overload")

        .arg(Arg::new("task_file")
            .required(true)
            .help("Path to the task set file"))

        .arg(Arg::new("policy")
            .short('p')
            .long("policy")
            .help("Initial scheduling policy")
            .value_parser(["rm", "edf"])
            .default_value("rm"))

        .arg(Arg::new("steps")
            .short('n')
            .long("steps")
            .help(format!("Number of time units to simulate (defaults to the hyperperiod, at most {})", MAX_DEFAULT_STEPS))
            .value_parser(value_parser!(usize)))

        .arg(Arg::new("window")
            .short('w')
            .long("window")
            .help(format!("Number of trailing steps inspected for deadline misses [default: {}]", DEFAULT_WINDOW_SIZE))
            .value_parser(value_parser!(usize)))

        .arg(Arg::new("threshold")
            .short('t')
            .long("threshold")
            .help(format!("Switch to EDF when the window holds more miss steps than this [default: {}]", DEFAULT_SWITCH_THRESHOLD))
            .value_parser(value_parser!(usize)))

        .arg(Arg::new("no-adapt")
            .long("no-adapt")
            .help("Never switch policy")
            .action(ArgAction::SetTrue))

        .arg(Arg::new("compare")
            .short('c')
            .long("compare")
            .help("Run RM only, EDF only and adaptive scheduling side by side")
            .conflicts_with("policy")
            .action(ArgAction::SetTrue))

        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .help("Write the timeline as CSV to this file"))
}

/// Run length when `--steps` is absent: the hyperperiod, capped.
fn default_steps(taskset: &TaskSet) -> TimeStep {
    match taskset.hyperperiod() {
        Ok(hyperperiod) if hyperperiod <= MAX_DEFAULT_STEPS => hyperperiod,
        Ok(hyperperiod) => {
            warn!("hyperperiod {} too long, simulating {} steps (use -n to override)", hyperperiod, MAX_DEFAULT_STEPS);
            MAX_DEFAULT_STEPS
        }
        Err(e) => {
            warn!("{}, simulating {} steps (use -n to override)", e, MAX_DEFAULT_STEPS);
            MAX_DEFAULT_STEPS
        }
    }
}

/// Builds the adaptation settings from the parsed arguments.
fn adaptive_config(matches: &ArgMatches) -> AdaptiveConfig {
    let window = matches.get_one::<usize>("window").copied().unwrap_or(DEFAULT_WINDOW_SIZE);
    if matches.get_flag("no-adapt") {
        return AdaptiveConfig { window_size: window, ..AdaptiveConfig::disabled() };
    }
    let threshold = matches.get_one::<usize>("threshold").copied().unwrap_or(DEFAULT_SWITCH_THRESHOLD);
    AdaptiveConfig::new(window, threshold)
}

fn print_report(report: &SimulationReport) {
    println!("Timeline (task id per time unit, 0 = idle):");
    println!("{:?}", report.timeline_values());
    println!();
    println!("Task statistics:");
    for stats in report.tasks.iter() {
        println!("Task {}: completed={}, missed_deadlines={}", stats.id, stats.completed, stats.missed);
    }
    println!(
        "Total: completed={}, missed={}, idle={}/{}",
        report.total_completed(),
        report.total_missed(),
        report.idle_steps(),
        report.steps()
    );
    match report.switched_at {
        Some(t) => println!("Mode: {} -> {} at t={}", report.initial_mode, report.final_mode, t),
        None => println!("Mode: {}", report.final_mode),
    }
}

fn write_output(path: &str, report: &SimulationReport) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    write_timeline_csv(report, file)?;
    Ok(())
}

fn main() {
    // cargo run <task_file> [-p rm|edf] [-n <steps>] [-w <window>] [-t <threshold>] [--no-adapt] [-c] [-o <csv>]
    // example : cargo run tasks.csv -p rm -n 200 -o timeline.csv
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches: ArgMatches = build_cli_command().get_matches();

    let task_file = matches.get_one::<String>("task_file").map(String::as_str).unwrap_or_default();
    let taskset = match read_task_file(task_file) {
        Ok(taskset) => taskset,
        Err(e) => {
            eprintln!("Error reading task file: {}", e);
            process::exit(SimulationCode::InvalidInput as i32);
        }
    };
    if taskset.is_empty() {
        warn!("task file {} defines no task", task_file);
    }

    let mode: Mode = matches
        .get_one::<String>("policy")
        .and_then(|p| p.parse().ok())
        .unwrap_or_default();
    let steps = matches.get_one::<usize>("steps").copied().unwrap_or_else(|| default_steps(&taskset));
    let config = adaptive_config(&matches);

    println!("Task set: {} tasks, utilisation {:.3}, {} steps", taskset.len(), taskset.utilisation(), steps);

    let reports = if matches.get_flag("compare") {
        compare(&taskset, config, steps).map(|results| {
            results
                .into_iter()
                .map(|(strategy, report)| (strategy.to_string(), report))
                .collect::<Vec<_>>()
        })
    } else {
        simulate(&taskset, mode, config, steps).map(|report| vec![(mode.to_string(), report)])
    };
    let reports = match reports {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(SimulationCode::InvalidInput as i32);
        }
    };

    for (name, report) in reports.iter() {
        println!();
        println!("=== {} ===", name);
        print_report(report);
    }

    if let Some(path) = matches.get_one::<String>("output") {
        // In comparison mode the last run is the adaptive one.
        if let Some((_, report)) = reports.last() {
            if let Err(e) = write_output(path, report) {
                eprintln!("Error writing timeline: {}", e);
                process::exit(SimulationCode::InvalidInput as i32);
            }
        }
    }

    let code = if reports.iter().all(|(_, report)| report.all_deadlines_met()) {
        SimulationCode::DeadlinesMet
    } else {
        SimulationCode::DeadlinesMissed
    };
    process::exit(code as i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_task_file_valid() {
        let task_file_content = "\
            10, 8\n\
            15, 7, 12\n\
            20, 10";
        let file_path = "test_tasks_valid.csv";

        std::fs::write(file_path, task_file_content).expect("Unable to write test file");

        let taskset = read_task_file(file_path).expect("Failed to read task set");
        std::fs::remove_file(file_path).expect("Failed to clean up test file");

        assert_eq!(taskset.len(), 3);
        let task = &taskset.get_tasks()[1];
        assert_eq!(task.id(), 2);
        assert_eq!(task.period(), 15);
        assert_eq!(task.exec_time(), 7);
        assert_eq!(task.relative_deadline(), 12);
        assert_eq!(taskset.get_tasks()[2].relative_deadline(), 20);
    }

    #[test]
    fn test_read_task_file_invalid_format() {
        let file_path = "test_tasks_invalid.csv";
        std::fs::write(file_path, "Invalid, Data").expect("Unable to write test file");

        let result = read_task_file(file_path);
        std::fs::remove_file(file_path).expect("Failed to clean up test file");

        assert!(result.is_err());
    }

    #[test]
    fn test_read_task_file_ids_start_at_one() {
        let file_path = "test_tasks_ids.csv";
        std::fs::write(file_path, "5, 1\n7, 2").expect("Unable to write test file");

        let taskset = read_task_file(file_path).expect("Failed to read task set");
        std::fs::remove_file(file_path).expect("Failed to clean up test file");

        assert!(taskset.get_task_by_id(0).is_none());
        assert_eq!(taskset.get_task_by_id(1).unwrap().period(), 5);
    }

    #[test]
    fn test_read_task_file_zero_period() {
        let file_path = "test_tasks_zero.csv";
        std::fs::write(file_path, "0, 1").expect("Unable to write test file");

        let result = read_task_file(file_path);
        std::fs::remove_file(file_path).expect("Failed to clean up test file");

        assert!(result.unwrap_err().to_string().contains("period must be positive"));
    }

    #[test]
    fn test_command_line_arguments() {
        let matches = build_cli_command().try_get_matches_from(vec![
            "adaptive-scheduler",
            "tasks.csv",
            "-n",
            "200",
            "-w",
            "20",
            "--compare",
        ]);

        assert!(matches.is_ok());
        let matches = matches.unwrap();

        assert_eq!(matches.get_one::<String>("task_file").unwrap(), "tasks.csv");
        assert_eq!(matches.get_one::<String>("policy").unwrap(), "rm");
        assert_eq!(*matches.get_one::<usize>("steps").unwrap(), 200);
        assert!(matches.get_flag("compare"));

        let config = adaptive_config(&matches);
        assert_eq!(config, AdaptiveConfig::new(20, DEFAULT_SWITCH_THRESHOLD));
    }

    #[test]
    fn test_compare_conflicts_with_policy() {
        let matches = build_cli_command()
            .try_get_matches_from(vec!["adaptive-scheduler", "tasks.csv", "-p", "edf", "--compare"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_default_steps_capped() {
        let small = TaskSet::new(vec![Task::new(1, 10, 1, None).unwrap(), Task::new(2, 15, 1, None).unwrap()]).unwrap();
        assert_eq!(default_steps(&small), 30);

        let coprime = TaskSet::new(vec![
            Task::new(1, 997, 1, None).unwrap(),
            Task::new(2, 991, 1, None).unwrap(),
            Task::new(3, 983, 1, None).unwrap(),
        ])
        .unwrap();
        assert_eq!(default_steps(&coprime), MAX_DEFAULT_STEPS);

        let overflowing = TaskSet::new(vec![
            Task::new(1, 4_294_967_291, 1, None).unwrap(),
            Task::new(2, 4_294_967_279, 1, None).unwrap(),
            Task::new(3, 4_294_967_231, 1, None).unwrap(),
        ])
        .unwrap();
        assert_eq!(default_steps(&overflowing), MAX_DEFAULT_STEPS);
    }

    #[test]
    fn test_no_adapt_disables_switch() {
        let matches = build_cli_command()
            .try_get_matches_from(vec!["adaptive-scheduler", "tasks.csv", "--no-adapt"])
            .unwrap();

        let config = adaptive_config(&matches);
        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
        assert_eq!(config.switch_threshold, usize::MAX);
        assert!(matches.get_one::<usize>("steps").is_none());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let matches = build_cli_command().try_get_matches_from(vec!["adaptive-scheduler", "tasks.csv", "-p", "llf"]);
        assert!(matches.is_err());
    }
}
