mod bench;
mod error;
mod output;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use itags_core::{ProblemInputs, ProblemInputsJson, Timekeeper};
use itags_oracle::EuclideanOracle;

use error::CliError;

/// Allocates, schedules and searches a coordination problem instance.
#[derive(Parser, Debug)]
#[command(version, about = "Allocation and scheduling search for multi-robot task coordination.", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a problem JSON document. Required unless `bench` is used.
    #[arg(value_name = "FILE")]
    pub problem: Option<PathBuf>,

    /// Random seed for `bench` instance generation.
    #[arg(long, default_value_t = 0)]
    pub bench_seed: u64,

    /// Number of randomly generated instances to run in `bench` mode.
    #[arg(long, default_value_t = 10)]
    pub bench_instances: u32,

    /// Tasks per generated instance in `bench` mode.
    #[arg(long, default_value_t = 10)]
    pub bench_tasks: usize,

    /// Robots per generated instance in `bench` mode.
    #[arg(long, default_value_t = 5)]
    pub bench_robots: usize,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the allocation search over randomly generated instances and
    /// report aggregate timing and node statistics, instead of solving a
    /// single problem file.
    Bench,
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_target(false)
        .init();
}

fn load_problem(path: &PathBuf) -> Result<ProblemInputs, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Io { path: path.clone(), source })?;
    let doc: ProblemInputsJson = serde_json::from_str(&content)?;
    Ok(ProblemInputs::from_json(doc)?)
}

fn run(args: &Args) -> Result<output::ResultJson, CliError> {
    let Some(problem_path) = &args.problem else {
        exit_missing_problem();
    };
    let problem = load_problem(problem_path)?;
    let oracle = EuclideanOracle::from_problem(&problem);
    let timekeeper = Timekeeper::new();
    let outcome = itags_search::search(&problem, &oracle, &timekeeper);
    Ok(output::render(outcome))
}

/// `Args::problem` is only optional because `bench` doesn't need it; reaching
/// here with neither a subcommand nor a file is a usage error clap's own
/// parser cannot express with `required_unless_present` across a positional
/// and a subcommand, so it is checked here instead.
fn exit_missing_problem() -> ! {
    eprintln!("error: a problem file is required unless running `bench`");
    std::process::exit(2);
}

fn main() -> ExitCode {
    let orig_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        orig_hook(panic_info);
        std::process::exit(1);
    }));

    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Some(Command::Bench) => {
            let report = bench::run(&args);
            println!(
                "{}",
                serde_json::json!({
                    "instances": report.instances,
                    "goals_found": report.goals_found,
                    "total_nodes_evaluated": report.total_nodes_evaluated,
                    "total_nodes_pruned": report.total_nodes_pruned,
                    "search_time_seconds": report.search_time.as_secs_f64(),
                })
            );
            ExitCode::SUCCESS
        }
        None => match run(&args) {
            Ok(result) => {
                println!("{}", serde_json::to_string_pretty(&result).expect("ResultJson always serializes"));
                if result.success {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(1)
                }
            }
            Err(err) => {
                tracing::error!(%err, "run failed");
                ExitCode::from(err.exit_code() as u8)
            }
        },
    }
}
