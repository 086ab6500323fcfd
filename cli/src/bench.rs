//! A throughput microbenchmark over randomly generated instances, grounded on
//! the original `executables/speed_tests/main.cpp` driver: generate N
//! instances of a chosen size, run the allocation search over each, and
//! report aggregate timing and node statistics. Unlike the original, process
//! management (multiple named scenarios, file-based problem fixtures) is not
//! carried over — only the size/seed-driven generation loop is.

use itags_core::{Configuration, Plan, ProblemInputs, Robot, Species, Task, Timekeeper, TraitAggregation};
use itags_oracle::EuclideanOracle;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Args;

pub struct BenchReport {
    pub instances: u32,
    pub goals_found: u32,
    pub total_nodes_evaluated: u64,
    pub total_nodes_pruned: u64,
    pub search_time: std::time::Duration,
}

fn random_configuration(rng: &mut SmallRng, extent: f64) -> Configuration {
    Configuration::new(rng.random_range(0.0..extent), rng.random_range(0.0..extent), rng.random_range(0.0..std::f64::consts::TAU))
}

fn random_problem(rng: &mut SmallRng, num_tasks: usize, num_robots: usize) -> ProblemInputs {
    let species = vec![Species {
        name: "generated".into(),
        traits: vec![],
        bounding_radius: 0.3,
        speed: 1.0,
        motion_planner_index: 0,
    }];
    let robots = (0..num_robots)
        .map(|i| Robot {
            name: format!("r{i}"),
            species: 0,
            initial_configuration: random_configuration(rng, 10.0),
        })
        .collect();
    let tasks = (0..num_tasks)
        .map(|i| Task {
            name: format!("t{i}"),
            duration: rng.random_range(1.0..5.0),
            desired_traits: vec![],
            linear_quality_coefficients: vec![],
            initial_configuration: random_configuration(rng, 10.0),
            terminal_configuration: random_configuration(rng, 10.0),
        })
        .collect();
    let itags_parameters = serde_json::from_value(serde_json::json!({
        "config_type": "best_first_search",
        "has_timeout": true,
        "timeout": 10.0,
        "timer_name": "itags",
    }))
    .expect("literal search parameters are well-formed");
    let scheduler_parameters = serde_json::from_value(serde_json::json!({
        "config_type": "deterministic_milp_scheduler",
        "timeout": 5.0,
        "milp_timeout": 5.0,
    }))
    .expect("literal scheduler parameters are well-formed");

    ProblemInputs {
        tasks,
        robots,
        species,
        motion_planners: vec![],
        plan: Plan::new(num_tasks, None, &[]).expect("an empty precedence set never cycles"),
        use_reverse: false,
        best_schedule: None,
        worst_schedule: None,
        itags_parameters,
        scheduler_parameters,
        trait_aggregation: Vec::<TraitAggregation>::new(),
    }
}

pub fn run(args: &Args) -> BenchReport {
    let mut rng = SmallRng::seed_from_u64(args.bench_seed);
    let timekeeper = Timekeeper::new();
    let mut report = BenchReport {
        instances: args.bench_instances,
        goals_found: 0,
        total_nodes_evaluated: 0,
        total_nodes_pruned: 0,
        search_time: std::time::Duration::ZERO,
    };

    for instance in 0..args.bench_instances {
        let problem = random_problem(&mut rng, args.bench_tasks, args.bench_robots);
        let oracle = EuclideanOracle::from_problem(&problem);
        let bucket = format!("bench-{instance}");
        let outcome = timekeeper.time(&bucket, || itags_search::search(&problem, &oracle, &timekeeper));
        report.search_time += timekeeper.elapsed(&bucket);
        report.total_nodes_evaluated += outcome.statistics.nodes_evaluated;
        report.total_nodes_pruned += outcome.statistics.nodes_pruned;
        if matches!(outcome.result, itags_search::SearchResult::Goal(_)) {
            report.goals_found += 1;
        }
        tracing::debug!(instance, nodes_evaluated = outcome.statistics.nodes_evaluated, "bench instance complete");
    }

    report
}
