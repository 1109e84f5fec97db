//! Integration tests for the rrsim host runtime

use core_types::Pid;
use rrsim::{parse_args, ActorMode, HostOptions, HostRuntime, OutputFormat};
use sim_kernel::{SchedulerConfig, SimulationReport};
use std::fs;

fn options(mode: ActorMode, config: SchedulerConfig) -> HostOptions {
    HostOptions {
        config,
        mode,
        ..HostOptions::default()
    }
}

fn seeded(process_count: usize) -> SchedulerConfig {
    SchedulerConfig {
        process_count,
        seed: Some(2024),
        max_ticks: Some(100_000),
        ..Default::default()
    }
}

#[test]
fn test_inline_run_completes() {
    let runtime = HostRuntime::new(options(ActorMode::Inline, seeded(10))).unwrap();
    let report = runtime.run().unwrap();

    assert_eq!(report.processes.len(), 10);
    assert!(report.processes.iter().all(|p| p.completed_at.is_some()));
    assert!(report.total_ticks >= report.processes.iter().map(|p| p.initial_burst as u64).sum());
}

#[test]
fn test_threaded_run_completes() {
    let runtime = HostRuntime::new(options(ActorMode::Threaded, seeded(6))).unwrap();
    let report = runtime.run().unwrap();

    assert_eq!(report.processes.len(), 6);
    assert!(report.processes.iter().all(|p| p.completed_at.is_some()));
}

#[test]
fn test_threaded_and_inline_agree() {
    // Same seed, same event order: the port must not change the outcome.
    let inline = HostRuntime::new(options(ActorMode::Inline, seeded(5)))
        .unwrap()
        .run()
        .unwrap();
    let threaded = HostRuntime::new(options(ActorMode::Threaded, seeded(5)))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(inline.processes, threaded.processes);
    assert_eq!(inline.total_ticks, threaded.total_ticks);
}

#[test]
fn test_fixed_bursts_without_io() {
    let args: Vec<String> = ["--bursts", "3,2", "--quantum", "1", "--io-percent", "0", "--inline"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let report = HostRuntime::new(parse_args(&args).unwrap())
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.total_ticks, 5);
    assert_eq!(report.process(Pid::new(0)).unwrap().initial_burst, 3);
    assert_eq!(report.process(Pid::new(1)).unwrap().completed_at, Some(4));
}

#[test]
fn test_json_rendering() {
    let mut host = options(ActorMode::Inline, seeded(3));
    host.output = OutputFormat::Json;
    let runtime = HostRuntime::new(host).unwrap();
    let report = runtime.run().unwrap();
    assert_eq!(runtime.options().output, OutputFormat::Json);

    let json = runtime.render(&report).unwrap();
    let parsed: SimulationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.processes, report.processes);
}

#[test]
fn test_config_file_then_flags() {
    let path = std::env::temp_dir().join(format!("rrsim-config-{}.json", std::process::id()));
    fs::write(&path, r#"{"process_count": 4, "time_quantum": 3, "seed": 1}"#).unwrap();

    let args: Vec<String> = vec![
        "--config".to_string(),
        path.to_string_lossy().into_owned(),
        "--quantum".to_string(),
        "2".to_string(),
    ];
    let options = parse_args(&args).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(options.config.process_count, 4);
    assert_eq!(options.config.time_quantum, 2);
    assert_eq!(options.config.seed, Some(1));
}
