//! # Command-line options
//!
//! Configuration is layered: defaults, then the JSON file given with
//! `--config`, then individual flags.

use crate::runtime::{ActorMode, HostRuntimeError, OutputFormat};
use log::LevelFilter;
use sim_kernel::SchedulerConfig;
use std::fs;

/// Everything the host needs to run one simulation
#[derive(Debug, Clone, PartialEq)]
pub struct HostOptions {
    pub config: SchedulerConfig,
    pub mode: ActorMode,
    pub output: OutputFormat,
    pub log_level: LevelFilter,
    pub show_help: bool,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            config: SchedulerConfig::default(),
            mode: ActorMode::Threaded,
            output: OutputFormat::Text,
            log_level: LevelFilter::Info,
            show_help: false,
        }
    }
}

/// Parses `args` (without the program name)
pub fn parse_args(args: &[String]) -> Result<HostOptions, HostRuntimeError> {
    let mut options = HostOptions::default();

    if let Some(path) = flag_value(args, "--config")? {
        let text = fs::read_to_string(path)?;
        options.config = SchedulerConfig::from_json(&text)?;
    }

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
            }
            "--processes" | "-n" => {
                i += 1;
                options.config.process_count = parse_number(args, i, "--processes")?;
            }
            "--quantum" | "-q" => {
                i += 1;
                options.config.time_quantum = parse_number(args, i, "--quantum")?;
            }
            "--max-burst" => {
                i += 1;
                options.config.max_cpu_burst = parse_number(args, i, "--max-burst")?;
            }
            "--max-io-wait" => {
                i += 1;
                options.config.max_io_wait = parse_number(args, i, "--max-io-wait")?;
            }
            "--io-percent" => {
                i += 1;
                options.config.io_request_percent = parse_number(args, i, "--io-percent")?;
            }
            "--bursts" => {
                i += 1;
                let list = value_at(args, i, "--bursts")?;
                let bursts = list
                    .split(',')
                    .map(|part| {
                        part.trim().parse::<u32>().map_err(|_| {
                            HostRuntimeError::Usage(format!("Invalid burst value: {}", part))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                options.config.process_count = bursts.len();
                options.config.initial_bursts = Some(bursts);
            }
            "--seed" => {
                i += 1;
                options.config.seed = Some(parse_number(args, i, "--seed")?);
            }
            "--tick-ms" => {
                i += 1;
                options.config.tick_interval_ms = parse_number(args, i, "--tick-ms")?;
            }
            "--max-ticks" => {
                i += 1;
                options.config.max_ticks = Some(parse_number(args, i, "--max-ticks")?);
            }
            "--inline" => {
                options.mode = ActorMode::Inline;
            }
            "--json" => {
                options.output = OutputFormat::Json;
            }
            "--verbose" | "-v" => {
                options.log_level = LevelFilter::Debug;
            }
            "--quiet" => {
                options.log_level = LevelFilter::Warn;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            other => {
                return Err(HostRuntimeError::Usage(format!("Unknown option: {}", other)));
            }
        }
        i += 1;
    }

    options.config.validate()?;
    Ok(options)
}

/// Usage text
pub fn usage(program: &str) -> String {
    [
        format!("Usage: {} [OPTIONS]", program),
        String::new(),
        "Options:".to_string(),
        "  -n, --processes <N>      Number of simulated processes (default 10)".to_string(),
        "  -q, --quantum <T>        Time quantum in ticks (default 5)".to_string(),
        "  --max-burst <T>          Upper bound of random CPU bursts (default 10)".to_string(),
        "  --max-io-wait <T>        Upper bound of random I/O waits (default 5)".to_string(),
        "  --io-percent <P>         Chance of an I/O request per tick (default 20)".to_string(),
        "  --bursts <A,B,...>       Fixed bursts; sets the process count".to_string(),
        "  --seed <S>               Seed every random draw".to_string(),
        "  --tick-ms <MS>           Wall-clock delay between ticks (default 0)".to_string(),
        "  --max-ticks <T>          Abort after T ticks".to_string(),
        "  --config <FILE>          JSON configuration, overridden by flags".to_string(),
        "  --inline                 Run actors on the kernel thread".to_string(),
        "  --json                   Print the report as JSON".to_string(),
        "  -v, --verbose            Include actor narration".to_string(),
        "  --quiet                  Only warnings and the report".to_string(),
        "  -h, --help               Show this help message".to_string(),
    ]
    .join("\n")
}

fn value_at<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, HostRuntimeError> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| HostRuntimeError::Usage(format!("Missing value for {}", flag)))
}

fn parse_number<T: std::str::FromStr>(
    args: &[String],
    i: usize,
    flag: &str,
) -> Result<T, HostRuntimeError> {
    let value = value_at(args, i, flag)?;
    value
        .parse()
        .map_err(|_| HostRuntimeError::Usage(format!("Invalid {} value: {}", flag, value)))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>, HostRuntimeError> {
    match args.iter().position(|arg| arg == flag) {
        Some(index) => value_at(args, index + 1, flag).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_kernel::ConfigError;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let options = parse_args(&[]).unwrap();
        assert_eq!(options, HostOptions::default());
    }

    #[test]
    fn test_numeric_flags() {
        let options = parse_args(&args(&[
            "-n", "4", "-q", "2", "--max-burst", "7", "--max-io-wait", "3", "--io-percent",
            "0", "--seed", "9", "--max-ticks", "500",
        ]))
        .unwrap();
        assert_eq!(options.config.process_count, 4);
        assert_eq!(options.config.time_quantum, 2);
        assert_eq!(options.config.max_cpu_burst, 7);
        assert_eq!(options.config.max_io_wait, 3);
        assert_eq!(options.config.io_request_percent, 0);
        assert_eq!(options.config.seed, Some(9));
        assert_eq!(options.config.max_ticks, Some(500));
    }

    #[test]
    fn test_bursts_set_process_count() {
        let options = parse_args(&args(&["--bursts", "3, 1,4"])).unwrap();
        assert_eq!(options.config.process_count, 3);
        assert_eq!(options.config.initial_bursts, Some(vec![3, 1, 4]));
    }

    #[test]
    fn test_mode_and_output_flags() {
        let options = parse_args(&args(&["--inline", "--json", "-v"])).unwrap();
        assert_eq!(options.mode, ActorMode::Inline);
        assert_eq!(options.output, OutputFormat::Json);
        assert_eq!(options.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_missing_value() {
        assert!(matches!(
            parse_args(&args(&["--quantum"])),
            Err(HostRuntimeError::Usage(_))
        ));
    }

    #[test]
    fn test_unknown_option() {
        assert!(matches!(
            parse_args(&args(&["--frobnicate"])),
            Err(HostRuntimeError::Usage(_))
        ));
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        assert!(matches!(
            parse_args(&args(&["--quantum", "0"])),
            Err(HostRuntimeError::Config(ConfigError::ZeroQuantum))
        ));
    }

    #[test]
    fn test_usage_mentions_every_flag() {
        let text = usage("rrsim");
        for flag in ["--processes", "--quantum", "--bursts", "--config", "--inline", "--json"] {
            assert!(text.contains(flag), "missing {}", flag);
        }
    }
}
