//! # rrsim
//!
//! Main entry point for the round-robin scheduler simulation.

use rrsim::{parse_args, usage, HostRuntime};
use services_logger::ConsoleLogger;
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("rrsim");

    let options = parse_args(args.get(1..).unwrap_or_default()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("{}", usage(program));
        process::exit(1);
    });

    if options.show_help {
        println!("{}", usage(program));
        return;
    }

    if let Err(e) = ConsoleLogger::init(options.log_level) {
        eprintln!("Failed to install logger: {}", e);
    }

    let runtime = HostRuntime::new(options).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    let report = runtime.run().unwrap_or_else(|e| {
        eprintln!("Simulation error: {}", e);
        process::exit(1);
    });

    match runtime.render(&report) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Failed to render report: {}", e);
            process::exit(1);
        }
    }
}
