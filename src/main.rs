use std::process;
use log::{error, Level};

use geofence::commands::{build_cli, CommandFactory, GeoFenceCommandFactory};
use geofence::utils::logger::Logger;

fn main() {
    let matches = build_cli().get_matches();

    let level = if matches.get_flag("verbose") { Level::Debug } else { Level::Info };
    match matches.get_one::<String>("log-to-file") {
        Some(path) => {
            if let Err(e) = Logger::init_global_logger(path, level) {
                eprintln!("Error setting up global logger: {}", e);
                process::exit(1);
            }
        },
        None => {
            env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(level.as_str().to_lowercase())
            ).init();
        },
    }

    let log_file = matches.get_one::<String>("log-file")
        .map(String::as_str)
        .unwrap_or("geofence.log");
    let logger = match Logger::new(log_file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    let factory = GeoFenceCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
