//! avdlaunch CLI
//!
//! Usage:
//!   avdlaunch              # interactive: select AVDs, pick a strategy, launch
//!   avdlaunch --list       # print the available AVDs and exit
//!   avdlaunch --plain      # force the minimal selector UI
//!   avdlaunch -V           # show version

use avdlaunch::cli::Args;
use avdlaunch::pipeline::{self, PipelineError};
use avdlaunch::spawn::EmulatorSpawner;
use avdlaunch::ui::{self, UiError};
use avdlaunch::{config, inventory};

#[tokio::main]
async fn main() {
    let args: Args = argh::from_env();

    let log_level = match args.log_level.to_lowercase().as_str() {
        "error" => "error",
        "warn" => "warn",
        "info" => "info",
        "debug" => "debug",
        "trace" => "trace",
        _ => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .init();

    if args.version {
        println!("avdlaunch {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let emulator = config::emulator_binary();

    if args.list {
        match inventory::fetch(&emulator).await {
            Ok(devices) => {
                println!("Available AVDs:");
                for (index, name) in devices.iter().enumerate() {
                    println!("  {}. {}", index + 1, name);
                }
                println!();
                println!("{} AVD(s) found", devices.len());
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Spawned terminals are OS-detached, so an interrupt can abandon any
    // in-flight launches and leave immediately.
    ctrlc::set_handler(|| {
        println!("\nInterrupted. Goodbye!");
        std::process::exit(0);
    })
    .expect("Error setting Ctrl+C handler");

    let ui = ui::new_ui(args.plain);
    let spawner = EmulatorSpawner::new(emulator.clone());

    match pipeline::run(ui.as_ref(), &spawner, &emulator).await {
        Ok(()) => println!("Goodbye!"),
        Err(PipelineError::Ui(UiError::Interrupted)) => println!("\nGoodbye!"),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
