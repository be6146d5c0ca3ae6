//! `trakk` command line front end.
#![allow(clippy::print_stdout, reason = "CLI output goes to stdout")]
#![allow(clippy::print_stderr, reason = "CLI errors go to stderr")]

use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::sync::Arc;
use trakk_lib::commands;
use trakk_lib::config::{default_config_path, TrackerConfig};
use trakk_lib::error::AppError;
use trakk_lib::platform::NativeTracker;
use trakk_lib::tracker::{TrackerEvent, TrackerService};
use trakk_lib::validation::parse_date;

#[derive(Parser, Debug)]
#[command(author, version, about = "Log time spent in configured desktop applications")]
struct Args {
    #[arg(long, global = true, help = "Config file (default: platform config dir)", value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Override the daily log file", value_name = "PATH")]
    data_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Override the HTML report file", value_name = "PATH")]
    report_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Track the configured apps until Ctrl-C
    Track,
    /// Print per-app totals for a day
    Summary {
        #[arg(long, help = "Day to summarize (default: today)", value_name = "YYYY-MM-DD")]
        date: Option<String>,
        #[arg(long, help = "Print totals as JSON")]
        json: bool,
    },
    /// Regenerate the HTML report and show today's total
    Report,
    /// Print the effective configuration
    Config {
        #[arg(long, help = "Write a default config file if none exists")]
        init: bool,
    },
}

fn main() {
    trakk_lib::init_logging();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn config_path(args: &Args) -> Result<PathBuf, AppError> {
    match &args.config {
        Some(path) => Ok(path.clone()),
        None => default_config_path(),
    }
}

fn load_config(args: &Args) -> Result<TrackerConfig, AppError> {
    let mut config = TrackerConfig::load(&config_path(args)?)?;
    if let Some(path) = &args.data_file {
        config.data_file = Some(path.clone());
    }
    if let Some(path) = &args.report_file {
        config.report_file = Some(path.clone());
    }
    Ok(config)
}

fn run(args: &Args) -> Result<(), AppError> {
    match &args.command {
        Command::Track => track(load_config(args)?),
        Command::Summary { date, json } => {
            let config = load_config(args)?;
            let date = match date {
                Some(raw) => parse_date(raw)?,
                None => Local::now().date_naive(),
            };
            match commands::day_summary(&config, date) {
                Ok(summary) if *json => println!("{}", serde_json::to_string_pretty(&summary)?),
                Ok(summary) if summary.apps.is_empty() => {
                    println!("No tracked activity on {}.", summary.date);
                }
                Ok(summary) => println!("{}", summary.text),
                Err(message) => exit_with(&message),
            }
            Ok(())
        }
        Command::Report => {
            let config = load_config(args)?;
            match commands::generate_report(&config, Local::now().date_naive()) {
                Ok(message) => println!("{message}"),
                Err(message) => exit_with(&message),
            }
            Ok(())
        }
        Command::Config { init } => {
            let path = config_path(args)?;
            if *init && !path.exists() {
                TrackerConfig::default().save(&path)?;
                println!("Wrote default config to {}", path.display());
            }
            let config = load_config(args)?;
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn exit_with(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

fn track(config: TrackerConfig) -> Result<(), AppError> {
    if config.apps_to_track.is_empty() {
        log::warn!("No apps configured in apps_to_track, nothing will be logged");
    }

    let probe = NativeTracker::new()?;

    let (tx, rx) = mpsc::channel();
    let service = Arc::new(TrackerService::new(config, tx));
    let handle = service.start(Box::new(probe))?;

    {
        let service = Arc::clone(&service);
        if let Err(e) = ctrlc::set_handler(move || service.stop()) {
            log::warn!("Could not install Ctrl-C handler: {e}");
        }
    }

    println!("{}", service.status_text());
    for event in rx {
        match event {
            TrackerEvent::Started => {}
            TrackerEvent::SessionLogged(session) => println!(
                "{} {}: {} - {} ({}s)",
                session.date, session.app, session.record.start, session.record.end, session.record.duration
            ),
            TrackerEvent::PersistFailed(message) => eprintln!("Could not save session: {message}"),
            TrackerEvent::Failed(message) => eprintln!("Tracking stopped: {message}"),
            TrackerEvent::Stopped => break,
        }
    }

    let result = handle.join().map_err(|_| AppError::ThreadPanicked)?;
    println!("{}", service.status_text());
    result
}
