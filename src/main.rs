use anyhow::{Context, Result};
use clap::{arg, ArgMatches, Command};
use std::io::Read;
use std::{fs, path::PathBuf};
use tracing::warn;
use u_league::{logging, LeagueConfig, LeagueScheduler, ScheduleRequest};

fn cli() -> Command {
    Command::new("u-league")
        .about("Builds a league schedule from a JSON request")
        .arg_required_else_help(true)
        .arg(arg!(<REQUEST> "Path to the request json file, or '-' for stdin"))
        .arg(
            arg!(--config <FILE> "Path to a json configuration file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(--output <FILE> "Write the response here instead of stdout")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(arg!(--pretty "Pretty-print the response json"))
}

fn main() {
    logging::init();
    let matches = cli().get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            LeagueConfig::from_json(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => LeagueConfig::default(),
    };

    let source = matches
        .get_one::<String>("REQUEST")
        .context("missing request argument")?;
    let request = ScheduleRequest::from_json(&load_request(source)?)?;

    let response = LeagueScheduler::new(config).run(&request)?;
    if let Some(warning) = &response.warning {
        warn!("{warning}");
    }

    let json = if matches.get_flag("pretty") {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };

    match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn load_request(source: &str) -> Result<String> {
    if source == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("reading request from stdin")?;
        Ok(raw)
    } else {
        fs::read_to_string(source).with_context(|| format!("reading request {source}"))
    }
}
