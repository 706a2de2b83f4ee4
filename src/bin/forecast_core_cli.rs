use std::{env, path::PathBuf, process};

use forecast_core::{
    config::ConfigManager,
    core::{
        services::{ForecastContext, ProjectionService, SavingsService, TrendsService},
        Clock, FixedClock, SystemClock,
    },
    domain::YearMonth,
    init,
    storage::JsonTransactionStore,
    utils::build_info,
};
use uuid::Uuid;

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

struct Options {
    user: Uuid,
    months: Option<usize>,
    as_of: Option<YearMonth>,
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_usage();
        process::exit(1);
    };
    if command == "--version" {
        println!("{}", build_info::current().banner());
        return Ok(());
    }
    let Some(path) = args.next().map(PathBuf::from) else {
        print_usage();
        process::exit(1);
    };
    let options = parse_options(args)?;

    let config = ConfigManager::new()?.load()?;
    let store = JsonTransactionStore::open(path)?;
    let clock: Box<dyn Clock> = match options.as_of {
        Some(month) => Box::new(
            FixedClock::at_month_end(month).ok_or_else(|| format!("invalid month {month}"))?,
        ),
        None => Box::new(SystemClock),
    };
    let ctx = ForecastContext::new(&store, &config, clock.as_ref());

    let json = match command.as_str() {
        "project" => serde_json::to_string_pretty(&ProjectionService::generate(
            &ctx,
            options.user,
            options.months,
        )?)?,
        "trends" => {
            serde_json::to_string_pretty(&TrendsService::historical_trends(&ctx, options.user)?)?
        }
        "savings" => {
            serde_json::to_string_pretty(&SavingsService::predictions(&ctx, options.user)?)?
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    };
    println!("{json}");
    Ok(())
}

fn parse_options(
    mut args: impl Iterator<Item = String>,
) -> Result<Options, Box<dyn std::error::Error>> {
    let mut user = None;
    let mut months = None;
    let mut as_of = None;
    while let Some(flag) = args.next() {
        let value = args
            .next()
            .ok_or_else(|| format!("missing value for {flag}"))?;
        match flag.as_str() {
            "--user" => user = Some(value.parse::<Uuid>()?),
            "--months" => months = Some(value.parse::<usize>()?),
            "--as-of" => as_of = Some(value.parse::<YearMonth>()?),
            other => return Err(format!("unknown option {other}").into()),
        }
    }
    let user = user.ok_or("--user is required")?;
    Ok(Options {
        user,
        months,
        as_of,
    })
}

fn print_usage() {
    eprintln!(
        "Usage: forecast_core_cli <command> <transactions.json> --user <uuid> [options]\n       \
         forecast_core_cli --version\n\
         Commands:\n  \
         project    forecast the coming months\n  \
         trends     summarize recent history\n  \
         savings    savings milestones and emergency fund\n\
         Options:\n  \
         --months <n>        projection horizon (project only)\n  \
         --as-of <YYYY-MM>   anchor month instead of today"
    );
}
