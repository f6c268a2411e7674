//! This is the command line tool that loads a history of draw numbers and
//! predicts the parity of the next draw.

extern crate clap;
extern crate env_logger;
extern crate log;

use clap::{value_parser, Arg, ArgAction, Command};
use predictor::consensus::{Consensus, VOTING_POLICIES};
use predictor::history::{History, ParseMode};
use predictor::models::model::Distribution;
use predictor::sweep::{sweep, SweepReport};
use predictor::{Config, Error, Predictor};

use std::ops::RangeInclusive;
use std::process::ExitCode;
use std::time::Instant;

/// A scoped utility struct for measuring and reporting time.
struct Timer {
    start: std::time::Instant,
}

impl Timer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let now = Instant::now();
        if let Some(duration) = now.checked_duration_since(self.start) {
            log::info!(
                "Operation completed in {:03} seconds",
                duration.as_secs_f32()
            );
        }
    }
}

/// Parse an order range such as "1..=9" or "3-6".
fn parse_range(s: &str) -> Result<RangeInclusive<usize>, String> {
    let (from, to) = s
        .split_once("..=")
        .or_else(|| s.split_once('-'))
        .ok_or_else(|| format!("Expected FROM..=TO, got '{}'", s))?;
    let from: usize = from.trim().parse().map_err(|e| format!("{}", e))?;
    let to: usize = to.trim().parse().map_err(|e| format!("{}", e))?;
    if from == 0 || from > to {
        return Err(format!("Invalid order range {}..={}", from, to));
    }
    Ok(from..=to)
}

fn percent(d: &Distribution) -> String {
    format!("Even: {:.1}%, Odd: {:.1}%", d.even * 100.0, d.odd * 100.0)
}

fn print_consensus(c: &Consensus) {
    println!("{}", "=".repeat(60));
    println!("Markov analysis, order {}", c.order);
    println!("{}", "=".repeat(60));
    println!("Observations: {}", c.observations);

    let window: Vec<String> = c.window.iter().map(|l| l.to_string()).collect();
    if window.is_empty() {
        println!("Current context: none");
    } else {
        println!("Current context: {}", window.join(" "));
    }
    match c.current_run {
        Some(label) => println!("The context is a run of {}", label),
        None => println!("The context is not a run of length {}", c.order),
    }

    println!("\nRuns of length {}:", c.order);
    println!("  Even: {}", c.run_counts.even);
    println!("  Odd: {}", c.run_counts.odd);

    println!("\nContexts seen:");
    for (k, n) in c.contexts_seen.iter().enumerate() {
        println!("  Length {}: {}", k + 1, n);
    }

    println!("\nPredictions:");
    println!(
        "  Global: {} ({})",
        c.global.label,
        percent(&c.global.distribution)
    );
    if c.context.order_used > 0 {
        println!(
            "  Context (length {}): {} ({})",
            c.context.order_used,
            c.context.label,
            percent(&c.context.distribution)
        );
    } else {
        println!("  Context: no samples, using the global prediction");
    }

    println!("\nCombined:");
    for (policy, combined) in VOTING_POLICIES.iter().zip(&c.combined) {
        println!(
            "  {}: {} ({}) [{}]",
            policy.name(),
            combined.label,
            percent(&combined.distribution),
            combined.source
        );
    }

    println!("\nVotes: Even {}/3, Odd {}/3", c.votes.even, c.votes.odd);
    if c.tie_broken {
        println!(
            "Recommendation: {} (tie broken by average)",
            c.recommendation
        );
    } else {
        println!("Recommendation: {}", c.recommendation);
    }
}

fn print_sweep(report: &SweepReport) {
    for row in &report.rows {
        println!(
            "Order {}: global {}, context {} (length {}), combined {}",
            row.order,
            row.global,
            row.context,
            row.context_order_used,
            row.combined
        );
    }

    println!("\n{}", "=".repeat(50));
    println!("Summary");
    println!("{}", "=".repeat(50));
    for (name, counts) in [
        ("Global", &report.global),
        ("Context", &report.context),
        ("Combined", &report.combined),
    ] {
        println!("{}: Even {}, Odd {}", name, counts.even, counts.odd);
    }
    let total = report.total();
    println!("Total: Even {}, Odd {}", total.even, total.odd);
}

fn run(
    input: &str,
    config: Config,
    mode: ParseMode,
    orders: Option<RangeInclusive<usize>>,
    json: bool,
) -> Result<(), Error> {
    let history = History::load(input, mode)?.limit(config.history_limit);
    if history.is_empty() {
        log::warn!("The history is empty, predictions fall back to defaults");
    }

    if let Some(orders) = orders {
        let report = sweep(history.as_slice(), orders, config.weight)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_sweep(&report);
        }
        return Ok(());
    }

    let mut predictor = Predictor::new(config)?;
    predictor.extend_labels(history.iter());
    let consensus = Consensus::from_predictor(&predictor, config.weight);
    if json {
        println!("{}", serde_json::to_string_pretty(&consensus)?);
    } else {
        print_consensus(&consensus);
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = Command::new("CLI")
        .version("1.x")
        .arg(
            Arg::new("order")
                .short('k')
                .long("order")
                .value_name("N")
                .help("The longest context to track")
                .value_parser(value_parser!(usize))
                .default_value("3")
                .num_args(1),
        )
        .arg(
            Arg::new("weight")
                .short('w')
                .long("weight")
                .value_name("W")
                .help("The weight of the context in the weighted policy")
                .value_parser(value_parser!(f64))
                .default_value("0.7")
                .num_args(1),
        )
        .arg(
            Arg::new("limit")
                .short('n')
                .long("limit")
                .value_name("N")
                .help("Only analyze the last N observations (0 for all)")
                .value_parser(value_parser!(usize))
                .default_value("0")
                .num_args(1),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Fail on invalid entries instead of skipping them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("sweep")
                .long("sweep")
                .value_name("FROM..=TO")
                .help("Run one predictor per order in the range")
                .value_parser(parse_range)
                .num_args(1),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the report as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("INPUT")
                .help("A JSON list of past draw numbers, oldest first")
                .required(true)
                .index(1),
        )
        .get_matches();

    env_logger::builder().format_timestamp(None).init();

    let order = matches.get_one::<usize>("order").copied().unwrap_or(3);
    let weight = matches.get_one::<f64>("weight").copied().unwrap_or(0.7);
    let limit = matches.get_one::<usize>("limit").copied().unwrap_or(0);
    let mode = if matches.get_flag("strict") {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };
    let orders = matches.get_one::<RangeInclusive<usize>>("sweep").cloned();
    let json = matches.get_flag("json");

    let Some(input) = matches.get_one::<String>("INPUT") else {
        return ExitCode::FAILURE;
    };

    let config = Config::new(order)
        .with_weight(weight)
        .with_history_limit(limit);

    let timer = Timer::new();
    let result = run(input, config, mode, orders, json);
    drop(timer);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

#[test]
fn test_parse_range() {
    assert_eq!(parse_range("1..=9"), Ok(1..=9));
    assert_eq!(parse_range("3-6"), Ok(3..=6));
    assert!(parse_range("0..=3").is_err());
    assert!(parse_range("5..=2").is_err());
    assert!(parse_range("x").is_err());
}
