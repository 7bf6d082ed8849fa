//! forensic-report: print a forensic verdict for provider records saved as JSON.
//!
//! Each input file holds one fundamentals record or an array of them; `-`
//! reads standard input.
//!
//! Usage:
//!   cargo run -p forensic-report -- quotes/bidu.json
//!   cargo run -p forensic-report -- --json quotes/*.json
//!   cargo run -p forensic-report -- --close BIDU=88.4 quotes/bidu.json

mod render;

use analysis_core::RawFundamentals;
use anyhow::{bail, Context};
use fundamental_analysis::{ForensicEngine, ForensicReport, VerdictThresholds};
use std::collections::HashMap;
use std::io::Read;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forensic_report=info,fundamental_analysis=warn".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let json_output = args.iter().any(|a| a == "--json");
    let closes = parse_closes(&args)?;
    let paths = input_paths(&args);

    if paths.is_empty() {
        eprintln!("Usage:");
        eprintln!("  forensic-report [OPTIONS] FILE...");
        eprintln!("      Records as JSON (object or array); - for stdin");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --json               Print reports as JSON instead of text");
        eprintln!("  --close SYMBOL=PRICE Last close to use when a record has no price");
        std::process::exit(1);
    }

    let thresholds = VerdictThresholds::from_env().context("invalid verdict thresholds")?;
    let engine = ForensicEngine::with_thresholds(thresholds);
    let history = |symbol: &str| closes.get(symbol).copied();

    let mut reports: Vec<ForensicReport> = Vec::new();
    let mut failed = 0usize;

    for path in &paths {
        let records = match read_records(path) {
            Ok(records) => records,
            Err(e) => {
                failed += 1;
                tracing::warn!("{}: {:#}", path, e);
                continue;
            }
        };

        for raw in records {
            match engine.analyze_with_fallback(&raw, &history) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    failed += 1;
                    tracing::warn!("{}: {} skipped: {}", path, raw.symbol, e);
                }
            }
        }
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}", render::render_report(report));
        }
    }

    tracing::info!("{} reports, {} failed", reports.len(), failed);
    if reports.is_empty() && failed > 0 {
        bail!("no record could be classified");
    }
    Ok(())
}

/// `--close AAPL=189.3` pairs, symbols upper-cased.
fn parse_closes(args: &[String]) -> anyhow::Result<HashMap<String, f64>> {
    let mut closes = HashMap::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg != "--close" {
            continue;
        }
        let pair = iter.next().context("--close needs SYMBOL=PRICE")?;
        let (symbol, price) = pair
            .split_once('=')
            .with_context(|| format!("--close expects SYMBOL=PRICE, got {:?}", pair))?;
        let price: f64 = price
            .parse()
            .with_context(|| format!("invalid close price in {:?}", pair))?;
        closes.insert(symbol.trim().to_uppercase(), price);
    }
    Ok(closes)
}

fn input_paths(args: &[String]) -> Vec<String> {
    let mut paths = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => {}
            "--close" => {
                iter.next();
            }
            other => paths.push(other.to_string()),
        }
    }
    paths
}

fn read_records(path: &str) -> anyhow::Result<Vec<RawFundamentals>> {
    let text = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?
    };

    parse_records(&text)
}

fn parse_records(text: &str) -> anyhow::Result<Vec<RawFundamentals>> {
    let value: serde_json::Value = serde_json::from_str(text).context("not valid JSON")?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        object @ serde_json::Value::Object(_) => vec![object],
        _ => bail!("expected a fundamentals object or an array of them"),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item).with_context(|| format!("record {} is malformed", i))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_closes() {
        let closes = parse_closes(&args(&["--close", "bidu=88.4", "a.json"])).unwrap();
        assert_eq!(closes.get("BIDU"), Some(&88.4));

        assert!(parse_closes(&args(&["--close", "BIDU"])).is_err());
        assert!(parse_closes(&args(&["--close"])).is_err());
    }

    #[test]
    fn test_input_paths_skip_options() {
        let paths = input_paths(&args(&["--json", "--close", "X=1", "a.json", "-"]));
        assert_eq!(paths, vec!["a.json".to_string(), "-".to_string()]);
    }

    #[test]
    fn test_parse_records_object_or_array() {
        let one = parse_records(r#"{"symbol": "AAPL", "currentPrice": 190.0}"#).unwrap();
        assert_eq!(one.len(), 1);

        let many = parse_records(r#"[{"symbol": "A"}, {"symbol": "B"}]"#).unwrap();
        assert_eq!(many.len(), 2);

        assert!(parse_records("42").is_err());
        assert!(parse_records(r#"[{"symbol": "A", "ebitda": "n/a"}]"#).is_err());
    }
}
