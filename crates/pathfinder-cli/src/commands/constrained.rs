//! Shortest paths under mandatory and flexible constraints.

use anyhow::{Context, Result};
use colored::Colorize;
use pathfinder::prelude::*;
use std::path::Path;

use super::{format_hops, load_topology};

/// Parse `metric=value`.
///
/// The value is read as JSON when it parses as a number, boolean or list,
/// and as a plain string otherwise, so `ownership=B` needs no quoting.
pub fn parse_constraint(arg: &str) -> std::result::Result<(String, MetricValue), String> {
    let (metric, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected METRIC=VALUE, got `{arg}`"))?;
    let metric = metric.trim();
    if metric.is_empty() {
        return Err(format!("missing metric name in `{arg}`"));
    }

    let raw = raw.trim();
    let value = serde_json::from_str::<MetricValue>(raw)
        .unwrap_or_else(|_| MetricValue::Text(raw.to_string()));
    Ok((metric.to_string(), value))
}

pub fn run(snapshot: Option<&Path>, query: &ConstrainedQuery, json: bool) -> Result<()> {
    let topology = load_topology(snapshot)?;
    let results = topology.best_constrained_paths(query)?;

    if json {
        let out = serde_json::to_string_pretty(&results).context("Failed to serialize paths")?;
        println!("{out}");
        return Ok(());
    }

    if results.is_empty() {
        println!(
            "{} No path from {} to {} meets the constraints",
            "•".yellow(),
            query.source.cyan(),
            query.destination.cyan()
        );
        return Ok(());
    }

    println!(
        "{} Constrained paths from {} to {}:",
        "→".blue(),
        query.source.cyan().bold(),
        query.destination.cyan().bold()
    );
    println!();

    for (i, result) in results.iter().enumerate() {
        let rank = format!("{}.", i + 1);
        println!("  {} {}", rank.blue(), format_hops(&result.hops));

        let met: Vec<String> = result
            .metrics
            .iter()
            .flatten()
            .map(|(metric, threshold)| format!("{metric}={threshold}"))
            .collect();
        if !met.is_empty() {
            println!("      {}", met.join("  ").dimmed());
        }
        if let Some(cost) = result.cost {
            println!("      {}", format!("cost {cost}").dimmed());
        }
    }

    let satisfied = results[0]
        .metrics
        .as_ref()
        .map(|m| m.keys().filter(|k| query.flexible.contains_key(*k)).count())
        .unwrap_or(0);
    println!();
    println!(
        "{} {} paths satisfying {} of {} flexible constraints",
        "✓".green(),
        results.len().to_string().cyan(),
        satisfied,
        query.flexible.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_parse_as_numbers() {
        let (metric, value) = parse_constraint("bandwidth=100").unwrap();
        assert_eq!(metric, "bandwidth");
        assert_eq!(value, MetricValue::Number(100.0));
    }

    #[test]
    fn bare_words_parse_as_text() {
        let (_, value) = parse_constraint("ownership=B").unwrap();
        assert_eq!(value, MetricValue::Text("B".into()));

        let (_, value) = parse_constraint("ownership=\"B\"").unwrap();
        assert_eq!(value, MetricValue::Text("B".into()));
    }

    #[test]
    fn lists_parse_as_lists() {
        let (_, value) = parse_constraint(r#"ownership=["A","B"]"#).unwrap();
        assert_eq!(value, MetricValue::List(vec!["A".into(), "B".into()]));
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(parse_constraint("bandwidth").is_err());
        assert!(parse_constraint("=100").is_err());
    }
}
