use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config};
use crate::scoring::{validate_scoring, Benchmarks, ScoringConfig, Weights};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Parse a number that must satisfy `check`, describing the rule in `rule`.
fn parse_number(input: &str, check: impl Fn(f64) -> bool, rule: &str) -> Result<f64, String> {
    match input.parse::<f64>() {
        Ok(v) if v.is_finite() && check(v) => Ok(v),
        Ok(_) => Err(format!("must be {}", rule)),
        Err(_) => Err(format!("'{}' is not a number", input)),
    }
}

/// Keep asking until the answer is a number accepted by `check`.
fn prompt_number(message: &str, default: f64, check: impl Fn(f64) -> bool, rule: &str) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match parse_number(&input, &check, rule) {
            Ok(v) => return Ok(v),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

fn prompt_weights(defaults: Weights) -> Result<Weights> {
    loop {
        let alpha = prompt_number("Paved area weight (alpha)", defaults.alpha, |v| v >= 0.0, "non-negative")?;
        let beta = prompt_number("Trailer count weight (beta)", defaults.beta, |v| v >= 0.0, "non-negative")?;
        let gamma = prompt_number("Gate nodes weight (gamma)", defaults.gamma, |v| v >= 0.0, "non-negative")?;
        let weights = Weights { alpha, beta, gamma };

        let check = ScoringConfig {
            weights,
            benchmarks: Benchmarks::default(),
        };
        match validate_scoring(&check) {
            Ok(()) => return Ok(weights),
            Err(errors) => {
                for e in errors {
                    println!("  Invalid: {}", e);
                }
                println!("  Try again.");
            }
        }
    }
}

fn prompt_benchmarks(defaults: Benchmarks) -> Result<Benchmarks> {
    let max_trailer_benchmark = prompt_number(
        "Trailer count scoring 100 points",
        defaults.max_trailer_benchmark,
        |v| v > 0.0,
        "positive",
    )?;
    let max_gate_benchmark = prompt_number(
        "Gate count scoring 100 points",
        defaults.max_gate_benchmark,
        |v| v > 0.0,
        "positive",
    )?;
    Ok(Benchmarks {
        max_trailer_benchmark,
        max_gate_benchmark,
    })
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Yard Velocity Configuration Wizard");
    println!("==================================");
    println!();
    println!("YVS = (alpha x Paved%) + (beta x NormTrailers) + (gamma x NormGates)");
    println!("The three weights must add up to 1.0.");
    println!();

    let defaults = ScoringConfig::default();
    let scoring = if prompt_yes_no("Configure scoring? (n accepts defaults)", false)? {
        println!();
        let weights = prompt_weights(defaults.weights)?;
        println!();
        println!("Raw counts are rescaled to 0-100 against a benchmark; counts above it are capped.");
        let benchmarks = prompt_benchmarks(defaults.benchmarks)?;
        ScoringConfig {
            weights,
            benchmarks,
        }
    } else {
        defaults
    };

    println!();
    let seed = loop {
        let input = prompt_with_default("Seed for the mock providers (blank for random)", "")?;
        if input.is_empty() {
            break None;
        }
        match input.parse::<u64>() {
            Ok(v) => break Some(v),
            Err(_) => println!("  Invalid: must be a whole number. Try again."),
        }
    };

    let path = match default_path {
        Some(p) => p,
        None => {
            let suggested = get_config_path()?;
            PathBuf::from(prompt_with_default(
                "Config file path",
                &suggested.display().to_string(),
            )?)
        }
    };

    if path.exists() && !prompt_yes_no(&format!("{} exists. Overwrite?", path.display()), false)? {
        println!("Aborted, nothing written.");
        return Ok(());
    }

    let mut config = Config {
        scoring,
        ..Config::default()
    };
    config.providers.seed = seed;

    save_config(&path, &config)?;
    println!();
    println!("Config written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_accepts_valid() {
        assert_eq!(parse_number("0.5", |v| v >= 0.0, "non-negative"), Ok(0.5));
    }

    #[test]
    fn test_parse_number_rejects_rule() {
        let err = parse_number("-1", |v| v >= 0.0, "non-negative").unwrap_err();
        assert_eq!(err, "must be non-negative");
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        let err = parse_number("abc", |v| v > 0.0, "positive").unwrap_err();
        assert!(err.contains("not a number"));
    }

    #[test]
    fn test_parse_number_rejects_infinity() {
        assert!(parse_number("inf", |v| v > 0.0, "positive").is_err());
    }
}
