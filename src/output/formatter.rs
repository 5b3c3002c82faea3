use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::facility::demo_link;
use crate::pipeline::{BatchOutcome, FacilityReport};
use crate::scoring::{ScoreBreakdown, ScoreResult, Tier, Weights};

use super::views::weight_percent;

const RULE_WIDTH: usize = 70;
const ACTION_WIDTH: usize = 30;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with one decimal, e.g. "72.5"
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

fn rule(c: char) -> String {
    c.to_string().repeat(RULE_WIDTH)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Color a piece of text by tier: whales green, standard yellow, low dimmed
fn tier_colored(text: &str, tier: Tier) -> String {
    match tier {
        Tier::Whale => text.green().bold().to_string(),
        Tier::Standard => text.yellow().to_string(),
        Tier::Low => text.dimmed().to_string(),
    }
}

/// Scoring formula with weights as percentages
pub fn format_formula(weights: &Weights) -> String {
    format!(
        "({} × Paved) + ({} × Trailers) + ({} × Gates)",
        weight_percent(weights.alpha),
        weight_percent(weights.beta),
        weight_percent(weights.gamma)
    )
}

/// Banner printed before a batch run
pub fn format_batch_header(target_count: usize, weights: &Weights, timestamp: &str) -> String {
    [
        rule('='),
        "DIGITAL DRAGNET - BATCH RECONNAISSANCE".to_string(),
        rule('='),
        format!("Timestamp: {}", timestamp),
        format!("Targets Loaded: {}", target_count),
        format!("Scoring Formula: {}", format_formula(weights)),
        rule('='),
    ]
    .join("\n")
}

/// Per-component lines shared by the facility detail and the explain view
fn breakdown_lines(b: &ScoreBreakdown) -> Vec<String> {
    let mut lines = vec![
        format!(
            "   Paved Area:    {:.1}% → {:.1} pts ({} weight)",
            b.paved_area.raw_value,
            b.paved_area.contribution,
            weight_percent(b.paved_area.weight)
        ),
        format!(
            "   Trailer Count: {} → {:.1} pts ({} weight)",
            b.trailer_count.raw_value,
            b.trailer_count.contribution,
            weight_percent(b.trailer_count.weight)
        ),
        format!(
            "   Gate Nodes:    {} → {:.1} pts ({} weight)",
            b.gate_nodes.raw_value,
            b.gate_nodes.contribution,
            weight_percent(b.gate_nodes.weight)
        ),
        format!("   {}", b.formula()),
        String::new(),
    ];
    for component in b.components() {
        lines.push(format!("   {}: {}", component.component.label(), component.interpretation));
    }
    lines
}

/// Score, tier and breakdown for a bare measurement
pub fn format_score_explanation(result: &ScoreResult, use_colors: bool) -> String {
    let c = &result.classification;
    let score_line = format!("{} YARD VELOCITY SCORE: {}/100", c.emoji, format_score(result.score));
    let score_line = if use_colors {
        tier_colored(&score_line, c.tier)
    } else {
        score_line
    };

    let mut lines = vec![
        score_line,
        format!("   Classification: {}", c.priority),
        String::new(),
        "SCORE BREAKDOWN:".to_string(),
    ];
    lines.extend(breakdown_lines(&result.breakdown));
    lines.push(String::new());
    lines.push(format!("EXPECTED ROI: {}", c.expected_roi));
    lines.push(format!("RECOMMENDED ACTION: {}", c.action));
    lines.join("\n")
}

/// Multi-line analysis of a single facility
pub fn format_facility_detail(report: &FacilityReport, use_colors: bool) -> String {
    let c = report.classification();
    let b = &report.result.breakdown;
    let score_line = format!("{} YARD VELOCITY SCORE: {}/100", c.emoji, format_score(report.score()));
    let score_line = if use_colors {
        tier_colored(&score_line, c.tier)
    } else {
        score_line
    };
    let name = if use_colors {
        report.facility.name.bold().to_string()
    } else {
        report.facility.name.clone()
    };

    let mut lines = vec![
        rule('='),
        format!("Target: {}", name),
        format!("Coordinates: ({}, {})", report.facility.lat, report.facility.lon),
        rule('='),
        String::new(),
        score_line,
        format!("   Classification: {}", c.priority),
        format!("   {}", c.description),
        String::new(),
        "SCORE BREAKDOWN:".to_string(),
    ];

    lines.extend(breakdown_lines(b));
    lines.push(String::new());
    lines.push(format!("EXPECTED ROI: {}", c.expected_roi));
    lines.push(format!("RECOMMENDED ACTION: {}", c.action));
    lines.push(rule('='));

    lines.join("\n")
}

/// Format ranked facilities as a table: RANK, FACILITY NAME, SCORE, CLASS, ACTION
pub fn format_ranked_table(reports: &[FacilityReport], use_colors: bool) -> String {
    if reports.is_empty() {
        return "No facilities scored.".to_string();
    }

    // Narrow terminals shrink the name column, pipes never truncate it
    let name_width = match get_terminal_width() {
        Some(width) if width >= 90 => 35,
        Some(width) if width > 55 => width - 55,
        Some(_) => 10,
        None => 35,
    };

    let header = format!(
        "{:<5} {:<name_width$} {:<8} {:<12} {}",
        "RANK",
        "FACILITY NAME",
        "SCORE",
        "CLASS",
        "ACTION",
        name_width = name_width
    );
    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };

    let mut lines = vec![header, "-".repeat(90)];
    for (idx, report) in reports.iter().enumerate() {
        let c = report.classification();
        let name = truncate(&report.facility.name, name_width);
        let class = format!("{} {}", c.emoji, c.label);
        let action = truncate(c.action, ACTION_WIDTH + 3);
        let score = format!("{:<8}", format_score(report.score()));
        let score = if use_colors {
            tier_colored(&score, c.tier)
        } else {
            score
        };

        lines.push(format!(
            "{:<5} {:<name_width$} {} {:<12} {}",
            idx + 1,
            name,
            score,
            class,
            action,
            name_width = name_width
        ));
    }

    lines.join("\n")
}

/// Tier counts, top target, and failures of a batch
pub fn format_summary(outcome: &BatchOutcome, use_colors: bool) -> String {
    let summary = outcome.summary();
    let mut lines = vec![
        rule('='),
        "SUMMARY STATISTICS".to_string(),
        rule('='),
        format!("🐋 WHALES (80+):        {} facilities - Immediate outreach", summary.whales),
        format!("🎯 STANDARD (50-79):    {} facilities - Nurture campaign", summary.standard),
        format!("📉 LOW (<50):           {} facilities - Deprioritize", summary.low),
    ];

    if let Some(top) = outcome.top_target() {
        let name = if use_colors {
            top.facility.name.bold().to_string()
        } else {
            top.facility.name.clone()
        };
        lines.push(String::new());
        lines.push(format!("TOP TARGET: {}", name));
        lines.push(format!(
            "   Score: {} | Expected ROI: {}",
            format_score(top.score()),
            top.classification().expected_roi
        ));
        lines.push(format!("   Action: {}", top.classification().action));
    }

    if !outcome.failures.is_empty() {
        lines.push(String::new());
        let heading = format!("FAILED ({}):", outcome.failures.len());
        lines.push(if use_colors {
            heading.red().to_string()
        } else {
            heading
        });
        for failure in &outcome.failures {
            lines.push(format!("   {} - {}", failure.name, failure.error));
        }
    }

    lines.join("\n")
}

/// Demo links for the `top` highest ranked facilities
pub fn format_demo_links(reports: &[FacilityReport], base_url: &str, top: usize) -> String {
    let mut lines = vec!["DEMO LINKS FOR SALES OUTREACH:".to_string(), "-".repeat(50)];
    for report in reports.iter().take(top) {
        lines.push(format!("{} {}", report.classification().emoji, report.facility.name));
        lines.push(format!("   {}", demo_link(base_url, &report.facility.name)));
    }
    lines.join("\n")
}

/// Format facilities as tab-separated values for scripting
/// Columns: rank, score, label, name (no headers, no colors)
pub fn format_tsv(reports: &[FacilityReport]) -> String {
    reports
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            format!(
                "{}\t{}\t{}\t{}",
                idx + 1,
                format_score(r.score()),
                r.classification().label,
                r.facility.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
