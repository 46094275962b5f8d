use chrono::Local;
use clap::Args;
use lockin_core::dashboard::build_cards;
use lockin_core::{chart_rows, Config, DashboardSummary, Emphasis};
use serde_json::json;

use super::load_goals;

#[derive(Args)]
pub struct DashboardArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
    /// Use the last cached goal list instead of the API
    #[arg(long)]
    offline: bool,
}

pub fn run(args: DashboardArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let goals = load_goals(&config, args.offline)?;

    let summary = DashboardSummary::from_goals(&goals);
    let charts = chart_rows(&goals);
    let cards = build_cards(goals, &Local::now());

    if args.json {
        let out = json!({
            "summary": summary,
            "charts": charts,
            "goals": cards,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "Goals: {} ({} active)   At stake: ${:.2}   Streaks: {} (avg {})",
        summary.total_goals,
        summary.active_goals,
        summary.total_at_stake,
        summary.total_streaks,
        summary.average_streak
    );

    if !charts.is_empty() {
        println!();
        for row in &charts {
            println!(
                "  {:<13} {:>3}% {:>4}/{:<4} {}",
                row.name,
                row.progress,
                row.streak,
                row.target,
                row.band.hex()
            );
        }
    }

    let attention: Vec<_> = cards
        .iter()
        .filter(|c| c.emphasis != Emphasis::Normal)
        .collect();
    if !attention.is_empty() {
        println!();
        println!("Needs attention:");
        for card in attention {
            println!("  {} - {}", card.goal.name, card.deadline_label());
            if let Some(warning) = card.risk_warning() {
                println!("    {warning}");
            }
        }
    }
    Ok(())
}
