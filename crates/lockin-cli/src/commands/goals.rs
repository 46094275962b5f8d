//! Goal management commands for CLI.

use chrono::Local;
use clap::Subcommand;
use lockin_core::dashboard::build_cards;
use lockin_core::{Config, GoalCard, GoalId, GoalInterval, NewGoal, ProofType};

use super::{block_on, client, load_goals, print_card};

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List goals with their countdowns
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Use the last cached list instead of the API
        #[arg(long)]
        offline: bool,
    },
    /// Show a single goal
    Show {
        /// Goal ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new goal
    Create {
        /// Goal name
        #[arg(long)]
        name: String,
        /// Target amount per interval (minutes)
        #[arg(long)]
        target: f64,
        /// Interval: daily, weekly or monthly
        #[arg(long, default_value = "daily")]
        interval: String,
        /// Amount at stake per missed interval
        #[arg(long, default_value = "0")]
        stake: f64,
        /// Daily deadline time (HH:mm or HH:mm:ss)
        #[arg(long, default_value = "23:59")]
        deadline: String,
        /// Proof type: photo, screenshot, video or data
        #[arg(long, default_value = "photo")]
        proof_type: String,
        /// Enable hard-core mode
        #[arg(long)]
        hardcore: bool,
    },
    /// Update a goal with a JSON patch object
    Update {
        /// Goal ID
        id: String,
        /// Fields to change, e.g. '{"stakeAmount": 15}'
        #[arg(long)]
        json: String,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
}

pub fn run(action: GoalsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        GoalsAction::List { json, offline } => {
            let goals = load_goals(&config, offline)?;
            let cards = build_cards(goals, &Local::now());
            if json {
                println!("{}", serde_json::to_string_pretty(&cards)?);
            } else if cards.is_empty() {
                println!("No goals yet.");
            } else {
                for card in &cards {
                    print_card(card);
                }
            }
        }
        GoalsAction::Show { id, json } => {
            let client = client(&config)?;
            let goal = block_on(client.get_goal(&GoalId(id)))??;
            let card = GoalCard::build(goal, &Local::now());
            if json {
                println!("{}", serde_json::to_string_pretty(&card)?);
            } else {
                print_card(&card);
            }
        }
        GoalsAction::Create {
            name,
            target,
            interval,
            stake,
            deadline,
            proof_type,
            hardcore,
        } => {
            let goal = NewGoal {
                name,
                target_amount: target,
                interval: interval.parse::<GoalInterval>()?,
                hard_core_mode: hardcore,
                proof_type: proof_type.parse::<ProofType>()?,
                stake_amount: stake,
                deadline_time: deadline,
            };
            let client = client(&config)?;
            let resp = block_on(client.create_goal(goal))??;
            print_response("Goal created", &resp);
        }
        GoalsAction::Update { id, json } => {
            let patch: serde_json::Value = serde_json::from_str(&json)?;
            let client = client(&config)?;
            let resp = block_on(client.update_goal(&GoalId(id), &patch))??;
            print_response("Goal updated", &resp);
        }
        GoalsAction::Delete { id } => {
            let client = client(&config)?;
            let resp = block_on(client.delete_goal(&GoalId(id.clone())))??;
            print_response(&format!("Goal {id} deleted"), &resp);
        }
    }
    Ok(())
}

/// Print the server's `message` if it sent one, else `fallback`.
pub(crate) fn print_response(fallback: &str, resp: &serde_json::Value) {
    match resp.get("message").and_then(|m| m.as_str()) {
        Some(message) if !message.is_empty() => println!("{message}"),
        _ => println!("{fallback}"),
    }
}
