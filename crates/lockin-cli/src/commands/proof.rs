use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;
use lockin_core::{Config, GoalCard, GoalId, ProofSubmission};

use super::goals::print_response;
use super::{block_on, client};

#[derive(Subcommand)]
pub enum ProofAction {
    /// Submit proof for the current interval
    Submit {
        /// Goal ID
        id: String,
        /// Proof file (repeatable)
        #[arg(long = "file", required = true)]
        files: Vec<PathBuf>,
        /// Optional note sent with the files
        #[arg(long)]
        description: Option<String>,
    },
}

pub fn run(action: ProofAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        ProofAction::Submit {
            id,
            files,
            description,
        } => {
            let id = GoalId(id);
            let proof = ProofSubmission { files, description };
            let client = client(&config)?;

            let resp = block_on(client.submit_proof(&id, &proof))??;
            print_response("Proof submitted", &resp);

            // The server recomputes streak and deadline; show its view.
            let goal = block_on(client.get_goal(&id))??;
            let card = GoalCard::build(goal, &Local::now());
            println!(
                "streak {} ({}%), next deadline {}",
                card.goal.current_streak,
                card.progress,
                card.deadline_label()
            );
        }
    }
    Ok(())
}
