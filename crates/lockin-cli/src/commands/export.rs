use std::path::PathBuf;

use clap::Args;
use lockin_core::api::save_export;
use lockin_core::{Config, GoalId};

use super::{block_on, client};

#[derive(Args)]
pub struct ExportArgs {
    /// Goal ID
    id: String,
    /// Output directory (default: export.directory from config)
    #[arg(long)]
    out: Option<PathBuf>,
}

pub fn run(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let client = client(&config)?;
    let id = GoalId(args.id);

    let (goal, csv) = block_on(async {
        let goal = client.get_goal(&id).await;
        let csv = client.export_goal_history(&id).await;
        (goal, csv)
    })?;
    let csv = csv?;

    // A missing name only affects the file name.
    let name = match goal {
        Ok(goal) => Some(goal.name),
        Err(e) => {
            tracing::warn!(error = %e, "could not fetch goal name for export file");
            None
        }
    };

    let dir = args
        .out
        .unwrap_or_else(|| PathBuf::from(&config.export.directory));
    let path = save_export(&dir, name.as_deref(), &csv)?;
    println!("{}", path.display());
    Ok(())
}
