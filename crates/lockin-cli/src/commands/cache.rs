use clap::Subcommand;
use lockin_core::GoalCache;

#[derive(Subcommand)]
pub enum CacheAction {
    /// List cached goal lists
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove one cache entry
    Clear {
        /// Entry name (e.g. "goals")
        name: String,
    },
    /// Remove every cache entry
    ClearAll,
}

pub fn run(action: CacheAction) -> Result<(), Box<dyn std::error::Error>> {
    let cache = GoalCache::open()?;

    match action {
        CacheAction::List { json } => {
            let entries = cache.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("cache is empty");
            } else {
                for entry in entries {
                    println!(
                        "{:<12} {:>4} goals  fetched {}",
                        entry.name,
                        entry.goal_count,
                        entry.fetched_at.format("%Y-%m-%d %H:%M UTC")
                    );
                }
            }
        }
        CacheAction::Clear { name } => {
            if cache.clear(&name)? {
                println!("cleared {name}");
            } else {
                println!("no cache entry named {name}");
            }
        }
        CacheAction::ClearAll => {
            let removed = cache.clear_all()?;
            println!("cleared {removed} entries");
        }
    }
    Ok(())
}
