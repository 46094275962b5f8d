pub mod account;
pub mod auth;
pub mod cache;
pub mod config;
pub mod countdown;
pub mod dashboard;
pub mod export;
pub mod goals;
pub mod proof;

use std::future::Future;

use chrono::Utc;
use lockin_core::storage::{self, GOALS_ENTRY};
use lockin_core::{
    Config, DevSession, Goal, GoalCache, GoalCard, GoalsClient, KeyringTokenSource, StaticToken,
};

/// Environment variable whose value, when set, is used as the ID token
/// instead of the keyring entry.
pub const TOKEN_ENV: &str = "LOCKIN_TOKEN";

/// Drive one async API call to completion on a fresh runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output, std::io::Error> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

/// API client for the loaded config, authenticated from LOCKIN_TOKEN or the keyring.
pub fn client(config: &Config) -> lockin_core::Result<GoalsClient> {
    match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => {
            tracing::debug!("using identity token from {TOKEN_ENV}");
            GoalsClient::from_config(config, StaticToken::new(token))
        }
        _ => GoalsClient::from_config(config, KeyringTokenSource),
    }
}

pub fn dev_enabled(config: &Config) -> bool {
    config.dev_mode || storage::is_dev_env()
}

/// Current goal list: fetched from the API and cached, or read back from
/// the cache with `offline`.
pub fn load_goals(config: &Config, offline: bool) -> Result<Vec<Goal>, Box<dyn std::error::Error>> {
    let cache = GoalCache::open()?;
    let session = DevSession::begin(&cache, dev_enabled(config))?;

    if offline {
        let (goals, fetched_at) = session
            .cache()
            .load(GOALS_ENTRY)?
            .ok_or("no cached goals yet, run without --offline first")?;
        eprintln!("(cached {})", fetched_at.format("%Y-%m-%d %H:%M UTC"));
        return Ok(goals);
    }

    let client = client(config)?;
    let goals = match block_on(client.list_goals())? {
        Ok(goals) => goals,
        Err(e) => {
            if e.is_remote() && session.cache().load(GOALS_ENTRY)?.is_some() {
                eprintln!("hint: --offline shows the last cached goals");
            }
            return Err(e.into());
        }
    };
    session.cache().store(GOALS_ENTRY, &goals, Utc::now())?;
    Ok(goals)
}

pub fn print_card(card: &GoalCard) {
    let goal = &card.goal;
    println!("{} [{}]", goal.name, goal.id);
    println!(
        "  status:   {} ({})",
        card.status.as_str(),
        card.color.color_name()
    );
    if let Some(desc) = goal.status_description.as_ref().filter(|d| !d.message.is_empty()) {
        match &desc.time_detail {
            Some(detail) => println!("  note:     {} ({detail})", desc.message),
            None => println!("  note:     {}", desc.message),
        }
    }
    println!("  target:   {}", goal.target_label());
    println!("  stake:    {}", goal.stake_label());
    println!("  streak:   {} ({}%)", goal.current_streak, card.progress);
    println!("  deadline: {}", card.deadline_label());
    if !goal.is_active {
        println!("  (inactive)");
    }
    if let Some(warning) = card.risk_warning() {
        println!("  ! {warning}");
    }
}
