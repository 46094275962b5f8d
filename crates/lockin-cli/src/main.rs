use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "lockin", version, about = "Lockin goal accountability CLI")]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Goal management
    Goals {
        #[command(subcommand)]
        action: commands::goals::GoalsAction,
    },
    /// Proof submission
    Proof {
        #[command(subcommand)]
        action: commands::proof::ProofAction,
    },
    /// Export a goal's history as CSV
    Export(commands::export::ExportArgs),
    /// Overview of all goals
    Dashboard(commands::dashboard::DashboardArgs),
    /// Countdown to an arbitrary deadline (offline)
    Countdown(commands::countdown::CountdownArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Identity token management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Local goal cache
    Cache {
        #[command(subcommand)]
        action: commands::cache::CacheAction,
    },
    /// Account registration and payment methods
    Account {
        #[command(subcommand)]
        action: commands::account::AccountAction,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Goals { action } => commands::goals::run(action),
        Commands::Proof { action } => commands::proof::run(action),
        Commands::Export(args) => commands::export::run(args),
        Commands::Dashboard(args) => commands::dashboard::run(args),
        Commands::Countdown(args) => commands::countdown::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Cache { action } => commands::cache::run(action),
        Commands::Account { action } => commands::account::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
