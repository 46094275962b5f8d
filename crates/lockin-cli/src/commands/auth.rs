use clap::Subcommand;
use lockin_core::{KeyringTokenSource, TokenSource};

use super::TOKEN_ENV;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store an ID token issued by the identity provider
    Login {
        /// ID token
        #[arg(long)]
        token: String,
    },
    /// Remove the stored token
    Logout,
    /// Check whether a token is available
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Login { token } => {
            let token = token.trim();
            if token.is_empty() {
                return Err("--token must not be empty".into());
            }
            KeyringTokenSource::store(token)?;
            println!("token stored");
        }
        AuthAction::Logout => {
            KeyringTokenSource::clear()?;
            println!("token removed");
        }
        AuthAction::Status => {
            let from_env = std::env::var(TOKEN_ENV).is_ok_and(|t| !t.trim().is_empty());
            if from_env {
                println!("authenticated (via {TOKEN_ENV})");
            } else if KeyringTokenSource.id_token()?.is_some() {
                println!("authenticated");
            } else {
                println!("not authenticated");
            }
        }
    }
    Ok(())
}
