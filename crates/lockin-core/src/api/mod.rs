//! Goals REST API client and the identity-token seam it authenticates with.

mod auth;
mod client;

pub use auth::{KeyringTokenSource, StaticToken, TokenSource};
pub use client::{export_file_name, save_export, GoalsClient, ProofSubmission};
