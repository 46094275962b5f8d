use crate::error::Result;
use crate::storage::credentials::{self, ID_TOKEN_KEY};

/// Supplies the bearer token for authenticated API calls.
///
/// Signing in happens with the identity provider outside this crate; a
/// source only hands back the ID token it obtained, or `None` when nobody
/// is signed in.
pub trait TokenSource: Send + Sync {
    fn id_token(&self) -> Result<Option<String>>;
}

/// Token stored in the OS keyring by `lockin auth login`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringTokenSource;

impl KeyringTokenSource {
    /// Persist `token` as the current ID token.
    pub fn store(token: &str) -> Result<()> {
        credentials::set(ID_TOKEN_KEY, token)
    }

    /// Forget the stored token.
    pub fn clear() -> Result<()> {
        credentials::delete(ID_TOKEN_KEY)
    }
}

impl TokenSource for KeyringTokenSource {
    fn id_token(&self) -> Result<Option<String>> {
        Ok(credentials::get(ID_TOKEN_KEY)?.filter(|t| !t.trim().is_empty()))
    }
}

/// A fixed token, e.g. from the environment.
#[derive(Debug, Default, Clone)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// A source with nobody signed in.
    pub fn none() -> Self {
        Self(None)
    }
}

impl TokenSource for StaticToken {
    fn id_token(&self) -> Result<Option<String>> {
        Ok(self.0.clone().filter(|t| !t.trim().is_empty()))
    }
}
