//! REST client for the goals API.
//!
//! Every call is made once: failures are returned to the caller, never
//! retried. Authenticated calls send `Authorization: Bearer <id token>`.

use reqwest::{multipart, Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use super::auth::TokenSource;
use crate::envelope;
use crate::error::{ConfigError, CoreError, Result, ValidationError};
use crate::goal::{Goal, GoalId, NewGoal, UserRegistration};
use crate::storage::Config;

/// Multipart field name the server reads proof files from.
const PROOF_FILE_FIELD: &str = "ProofFile";

/// Files and optional note submitted as proof for one interval.
#[derive(Debug, Clone, Default)]
pub struct ProofSubmission {
    pub files: Vec<PathBuf>,
    pub description: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentMethodBody<'a> {
    payment_method_id: &'a str,
}

/// Client for `{base_url}/api`.
pub struct GoalsClient {
    http: Client,
    api_root: String,
    tokens: Box<dyn TokenSource>,
}

impl GoalsClient {
    /// Build a client for `base_url` (the server root, without `/api`).
    ///
    /// # Errors
    /// Returns an error if `base_url` is not an absolute http(s) URL or the
    /// HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        tokens: impl TokenSource + 'static,
        timeout: Duration,
    ) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            key: "api.base_url".into(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: "api.base_url".into(),
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            }
            .into());
        }

        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_root: format!("{}/api", base_url.trim_end_matches('/')),
            tokens: Box::new(tokens),
        })
    }

    /// Build a client from the loaded configuration.
    ///
    /// # Errors
    /// Same as [`GoalsClient::new`].
    pub fn from_config(config: &Config, tokens: impl TokenSource + 'static) -> Result<Self> {
        Self::new(&config.base_url(), tokens, config.timeout())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_root, endpoint)
    }

    fn goal_url(&self, id: &GoalId, suffix: &str) -> String {
        self.url(&format!("/goals/{}{suffix}", urlencoding::encode(&id.0)))
    }

    fn bearer(&self) -> Result<String> {
        match self.tokens.id_token() {
            Ok(Some(token)) => Ok(token),
            Ok(None) => Err(CoreError::AuthenticationRequired),
            Err(e) => {
                tracing::warn!(error = %e, "could not read identity token");
                Err(CoreError::AuthenticationRequired)
            }
        }
    }

    fn authed(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let token = self.bearer()?;
        tracing::debug!(%method, url, "api request");
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    /// `GET /goals`, unwrapped and parsed. Unrecognized envelopes yield an
    /// empty list.
    pub async fn list_goals(&self) -> Result<Vec<Goal>> {
        let body = send_json(self.authed(Method::GET, &self.url("/goals"))?).await?;
        Ok(envelope::parse_goal_list(&body))
    }

    /// `GET /goals/{id}`.
    pub async fn get_goal(&self, id: &GoalId) -> Result<Goal> {
        let body = send_json(self.authed(Method::GET, &self.goal_url(id, ""))?).await?;
        let record = envelope::unwrap_goal_record(&body).ok_or_else(|| {
            CoreError::MalformedResponse(format!("no goal object in response for goal {id}"))
        })?;
        Ok(serde_json::from_value(record.clone())?)
    }

    /// `POST /goals`. The goal is validated and its deadline time normalized
    /// to `HH:mm:ss` before anything is sent.
    pub async fn create_goal(&self, goal: NewGoal) -> Result<Value> {
        let goal = goal.validate()?;
        send_json(self.authed(Method::POST, &self.url("/goals"))?.json(&goal)).await
    }

    /// `PUT /goals/{id}` with an arbitrary field patch.
    pub async fn update_goal(&self, id: &GoalId, patch: &Value) -> Result<Value> {
        if !patch.is_object() {
            return Err(ValidationError::invalid("patch", "must be a JSON object").into());
        }
        send_json(self.authed(Method::PUT, &self.goal_url(id, ""))?.json(patch)).await
    }

    /// `DELETE /goals/{id}`.
    pub async fn delete_goal(&self, id: &GoalId) -> Result<Value> {
        send_json(self.authed(Method::DELETE, &self.goal_url(id, ""))?).await
    }

    /// `POST /goals/{id}/proof` as multipart: one `ProofFile` part per file
    /// plus an optional `description`.
    pub async fn submit_proof(&self, id: &GoalId, proof: &ProofSubmission) -> Result<Value> {
        if proof.files.is_empty() {
            return Err(ValidationError::Empty("files".into()).into());
        }

        let mut form = multipart::Form::new();
        for path in &proof.files {
            form = form.part(PROOF_FILE_FIELD, file_part(path).await?);
        }
        if let Some(description) = proof.description.as_deref().filter(|d| !d.is_empty()) {
            form = form.text("description", description.to_string());
        }

        let req = self
            .authed(Method::POST, &self.goal_url(id, "/proof"))?
            .multipart(form);
        send_json(req).await
    }

    /// `GET /goals/{id}/export?format=csv`, returning the raw CSV bytes.
    pub async fn export_goal_history(&self, id: &GoalId) -> Result<Vec<u8>> {
        let req = self
            .authed(Method::GET, &self.goal_url(id, "/export"))?
            .query(&[("format", "csv")]);
        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            return Err(api_error(status, &body));
        }
        Ok(bytes.to_vec())
    }

    /// `POST /users/payment/save-payment-method` with a processor-issued id.
    pub async fn save_payment_method(&self, payment_method_id: &str) -> Result<Value> {
        if payment_method_id.trim().is_empty() {
            return Err(ValidationError::Empty("paymentMethodId".into()).into());
        }
        let body = PaymentMethodBody { payment_method_id };
        let url = self.url("/users/payment/save-payment-method");
        send_json(self.authed(Method::POST, &url)?.json(&body)).await
    }

    /// `POST /users/payment/verify-card`.
    pub async fn verify_card(&self) -> Result<Value> {
        let url = self.url("/users/payment/verify-card");
        send_json(self.authed(Method::POST, &url)?).await
    }

    /// `POST /users/register`. The only unauthenticated call.
    pub async fn register_user(&self, user: &UserRegistration) -> Result<Value> {
        let url = self.url("/users/register");
        tracing::debug!(url = %url, "api request (unauthenticated)");
        let req = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "*/*")
            .json(user);
        send_json(req).await
    }
}

async fn send_json(req: RequestBuilder) -> Result<Value> {
    let resp = req.send().await?;
    let status = resp.status();
    let bytes = resp.bytes().await?;

    let body = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(v) => v,
            Err(_) if !status.is_success() => Value::Null,
            Err(e) => {
                return Err(CoreError::MalformedResponse(format!(
                    "response is not JSON: {e}"
                )))
            }
        }
    };

    if !status.is_success() {
        return Err(api_error(status, &body));
    }
    Ok(body)
}

/// The server's `message`, or `HTTP <code>: <reason>` when it sent none.
fn api_error(status: StatusCode, body: &Value) -> CoreError {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        });
    tracing::debug!(status = status.as_u16(), %message, "api error");
    CoreError::Api {
        status: status.as_u16(),
        message,
    }
}

async fn file_part(path: &Path) -> Result<multipart::Part> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "proof".to_string());
    let part = multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime_for(path))?;
    Ok(part)
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "csv" => "text/csv",
        "json" => "application/json",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// File name for a goal's exported history: every character outside
/// `[A-Za-z0-9]` becomes `_`.
pub fn export_file_name(goal_name: Option<&str>) -> String {
    let stem = match goal_name {
        Some(name) if !name.is_empty() => name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect(),
        _ => "goal".to_string(),
    };
    format!("{stem}_history.csv")
}

/// Write exported CSV bytes into `dir`, returning the file path.
///
/// # Errors
/// Returns an error if the directory cannot be created or the write fails.
pub fn save_export(dir: &Path, goal_name: Option<&str>, csv: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(goal_name));
    std::fs::write(&path, csv)?;
    tracing::info!(path = %path.display(), bytes = csv.len(), "goal history exported");
    Ok(path)
}
