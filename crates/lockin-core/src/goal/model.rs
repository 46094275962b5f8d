//! Goal records as projected from the remote API.
//!
//! The server owns every goal; the client holds a read-only copy. Field
//! names follow the API's camelCase and accept the older aliases some
//! endpoints still emit (`streak`, `nextDeadline`, `lastProofSubmitted`).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::deadline::normalize_deadline_time;
use crate::error::{Result, ValidationError};

/// Opaque goal identifier. The API sends either a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GoalId(pub String);

impl<'de> Deserialize<'de> for GoalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => GoalId(s),
            Raw::Number(n) => GoalId(n.to_string()),
        })
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GoalId {
    fn from(s: &str) -> Self {
        GoalId(s.to_string())
    }
}

/// Recurrence period governing deadline rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalInterval {
    #[serde(alias = "day", alias = "Daily")]
    Daily,
    #[serde(alias = "week", alias = "Weekly")]
    Weekly,
    #[serde(alias = "month", alias = "Monthly")]
    Monthly,
}

impl GoalInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalInterval::Daily => "daily",
            GoalInterval::Weekly => "weekly",
            GoalInterval::Monthly => "monthly",
        }
    }

    /// Singular unit used in "30 minutes / day" labels.
    pub fn unit(&self) -> &'static str {
        match self {
            GoalInterval::Daily => "day",
            GoalInterval::Weekly => "week",
            GoalInterval::Monthly => "month",
        }
    }
}

impl std::str::FromStr for GoalInterval {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(GoalInterval::Daily),
            "weekly" | "week" => Ok(GoalInterval::Weekly),
            "monthly" | "month" => Ok(GoalInterval::Monthly),
            other => Err(ValidationError::invalid(
                "interval",
                format!("'{other}' is not one of daily, weekly, monthly"),
            )),
        }
    }
}

/// What kind of evidence a goal expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofType {
    Photo,
    Screenshot,
    Video,
    Data,
}

impl std::str::FromStr for ProofType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "photo" => Ok(ProofType::Photo),
            "screenshot" => Ok(ProofType::Screenshot),
            "video" => Ok(ProofType::Video),
            "data" => Ok(ProofType::Data),
            other => Err(ValidationError::invalid(
                "proofType",
                format!("'{other}' is not one of photo, screenshot, video, data"),
            )),
        }
    }
}

/// Server-provided explanation of the current status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDescription {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub time_detail: Option<String>,
}

/// A goal as returned by `GET /goals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: f64,
    pub interval: GoalInterval,
    #[serde(default)]
    pub stake_amount: f64,
    #[serde(default)]
    pub deadline_time: String,
    /// Empty when the server did not send one.
    #[serde(default, alias = "nextDeadline", deserialize_with = "null_as_empty")]
    pub next_deadline_date_time: String,
    #[serde(default, alias = "streak")]
    pub current_streak: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub status_description: Option<StatusDescription>,
    #[serde(default, alias = "lastProofSubmitted")]
    pub last_proof_date: Option<String>,
    #[serde(default, alias = "hardcoreMode")]
    pub hard_core_mode: bool,
    #[serde(default)]
    pub proof_type: Option<ProofType>,
    #[serde(default)]
    pub display_stake_amount: Option<String>,
    #[serde(default)]
    pub display_target: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_true() -> bool {
    true
}

fn default_status() -> String {
    "active".into()
}

impl Goal {
    /// "30 minutes / day" style label, preferring the server's rendering.
    pub fn target_label(&self) -> String {
        match &self.display_target {
            Some(label) if !label.is_empty() => label.clone(),
            _ => format!("{} minutes / {}", self.target_amount, self.interval.unit()),
        }
    }

    /// "$12.50" style label, preferring the server's rendering.
    pub fn stake_label(&self) -> String {
        match &self.display_stake_amount {
            Some(label) if !label.is_empty() => label.clone(),
            _ => format!("${:.2}", self.stake_amount),
        }
    }
}

/// Body of `POST /goals`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub target_amount: f64,
    pub interval: GoalInterval,
    pub hard_core_mode: bool,
    pub proof_type: ProofType,
    pub stake_amount: f64,
    pub deadline_time: String,
}

impl NewGoal {
    /// Check the creation invariants and normalize `deadline_time` to `HH:mm:ss`.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for a blank name, a non-positive target,
    /// a negative stake, or a malformed deadline time.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(ValidationError::Empty("name".into()));
        }
        if !(self.target_amount > 0.0) {
            return Err(ValidationError::invalid(
                "targetAmount",
                "must be greater than zero",
            ));
        }
        if !(self.stake_amount >= 0.0) {
            return Err(ValidationError::invalid("stakeAmount", "must not be negative"));
        }
        self.deadline_time = normalize_deadline_time(&self.deadline_time)?;
        Ok(self)
    }
}

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}
