//! # Lockin Core Library
//!
//! Client-side logic for the Lockin habit-accountability service: users
//! stake money on recurring goals and submit proof before each deadline.
//! The remote API owns all goal state; this crate derives what a client
//! shows from it and talks to the API on the user's behalf.
//!
//! ## Architecture
//!
//! - **Deadline engine** ([`deadline`]): countdown text and urgency for a
//!   goal's next deadline, next-deadline rollover per interval
//! - **Status classifier** ([`status`]): status tags, badge colors, progress
//! - **Dashboard** ([`dashboard`]): per-goal cards and overview aggregates
//! - **Envelope** ([`envelope`]): the one place that unwraps the goal-list
//!   response nesting
//! - **API client** ([`api`]): async REST client with bearer authentication
//! - **Storage** ([`storage`]): TOML config, SQLite goal cache, keyring
//!
//! ## Key Components
//!
//! - [`Countdown`] / [`time_until_deadline`]: what a goal card shows
//! - [`GoalCard`]: countdown, status and progress for one goal
//! - [`GoalsClient`]: the REST client
//! - [`Config`]: application configuration management

pub mod api;
pub mod dashboard;
pub mod deadline;
pub mod envelope;
pub mod error;
pub mod goal;
pub mod status;
pub mod storage;

pub use api::{GoalsClient, KeyringTokenSource, ProofSubmission, StaticToken, TokenSource};
pub use dashboard::{chart_rows, ChartRow, DashboardSummary, Emphasis, GoalCard, ProgressBand};
pub use deadline::{next_deadline, time_until_deadline, time_until_deadline_at, Countdown, OVERDUE};
pub use envelope::{parse_goal_list, unwrap_goal_list};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use goal::{Goal, GoalId, GoalInterval, NewGoal, ProofType, UserRegistration};
pub use status::{classify_status, progress_percentage, status_color, ColorClass, StatusTag};
pub use storage::{Config, DevSession, GoalCache};
