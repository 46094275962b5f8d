//! Status classifier.
//!
//! The server assigns each goal a status string. This module maps it onto a
//! fixed tag set and a display treatment, and computes the progress
//! percentage used by bars and charts. No status is derived locally.

use serde::{Deserialize, Serialize};

use crate::goal::Goal;

/// Known status values. Anything else is [`StatusTag::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTag {
    Active,
    Warning,
    Danger,
    Safe,
    Other,
}

impl StatusTag {
    /// Total over all strings: unrecognized values fall back to `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => StatusTag::Active,
            "warning" => StatusTag::Warning,
            "danger" => StatusTag::Danger,
            "safe" => StatusTag::Safe,
            _ => StatusTag::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTag::Active => "active",
            StatusTag::Warning => "warning",
            StatusTag::Danger => "danger",
            StatusTag::Safe => "safe",
            StatusTag::Other => "other",
        }
    }
}

/// Display treatment for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    /// green
    Positive,
    /// yellow
    Caution,
    /// red
    Critical,
    /// blue, the fallback
    Neutral,
}

impl ColorClass {
    pub fn color_name(&self) -> &'static str {
        match self {
            ColorClass::Positive => "green",
            ColorClass::Caution => "yellow",
            ColorClass::Critical => "red",
            ColorClass::Neutral => "blue",
        }
    }

    /// Badge class string for web front ends.
    pub fn badge_class(&self) -> &'static str {
        match self {
            ColorClass::Positive => "bg-green-500/20 text-green-400 border-green-500/30",
            ColorClass::Caution => "bg-yellow-500/20 text-yellow-400 border-yellow-500/30",
            ColorClass::Critical => "bg-red-500/20 text-red-400 border-red-500/30",
            ColorClass::Neutral => "bg-blue-500/20 text-blue-400 border-blue-500/30",
        }
    }
}

/// Tag for the server-assigned status of `goal`.
pub fn classify_status(goal: &Goal) -> StatusTag {
    StatusTag::parse(&goal.status)
}

/// Badge treatment for a tag. `Safe` has no rule of its own and shares the
/// neutral fallback.
pub fn status_color(tag: StatusTag) -> ColorClass {
    match tag {
        StatusTag::Active => ColorClass::Positive,
        StatusTag::Warning => ColorClass::Caution,
        StatusTag::Danger => ColorClass::Critical,
        StatusTag::Safe | StatusTag::Other => ColorClass::Neutral,
    }
}

/// Streak progress toward the target, as a whole percentage in `0..=100`.
///
/// A zero, negative or NaN target yields 0.
pub fn progress_percentage(current_streak: u32, target_amount: f64) -> u8 {
    if !(target_amount > 0.0) {
        return 0;
    }
    let pct = (f64::from(current_streak) / target_amount * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
