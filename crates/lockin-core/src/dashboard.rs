//! Per-goal cards and dashboard aggregates.
//!
//! A [`GoalCard`] is what a list view shows for one goal: the countdown
//! from the deadline engine, the status treatment from the classifier, and
//! the progress percentage. [`DashboardSummary`] and [`chart_rows`] feed the
//! overview screen.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::deadline::{self, Countdown};
use crate::goal::Goal;
use crate::status::{self, ColorClass, StatusTag};

/// Chart labels longer than this are truncated.
const SHORT_NAME_LEN: usize = 10;

/// Text shown when a goal's deadline cannot be determined.
pub const UNKNOWN_COUNTDOWN: &str = "--";

/// How loudly a card should present its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Overdue,
    Urgent,
    Normal,
}

/// Derived view of one goal at a given instant.
#[derive(Debug, Clone, Serialize)]
pub struct GoalCard {
    pub goal: Goal,
    pub countdown: Countdown,
    /// The deadline could not be parsed or computed.
    pub deadline_invalid: bool,
    pub status: StatusTag,
    pub color: ColorClass,
    pub progress: u8,
    pub emphasis: Emphasis,
}

impl GoalCard {
    /// Evaluate `goal` at `now`. Never fails: a goal with an unusable
    /// deadline gets a placeholder countdown and `deadline_invalid = true`.
    pub fn build<Tz: TimeZone>(goal: Goal, now: &DateTime<Tz>) -> Self {
        let countdown = if goal.next_deadline_date_time.trim().is_empty() {
            deadline::next_deadline_for(&goal, now)
                .map(|due| Countdown::from_remaining(due - now.clone()))
        } else {
            deadline::time_until_deadline_at(&goal.next_deadline_date_time, now)
        };

        let (countdown, deadline_invalid) = match countdown {
            Ok(c) => (c, false),
            Err(e) => {
                tracing::warn!(goal_id = %goal.id, error = %e, "cannot compute countdown");
                (
                    Countdown {
                        text: UNKNOWN_COUNTDOWN.to_string(),
                        urgent: false,
                        overdue: false,
                    },
                    true,
                )
            }
        };

        let emphasis = if countdown.overdue {
            Emphasis::Overdue
        } else if countdown.urgent {
            Emphasis::Urgent
        } else {
            Emphasis::Normal
        };

        let tag = status::classify_status(&goal);
        Self {
            progress: status::progress_percentage(goal.current_streak, goal.target_amount),
            color: status::status_color(tag),
            status: tag,
            countdown,
            deadline_invalid,
            emphasis,
            goal,
        }
    }

    /// "3h 12m left", or "OVERDUE!" once the deadline has passed.
    pub fn deadline_label(&self) -> String {
        if self.countdown.overdue {
            format!("{}!", deadline::OVERDUE)
        } else {
            format!("{} left", self.countdown.text)
        }
    }

    /// Warning line for urgent, not yet overdue goals.
    pub fn risk_warning(&self) -> Option<String> {
        (self.emphasis == Emphasis::Urgent)
            .then(|| format!("Submit proof soon or lose {}!", self.goal.stake_label()))
    }
}

/// Build cards for every goal, in input order.
pub fn build_cards<Tz: TimeZone>(goals: Vec<Goal>, now: &DateTime<Tz>) -> Vec<GoalCard> {
    goals.into_iter().map(|g| GoalCard::build(g, now)).collect()
}

/// Aggregate numbers for the dashboard header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_goals: usize,
    pub active_goals: usize,
    /// Sum of stakes over all goals, active or not.
    pub total_at_stake: f64,
    pub total_streaks: u64,
    /// Rounded mean streak over all goals; 0 with no goals.
    pub average_streak: u64,
}

impl DashboardSummary {
    pub fn from_goals(goals: &[Goal]) -> Self {
        let total_streaks: u64 = goals.iter().map(|g| u64::from(g.current_streak)).sum();
        let average_streak = if goals.is_empty() {
            0
        } else {
            (total_streaks as f64 / goals.len() as f64).round() as u64
        };

        Self {
            total_goals: goals.len(),
            active_goals: goals.iter().filter(|g| g.is_active).count(),
            total_at_stake: goals.iter().map(|g| g.stake_amount).sum(),
            total_streaks,
            average_streak,
        }
    }
}

/// Bar color band for a progress value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    /// 80% and above
    High,
    /// 50% to 79%
    Medium,
    Low,
}

impl ProgressBand {
    pub fn for_progress(progress: u8) -> Self {
        match progress {
            80.. => ProgressBand::High,
            50..=79 => ProgressBand::Medium,
            _ => ProgressBand::Low,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            ProgressBand::High => "#10B981",
            ProgressBand::Medium => "#F59E0B",
            ProgressBand::Low => "#EF4444",
        }
    }
}

/// One bar in the streak/progress charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub name: String,
    pub full_name: String,
    pub streak: u32,
    pub target: f64,
    pub progress: u8,
    pub stake: f64,
    pub band: ProgressBand,
}

/// Chart rows for the active goals.
pub fn chart_rows(goals: &[Goal]) -> Vec<ChartRow> {
    goals
        .iter()
        .filter(|g| g.is_active)
        .map(|g| {
            let progress = status::progress_percentage(g.current_streak, g.target_amount);
            ChartRow {
                name: short_name(&g.name),
                full_name: g.name.clone(),
                streak: g.current_streak,
                target: g.target_amount,
                progress,
                stake: g.stake_amount,
                band: ProgressBand::for_progress(progress),
            }
        })
        .collect()
}

fn short_name(name: &str) -> String {
    if name.chars().count() > SHORT_NAME_LEN {
        let head: String = name.chars().take(SHORT_NAME_LEN).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}
