//! Goal-list response normalization.
//!
//! `GET /goals` wraps its array in anywhere from zero to three `data`
//! objects depending on the server version. This is the only place that
//! knows about the nesting; everything past it sees a flat list.
//!
//! TODO: drop the fallback chain once the API settles on a single envelope.

use serde_json::Value;

use crate::goal::Goal;

/// The goal array inside `body`, or an empty slice if none is found.
///
/// Lookup order: `data.data.data`, `data.data`, `data`, then `body` itself.
/// The first candidate that is an array wins.
pub fn unwrap_goal_list(body: &Value) -> &[Value] {
    let candidates = [
        body.pointer("/data/data/data"),
        body.pointer("/data/data"),
        body.get("data"),
        Some(body),
    ];

    for candidate in candidates.into_iter().flatten() {
        if let Some(items) = candidate.as_array() {
            return items;
        }
    }

    tracing::warn!("goal list response has no array under any known envelope, using empty list");
    &[]
}

/// The single goal object inside `body` (`GET /goals/{id}`), using the same
/// lookup order as [`unwrap_goal_list`] but looking for an object with an `id`.
pub fn unwrap_goal_record(body: &Value) -> Option<&Value> {
    [
        body.pointer("/data/data/data"),
        body.pointer("/data/data"),
        body.get("data"),
        Some(body),
    ]
    .into_iter()
    .flatten()
    .find(|candidate| candidate.get("id").is_some())
}

/// Parse the goal list out of `body`. Entries that do not parse as a
/// [`Goal`] are logged and skipped.
pub fn parse_goal_list(body: &Value) -> Vec<Goal> {
    unwrap_goal_list(body)
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Goal>(item.clone()) {
            Ok(goal) => Some(goal),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed goal entry");
                None
            }
        })
        .collect()
}
