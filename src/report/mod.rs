//! Final report structure.
//!
//! [`build_report`] turns accumulator state into a [`Report`]; the `json`
//! functions encode it. All ordering in the output is decided here, never by
//! accumulator storage order.

mod builder;
mod json;

pub use builder::{build_report, DateOrder};
pub use json::{render_report, to_json_bytes, write_report};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate statistics for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Registered users.
    pub total_users: u64,
    /// Distinct `"NAME VERSION"` labels.
    pub unique_browsers_count: u64,
    /// Sessions folded.
    pub total_sessions: u64,
    /// Distinct labels, sorted and joined with `,`.
    pub all_browsers: String,
    /// Per-user statistics keyed by display name.
    pub users_stats: BTreeMap<String, UserStats>,
}

/// Statistics for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Number of sessions.
    pub sessions_count: u32,
    /// Sum of durations, e.g. `"455 min."`.
    pub total_time: String,
    /// Longest single session, e.g. `"118 min."`.
    pub longest_session: String,
    /// Labels in arrival order, duplicates kept, joined with `", "`.
    pub browsers: String,
    /// Any session used Internet Explorer.
    #[serde(rename = "usedIE")]
    pub used_ie: bool,
    /// Every session used Chrome.
    pub always_used_chrome: bool,
    /// Session dates as `YYYY-MM-DD`, chronologically sorted.
    pub dates: Vec<String>,
}
