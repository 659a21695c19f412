use std::collections::BTreeMap;

use tracing::warn;

use super::{Report, UserStats};
use crate::accumulator::{GlobalAccumulator, UserAccumulator};
use crate::record::DATE_FORMAT;

/// Direction in which each user's `dates` are sorted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateOrder {
    /// Oldest first.
    #[default]
    Ascending,
    /// Newest first.
    Descending,
}

/// Convert end-of-stream accumulator state into the final report.
///
/// Deterministic for a given input: every order-sensitive field is sorted
/// here. Users are consumed one at a time so their per-session vectors are
/// freed as the report fills up.
pub fn build_report(
    global: GlobalAccumulator,
    users: Vec<UserAccumulator>,
    date_order: DateOrder,
) -> Report {
    let mut labels: Vec<&str> = global.distinct_browsers().collect();
    labels.sort_unstable();
    let all_browsers = labels.join(",");

    let total_users = users.len() as u64;
    let mut users_stats = BTreeMap::new();
    for user in users {
        let (name, stats) = user_stats(&global, user, date_order);
        if users_stats.contains_key(&name) {
            warn!(user = %name, "duplicate display name, keeping the later user");
        }
        users_stats.insert(name, stats);
    }

    Report {
        total_users,
        unique_browsers_count: global.unique_browsers() as u64,
        total_sessions: global.total_sessions(),
        all_browsers,
        users_stats,
    }
}

fn user_stats(
    global: &GlobalAccumulator,
    user: UserAccumulator,
    date_order: DateOrder,
) -> (String, UserStats) {
    let UserAccumulator {
        name,
        session_count,
        total_minutes,
        longest_minutes,
        browsers_seen,
        used_internet_explorer,
        all_sessions_were_chrome,
        mut dates_seen,
    } = user;

    let mut browsers = String::new();
    for (idx, key) in browsers_seen.iter().enumerate() {
        if idx > 0 {
            browsers.push_str(", ");
        }
        browsers.push_str(global.resolve(*key));
    }

    match date_order {
        DateOrder::Ascending => dates_seen.sort_unstable(),
        DateOrder::Descending => dates_seen.sort_unstable_by(|a, b| b.cmp(a)),
    }

    let stats = UserStats {
        sessions_count: session_count,
        total_time: format_minutes(total_minutes),
        longest_session: format_minutes(u64::from(longest_minutes)),
        browsers,
        used_ie: used_internet_explorer,
        always_used_chrome: all_sessions_were_chrome,
        dates: dates_seen
            .iter()
            .map(|date| date.format(DATE_FORMAT).to_string())
            .collect(),
    };
    (name, stats)
}

fn format_minutes(minutes: u64) -> String {
    format!("{minutes} min.")
}
