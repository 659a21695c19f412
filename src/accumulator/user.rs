use std::mem::size_of;

use chrono::NaiveDate;

use super::BrowserKey;
use crate::record::SessionRecord;

/// Running summary for a single user.
///
/// Created on the user's registration line and mutated only by
/// [`fold`](Self::fold).
#[derive(Debug, Clone)]
pub struct UserAccumulator {
    pub(crate) name: String,
    pub(crate) session_count: u32,
    pub(crate) total_minutes: u64,
    pub(crate) longest_minutes: u32,
    /// Insertion order, duplicates kept.
    pub(crate) browsers_seen: Vec<BrowserKey>,
    pub(crate) used_internet_explorer: bool,
    /// Starts true; cleared by the first non-Chrome session and never set again.
    pub(crate) all_sessions_were_chrome: bool,
    /// Insertion order; sorted only when the report is built.
    pub(crate) dates_seen: Vec<NaiveDate>,
}

impl UserAccumulator {
    /// Create an accumulator with no sessions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            session_count: 0,
            total_minutes: 0,
            longest_minutes: 0,
            browsers_seen: Vec::new(),
            used_internet_explorer: false,
            all_sessions_were_chrome: true,
            dates_seen: Vec::new(),
        }
    }

    /// Fold one session into the summary.
    ///
    /// `browser` must be the key the global accumulator issued for this
    /// session's label.
    pub fn fold(&mut self, session: &SessionRecord<'_>, browser: BrowserKey) {
        self.session_count += 1;
        self.total_minutes += u64::from(session.duration_minutes);
        self.longest_minutes = self.longest_minutes.max(session.duration_minutes);
        self.browsers_seen.push(browser);
        self.used_internet_explorer |= session.is_internet_explorer();
        self.all_sessions_were_chrome &= session.is_chrome();
        self.dates_seen.push(session.date);
    }

    /// Display name the report is keyed by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sessions folded so far.
    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    /// Sum of session durations.
    pub fn total_minutes(&self) -> u64 {
        self.total_minutes
    }

    /// Longest single session.
    pub fn longest_minutes(&self) -> u32 {
        self.longest_minutes
    }

    /// Browsers in the order the sessions arrived.
    pub fn browsers_seen(&self) -> &[BrowserKey] {
        &self.browsers_seen
    }

    /// Session dates in the order the sessions arrived.
    pub fn dates_seen(&self) -> &[NaiveDate] {
        &self.dates_seen
    }

    /// Whether any session used Internet Explorer.
    pub fn used_internet_explorer(&self) -> bool {
        self.used_internet_explorer
    }

    /// Whether every session so far used Chrome (true for a user with none).
    pub fn all_sessions_were_chrome(&self) -> bool {
        self.all_sessions_were_chrome
    }

    /// Heap bytes currently owned by this accumulator.
    pub fn heap_bytes(&self) -> usize {
        self.name.capacity()
            + self.browsers_seen.capacity() * size_of::<BrowserKey>()
            + self.dates_seen.capacity() * size_of::<NaiveDate>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::GlobalAccumulator;

    fn session(browser_name: &str, minutes: u32, day: u32) -> SessionRecord<'_> {
        SessionRecord {
            user: "0",
            date: NaiveDate::from_ymd_opt(2017, 1, day).unwrap(),
            browser_name,
            browser_version: 1,
            duration_minutes: minutes,
        }
    }

    fn fold_all(sessions: &[SessionRecord<'_>]) -> UserAccumulator {
        let mut global = GlobalAccumulator::new();
        let mut user = UserAccumulator::new("Ada Lovelace");
        for s in sessions {
            let (key, _) = global.fold_session(&s.browser_label());
            user.fold(s, key);
        }
        user
    }

    #[test]
    fn new_user_has_vacuous_flags() {
        let user = UserAccumulator::new("Ada Lovelace");
        assert_eq!(user.session_count(), 0);
        assert!(user.all_sessions_were_chrome());
        assert!(!user.used_internet_explorer());
    }

    #[test]
    fn totals_and_longest() {
        let user = fold_all(&[session("Chrome", 30, 1), session("Chrome", 90, 2), session("Chrome", 5, 3)]);
        assert_eq!(user.session_count(), 3);
        assert_eq!(user.total_minutes(), 125);
        assert_eq!(user.longest_minutes(), 90);
        assert!(user.all_sessions_were_chrome());
    }

    #[test]
    fn chrome_flag_never_recovers() {
        let user = fold_all(&[session("Chrome", 1, 1), session("Firefox", 1, 2), session("Chrome", 1, 3)]);
        assert!(!user.all_sessions_were_chrome());
    }

    #[test]
    fn internet_explorer_flag_sticks() {
        let user = fold_all(&[session("Internet Explorer", 1, 1), session("Safari", 1, 2)]);
        assert!(user.used_internet_explorer());
    }

    #[test]
    fn keeps_arrival_order_and_duplicates() {
        let user = fold_all(&[session("Safari", 1, 9), session("Chrome", 1, 3), session("Safari", 1, 5)]);
        assert_eq!(user.browsers_seen().len(), 3);
        assert_eq!(user.browsers_seen()[0], user.browsers_seen()[2]);
        let days: Vec<_> = user.dates_seen().iter().map(|d| d.to_string()).collect();
        assert_eq!(days, ["2017-01-09", "2017-01-03", "2017-01-05"]);
    }

    #[test]
    fn heap_bytes_track_growth() {
        let empty = UserAccumulator::new(String::new()).heap_bytes();
        let user = fold_all(&[session("Chrome", 1, 1)]);
        assert!(user.heap_bytes() > empty);
    }
}
