use std::fmt::Write;

use chrono::NaiveDate;

/// Registration of a user, borrowed from its source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRecord<'a> {
    /// Identifier that session lines refer back to.
    pub id: &'a str,
    /// Given name.
    pub first_name: &'a str,
    /// Family name.
    pub last_name: &'a str,
    /// Age in years.
    pub age: u32,
}

impl UserRecord<'_> {
    /// Name used as the user's key in the report.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One user session, borrowed from its source line.
///
/// Lives only for a single fold step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRecord<'a> {
    /// Owning user's identifier.
    pub user: &'a str,
    /// Calendar date of the session.
    pub date: NaiveDate,
    /// Browser name as written in the log (e.g. `Internet Explorer`).
    pub browser_name: &'a str,
    /// Browser major version.
    pub browser_version: u32,
    /// Session length in minutes.
    pub duration_minutes: u32,
}

impl SessionRecord<'_> {
    /// Whether the session used Chrome.
    pub fn is_chrome(&self) -> bool {
        contains_ignore_ascii_case(self.browser_name, "chrome")
    }

    /// Whether the session used Internet Explorer.
    pub fn is_internet_explorer(&self) -> bool {
        contains_ignore_ascii_case(self.browser_name, "internet explorer")
    }

    /// Write the report label (`"NAME VERSION"`, name upper-cased) into `buf`.
    ///
    /// The buffer is cleared first so callers can reuse one allocation for
    /// the whole run.
    pub fn write_browser_label(&self, buf: &mut String) {
        buf.clear();
        for c in self.browser_name.chars() {
            buf.extend(c.to_uppercase());
        }
        // Writing into a String cannot fail.
        let _ = write!(buf, " {}", self.browser_version);
    }

    /// Allocating variant of [`write_browser_label`](Self::write_browser_label).
    pub fn browser_label(&self) -> String {
        let mut label = String::with_capacity(self.browser_name.len() + 4);
        self.write_browser_label(&mut label);
        label
    }
}

/// A successfully parsed log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLine<'a> {
    /// `user,...` line.
    User(UserRecord<'a>),
    /// `session,...` line.
    Session(SessionRecord<'a>),
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}
